//! Workflow subcommand handlers.

use tracing::warn;

use voicechain_config::Config;
use voicechain_workflow::{
    demo_partners, steps, CaseRegistry, StepChange, StepState, WorkflowEngine, WorkflowError,
};

use crate::app::{format_eur, open_engine, parse_category, truncate};
use crate::cli::WorkflowAction;

/// Handle workflow subcommands.
pub(crate) async fn handle_workflow_command(
    action: WorkflowAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine(config).await?;

    match action {
        WorkflowAction::Status { format } => return print_status(&engine, &format),
        WorkflowAction::Next => {
            let change = engine.next().await;
            report_change(&engine, change)?;
        }
        WorkflowAction::Prev => {
            let change = engine.previous().await;
            report_change(&engine, change)?;
        }
        WorkflowAction::Goto { step } => {
            let target = engine
                .definition()
                .resolve(&step)
                .ok_or_else(|| format!("Unknown step: {}", step))?;
            let change = engine.go_to(target).await;
            report_change(&engine, change)?;
        }
        WorkflowAction::Toggle { case_id } => {
            let selected = engine.toggle(&case_id).await?;
            let title = engine
                .registry()
                .get_case(&case_id)
                .map(|c| c.title.clone())
                .unwrap_or_else(|_| "(no longer in catalog)".to_string());
            let verb = if selected { "Selected" } else { "Deselected" };
            println!("{} case {}: {}", verb, case_id, title);
            print_selection_total(&engine);
        }
        WorkflowAction::SelectAll { category } => {
            let visible: Vec<String> = match parse_category(category.as_deref())? {
                Some(category) => engine.registry().filter(Some(category)),
                None => engine.registry().actionable(),
            }
            .iter()
            .map(|c| c.id.clone())
            .collect();

            if engine.toggle_all(&visible).await? {
                println!("Selected {} cases.", engine.selection().len());
            } else {
                println!("Selection cleared.");
            }
            print_selection_total(&engine);
        }
        WorkflowAction::Clear => {
            engine.clear_selection().await;
            println!("Selection cleared.");
        }
        WorkflowAction::Reset => {
            engine.reset().await?;
            println!("Workflow progress reset.");
        }
        WorkflowAction::Complete { format } => {
            let summary = engine.complete()?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Workflow complete.");
                println!("Cases pursued:             {}", summary.case_count);
                println!(
                    "Total estimated recovery:  {}",
                    format_eur(summary.total_estimated_recovery)
                );
            }
        }
    }

    if engine.is_degraded() {
        warn!("Progress could not be saved");
        println!("Warning: progress could not be saved; changes last only for this run.");
    }

    Ok(())
}

/// Print the outcome of a navigation request. Rejected steps are reported
/// as a no-op rather than an error.
fn report_change(
    engine: &WorkflowEngine,
    change: Result<StepChange, WorkflowError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match change {
        Ok(change) if change.is_noop() => {
            println!("Already at step {}.", change.to);
        }
        Ok(change) => {
            let label = engine
                .definition()
                .step(change.to)
                .map(|s| s.label.as_str())
                .unwrap_or("");
            println!("Step {}/{}: {}", change.to, engine.total_steps(), label);
        }
        Err(e) if e.is_invalid_step() => {
            println!("No change: {}", e);
        }
        Err(e) => return Err(e.into()),
    }
    print_strip(engine);
    Ok(())
}

fn print_strip(engine: &WorkflowEngine) {
    let strip: Vec<String> = engine
        .step_strip()
        .into_iter()
        .map(|(step, state)| {
            let mark = match state {
                StepState::Completed => "x",
                StepState::Current => ">",
                StepState::Upcoming if step.index <= engine.highest_step_reached() => "~",
                StepState::Upcoming => " ",
            };
            format!("[{}] {}", mark, step.short_label)
        })
        .collect();
    println!("{}", strip.join("  "));
}

fn print_selection_total(engine: &WorkflowEngine) {
    let summary = engine.summary();
    println!(
        "{} selected, estimated recovery {}",
        summary.case_count,
        format_eur(summary.total_estimated_recovery)
    );
}

fn print_status(engine: &WorkflowEngine, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let summary = engine.summary();

    if format == "json" {
        let strip: Vec<_> = engine
            .step_strip()
            .into_iter()
            .map(|(step, state)| serde_json::json!({ "step": step, "state": state }))
            .collect();
        let json = serde_json::json!({
            "record": engine.record(),
            "badge": engine.badge().map(|b| b.to_string()),
            "steps": strip,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let label = engine
        .current_step_definition()
        .map(|s| s.label.as_str())
        .unwrap_or("");
    println!(
        "Step {}/{}: {}  (highest reached: {})",
        engine.current_step(),
        engine.total_steps(),
        label,
        engine.highest_step_reached()
    );
    print_strip(engine);
    println!();

    if engine.current_step() == steps::SELECTION {
        println!("{:<8} {:<32} {:<9} {:>10}", "", "TITLE", "CATEGORY", "RECOVERY");
        println!("{}", "-".repeat(64));
        for (case, selected) in engine.selectable_cases() {
            let mark = if selected { "[x]" } else { "[ ]" };
            println!(
                "{} {:<4} {:<32} {:<9} {:>10}",
                mark,
                case.id,
                truncate(&case.title, 32),
                case.category.as_str(),
                format_eur(case.estimated_revenue)
            );
        }
    } else {
        let cases = engine.selected_cases();
        if cases.is_empty() {
            println!("No cases selected.");
        }
        for case in cases {
            println!(
                "  {:<4} {:<32} {:>10}",
                case.id,
                truncate(&case.title, 32),
                format_eur(case.estimated_revenue)
            );
        }
    }

    if engine.current_step() == steps::LEGAL {
        print_partners()?;
    }

    println!();
    println!(
        "Selected: {}  Estimated recovery: {}",
        summary.case_count,
        format_eur(summary.total_estimated_recovery)
    );
    if summary.stale_references > 0 {
        println!(
            "{} selected case(s) are no longer in the catalog and were skipped.",
            summary.stale_references
        );
    }

    Ok(())
}

fn print_partners() -> Result<(), Box<dyn std::error::Error>> {
    println!("\nLegal partners:");
    println!(
        "{:<20} {:<32} {:<10} {:>6}  {:<12} {}",
        "NAME", "SPECIALIZATION", "LOCATION", "RATING", "RATE", "STATUS"
    );
    println!("{}", "-".repeat(100));
    for partner in demo_partners()? {
        println!(
            "{:<20} {:<32} {:<10} {:>6.1}  {:<12} {}",
            truncate(&partner.name, 20),
            truncate(&partner.specialization, 32),
            partner.location,
            partner.rating,
            partner.hourly_rate,
            if partner.available { "available" } else { "booked" }
        );
    }
    Ok(())
}
