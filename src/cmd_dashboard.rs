//! Dashboard handler: milestone progress of the selected cases.

use voicechain_config::Config;
use voicechain_workflow::MilestoneStatus;

use crate::app::{format_eur, open_engine, truncate};

pub(crate) async fn handle_dashboard_command(
    config: &Config,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine(config).await?;
    let summary = engine.summary();
    let cases = engine.selected_cases();

    if format == "json" {
        let rows: Vec<_> = cases
            .iter()
            .map(|case| {
                serde_json::json!({
                    "id": case.id,
                    "title": case.title,
                    "milestones": case.milestones,
                    "overallProgress": case.milestones.overall_progress(),
                    "estimatedRevenue": case.estimated_revenue,
                })
            })
            .collect();
        let json = serde_json::json!({
            "badge": engine.badge().map(|b| b.to_string()),
            "summary": summary,
            "cases": rows,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("Protection Dashboard");
    println!("{}", "=".repeat(50));
    if let Some(badge) = engine.badge() {
        println!("Workflow in progress: step {}", badge);
    }
    println!("Active cases:             {}", summary.case_count);
    println!("Average progress:         {}%", summary.average_progress);
    println!(
        "Total estimated recovery: {}",
        format_eur(summary.total_estimated_recovery)
    );

    if cases.is_empty() {
        println!("\nNo cases selected. Run `voicechain workflow toggle <id>` to add one.");
        return Ok(());
    }

    println!();
    println!("{:<4} {:<32} {:>8}  {}", "ID", "TITLE", "PROGRESS", "MILESTONES");
    println!("{}", "-".repeat(80));
    for case in &cases {
        let marks: String = case
            .milestones
            .labelled()
            .iter()
            .map(|(_, status)| match status {
                MilestoneStatus::Completed => '#',
                MilestoneStatus::InProgress => '+',
                MilestoneStatus::Pending => '.',
            })
            .collect();
        println!(
            "{:<4} {:<32} {:>7}%  {}",
            case.id,
            truncate(&case.title, 32),
            case.milestones.overall_progress(),
            marks
        );
    }
    println!("\nMilestones: evidence, report, outreach, legal (# done, + in progress, . pending)");

    if summary.stale_references > 0 {
        println!(
            "{} selected case(s) are no longer in the catalog and were skipped.",
            summary.stale_references
        );
    }

    Ok(())
}
