//! Case catalog and report handlers.

use std::sync::Arc;

use voicechain_config::Config;
use voicechain_workflow::{Case, CaseRegistry, ScanReport, SelectionSet};

use crate::app::{band_label, format_eur, load_registry, open_engine, parse_category, truncate};
use crate::cli::CasesAction;

/// Handle cases subcommands.
pub(crate) async fn handle_cases_command(
    action: CasesAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CasesAction::List { category, format } => cases_list(config, category.as_deref(), &format).await,
        CasesAction::Show { case_id, format } => case_show(config, &case_id, &format).await,
    }
}

async fn cases_list(
    config: &Config,
    category: Option<&str>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let category = parse_category(category)?;
    let registry = load_registry(&config.workflow).await?;
    let cases = registry.filter(category);

    if cases.is_empty() {
        println!("No cases found.");
        return Ok(());
    }

    match format {
        "json" => {
            let cases: Vec<&Case> = cases.iter().map(|c| c.as_ref()).collect();
            println!("{}", serde_json::to_string_pretty(&cases)?);
        }
        _ => print_case_table(&cases, None),
    }

    Ok(())
}

async fn case_show(
    config: &Config,
    case_id: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = load_registry(&config.workflow).await?;
    let case = registry.get_case(case_id)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(case.as_ref())?);
        return Ok(());
    }

    println!("Case: {}", case.title);
    println!("{}", "=".repeat(50));
    println!("ID:          {}", case.id);
    println!("Channel:     {}", case.channel_name);
    println!("URL:         {}", case.source_url);
    if let Some(date) = case.upload_date {
        println!("Uploaded:    {}", date);
    }
    println!("Category:    {}", case.category);
    println!(
        "Confidence:  {}% ({})",
        case.confidence,
        band_label(case.confidence_band())
    );
    println!("Views:       {}", case.views);
    println!("Monetized:   {}", if case.monetized { "yes" } else { "no" });
    println!("Recovery:    {}", format_eur(case.estimated_revenue));

    if !case.match_timestamps.is_empty() {
        println!("Matches:");
        for timestamp in &case.match_timestamps {
            println!("  {:<9} {}", timestamp, case.timestamp_url(timestamp));
        }
    }
    if !case.description.is_empty() {
        println!("\n{}", case.description);
    }

    println!("\nMilestones:");
    for (label, status) in case.milestones.labelled() {
        println!("  - {:<22} {}", label, status.as_str());
    }

    Ok(())
}

/// Scan report: headline figures plus the case list with selection markers.
pub(crate) async fn handle_report_command(
    config: &Config,
    category: Option<&str>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let category = parse_category(category)?;
    let engine = open_engine(config).await?;
    let report = ScanReport::compute(engine.registry().as_ref(), config.scan.videos_target);
    let cases = engine.registry().filter(category);

    if format == "json" {
        let cases: Vec<&Case> = cases.iter().map(|c| c.as_ref()).collect();
        let json = serde_json::json!({
            "report": report,
            "cases": cases,
            "selected": engine.selection().members(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    print_report_header(&report);
    println!();
    if cases.is_empty() {
        println!("No cases found.");
    } else {
        print_case_table(&cases, Some(engine.selection()));
    }

    Ok(())
}

pub(crate) fn print_report_header(report: &ScanReport) {
    println!("Scan Report");
    println!("{}", "=".repeat(50));
    println!("Videos scanned:        {}", report.videos_scanned);
    println!("Matches found:         {}", report.matches_found);
    println!(
        "Estimated revenue loss: {}",
        format_eur(report.estimated_revenue_loss)
    );
    println!("Reputation risk:       {}", report.reputation_risk);
    println!(
        "Action: {}  Monitor: {}  Review: {}",
        report.action_count, report.monitor_count, report.review_count
    );
}

/// Case table. With a selection, a marker column shows membership.
pub(crate) fn print_case_table(cases: &[Arc<Case>], selection: Option<&SelectionSet>) {
    let marker = |case: &Case| match selection {
        Some(s) if s.contains(&case.id) => "[x] ",
        Some(_) => "[ ] ",
        None => "",
    };
    let pad = if selection.is_some() { "    " } else { "" };

    println!(
        "{}{:<4} {:<32} {:<9} {:<11} {:>10} {:>10}",
        pad, "ID", "TITLE", "CATEGORY", "CONFIDENCE", "VIEWS", "RECOVERY"
    );
    println!("{}", "-".repeat(80 + pad.len()));
    for case in cases {
        println!(
            "{}{:<4} {:<32} {:<9} {:<11} {:>10} {:>10}",
            marker(case.as_ref()),
            case.id,
            truncate(&case.title, 32),
            case.category.as_str(),
            format!("{}% {}", case.confidence, band_label(case.confidence_band())),
            case.views,
            format_eur(case.estimated_revenue)
        );
    }
}
