//! Scan handler: record a sample, run the simulated scan, show the report.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use voicechain_config::Config;
use voicechain_scan::{
    acquire, Counter, Permission, ScanEvent, ScanSimulation, SimulatedMicrophone,
};
use voicechain_workflow::ScanReport;

use crate::app::load_registry;
use crate::cmd_cases::print_report_header;

pub(crate) async fn handle_scan_command(
    config: &Config,
    seed: Option<u64>,
    record_ms: u64,
    deny_microphone: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if record_ms > 0 {
        record_sample(record_ms, deny_microphone).await?;
    }

    let mut scan_config = config.scan.clone();
    if seed.is_some() {
        scan_config.seed = seed;
    }

    let mut handle = ScanSimulation::start(&scan_config)?;
    let token = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let mut last_progress = 0;
    while let Some(event) = handle.next_event().await {
        match event {
            ScanEvent::StageEntered { stage } => println!("==> {}", stage),
            ScanEvent::Tick {
                counter: Counter::Progress,
                value,
            } if value >= last_progress + 10 => {
                last_progress = value;
                let snapshot = handle.snapshot();
                println!(
                    "    {:>3}%  videos scanned: {:>5}  matches: {}",
                    snapshot.progress, snapshot.videos_scanned, snapshot.matches_found
                );
            }
            ScanEvent::Completed => println!("    scan finished"),
            _ => {}
        }
    }

    if handle.is_cancelled() {
        println!("Scan cancelled.");
        return Ok(());
    }

    info!("Scan used seed {}", handle.seed());
    let registry = load_registry(&config.workflow).await?;
    let report = ScanReport::compute(registry.as_ref(), handle.snapshot().videos_scanned);
    println!();
    print_report_header(&report);
    println!("\nRun `voicechain report` to review the cases.");

    Ok(())
}

async fn record_sample(record_ms: u64, deny: bool) -> Result<(), Box<dyn std::error::Error>> {
    let permission = if deny {
        Permission::Denied
    } else {
        Permission::Granted
    };
    println!("Requesting microphone access...");
    let session = acquire(Arc::new(SimulatedMicrophone::new(permission))).await?;

    println!("Recording voice sample for {} ms...", record_ms);
    tokio::time::sleep(Duration::from_millis(record_ms)).await;
    let recorded = session.stop();
    println!("Recorded {:.1}s of audio.", recorded.as_secs_f64());
    Ok(())
}
