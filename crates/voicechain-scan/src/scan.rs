//! Simulated voice scan.
//!
//! A scan runs a set of timers: one per counter, one per stage boundary and
//! one that announces the report. Their output is a stream of [`ScanEvent`]s
//! read through a [`ScanHandle`]. Dropping or cancelling the handle stops
//! every timer, and no event is delivered afterwards.

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use voicechain_config::ScanConfig;

use crate::error::{ScanError, ScanResult};
use crate::timer::{TimerControl, TimerGroup};

/// Stage of the scan pipeline, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStage {
    Encrypting,
    Uploading,
    Scanning,
    Analyzing,
    Complete,
}

impl ScanStage {
    pub const ALL: [ScanStage; 5] = [
        ScanStage::Encrypting,
        ScanStage::Uploading,
        ScanStage::Scanning,
        ScanStage::Analyzing,
        ScanStage::Complete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScanStage::Encrypting => "Encrypting voice sample",
            ScanStage::Uploading => "Uploading encrypted fingerprint",
            ScanStage::Scanning => "Scanning platforms",
            ScanStage::Analyzing => "Analyzing matches",
            ScanStage::Complete => "Scan complete",
        }
    }

    fn duration_ms(self, config: &ScanConfig) -> u64 {
        let stages = &config.stages;
        match self {
            ScanStage::Encrypting => stages.encrypting_ms,
            ScanStage::Uploading => stages.uploading_ms,
            ScanStage::Scanning => stages.scanning_ms,
            ScanStage::Analyzing => stages.analyzing_ms,
            ScanStage::Complete => stages.complete_ms,
        }
    }
}

impl fmt::Display for ScanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counter advanced by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Progress,
    VideosScanned,
    MatchesFound,
}

/// Discrete output of a running scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    /// A counter moved to `value`.
    Tick { counter: Counter, value: u64 },
    StageEntered { stage: ScanStage },
    /// Progress reached 100 percent.
    Completed,
    /// The report is ready; the scan has stopped.
    NavigateToReport,
}

/// Latest counter values, folded from events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSnapshot {
    pub stage: Option<ScanStage>,
    pub progress: u32,
    pub videos_scanned: u64,
    pub matches_found: u32,
    pub completed: bool,
    pub report_ready: bool,
}

impl ScanSnapshot {
    pub fn apply(&mut self, event: &ScanEvent) {
        match *event {
            ScanEvent::Tick { counter, value } => match counter {
                Counter::Progress => self.progress = value as u32,
                Counter::VideosScanned => self.videos_scanned = value,
                Counter::MatchesFound => self.matches_found = value as u32,
            },
            ScanEvent::StageEntered { stage } => self.stage = Some(stage),
            ScanEvent::Completed => self.completed = true,
            ScanEvent::NavigateToReport => self.report_ready = true,
        }
    }
}

/// Starts simulated scans.
pub struct ScanSimulation;

impl ScanSimulation {
    /// Check that `config` can drive the scan timers.
    pub fn validate(config: &ScanConfig) -> ScanResult<()> {
        let intervals = [
            ("progress_interval_ms", config.progress_interval_ms),
            ("videos_interval_ms", config.videos_interval_ms),
            ("matches_interval_ms", config.matches_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ScanError::InvalidConfig(format!("{} must be positive", name)));
            }
        }
        if config.progress_step == 0 {
            return Err(ScanError::InvalidConfig(
                "progress_step must be positive".to_string(),
            ));
        }
        if config.videos_min_increment > config.videos_max_increment {
            return Err(ScanError::InvalidConfig(format!(
                "videos_min_increment {} exceeds videos_max_increment {}",
                config.videos_min_increment, config.videos_max_increment
            )));
        }
        if !(0.0..=1.0).contains(&config.match_probability) {
            return Err(ScanError::InvalidConfig(format!(
                "match_probability {} is outside 0..=1",
                config.match_probability
            )));
        }
        Ok(())
    }

    /// Start a scan. Must be called from within a tokio runtime.
    pub fn start(config: &ScanConfig) -> ScanResult<ScanHandle> {
        Self::validate(config)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let stop = CancellationToken::new();
        let mut timers = TimerGroup::with_token(stop.child_token());
        let (tx, rx) = mpsc::unbounded_channel();

        info!("Scan started (seed {})", seed);
        let _ = tx.send(ScanEvent::StageEntered {
            stage: ScanStage::Encrypting,
        });

        // Progress percentage.
        {
            let tx = tx.clone();
            let step = config.progress_step;
            let mut progress = 0u32;
            timers.repeating(
                "progress",
                Duration::from_millis(config.progress_interval_ms),
                move || {
                    progress = (progress + step).min(100);
                    let tick = ScanEvent::Tick {
                        counter: Counter::Progress,
                        value: u64::from(progress),
                    };
                    if tx.send(tick).is_err() {
                        return TimerControl::Stop;
                    }
                    if progress >= 100 {
                        let _ = tx.send(ScanEvent::Completed);
                        return TimerControl::Stop;
                    }
                    TimerControl::Continue
                },
            );
        }

        // Videos scanned.
        {
            let tx = tx.clone();
            let target = config.videos_target;
            let (min, max) = (config.videos_min_increment, config.videos_max_increment);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut videos = 0u64;
            timers.repeating(
                "videos",
                Duration::from_millis(config.videos_interval_ms),
                move || {
                    videos = (videos + rng.gen_range(min..=max)).min(target);
                    let tick = ScanEvent::Tick {
                        counter: Counter::VideosScanned,
                        value: videos,
                    };
                    if tx.send(tick).is_err() || videos >= target {
                        return TimerControl::Stop;
                    }
                    TimerControl::Continue
                },
            );
        }

        // Matches found.
        {
            let tx = tx.clone();
            let target = config.matches_target;
            let probability = config.match_probability;
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
            let mut matches = 0u32;
            timers.repeating(
                "matches",
                Duration::from_millis(config.matches_interval_ms),
                move || {
                    if matches >= target {
                        return TimerControl::Stop;
                    }
                    if rng.gen_bool(probability) {
                        matches += 1;
                        let tick = ScanEvent::Tick {
                            counter: Counter::MatchesFound,
                            value: u64::from(matches),
                        };
                        if tx.send(tick).is_err() {
                            return TimerControl::Stop;
                        }
                    }
                    if matches >= target {
                        TimerControl::Stop
                    } else {
                        TimerControl::Continue
                    }
                },
            );
        }

        // Stage boundaries, each stage entered when the previous one ends.
        let mut offset = 0u64;
        for pair in ScanStage::ALL.windows(2) {
            let (previous, stage) = (pair[0], pair[1]);
            offset += previous.duration_ms(config);
            let tx = tx.clone();
            timers.once(
                format!("stage-{:?}", stage).to_lowercase(),
                Duration::from_millis(offset),
                move || {
                    debug!("Scan stage: {}", stage);
                    let _ = tx.send(ScanEvent::StageEntered { stage });
                },
            );
        }

        // Report navigation ends the scan.
        {
            let group = timers.token().clone();
            timers.once(
                "navigate",
                Duration::from_millis(config.navigate_delay_ms),
                move || {
                    info!("Scan finished, report ready");
                    let _ = tx.send(ScanEvent::NavigateToReport);
                    group.cancel();
                },
            );
        }

        Ok(ScanHandle {
            stop,
            timers,
            rx,
            snapshot: ScanSnapshot::default(),
            seed,
        })
    }
}

/// Receiving end of a running scan. Dropping it cancels the scan.
pub struct ScanHandle {
    stop: CancellationToken,
    timers: TimerGroup,
    rx: mpsc::UnboundedReceiver<ScanEvent>,
    snapshot: ScanSnapshot,
    seed: u64,
}

impl ScanHandle {
    /// Next event, or `None` once the scan is over or cancelled.
    ///
    /// `NavigateToReport` is always the last event delivered.
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        if self.stop.is_cancelled() || self.snapshot.report_ready {
            return None;
        }
        let event = tokio::select! {
            biased;
            _ = self.stop.cancelled() => None,
            event = self.rx.recv() => event,
        }?;
        self.snapshot.apply(&event);
        Some(event)
    }

    /// Stop every timer of the scan. Idempotent.
    pub fn cancel(&self) {
        if !self.stop.is_cancelled() {
            debug!("Scan cancelled");
        }
        self.stop.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Whether the timers have stopped, by cancellation or completion.
    pub fn is_finished(&self) -> bool {
        self.timers.is_cancelled()
    }

    /// Token that cancels the scan, e.g. from a signal handler.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.stop.clone()
    }

    pub fn snapshot(&self) -> &ScanSnapshot {
        &self.snapshot
    }

    /// Seed of the counter RNG, for reproducing a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
