//! Simulated scan configuration types.

use serde::{Deserialize, Serialize};

/// Timing and counter targets of the simulated scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Progress counter tick interval.
    #[serde(default = "default_progress_interval")]
    pub progress_interval_ms: u64,

    /// Percentage added per progress tick.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Videos-scanned counter tick interval.
    #[serde(default = "default_videos_interval")]
    pub videos_interval_ms: u64,

    /// Terminal value of the videos-scanned counter.
    #[serde(default = "default_videos_target")]
    pub videos_target: u64,

    /// Smallest random increment of the videos-scanned counter.
    #[serde(default = "default_videos_min_increment")]
    pub videos_min_increment: u64,

    /// Largest random increment of the videos-scanned counter.
    #[serde(default = "default_videos_max_increment")]
    pub videos_max_increment: u64,

    /// Matches-found counter tick interval.
    #[serde(default = "default_matches_interval")]
    pub matches_interval_ms: u64,

    /// Terminal value of the matches-found counter.
    #[serde(default = "default_matches_target")]
    pub matches_target: u32,

    /// Chance that a matches tick adds one match.
    #[serde(default = "default_match_probability")]
    pub match_probability: f64,

    /// Delay from scan start until the report is ready.
    #[serde(default = "default_navigate_delay")]
    pub navigate_delay_ms: u64,

    /// RNG seed. A random seed is drawn when unset.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub stages: StageDurations,
}

fn default_progress_interval() -> u64 {
    120
}

fn default_progress_step() -> u32 {
    2
}

fn default_videos_interval() -> u64 {
    100
}

fn default_videos_target() -> u64 {
    2847
}

fn default_videos_min_increment() -> u64 {
    20
}

fn default_videos_max_increment() -> u64 {
    69
}

fn default_matches_interval() -> u64 {
    800
}

fn default_matches_target() -> u32 {
    7
}

fn default_match_probability() -> f64 {
    0.3
}

fn default_navigate_delay() -> u64 {
    7500
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: default_progress_interval(),
            progress_step: default_progress_step(),
            videos_interval_ms: default_videos_interval(),
            videos_target: default_videos_target(),
            videos_min_increment: default_videos_min_increment(),
            videos_max_increment: default_videos_max_increment(),
            matches_interval_ms: default_matches_interval(),
            matches_target: default_matches_target(),
            match_probability: default_match_probability(),
            navigate_delay_ms: default_navigate_delay(),
            seed: None,
            stages: StageDurations::default(),
        }
    }
}

/// Duration of each scan stage, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDurations {
    #[serde(default = "default_encrypting")]
    pub encrypting_ms: u64,

    #[serde(default = "default_uploading")]
    pub uploading_ms: u64,

    #[serde(default = "default_scanning")]
    pub scanning_ms: u64,

    #[serde(default = "default_analyzing")]
    pub analyzing_ms: u64,

    #[serde(default = "default_complete")]
    pub complete_ms: u64,
}

impl StageDurations {
    /// Total time from the first stage until the last one ends.
    pub fn total_ms(&self) -> u64 {
        self.encrypting_ms + self.uploading_ms + self.scanning_ms + self.analyzing_ms + self.complete_ms
    }
}

fn default_encrypting() -> u64 {
    1000
}

fn default_uploading() -> u64 {
    1500
}

fn default_scanning() -> u64 {
    3000
}

fn default_analyzing() -> u64 {
    1500
}

fn default_complete() -> u64 {
    500
}

impl Default for StageDurations {
    fn default() -> Self {
        Self {
            encrypting_ms: default_encrypting(),
            uploading_ms: default_uploading(),
            scanning_ms: default_scanning(),
            analyzing_ms: default_analyzing(),
            complete_ms: default_complete(),
        }
    }
}
