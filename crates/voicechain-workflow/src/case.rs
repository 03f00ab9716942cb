//! Case records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Triage bucket of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseCategory {
    /// Strong evidence, pursue now.
    Action,
    /// Keep watching.
    Monitor,
    /// Needs manual verification.
    Review,
}

impl CaseCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseCategory::Action => "action",
            CaseCategory::Monitor => "monitor",
            CaseCategory::Review => "review",
        }
    }

    /// Parse a category name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "action" => Some(CaseCategory::Action),
            "monitor" => Some(CaseCategory::Monitor),
            "review" => Some(CaseCategory::Review),
            _ => None,
        }
    }
}

impl fmt::Display for CaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display band of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(confidence: u8) -> Self {
        match confidence {
            90.. => ConfidenceBand::High,
            80..=89 => ConfidenceBand::Medium,
            _ => ConfidenceBand::Low,
        }
    }
}

/// Status of one dashboard milestone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl MilestoneStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MilestoneStatus::Pending => "pending",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Completed => "completed",
        }
    }
}

/// The four dashboard milestones of a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestones {
    #[serde(default)]
    pub evidence: MilestoneStatus,
    #[serde(default)]
    pub report: MilestoneStatus,
    #[serde(default)]
    pub outreach: MilestoneStatus,
    #[serde(default)]
    pub legal: MilestoneStatus,
}

impl Milestones {
    pub const COUNT: usize = 4;

    /// Milestones with their dashboard labels, in display order.
    pub fn labelled(&self) -> [(&'static str, MilestoneStatus); Self::COUNT] {
        [
            ("Evidence Downloaded", self.evidence),
            ("Report Filed", self.report),
            ("Creator Responded", self.outreach),
            ("Legal Case Settled", self.legal),
        ]
    }

    pub fn completed(&self) -> usize {
        self.labelled()
            .iter()
            .filter(|(_, status)| *status == MilestoneStatus::Completed)
            .count()
    }

    /// Share of completed milestones as a rounded percentage.
    pub fn overall_progress(&self) -> u32 {
        ((self.completed() as f64 / Self::COUNT as f64) * 100.0).round() as u32
    }
}

/// A candidate instance of voice misuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub channel_name: String,
    pub source_url: String,
    #[serde(default)]
    pub upload_date: Option<NaiveDate>,
    /// Match confidence, `0..=100`.
    pub confidence: u8,
    pub views: u64,
    pub monetized: bool,
    #[serde(default)]
    pub match_timestamps: Vec<String>,
    pub category: CaseCategory,
    /// Estimated recoverable revenue in whole euros.
    pub estimated_revenue: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub milestones: Milestones,
}

impl Case {
    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_score(self.confidence)
    }

    /// Whether the case shows up in the workflow's case-selection step.
    pub fn is_actionable(&self) -> bool {
        matches!(self.category, CaseCategory::Action | CaseCategory::Monitor)
    }

    /// Source URL that opens the video at `timestamp`.
    pub fn timestamp_url(&self, timestamp: &str) -> String {
        let separator = if self.source_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}t={}",
            self.source_url,
            separator,
            timestamp_to_seconds(timestamp)
        )
    }
}

/// Seconds into the video for `h:mm:ss` or `m:ss`. Anything else is 0.
pub fn timestamp_to_seconds(timestamp: &str) -> u64 {
    let parts: Result<Vec<u64>, _> = timestamp.split(':').map(|p| p.trim().parse::<u64>()).collect();
    match parts.as_deref() {
        Ok([h, m, s]) => h * 3600 + m * 60 + s,
        Ok([m, s]) => m * 60 + s,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(CaseCategory::parse("Action"), Some(CaseCategory::Action));
        assert_eq!(CaseCategory::parse("review"), Some(CaseCategory::Review));
        assert_eq!(CaseCategory::parse("all"), None);
    }

    #[test]
    fn test_confidence_band() {
        assert_eq!(ConfidenceBand::from_score(94), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(90), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(84), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(79), ConfidenceBand::Low);
    }

    #[test]
    fn test_overall_progress() {
        let mut milestones = Milestones::default();
        assert_eq!(milestones.overall_progress(), 0);

        milestones.evidence = MilestoneStatus::Completed;
        milestones.report = MilestoneStatus::InProgress;
        assert_eq!(milestones.overall_progress(), 25);

        milestones.report = MilestoneStatus::Completed;
        milestones.outreach = MilestoneStatus::Completed;
        milestones.legal = MilestoneStatus::Completed;
        assert_eq!(milestones.overall_progress(), 100);
    }

    #[test]
    fn test_case_deserialize_minimal() {
        let json = r#"{
            "id": "x",
            "title": "Clip",
            "sourceUrl": "https://example.com/x",
            "confidence": 88,
            "views": 10,
            "monetized": false,
            "category": "monitor",
            "estimatedRevenue": 0
        }"#;
        let case: Case = serde_json::from_str(json).unwrap();
        assert_eq!(case.id, "x");
        assert!(case.is_actionable());
        assert!(case.upload_date.is_none());
        assert_eq!(case.milestones, Milestones::default());
    }

    fn case_at(url: &str) -> Case {
        Case {
            id: "1".to_string(),
            title: "Clip".to_string(),
            channel_name: String::new(),
            source_url: url.to_string(),
            upload_date: None,
            confidence: 90,
            views: 0,
            monetized: false,
            match_timestamps: Vec::new(),
            category: CaseCategory::Action,
            estimated_revenue: 0,
            description: String::new(),
            milestones: Milestones::default(),
        }
    }

    #[test]
    fn test_timestamp_to_seconds() {
        assert_eq!(timestamp_to_seconds("1:15:30"), 4530);
        assert_eq!(timestamp_to_seconds("2:34"), 154);
        assert_eq!(timestamp_to_seconds("0:07"), 7);
        assert_eq!(timestamp_to_seconds("42"), 0);
        assert_eq!(timestamp_to_seconds("a:b"), 0);
        assert_eq!(timestamp_to_seconds("1:2:3:4"), 0);
        assert_eq!(timestamp_to_seconds(""), 0);
    }

    #[test]
    fn test_timestamp_url_separator() {
        let plain = case_at("https://youtube.com/watch/abc");
        assert_eq!(plain.timestamp_url("2:34"), "https://youtube.com/watch/abc?t=154");

        let query = case_at("https://youtube.com/watch?v=abc");
        assert_eq!(query.timestamp_url("1:15:30"), "https://youtube.com/watch?v=abc&t=4530");

        assert_eq!(query.timestamp_url("bad"), "https://youtube.com/watch?v=abc&t=0");
    }

    #[test]
    fn test_milestone_status_wire_name() {
        let json = serde_json::to_string(&MilestoneStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
