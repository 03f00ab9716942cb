//! Rollups over the case catalog and the current selection.
//!
//! Ids that no longer resolve in the registry are skipped: they contribute
//! nothing to sums and are left out of averaging denominators.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use voicechain_progress::ProgressRecord;

use crate::case::{Case, CaseCategory};
use crate::registry::CaseRegistry;

/// Split selected ids into resolved cases and stale references.
pub fn resolve_selection(
    registry: &dyn CaseRegistry,
    ids: &[String],
) -> (Vec<Arc<Case>>, Vec<String>) {
    let mut resolved = Vec::with_capacity(ids.len());
    let mut stale = Vec::new();

    for id in ids {
        match registry.get_case(id) {
            Ok(case) => resolved.push(case),
            Err(_) => {
                debug!("Skipping stale case reference: {}", id);
                stale.push(id.clone());
            }
        }
    }

    (resolved, stale)
}

fn rounded_mean(values: impl Iterator<Item = u64>, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    let sum: u64 = values.sum();
    (sum as f64 / count as f64).round() as u32
}

/// Aggregate figures over the selected cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub case_count: usize,
    pub stale_references: usize,
    pub total_estimated_recovery: u64,
    pub total_views: u64,
    /// Mean milestone progress in percent, 0 for an empty selection.
    pub average_progress: u32,
    pub average_confidence: u32,
    pub monetized_count: usize,
}

impl SelectionSummary {
    pub fn compute(registry: &dyn CaseRegistry, ids: &[String]) -> Self {
        let (cases, stale) = resolve_selection(registry, ids);
        Self::from_cases(&cases, stale.len())
    }

    fn from_cases(cases: &[Arc<Case>], stale_references: usize) -> Self {
        let case_count = cases.len();
        Self {
            case_count,
            stale_references,
            total_estimated_recovery: cases.iter().map(|c| c.estimated_revenue).sum(),
            total_views: cases.iter().map(|c| c.views).sum(),
            average_progress: rounded_mean(
                cases.iter().map(|c| c.milestones.overall_progress() as u64),
                case_count,
            ),
            average_confidence: rounded_mean(
                cases.iter().map(|c| c.confidence as u64),
                case_count,
            ),
            monetized_count: cases.iter().filter(|c| c.monetized).count(),
        }
    }
}

/// "Step X of N" badge shown by views outside the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowBadge {
    pub step: u32,
    pub total: u32,
}

impl WorkflowBadge {
    /// Badge for a persisted record; `None` until the user has moved past
    /// the first step.
    pub fn from_record(record: &ProgressRecord, total: u32) -> Option<Self> {
        Self::new(record.current_step, record.highest_step_reached, total)
    }

    pub fn new(current: u32, highest: u32, total: u32) -> Option<Self> {
        (highest > 1).then_some(Self {
            step: current,
            total,
        })
    }
}

impl fmt::Display for WorkflowBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.step, self.total)
    }
}

/// Brand risk derived from the scan findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationRisk {
    Low,
    Medium,
    High,
}

impl ReputationRisk {
    pub fn as_str(self) -> &'static str {
        match self {
            ReputationRisk::Low => "low",
            ReputationRisk::Medium => "medium",
            ReputationRisk::High => "high",
        }
    }

    pub fn assess(cases: &[Arc<Case>]) -> Self {
        let action: Vec<_> = cases
            .iter()
            .filter(|c| c.category == CaseCategory::Action)
            .collect();
        if action.iter().any(|c| c.monetized && c.confidence >= 90) {
            ReputationRisk::High
        } else if !action.is_empty() {
            ReputationRisk::Medium
        } else {
            ReputationRisk::Low
        }
    }
}

impl fmt::Display for ReputationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header figures of the scan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub videos_scanned: u64,
    pub matches_found: usize,
    pub estimated_revenue_loss: u64,
    pub reputation_risk: ReputationRisk,
    pub action_count: usize,
    pub monitor_count: usize,
    pub review_count: usize,
}

impl ScanReport {
    pub fn compute(registry: &dyn CaseRegistry, videos_scanned: u64) -> Self {
        let cases = registry.list_cases();
        let count = |category: CaseCategory| cases.iter().filter(|c| c.category == category).count();
        Self {
            videos_scanned,
            matches_found: cases.len(),
            estimated_revenue_loss: cases.iter().map(|c| c.estimated_revenue).sum(),
            reputation_risk: ReputationRisk::assess(&cases),
            action_count: count(CaseCategory::Action),
            monitor_count: count(CaseCategory::Monitor),
            review_count: count(CaseCategory::Review),
        }
    }
}

/// Returned by completing the workflow at its final step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionSummary {
    pub steps: u32,
    pub case_count: usize,
    pub total_estimated_recovery: u64,
}
