//! Step catalog of a guided workflow.

use serde::Serialize;

use crate::error::{WorkflowError, WorkflowResult};

/// Step indices of the voice-protection workflow.
pub mod steps {
    pub const SELECTION: u32 = 1;
    pub const EVIDENCE: u32 = 2;
    pub const REPORT: u32 = 3;
    pub const OUTREACH: u32 = 4;
    pub const MONITOR: u32 = 5;
    pub const ESCALATE: u32 = 6;
    pub const LEGAL: u32 = 7;
}

/// Descriptive metadata of one step. Only the index is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    /// 1-based position.
    pub index: u32,
    pub label: String,
    pub short_label: String,
}

/// How a step renders relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

/// Ordered, non-empty list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowDefinition {
    steps: Vec<StepDefinition>,
}

impl WorkflowDefinition {
    /// Build a definition from `(label, short_label)` pairs.
    pub fn new<L, S>(steps: impl IntoIterator<Item = (L, S)>) -> WorkflowResult<Self>
    where
        L: Into<String>,
        S: Into<String>,
    {
        let steps = Self::number(steps);
        if steps.is_empty() {
            return Err(WorkflowError::EmptyWorkflow);
        }
        Ok(Self { steps })
    }

    /// The seven-step voice-protection workflow.
    pub fn voice_protection() -> Self {
        Self {
            steps: Self::number([
                ("Case Selection", "Select"),
                ("Evidence Collection", "Evidence"),
                ("Platform Reporting", "Report"),
                ("Direct Outreach", "Outreach"),
                ("Wait & Monitor", "Monitor"),
                ("Escalation", "Escalate"),
                ("Legal Consultation", "Legal"),
            ]),
        }
    }

    fn number<L, S>(steps: impl IntoIterator<Item = (L, S)>) -> Vec<StepDefinition>
    where
        L: Into<String>,
        S: Into<String>,
    {
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (label, short_label))| StepDefinition {
                index: i as u32 + 1,
                label: label.into(),
                short_label: short_label.into(),
            })
            .collect()
    }

    /// Number of steps (N).
    pub fn len(&self) -> u32 {
        self.steps.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Step by 1-based index.
    pub fn step(&self, index: u32) -> Option<&StepDefinition> {
        let i = index.checked_sub(1)?;
        self.steps.get(i as usize)
    }

    /// Resolve a step from its index or short label (case-insensitive).
    ///
    /// Any integer is returned as-is, so out-of-range numbers reach the
    /// controller's range check.
    pub fn resolve(&self, name: &str) -> Option<i64> {
        if let Ok(index) = name.trim().parse::<i64>() {
            return Some(index);
        }
        self.steps
            .iter()
            .find(|s| s.short_label.eq_ignore_ascii_case(name) || s.label.eq_ignore_ascii_case(name))
            .map(|s| i64::from(s.index))
    }

    /// Every step with its state relative to `current`.
    pub fn strip(&self, current: u32) -> Vec<(&StepDefinition, StepState)> {
        self.steps
            .iter()
            .map(|s| {
                let state = match s.index.cmp(&current) {
                    std::cmp::Ordering::Less => StepState::Completed,
                    std::cmp::Ordering::Equal => StepState::Current,
                    std::cmp::Ordering::Greater => StepState::Upcoming,
                };
                (s, state)
            })
            .collect()
    }
}

impl Default for WorkflowDefinition {
    fn default() -> Self {
        Self::voice_protection()
    }
}
