//! The persisted progress record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProgressError;

/// Persisted cursor and selection snapshot of the guided workflow.
///
/// Serialized as `{"currentStep", "highestStepReached", "selectedCases"}`
/// plus an optional `updatedAt` stamp used for retention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Step the user is currently on (1-based).
    pub current_step: u32,
    /// Furthest step ever reached. Never below `current_step`.
    pub highest_step_reached: u32,
    /// Selected case identifiers in insertion order.
    #[serde(default)]
    pub selected_cases: Vec<String>,
    /// When the record was last written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            current_step: 1,
            highest_step_reached: 1,
            selected_cases: Vec::new(),
            updated_at: None,
        }
    }
}

impl ProgressRecord {
    /// Create a record without a timestamp.
    pub fn new(current_step: u32, highest_step_reached: u32, selected_cases: Vec<String>) -> Self {
        Self {
            current_step,
            highest_step_reached,
            selected_cases,
            updated_at: None,
        }
    }

    /// Parse and validate a stored payload.
    ///
    /// `max_step` bounds both step fields when given.
    pub fn decode(raw: &str, max_step: Option<u32>) -> Result<Self, ProgressError> {
        let record: ProgressRecord = serde_json::from_str(raw)?;
        record.validate(max_step)?;
        Ok(record)
    }

    /// Serialize for storage.
    pub fn encode(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the record invariants.
    pub fn validate(&self, max_step: Option<u32>) -> Result<(), ProgressError> {
        if self.current_step < 1 || self.highest_step_reached < 1 {
            return Err(ProgressError::InvalidRecord(format!(
                "steps are 1-based, got current={} highest={}",
                self.current_step, self.highest_step_reached
            )));
        }
        if self.highest_step_reached < self.current_step {
            return Err(ProgressError::InvalidRecord(format!(
                "highestStepReached {} is behind currentStep {}",
                self.highest_step_reached, self.current_step
            )));
        }
        if let Some(max) = max_step {
            if self.highest_step_reached > max {
                return Err(ProgressError::InvalidRecord(format!(
                    "highestStepReached {} exceeds step count {}",
                    self.highest_step_reached, max
                )));
            }
        }
        Ok(())
    }

    /// A workflow counts as started once the frontier has moved past step 1.
    pub fn is_in_progress(&self) -> bool {
        self.highest_step_reached > 1
    }

    /// Compare the workflow fields, ignoring the timestamp.
    pub fn same_progress(&self, other: &ProgressRecord) -> bool {
        self.current_step == other.current_step
            && self.highest_step_reached == other.highest_step_reached
            && self.selected_cases == other.selected_cases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let record = ProgressRecord::default();
        assert_eq!(record.current_step, 1);
        assert_eq!(record.highest_step_reached, 1);
        assert!(record.selected_cases.is_empty());
        assert!(!record.is_in_progress());
    }

    #[test]
    fn test_wire_layout_is_camel_case() {
        let record = ProgressRecord::new(3, 5, vec!["1".to_string(), "7".to_string()]);
        let json = record.encode().unwrap();
        assert_eq!(
            json,
            r#"{"currentStep":3,"highestStepReached":5,"selectedCases":["1","7"]}"#
        );
    }

    #[test]
    fn test_decode_without_selection() {
        let record = ProgressRecord::decode(r#"{"currentStep":2,"highestStepReached":4}"#, None).unwrap();
        assert_eq!(record.current_step, 2);
        assert_eq!(record.highest_step_reached, 4);
        assert!(record.selected_cases.is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            ProgressRecord::decode("{not json", None),
            Err(ProgressError::Serialization(_))
        ));
        assert!(ProgressRecord::decode(r#"{"currentStep":"two"}"#, None).is_err());
    }

    #[test]
    fn test_decode_rejects_frontier_behind_cursor() {
        let result = ProgressRecord::decode(r#"{"currentStep":5,"highestStepReached":3}"#, None);
        assert!(matches!(result, Err(ProgressError::InvalidRecord(_))));
    }

    #[test]
    fn test_decode_rejects_zero_step() {
        let result = ProgressRecord::decode(r#"{"currentStep":0,"highestStepReached":0}"#, None);
        assert!(matches!(result, Err(ProgressError::InvalidRecord(_))));
    }

    #[test]
    fn test_decode_respects_max_step() {
        let raw = r#"{"currentStep":2,"highestStepReached":9}"#;
        assert!(ProgressRecord::decode(raw, None).is_ok());
        assert!(ProgressRecord::decode(raw, Some(7)).is_err());
    }

    #[test]
    fn test_same_progress_ignores_timestamp() {
        let a = ProgressRecord::new(2, 2, vec![]);
        let mut b = a.clone();
        b.updated_at = Some(Utc::now());
        assert_ne!(a, b);
        assert!(a.same_progress(&b));
    }
}
