//! Workflow errors.

use thiserror::Error;

use voicechain_progress::ProgressError;

/// Workflow error types.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Navigation target outside `1..=total`.
    #[error("Step {step} is outside 1..={total}")]
    StepOutOfRange { step: i64, total: u32 },

    /// Navigation target skips past the furthest step reached.
    #[error("Step {step} is ahead of the frontier (highest reached: {highest})")]
    StepBeyondFrontier { step: u32, highest: u32 },

    /// `complete` called before the last step.
    #[error("Workflow can only be completed at step {total} (current: {current})")]
    NotAtFinalStep { current: u32, total: u32 },

    /// Case identifier does not resolve in the registry.
    #[error("Case not found: {0}")]
    CaseNotFound(String),

    /// Registry built with two cases sharing an identifier.
    #[error("Duplicate case id: {0}")]
    DuplicateCase(String),

    /// Case record has an out-of-range attribute.
    #[error("Invalid case {id}: {message}")]
    InvalidCase { id: String, message: String },

    /// Workflow definition without steps.
    #[error("Workflow definition has no steps")]
    EmptyWorkflow,

    /// Catalog parse error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Progress store error.
    #[error("Progress error: {0}")]
    Progress(#[from] ProgressError),
}

impl WorkflowError {
    /// Whether the error is a rejected navigation request.
    pub fn is_invalid_step(&self) -> bool {
        matches!(
            self,
            WorkflowError::StepOutOfRange { .. } | WorkflowError::StepBeyondFrontier { .. }
        )
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_step_classification() {
        assert!(WorkflowError::StepOutOfRange { step: 0, total: 7 }.is_invalid_step());
        assert!(WorkflowError::StepBeyondFrontier { step: 5, highest: 1 }.is_invalid_step());
        assert!(!WorkflowError::CaseNotFound("x".to_string()).is_invalid_step());
    }

    #[test]
    fn test_display() {
        let err = WorkflowError::StepBeyondFrontier { step: 7, highest: 5 };
        let display = err.to_string();
        assert!(display.contains('7'));
        assert!(display.contains("highest reached: 5"));
    }
}
