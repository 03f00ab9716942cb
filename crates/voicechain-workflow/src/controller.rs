//! Step controller: the sequencer over steps `1..=total`.
//!
//! The controller owns the cursor (`current`) and the frontier (`highest`).
//! Every accepted transition keeps `highest >= current`, and `highest` never
//! decreases. Rejected transitions leave both untouched.

use crate::error::{WorkflowError, WorkflowResult};

/// Result of an accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepChange {
    pub from: u32,
    pub to: u32,
    /// Frontier after the transition.
    pub frontier: u32,
    pub frontier_advanced: bool,
}

impl StepChange {
    /// Whether the transition left the cursor where it was.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Finite-state sequencer with frontier gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepController {
    total: u32,
    current: u32,
    highest: u32,
}

impl StepController {
    /// Fresh controller at step 1.
    pub fn new(total: u32) -> Self {
        Self {
            total: total.max(1),
            current: 1,
            highest: 1,
        }
    }

    /// Resume from a persisted cursor and frontier.
    pub fn restore(total: u32, current: u32, highest: u32) -> WorkflowResult<Self> {
        let total = total.max(1);
        if current == 0 || current > total {
            return Err(WorkflowError::StepOutOfRange {
                step: current.into(),
                total,
            });
        }
        if highest < current || highest > total {
            return Err(WorkflowError::StepOutOfRange {
                step: highest.into(),
                total,
            });
        }
        Ok(Self {
            total,
            current,
            highest,
        })
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn highest(&self) -> u32 {
        self.highest
    }

    /// Move the cursor to `step`.
    ///
    /// Backward moves and step 1 are always allowed; forward moves may go at
    /// most one step past the frontier.
    pub fn go_to(&mut self, step: i64) -> WorkflowResult<StepChange> {
        let step = match u32::try_from(step) {
            Ok(step) if (1..=self.total).contains(&step) => step,
            _ => {
                return Err(WorkflowError::StepOutOfRange {
                    step,
                    total: self.total,
                });
            }
        };
        if step != 1 && step > self.highest + 1 {
            return Err(WorkflowError::StepBeyondFrontier {
                step,
                highest: self.highest,
            });
        }

        let from = self.current;
        let frontier_advanced = step > self.highest;
        self.current = step;
        if frontier_advanced {
            self.highest = step;
        }

        Ok(StepChange {
            from,
            to: step,
            frontier: self.highest,
            frontier_advanced,
        })
    }

    /// Advance one step, staying put at the last one.
    pub fn next(&mut self) -> WorkflowResult<StepChange> {
        self.go_to(i64::from((self.current + 1).min(self.total)))
    }

    /// Go back one step, staying put at the first one.
    pub fn previous(&mut self) -> WorkflowResult<StepChange> {
        self.go_to(i64::from(self.current.saturating_sub(1).max(1)))
    }

    /// "In progress" signal used by the workflow badge.
    pub fn is_in_progress(&self) -> bool {
        self.highest > 1
    }

    pub fn is_at_final_step(&self) -> bool {
        self.current == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_one() {
        let controller = StepController::new(7);
        assert_eq!(controller.current(), 1);
        assert_eq!(controller.highest(), 1);
        assert!(!controller.is_in_progress());
        assert!(!controller.is_at_final_step());
    }

    #[test]
    fn test_navigation_scenario() {
        let mut c = StepController::new(7);

        let err = c.go_to(5).unwrap_err();
        assert!(matches!(err, WorkflowError::StepBeyondFrontier { step: 5, highest: 1 }));
        assert_eq!(c.current(), 1);

        for _ in 0..4 {
            c.next().unwrap();
        }
        assert_eq!((c.current(), c.highest()), (5, 5));

        c.previous().unwrap();
        c.previous().unwrap();
        assert_eq!((c.current(), c.highest()), (3, 5));

        assert!(c.go_to(7).is_err());
        assert_eq!((c.current(), c.highest()), (3, 5));

        let change = c.go_to(6).unwrap();
        assert!(change.frontier_advanced);
        assert_eq!((c.current(), c.highest()), (6, 6));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut c = StepController::new(7);
        assert!(matches!(
            c.go_to(0),
            Err(WorkflowError::StepOutOfRange { step: 0, total: 7 })
        ));
        assert!(matches!(
            c.go_to(8),
            Err(WorkflowError::StepOutOfRange { step: 8, total: 7 })
        ));
        assert!(matches!(
            c.go_to(-1),
            Err(WorkflowError::StepOutOfRange { step: -1, total: 7 })
        ));
        assert_eq!(c, StepController::new(7));
    }

    #[test]
    fn test_step_one_always_reachable() {
        let mut c = StepController::restore(7, 4, 6).unwrap();
        let change = c.go_to(1).unwrap();
        assert_eq!(change.from, 4);
        assert!(!change.frontier_advanced);
        assert_eq!((c.current(), c.highest()), (1, 6));
    }

    #[test]
    fn test_backward_jump_keeps_frontier() {
        let mut c = StepController::restore(7, 6, 6).unwrap();
        c.go_to(2).unwrap();
        assert_eq!(c.highest(), 6);
        // Jumping forward again within the frontier is fine.
        c.go_to(6).unwrap();
        c.go_to(7).unwrap();
        assert_eq!((c.current(), c.highest()), (7, 7));
    }

    #[test]
    fn test_next_at_last_step_is_noop() {
        let mut c = StepController::restore(7, 7, 7).unwrap();
        let change = c.next().unwrap();
        assert!(change.is_noop());
        assert!(c.is_at_final_step());
    }

    #[test]
    fn test_previous_at_first_step_is_noop() {
        let mut c = StepController::new(7);
        let change = c.previous().unwrap();
        assert!(change.is_noop());
        assert_eq!(c.current(), 1);
    }

    #[test]
    fn test_restore_rejects_inconsistent_state() {
        assert!(StepController::restore(7, 0, 1).is_err());
        assert!(StepController::restore(7, 8, 8).is_err());
        assert!(StepController::restore(7, 4, 3).is_err());
        assert!(StepController::restore(7, 4, 9).is_err());
        assert!(StepController::restore(7, 4, 4).is_ok());
    }

    #[test]
    fn test_frontier_invariant_over_sequence() {
        let mut c = StepController::new(7);
        let mut last_highest = c.highest();
        let targets = [2, 3, 1, 5, 2, 3, 4, 7, 5, 6, 7, 0, 9, 1, 3];

        for (i, &target) in targets.iter().enumerate() {
            let _ = match i % 3 {
                0 => c.go_to(target),
                1 => c.next(),
                _ => c.previous(),
            };
            assert!(c.highest() >= c.current());
            assert!(c.highest() >= last_highest);
            last_highest = c.highest();
        }
    }
}
