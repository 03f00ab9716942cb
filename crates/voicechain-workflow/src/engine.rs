//! Workflow engine: the single owner of workflow state.
//!
//! Every view reads and mutates progress through one [`WorkflowEngine`].
//! State is restored in [`WorkflowEngine::open`] before anything is reported,
//! and every accepted mutation is written through to the progress store.

use std::sync::Arc;

use tracing::{debug, info, warn};

use voicechain_progress::{ProgressRecord, ProgressStore, SaveOutcome};

use crate::case::Case;
use crate::controller::{StepChange, StepController};
use crate::error::{WorkflowError, WorkflowResult};
use crate::registry::CaseRegistry;
use crate::selection::SelectionSet;
use crate::step::{StepDefinition, StepState, WorkflowDefinition};
use crate::summary::{resolve_selection, CompletionSummary, SelectionSummary, WorkflowBadge};

/// Guided workflow over a case registry with persisted progress.
pub struct WorkflowEngine {
    definition: WorkflowDefinition,
    registry: Arc<dyn CaseRegistry>,
    store: ProgressStore,
    controller: StepController,
    selection: SelectionSet,
    last_save: Option<SaveOutcome>,
}

impl WorkflowEngine {
    /// Restore the engine from `store`.
    ///
    /// Unreadable or inconsistent records start the workflow fresh.
    pub async fn open(
        definition: WorkflowDefinition,
        registry: Arc<dyn CaseRegistry>,
        store: ProgressStore,
    ) -> Self {
        let total = definition.len();
        let store = store.with_max_step(total);
        let record = store.load().await;

        let controller =
            match StepController::restore(total, record.current_step, record.highest_step_reached) {
                Ok(controller) => controller,
                Err(e) => {
                    warn!("Ignoring stored cursor: {}", e);
                    StepController::new(total)
                }
            };
        let selection = SelectionSet::from_ids(record.selected_cases);

        debug!(
            "Opened workflow at step {}/{} (highest {}), {} selected",
            controller.current(),
            total,
            controller.highest(),
            selection.len()
        );

        Self {
            definition,
            registry,
            store,
            controller,
            selection,
            last_save: None,
        }
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    pub fn registry(&self) -> &Arc<dyn CaseRegistry> {
        &self.registry
    }

    pub fn current_step(&self) -> u32 {
        self.controller.current()
    }

    pub fn highest_step_reached(&self) -> u32 {
        self.controller.highest()
    }

    pub fn total_steps(&self) -> u32 {
        self.controller.total()
    }

    pub fn current_step_definition(&self) -> Option<&StepDefinition> {
        self.definition.step(self.controller.current())
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Outcome of the most recent write, `None` before the first one.
    pub fn last_save(&self) -> Option<SaveOutcome> {
        self.last_save
    }

    /// Whether the last write failed and state lives only in memory.
    pub fn is_degraded(&self) -> bool {
        matches!(self.last_save, Some(SaveOutcome::NotPersisted))
    }

    /// Snapshot of the state as it is persisted.
    pub fn record(&self) -> ProgressRecord {
        ProgressRecord::new(
            self.controller.current(),
            self.controller.highest(),
            self.selection.to_vec(),
        )
    }

    // Navigation

    pub async fn go_to(&mut self, step: i64) -> WorkflowResult<StepChange> {
        let change = self.controller.go_to(step)?;
        self.log_transition(&change);
        self.persist().await;
        Ok(change)
    }

    pub async fn next(&mut self) -> WorkflowResult<StepChange> {
        let change = self.controller.next()?;
        self.log_transition(&change);
        self.persist().await;
        Ok(change)
    }

    pub async fn previous(&mut self) -> WorkflowResult<StepChange> {
        let change = self.controller.previous()?;
        self.log_transition(&change);
        self.persist().await;
        Ok(change)
    }

    fn log_transition(&self, change: &StepChange) {
        let label = self
            .definition
            .step(change.to)
            .map(|s| s.label.as_str())
            .unwrap_or("?");
        if change.frontier_advanced {
            info!(
                "Step {} -> {} ({}), frontier advanced to {}",
                change.from, change.to, label, change.frontier
            );
        } else {
            info!("Step {} -> {} ({})", change.from, change.to, label);
        }
    }

    // Selection

    /// Flip membership of `case_id`.
    ///
    /// Adding requires the id to resolve in the registry. A stale id that is
    /// already selected can still be removed.
    pub async fn toggle(&mut self, case_id: &str) -> WorkflowResult<bool> {
        if !self.selection.contains(case_id) {
            self.ensure_known(case_id)?;
        }
        let selected = self.selection.toggle(case_id);
        info!(
            "Case {} {}",
            case_id,
            if selected { "selected" } else { "deselected" }
        );
        self.persist().await;
        Ok(selected)
    }

    /// Replace the selection with `ids`. Nothing changes if any id is unknown.
    pub async fn select_all(&mut self, ids: &[String]) -> WorkflowResult<()> {
        for id in ids {
            self.ensure_known(id)?;
        }
        self.selection.select_all(ids.iter().cloned());
        info!("Selected {} cases", self.selection.len());
        self.persist().await;
        Ok(())
    }

    /// "Select all" checkbox over `visible` ids.
    pub async fn toggle_all(&mut self, visible: &[String]) -> WorkflowResult<bool> {
        for id in visible {
            self.ensure_known(id)?;
        }
        let any = self.selection.toggle_all(visible);
        info!("Selection now holds {} cases", self.selection.len());
        self.persist().await;
        Ok(any)
    }

    pub async fn clear_selection(&mut self) {
        self.selection.clear();
        info!("Selection cleared");
        self.persist().await;
    }

    fn ensure_known(&self, case_id: &str) -> WorkflowResult<()> {
        if self.registry.contains(case_id) {
            Ok(())
        } else {
            Err(WorkflowError::CaseNotFound(case_id.to_string()))
        }
    }

    /// Forget all progress and remove the stored record.
    pub async fn reset(&mut self) -> WorkflowResult<()> {
        self.store.clear().await?;
        self.controller = StepController::new(self.definition.len());
        self.selection.clear();
        self.last_save = None;
        info!("Workflow reset");
        Ok(())
    }

    async fn persist(&mut self) {
        let outcome = self.store.save(&self.record()).await;
        self.last_save = Some(outcome);
    }

    // Views

    /// Badge for views outside the workflow, `None` until progress exists.
    pub fn badge(&self) -> Option<WorkflowBadge> {
        WorkflowBadge::new(
            self.controller.current(),
            self.controller.highest(),
            self.controller.total(),
        )
    }

    pub fn step_strip(&self) -> Vec<(&StepDefinition, StepState)> {
        self.definition.strip(self.controller.current())
    }

    /// Cases offered in the selection step, with their selection state.
    pub fn selectable_cases(&self) -> Vec<(Arc<Case>, bool)> {
        self.registry
            .actionable()
            .into_iter()
            .map(|case| {
                let selected = self.selection.contains(&case.id);
                (case, selected)
            })
            .collect()
    }

    /// Selected cases that still resolve. Stale ids are omitted.
    pub fn selected_cases(&self) -> Vec<Arc<Case>> {
        resolve_selection(self.registry.as_ref(), self.selection.members()).0
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary::compute(self.registry.as_ref(), self.selection.members())
    }

    /// Finish the workflow. Only valid at the final step; state is kept.
    pub fn complete(&self) -> WorkflowResult<CompletionSummary> {
        if !self.controller.is_at_final_step() {
            return Err(WorkflowError::NotAtFinalStep {
                current: self.controller.current(),
                total: self.controller.total(),
            });
        }
        let summary = self.summary();
        info!(
            "Workflow completed with {} cases, estimated recovery {}",
            summary.case_count, summary.total_estimated_recovery
        );
        Ok(CompletionSummary {
            steps: self.controller.total(),
            case_count: summary.case_count,
            total_estimated_recovery: summary.total_estimated_recovery,
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
