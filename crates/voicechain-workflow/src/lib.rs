//! # VoiceChain Workflow
//!
//! Guided multi-step case workflow: a case registry, a selection set and a
//! step controller, combined in one engine whose progress survives restarts.
//!
//! ## Features
//!
//! - Seven-step voice-protection workflow with frontier-gated navigation
//! - Selection of cases validated against the registry
//! - Write-through persistence via `voicechain-progress`
//! - Rollups that skip stale case references

pub mod case;
pub mod controller;
pub mod engine;
pub mod error;
pub mod partner;
pub mod registry;
pub mod selection;
pub mod step;
pub mod summary;

pub use case::{
    timestamp_to_seconds, Case, CaseCategory, ConfidenceBand, MilestoneStatus, Milestones,
};
pub use controller::{StepChange, StepController};
pub use engine::WorkflowEngine;
pub use error::{WorkflowError, WorkflowResult};
pub use partner::{demo_partners, LegalPartner};
pub use registry::{CaseRegistry, StaticCaseRegistry};
pub use selection::SelectionSet;
pub use step::{steps, StepDefinition, StepState, WorkflowDefinition};
pub use summary::{
    resolve_selection, CompletionSummary, ReputationRisk, ScanReport, SelectionSummary,
    WorkflowBadge,
};
