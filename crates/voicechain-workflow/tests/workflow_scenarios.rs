//! End-to-end workflow scenarios over the file backend.
//!
//! Each test opens engines against a temporary storage directory, the way
//! separate views of the product share one persisted record.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use voicechain_progress::{FileBackend, ProgressRecord, ProgressStore, StorageBackend};
use voicechain_workflow::{
    Case, CaseCategory, CaseRegistry, Milestones, StaticCaseRegistry, WorkflowDefinition,
    WorkflowEngine,
};

const KEY: &str = "voicechain_workflow_state";

// ============================================================================
// Test Helpers
// ============================================================================

fn case(id: &str, revenue: u64) -> Case {
    Case {
        id: id.to_string(),
        title: format!("Clip {}", id),
        channel_name: "Channel".to_string(),
        source_url: format!("https://example.com/watch?v={}", id),
        upload_date: None,
        confidence: 92,
        views: 10_000,
        monetized: true,
        match_timestamps: vec!["0:15-0:42".to_string()],
        category: CaseCategory::Action,
        estimated_revenue: revenue,
        description: String::new(),
        milestones: Milestones::default(),
    }
}

fn registry_with(cases: Vec<Case>) -> Arc<dyn CaseRegistry> {
    Arc::new(StaticCaseRegistry::new(cases).unwrap())
}

async fn store_at(dir: &Path) -> ProgressStore {
    let backend = FileBackend::new(dir.to_path_buf()).await.unwrap();
    ProgressStore::new(Arc::new(backend), KEY)
}

async fn open(dir: &Path, registry: Arc<dyn CaseRegistry>) -> WorkflowEngine {
    WorkflowEngine::open(
        WorkflowDefinition::voice_protection(),
        registry,
        store_at(dir).await,
    )
    .await
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_selection_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let registry = registry_with(vec![case("A", 500), case("B", 250)]);

    {
        let mut engine = open(dir.path(), registry.clone()).await;
        assert!(engine.toggle("A").await.unwrap());
        engine.next().await.unwrap();
    }

    let engine = open(dir.path(), registry).await;
    assert!(engine.selection().contains("A"));
    assert!(!engine.selection().contains("B"));
    assert_eq!(engine.current_step(), 2);
    assert_eq!(engine.summary().total_estimated_recovery, 500);
}

#[tokio::test]
async fn test_stale_reference_renders_empty() {
    let dir = TempDir::new().unwrap();
    let backend = FileBackend::new(dir.path().to_path_buf()).await.unwrap();
    backend
        .set(KEY, r#"{"currentStep":2,"highestStepReached":2,"selectedCases":["X"]}"#)
        .await
        .unwrap();

    let engine = open(dir.path(), registry_with(vec![case("A", 500)])).await;

    assert!(engine.selected_cases().is_empty());
    let summary = engine.summary();
    assert_eq!(summary.case_count, 0);
    assert_eq!(summary.total_estimated_recovery, 0);
    assert_eq!(summary.average_progress, 0);
    assert_eq!(summary.stale_references, 1);
    assert_eq!(engine.current_step(), 2);
}

#[tokio::test]
async fn test_corrupt_payload_loads_default() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(format!("{}.json", KEY)), "{\"currentStep\": tru").unwrap();

    let engine = open(dir.path(), registry_with(vec![case("A", 500)])).await;
    assert_eq!(engine.record(), ProgressRecord::new(1, 1, Vec::new()));
}

#[tokio::test]
async fn test_inverted_record_loads_default() {
    let dir = TempDir::new().unwrap();
    let backend = FileBackend::new(dir.path().to_path_buf()).await.unwrap();
    backend
        .set(KEY, r#"{"currentStep":5,"highestStepReached":2,"selectedCases":[]}"#)
        .await
        .unwrap();

    let engine = open(dir.path(), registry_with(Vec::new())).await;
    assert_eq!(engine.record(), ProgressRecord::default());
}

#[tokio::test]
async fn test_views_share_progress() {
    let dir = TempDir::new().unwrap();
    let registry: Arc<dyn CaseRegistry> = Arc::new(StaticCaseRegistry::demo().unwrap());

    let mut workflow_view = open(dir.path(), registry.clone()).await;
    workflow_view.toggle("1").await.unwrap();
    workflow_view.next().await.unwrap();
    workflow_view.next().await.unwrap();
    workflow_view.go_to(1).await.unwrap();

    // A second view opened later sees the badge from the frontier.
    let layout_view = open(dir.path(), registry).await;
    let badge = layout_view.badge().unwrap();
    assert_eq!(badge.to_string(), "1/7");
    assert_eq!(layout_view.highest_step_reached(), 3);
}

#[tokio::test]
async fn test_invariants_hold_across_reopens() {
    let dir = TempDir::new().unwrap();
    let registry = registry_with(vec![case("A", 1)]);
    let mut last_highest = 1;

    let operations: [i32; 12] = [1, 1, -1, 4, 1, 1, 7, -1, -1, 6, 1, 0];
    for op in operations {
        let mut engine = open(dir.path(), registry.clone()).await;
        let _ = match op {
            1 => engine.next().await,
            -1 => engine.previous().await,
            step => engine.go_to(step.into()).await,
        };

        assert!(engine.highest_step_reached() >= engine.current_step());
        assert!(engine.highest_step_reached() >= last_highest);
        last_highest = engine.highest_step_reached();
    }
}

#[tokio::test]
async fn test_empty_selection_rollup() {
    let dir = TempDir::new().unwrap();
    let engine = open(dir.path(), registry_with(vec![case("A", 500)])).await;

    let summary = engine.summary();
    assert_eq!(summary.total_estimated_recovery, 0);
    assert_eq!(summary.average_progress, 0);
    assert_eq!(summary.average_confidence, 0);
}

#[tokio::test]
async fn test_reset_removes_file() {
    let dir = TempDir::new().unwrap();
    let registry = registry_with(vec![case("A", 500)]);

    let mut engine = open(dir.path(), registry.clone()).await;
    engine.toggle("A").await.unwrap();
    let path = dir.path().join(format!("{}.json", KEY));
    assert!(path.exists());

    engine.reset().await.unwrap();
    assert!(!path.exists());

    let engine = open(dir.path(), registry).await;
    assert!(engine.selection().is_empty());
}
