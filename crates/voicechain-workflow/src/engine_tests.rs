
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use voicechain_progress::{MemoryBackend, ProgressError, StorageBackend};

    use crate::registry::StaticCaseRegistry;
    use crate::step::steps;

    const KEY: &str = "voicechain_workflow_state";

    /// Memory backend that counts writes and can be switched to failing.
    #[derive(Default)]
    struct CountingBackend {
        inner: MemoryBackend,
        writes: AtomicUsize,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl StorageBackend for CountingBackend {
        async fn get(&self, key: &str) -> Result<Option<String>, ProgressError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), ProgressError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ProgressError::StorageWrite("quota exceeded".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), ProgressError> {
            self.inner.remove(key).await
        }
    }

    fn registry() -> Arc<dyn CaseRegistry> {
        Arc::new(StaticCaseRegistry::demo().unwrap())
    }

    async fn open_with(backend: Arc<CountingBackend>) -> WorkflowEngine {
        let store = ProgressStore::new(backend, KEY);
        WorkflowEngine::open(WorkflowDefinition::voice_protection(), registry(), store).await
    }

    #[tokio::test]
    async fn test_open_fresh() {
        let engine = open_with(Arc::new(CountingBackend::default())).await;
        assert_eq!(engine.current_step(), steps::SELECTION);
        assert_eq!(engine.highest_step_reached(), 1);
        assert_eq!(engine.total_steps(), 7);
        assert!(engine.selection().is_empty());
        assert!(engine.badge().is_none());
        assert!(engine.last_save().is_none());
    }

    #[tokio::test]
    async fn test_navigation_scenario_persists() {
        let backend = Arc::new(CountingBackend::default());
        let mut engine = open_with(backend.clone()).await;

        assert!(engine.go_to(5).await.unwrap_err().is_invalid_step());
        assert_eq!(engine.current_step(), 1);

        for _ in 0..4 {
            engine.next().await.unwrap();
        }
        assert_eq!((engine.current_step(), engine.highest_step_reached()), (5, 5));

        engine.previous().await.unwrap();
        engine.previous().await.unwrap();
        assert_eq!((engine.current_step(), engine.highest_step_reached()), (3, 5));

        assert!(engine.go_to(7).await.is_err());
        engine.go_to(6).await.unwrap();
        assert_eq!((engine.current_step(), engine.highest_step_reached()), (6, 6));

        let reopened = open_with(backend).await;
        assert_eq!(reopened.record(), engine.record());
    }

    #[tokio::test]
    async fn test_rejected_go_to_writes_nothing() {
        let backend = Arc::new(CountingBackend::default());
        let mut engine = open_with(backend.clone()).await;

        engine.next().await.unwrap();
        let writes = backend.writes.load(Ordering::SeqCst);

        assert!(engine.go_to(4).await.is_err());
        assert!(engine.go_to(0).await.is_err());
        assert!(engine.go_to(8).await.is_err());
        assert!(engine.go_to(-1).await.unwrap_err().is_invalid_step());

        assert_eq!(backend.writes.load(Ordering::SeqCst), writes);
        assert_eq!(engine.current_step(), 2);
    }

    #[tokio::test]
    async fn test_toggle_persists_and_rejects_unknown() {
        let backend = Arc::new(CountingBackend::default());
        let mut engine = open_with(backend.clone()).await;

        assert!(engine.toggle("1").await.unwrap());
        assert!(engine.toggle("7").await.unwrap());

        let err = engine.toggle("X").await.unwrap_err();
        assert!(matches!(err, WorkflowError::CaseNotFound(ref id) if id == "X"));
        assert_eq!(engine.selection().len(), 2);

        let reopened = open_with(backend).await;
        assert!(reopened.selection().contains("1"));
        assert!(reopened.selection().contains("7"));
    }

    #[tokio::test]
    async fn test_stale_id_can_be_removed() {
        let backend = Arc::new(CountingBackend::default());
        backend
            .set(KEY, r#"{"currentStep":1,"highestStepReached":1,"selectedCases":["X","1"]}"#)
            .await
            .unwrap();

        let mut engine = open_with(backend).await;
        assert_eq!(engine.selected_cases().len(), 1);
        assert_eq!(engine.summary().stale_references, 1);

        assert!(!engine.toggle("X").await.unwrap());
        assert_eq!(engine.selection().members(), &["1".to_string()]);
    }

    #[tokio::test]
    async fn test_select_all_is_atomic() {
        let mut engine = open_with(Arc::new(CountingBackend::default())).await;
        engine.toggle("3").await.unwrap();

        let bad = vec!["1".to_string(), "nope".to_string()];
        assert!(engine.select_all(&bad).await.is_err());
        assert_eq!(engine.selection().members(), &["3".to_string()]);

        let good = vec!["1".to_string(), "2".to_string()];
        engine.select_all(&good).await.unwrap();
        assert_eq!(engine.selection().members(), good.as_slice());
    }

    #[tokio::test]
    async fn test_toggle_all_and_clear() {
        let mut engine = open_with(Arc::new(CountingBackend::default())).await;
        let visible: Vec<String> = engine
            .registry()
            .filter(Some(crate::case::CaseCategory::Action))
            .iter()
            .map(|c| c.id.clone())
            .collect();

        assert!(engine.toggle_all(&visible).await.unwrap());
        assert_eq!(engine.selection().len(), 3);
        assert!(!engine.toggle_all(&visible).await.unwrap());
        assert!(engine.selection().is_empty());

        engine.toggle("4").await.unwrap();
        engine.clear_selection().await;
        assert!(engine.selection().is_empty());
        assert_eq!(engine.summary().total_estimated_recovery, 0);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_state_in_memory() {
        let backend = Arc::new(CountingBackend::default());
        backend.fail_writes.store(true, Ordering::SeqCst);
        let mut engine = open_with(backend.clone()).await;

        engine.next().await.unwrap();
        engine.toggle("2").await.unwrap();

        assert_eq!(engine.current_step(), 2);
        assert!(engine.selection().contains("2"));
        assert!(engine.is_degraded());

        backend.fail_writes.store(false, Ordering::SeqCst);
        engine.next().await.unwrap();
        assert_eq!(engine.last_save(), Some(SaveOutcome::Persisted));
        assert!(!engine.is_degraded());
    }

    #[tokio::test]
    async fn test_badge_tracks_frontier_not_cursor() {
        let mut engine = open_with(Arc::new(CountingBackend::default())).await;
        engine.next().await.unwrap();
        engine.next().await.unwrap();
        engine.go_to(1).await.unwrap();

        let badge = engine.badge().unwrap();
        assert_eq!(badge.to_string(), "1/7");
    }

    #[tokio::test]
    async fn test_step_strip_and_current_definition() {
        let mut engine = open_with(Arc::new(CountingBackend::default())).await;
        engine.next().await.unwrap();

        assert_eq!(engine.current_step_definition().unwrap().short_label, "Evidence");
        let strip = engine.step_strip();
        assert_eq!(strip[0].1, StepState::Completed);
        assert_eq!(strip[1].1, StepState::Current);
        assert_eq!(strip[2].1, StepState::Upcoming);
    }

    #[tokio::test]
    async fn test_selectable_cases_marks_selection() {
        let mut engine = open_with(Arc::new(CountingBackend::default())).await;
        engine.toggle("3").await.unwrap();

        let cases = engine.selectable_cases();
        assert_eq!(cases.len(), 5);
        assert!(cases.iter().all(|(c, _)| c.is_actionable()));
        let selected: Vec<_> = cases.iter().filter(|(_, s)| *s).map(|(c, _)| c.id.as_str()).collect();
        assert_eq!(selected, vec!["3"]);
    }

    #[tokio::test]
    async fn test_complete_only_at_final_step() {
        let mut engine = open_with(Arc::new(CountingBackend::default())).await;
        engine.toggle("1").await.unwrap();
        engine.toggle("7").await.unwrap();

        assert!(matches!(
            engine.complete(),
            Err(WorkflowError::NotAtFinalStep { current: 1, total: 7 })
        ));

        for _ in 0..6 {
            engine.next().await.unwrap();
        }
        let summary = engine.complete().unwrap();
        assert_eq!(summary.case_count, 2);
        assert_eq!(summary.total_estimated_recovery, 2100 + 980);
        assert_eq!(engine.current_step(), steps::LEGAL);

        // Earlier steps stay reachable after completion.
        engine.go_to(steps::REPORT.into()).await.unwrap();
        assert_eq!(engine.highest_step_reached(), 7);
    }

    #[tokio::test]
    async fn test_reset() {
        let backend = Arc::new(CountingBackend::default());
        let mut engine = open_with(backend.clone()).await;
        engine.next().await.unwrap();
        engine.toggle("1").await.unwrap();

        engine.reset().await.unwrap();
        assert_eq!(engine.record(), ProgressRecord::default());
        assert!(backend.get(KEY).await.unwrap().is_none());

        let reopened = open_with(backend).await;
        assert_eq!(reopened.record(), ProgressRecord::default());
    }

    #[tokio::test]
    async fn test_record_beyond_definition_starts_fresh() {
        let backend = Arc::new(CountingBackend::default());
        backend
            .set(KEY, r#"{"currentStep":9,"highestStepReached":9,"selectedCases":["1"]}"#)
            .await
            .unwrap();

        let engine = open_with(backend).await;
        assert_eq!(engine.record(), ProgressRecord::default());
    }
