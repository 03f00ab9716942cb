
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_unknown_backend() {
        let mut config = Config::default();
        config.storage.backend = "redis".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "storage.backend"));
    }

    #[test]
    fn test_validate_empty_key() {
        let mut config = Config::default();
        config.storage.key = "  ".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "storage.key"));
    }

    #[test]
    fn test_validate_long_retention_warning() {
        let mut config = Config::default();
        config.storage.retention_days = 1000;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "storage.retention_days"));
    }

    #[test]
    fn test_validate_memory_backend_warning() {
        let mut config = Config::default();
        config.storage.backend = "memory".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_validate_missing_catalog() {
        let mut config = Config::default();
        config.workflow.catalog = Some(PathBuf::from("/nonexistent/cases.json"));

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "workflow.catalog"));
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = Config::default();
        config.scan.videos_interval_ms = 0;

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "scan.videos_interval_ms"));
    }

    #[test]
    fn test_validate_inverted_increments() {
        let mut config = Config::default();
        config.scan.videos_min_increment = 80;

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "scan.videos_min_increment"));
    }

    #[test]
    fn test_validate_probability_range() {
        let mut config = Config::default();
        config.scan.match_probability = 1.5;

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "scan.match_probability"));
    }

    #[test]
    fn test_validate_short_navigate_delay_warning() {
        let mut config = Config::default();
        config.scan.navigate_delay_ms = 1000;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "scan.navigate_delay_ms"));
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut config = Config::default();
        config.storage.backend = "redis".to_string();
        config.scan.progress_step = 0;

        let err = ConfigValidator::validate(&config).into_result().unwrap_err();
        assert!(err.to_string().contains("storage.backend"));
    }

    #[test]
    fn test_into_result_returns_warnings() {
        let mut config = Config::default();
        config.storage.backend = "memory".to_string();

        let warnings = ConfigValidator::validate(&config).into_result().unwrap();
        assert_eq!(warnings.len(), 1);
    }
