//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a `ConfigError`, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_storage(config, &mut result);
        Self::validate_workflow(config, &mut result);
        Self::validate_scan(config, &mut result);

        result
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        let valid_backends = ["file", "memory"];
        if !valid_backends.contains(&config.storage.backend.as_str()) {
            result.add_error(ValidationError::new(
                "storage.backend",
                format!(
                    "Unknown storage backend '{}', valid values: {:?}",
                    config.storage.backend, valid_backends
                ),
            ));
        }

        if config.storage.key.trim().is_empty() {
            result.add_error(ValidationError::new("storage.key", "Storage key cannot be empty"));
        }

        if config.storage.retention_days > 365 {
            result.add_warning(ValidationWarning::new(
                "storage.retention_days",
                "retention_days is over a year, stale workflows will linger",
            ));
        }

        if config.storage.backend == "memory" {
            result.add_warning(ValidationWarning::new(
                "storage.backend",
                "memory backend does not survive a restart",
            ));
        }
    }

    fn validate_workflow(config: &Config, result: &mut ValidationResult) {
        if let Some(ref catalog) = config.workflow.catalog {
            if !catalog.exists() {
                result.add_error(ValidationError::new(
                    "workflow.catalog",
                    format!("Case catalog does not exist: {:?}", catalog),
                ));
            }
        }
    }

    fn validate_scan(config: &Config, result: &mut ValidationResult) {
        let scan = &config.scan;

        let intervals = [
            ("scan.progress_interval_ms", scan.progress_interval_ms),
            ("scan.videos_interval_ms", scan.videos_interval_ms),
            ("scan.matches_interval_ms", scan.matches_interval_ms),
        ];
        for (path, value) in intervals {
            if value == 0 {
                result.add_error(ValidationError::new(path, "interval must be greater than 0"));
            }
        }

        if scan.progress_step == 0 {
            result.add_error(ValidationError::new(
                "scan.progress_step",
                "progress_step must be greater than 0",
            ));
        }

        if scan.videos_min_increment > scan.videos_max_increment {
            result.add_error(ValidationError::new(
                "scan.videos_min_increment",
                "videos_min_increment cannot exceed videos_max_increment",
            ));
        }

        if !(0.0..=1.0).contains(&scan.match_probability) {
            result.add_error(ValidationError::new(
                "scan.match_probability",
                "match_probability must be within 0.0..=1.0",
            ));
        }

        if scan.navigate_delay_ms < scan.stages.total_ms() {
            result.add_warning(ValidationWarning::new(
                "scan.navigate_delay_ms",
                "report becomes ready before the last stage ends",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
