//! Shared setup for command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use voicechain_config::{Config, ConfigLoader, WorkflowConfig};
use voicechain_progress::ProgressStore;
use voicechain_workflow::{
    CaseCategory, CaseRegistry, ConfidenceBand, StaticCaseRegistry, WorkflowDefinition,
    WorkflowEngine,
};

/// Registry from the configured catalog, or the built-in demo catalog.
pub(crate) async fn load_registry(
    config: &WorkflowConfig,
) -> Result<Arc<dyn CaseRegistry>, Box<dyn std::error::Error>> {
    let registry = match &config.catalog {
        Some(path) => {
            let path = PathBuf::from(ConfigLoader::expand_path(&path.to_string_lossy()));
            StaticCaseRegistry::from_file(&path).await?
        }
        None => StaticCaseRegistry::demo()?,
    };
    debug!("Case registry holds {} cases", registry.len());
    Ok(Arc::new(registry))
}

/// Open the workflow engine with persisted progress.
pub(crate) async fn open_engine(config: &Config) -> Result<WorkflowEngine, Box<dyn std::error::Error>> {
    let registry = load_registry(&config.workflow).await?;
    let store = ProgressStore::from_config(&config.storage).await?;
    Ok(WorkflowEngine::open(WorkflowDefinition::voice_protection(), registry, store).await)
}

/// Parse a `--category` value. `all` and no value mean every category.
pub(crate) fn parse_category(
    value: Option<&str>,
) -> Result<Option<CaseCategory>, Box<dyn std::error::Error>> {
    match value {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => CaseCategory::parse(v)
            .map(Some)
            .ok_or_else(|| format!("Unknown category: {} (expected action, monitor, review or all)", v).into()),
    }
}

/// Whole euros with thousands separators.
pub(crate) fn format_eur(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('€');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub(crate) fn band_label(band: ConfidenceBand) -> &'static str {
    match band {
        ConfidenceBand::High => "high",
        ConfidenceBand::Medium => "medium",
        ConfidenceBand::Low => "low",
    }
}

/// Shorten `text` to `width` characters for table cells.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
