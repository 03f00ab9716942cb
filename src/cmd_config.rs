//! Config subcommand handlers.

use std::path::Path;

use voicechain_config::{Config, ConfigValidator};

use crate::cli::ConfigAction;

pub(crate) fn handle_config_command(
    action: ConfigAction,
    config: &Config,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Check => config_check(config, path),
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
    }
}

fn config_check(config: &Config, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };
    println!("Config: {}", source);

    for warning in &result.warnings {
        println!("  warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("  error:   {}: {}", error.path, error.message);
    }

    if result.is_valid() {
        println!("OK");
        Ok(())
    } else {
        Err(format!("{} configuration error(s)", result.errors.len()).into())
    }
}
