//! `iam-lifecycle config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::cli::{ConfigAction, ConfigArgs, ConfigSection};
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Loads and validates the configuration, reporting any errors.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (parse errors, invalid values,
/// missing explicit file).
async fn execute_validate(
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = ?config_path, "validating configuration");

    let report = match load_config(config_path).await {
        Ok(loaded) => ConfigValidationReport {
            source: loaded.source,
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: display_source(config_path),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Displays the effective configuration (file + env overrides + defaults).
async fn execute_show(
    config_path: Option<&Path>,
    section: Option<ConfigSection>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = ?config_path, "loading configuration");

    let loaded = load_config(config_path).await?;
    let config = &loaded.config;

    let config_toml = match section {
        Some(ConfigSection::General) => toml::to_string_pretty(&config.general),
        Some(ConfigSection::Scenario) => toml::to_string_pretty(&config.scenario),
        Some(ConfigSection::Backend) => toml::to_string_pretty(&config.backend),
        None => toml::to_string_pretty(config),
    }
    .unwrap_or_else(|e| format!("(serialization error: {})", e));

    let config_value = match section {
        Some(ConfigSection::General) => serde_json::to_value(&config.general)?,
        Some(ConfigSection::Scenario) => serde_json::to_value(&config.scenario)?,
        Some(ConfigSection::Backend) => serde_json::to_value(&config.backend)?,
        None => serde_json::to_value(config)?,
    };

    let report = ConfigReport {
        source: loaded.source,
        section: section.map(|s| s.as_str().to_owned()),
        config: config_value,
        config_toml,
    };

    writer.render(&report)?;

    Ok(())
}

fn display_source(config_path: Option<&Path>) -> String {
    match config_path {
        Some(path) => path.display().to_string(),
        None => super::DEFAULT_CONFIG_PATH.to_owned(),
    }
}

/// Configuration display report.
///
/// JSON output carries `config`; text output prints `config_toml`.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Effective configuration (or the selected section)
    pub config: serde_json::Value,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration source
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
