//! Command handlers -- one module per subcommand

pub mod config;
pub mod run;
pub mod steps;

use std::path::Path;

use tracing::debug;

use iam_lifecycle_core::config::LifecycleConfig;

use crate::error::CliError;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "iam-lifecycle.toml";

/// Effective configuration plus where it came from.
pub struct LoadedConfig {
    pub config: LifecycleConfig,
    /// File path, or `(built-in defaults)`
    pub source: String,
}

/// Loads the effective configuration.
///
/// An explicit path must exist. Without one, `./iam-lifecycle.toml` is used
/// when present and built-in defaults otherwise. Env overrides apply in
/// every case.
pub async fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, CliError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            tokio::fs::try_exists(default)
                .await
                .unwrap_or(false)
                .then(|| default.to_path_buf())
        }
    };

    match path {
        Some(path) => {
            let config = LifecycleConfig::load(&path).await?;
            Ok(LoadedConfig {
                config,
                source: path.display().to_string(),
            })
        }
        None => {
            debug!("no config file, using built-in defaults");
            let mut config = LifecycleConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(LoadedConfig {
                config,
                source: "(built-in defaults)".to_owned(),
            })
        }
    }
}
