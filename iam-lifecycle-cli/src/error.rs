//! CLI-specific error types and exit code mapping

use iam_lifecycle_core::error::{CheckError, LifecycleError};
use iam_lifecycle_scenario::ScenarioError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from iam-lifecycle-core.
    ///
    /// Scenario failures arrive here through `LifecycleError::Check`.
    #[error("{0}")]
    Core(#[from] LifecycleError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                               |
    /// |------|---------------------------------------|
    /// | 0    | Success                               |
    /// | 1    | Scenario failure / command error      |
    /// | 2    | Configuration error                   |
    /// | 3    | Cleanup failure with strict cleanup   |
    /// | 10   | IO error                              |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(LifecycleError::Config(_)) => 2,
            Self::Core(LifecycleError::Check(CheckError::Cleanup { .. })) => 3,
            Self::Io(_) | Self::Core(LifecycleError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ScenarioError> for CliError {
    fn from(e: ScenarioError) -> Self {
        Self::Core(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iam_lifecycle_core::error::ConfigError;
    use iam_lifecycle_core::IamError;
    use iam_lifecycle_scenario::ScenarioStep;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err = CliError::Core(LifecycleError::Config(ConfigError::FileNotFound {
            path: "x.toml".to_owned(),
        }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_cleanup_error() {
        let err = CliError::Core(LifecycleError::Check(CheckError::Cleanup { failures: 2 }));
        assert_eq!(err.exit_code(), 3, "strict cleanup failure should return 3");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_check_error() {
        let err = CliError::Core(LifecycleError::Check(CheckError::Step {
            step: "create-user".to_owned(),
            reason: "throttled".to_owned(),
        }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_json_serialize_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid json")
            .expect_err("should fail parsing");
        let err = CliError::JsonSerialize(json_err);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_from_scenario_assertion() {
        let err: CliError = ScenarioError::Assertion {
            step: ScenarioStep::GetUser,
            message: "Expected user".to_owned(),
        }
        .into();
        assert!(matches!(
            err,
            CliError::Core(LifecycleError::Check(CheckError::Assertion { ref step, .. }))
                if step == "get-user"
        ));
        assert!(err.to_string().contains("Expected user"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_from_scenario_client_error() {
        let err: CliError = ScenarioError::Client {
            step: ScenarioStep::CreateUser,
            source: IamError::Transport("connection reset".to_owned()),
        }
        .into();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_from_scenario_cleanup() {
        let err: CliError = ScenarioError::Cleanup { failures: 1 }.into();
        assert!(matches!(
            err,
            CliError::Core(LifecycleError::Check(CheckError::Cleanup { failures: 1 }))
        ));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_from_scenario_config() {
        let err: CliError = ScenarioError::Config {
            field: "initial_path".to_owned(),
            reason: "must begin and end with '/'".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = format!("{}", err);
        assert!(display_str.contains("configuration error"));
        assert!(display_str.contains("invalid TOML syntax"));
    }
}
