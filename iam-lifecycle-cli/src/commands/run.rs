//! `iam-lifecycle run` command handler

use std::io::Write;
use std::sync::Arc;

use tracing::info;

use iam_lifecycle_core::config::LifecycleConfig;
use iam_lifecycle_core::{IamError, InMemoryIamClient};
use iam_lifecycle_scenario::{
    CleanupOutcome, IamLifecycleScenario, Outcome, ScenarioConfig, ScenarioReport, StepStatus,
};

use crate::cli::{FaultSpec, RunArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
///
/// Renders the report (and the metrics file, when requested) in every case,
/// then maps a failed run to its `CliError` so the exit code reflects the
/// outcome.
pub async fn execute(
    mut args: RunArgs,
    config: &LifecycleConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let metrics = match args.metrics_file.take() {
        Some(path) => {
            let handle = crate::metrics_export::install_metrics_recorder()
                .map_err(|e| CliError::Command(format!("{e:#}")))?;
            Some((handle, path))
        }
        None => None,
    };

    let report = run_scenario(args, config).await?;
    writer.render(&report)?;
    if let Some((handle, path)) = &metrics {
        crate::metrics_export::write_metrics(handle, path).await?;
    }
    report.into_result()?;
    Ok(())
}

/// Builds the client and scenario from config + flags and runs it.
pub async fn run_scenario(
    args: RunArgs,
    config: &LifecycleConfig,
) -> Result<ScenarioReport, CliError> {
    let mut scenario_config = ScenarioConfig::from_core(&config.scenario);
    if let Some(prefix) = args.name_prefix {
        scenario_config.name_prefix = Some(prefix);
    }
    if args.strict_cleanup {
        scenario_config.strict_cleanup = true;
    }

    let client = build_client(config, &args.faults);
    info!(
        faults = args.faults.len(),
        strict_cleanup = scenario_config.strict_cleanup,
        "running scenario against in-memory IAM service"
    );

    let scenario = IamLifecycleScenario::new(Arc::new(client), scenario_config);
    Ok(scenario.run().await?)
}

fn build_client(config: &LifecycleConfig, faults: &[FaultSpec]) -> InMemoryIamClient {
    faults
        .iter()
        .fold(InMemoryIamClient::from_config(&config.backend), |client, fault| {
            let error = IamError::Service(format!("injected failure: {}", fault.operation));
            match fault.nth_call {
                Some(nth) => client.fail_on_call(fault.operation, nth, error),
                None => client.fail_on(fault.operation, error),
            }
        })
}

impl Render for ScenarioReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Scenario: {}", self.scenario.bold())?;
        writeln!(w, "  User:  {}", self.user_name)?;
        writeln!(w, "  Group: {}", self.group_name)?;
        writeln!(w)?;

        writeln!(w, "Steps:")?;
        for (idx, record) in self.steps.iter().enumerate() {
            let status = match &record.status {
                StepStatus::Passed => "PASS".green(),
                StepStatus::Failed { .. } => "FAIL".red().bold(),
                StepStatus::Skipped => "SKIP".dimmed(),
                StepStatus::Running => "RUN ".yellow(),
            };
            writeln!(w, "  {:>2}. [{}] {}", idx + 1, status, record.description)?;
            if let StepStatus::Failed { reason } = &record.status {
                writeln!(w, "          {}", reason.red())?;
            }
        }
        writeln!(w)?;

        writeln!(w, "Cleanup:")?;
        if self.cleanup.is_empty() {
            writeln!(w, "  (nothing was created)")?;
        }
        for record in &self.cleanup {
            let outcome = match &record.outcome {
                CleanupOutcome::Deleted => "deleted".green(),
                CleanupOutcome::AlreadyAbsent => "already absent".normal(),
                CleanupOutcome::Failed { reason } => format!("failed: {reason}").red(),
            };
            writeln!(
                w,
                "  {:<6} {:<40} {}",
                record.task.kind.to_string(),
                record.task.name,
                outcome
            )?;
        }
        writeln!(w)?;

        let outcome = match &self.outcome {
            Outcome::Passed => self.outcome.to_string().green().bold(),
            Outcome::Failed { .. } => self.outcome.to_string().red().bold(),
        };
        writeln!(w, "Result: {} ({} ms)", outcome, self.duration_ms)?;
        Ok(())
    }
}
