//! `iam-lifecycle steps` command handler

use std::io::Write;

use serde::Serialize;

use iam_lifecycle_scenario::{SCENARIO_NAME, ScenarioStep};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `steps` command.
pub fn execute(writer: &OutputWriter) -> Result<(), CliError> {
    writer.render(&StepPlan::new())
}

/// Ordered step plan of the scenario.
#[derive(Serialize)]
pub struct StepPlan {
    pub scenario: &'static str,
    pub steps: Vec<StepPlanEntry>,
}

#[derive(Serialize)]
pub struct StepPlanEntry {
    pub ordinal: usize,
    pub id: &'static str,
    pub summary: &'static str,
}

impl StepPlan {
    pub fn new() -> Self {
        let steps = ScenarioStep::ALL
            .iter()
            .map(|step| StepPlanEntry {
                ordinal: step.ordinal(),
                id: step.id(),
                summary: step.summary(),
            })
            .collect();
        Self {
            scenario: SCENARIO_NAME,
            steps,
        }
    }
}

impl Render for StepPlan {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Scenario: {}", self.scenario.bold())?;
        writeln!(w)?;
        for entry in &self.steps {
            writeln!(
                w,
                "  {:>2}. {:<30} {}",
                entry.ordinal, entry.id, entry.summary
            )?;
        }
        writeln!(w)?;
        writeln!(
            w,
            "Cleanup: delete group, then user (reverse creation order; \"not found\" is success)"
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_lists_every_step_in_order() {
        let plan = StepPlan::new();
        assert_eq!(plan.steps.len(), 20);
        assert_eq!(plan.steps[0].id, "create-user");
        assert_eq!(plan.steps[19].id, "verify-group-deleted");
        assert!(plan.steps.iter().enumerate().all(|(i, e)| e.ordinal == i + 1));
    }

    #[test]
    fn plan_renders_text() {
        let mut buffer = Vec::new();
        StepPlan::new().render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("iam-user-group-management"));
        assert!(output.contains("add-user-to-group-again"));
        assert!(output.contains("Cleanup:"));
    }

    #[test]
    fn plan_serializes_to_json() {
        let value = serde_json::to_value(StepPlan::new()).unwrap();
        assert_eq!(value["steps"][4]["id"], "create-group");
        assert_eq!(value["steps"][4]["ordinal"], 5);
    }
}
