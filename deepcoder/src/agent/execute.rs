//! Sequential plan execution
//!
//! The executor walks the plan strictly in order, one step to completion
//! before the next begins, threading an [`ExecutionContext`] through. The
//! only suspension points are the delegated calls to the file manager and
//! the model backend. Presentation, confirmation, apply and git steps are
//! markers the CLI consumes after the run; the executor only keeps them in
//! order.

use std::collections::HashMap;

use anyhow::{bail, Result};
use tracing::{debug, error};

use crate::agent::changes::{extract_changes, FileChange};
use crate::agent::plan::PlanStep;
use crate::agent::prompt;
use crate::agent::Agent;

/// Mutable state threaded through a single plan run
#[derive(Debug, Default)]
pub struct ExecutionContext {
    pub instruction: String,
    /// Contents of every file read so far, keyed by path
    pub files: HashMap<String, String>,
    pub changes: Vec<FileChange>,
    pub explanation: Option<String>,
    /// First failure, if any; never cleared once set
    pub error: Option<String>,
}

impl ExecutionContext {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            ..Self::default()
        }
    }
}

impl Agent {
    /// Run a plan to completion or to its first failing step.
    ///
    /// Collaborator failures never escape: the first one is recorded in
    /// `context.error` and stops the run, keeping whatever context had
    /// accumulated by then.
    pub async fn execute_plan(&self, plan: &[PlanStep], instruction: &str) -> ExecutionContext {
        let mut context = ExecutionContext::new(instruction);

        for step in plan {
            debug!(action = step.action(), "executing step");

            if let Err(err) = self.execute_step(step, &mut context).await {
                error!(action = step.action(), %err, "step failed");
                context.error = Some(format!("Error in {}: {}", step.action(), err));
                break;
            }
        }

        context
    }

    async fn execute_step(&self, step: &PlanStep, context: &mut ExecutionContext) -> Result<()> {
        match step {
            PlanStep::ReadFile { path } => {
                let content = self.files.read_file(path).await?;
                context.files.insert(path.clone(), content);
            }

            PlanStep::SearchFiles { criteria } => {
                for path in self.files.search_files(criteria).await? {
                    if !context.files.contains_key(&path) {
                        let content = self.files.read_file(&path).await?;
                        context.files.insert(path, content);
                    }
                }
            }

            PlanStep::GenerateChanges {
                category,
                instruction,
            } => {
                let prompt = prompt::code_generation_prompt(*category, instruction, &context.files);
                let response = self.model.generate(&prompt).await?;
                if let Some(err) = &response.error {
                    bail!("Model error: {err}");
                }
                context.changes = extract_changes(&response.content, &context.files);
            }

            PlanStep::GenerateExplanation { instruction } => {
                let prompt = prompt::explanation_prompt(instruction, &context.files);
                let response = self.model.generate(&prompt).await?;
                if let Some(err) = &response.error {
                    bail!("Model error: {err}");
                }
                context.explanation = Some(response.content);
            }

            PlanStep::PresentChanges
            | PlanStep::ConfirmChanges
            | PlanStep::ApplyChanges
            | PlanStep::PresentExplanation
            | PlanStep::GitStageChanges
            | PlanStep::GitCommitChanges { .. } => {
                debug!(action = step.action(), "step deferred to caller");
            }
        }

        Ok(())
    }
}
