//! The DeepCoder agent: classify, plan, execute
//!
//! [`Agent::process_instruction`] takes a natural-language instruction
//! through the full pipeline and hands the resulting
//! [`ExecutionContext`] back to the caller, which presents diffs, asks
//! for confirmation and applies writes entirely outside the agent.

pub mod changes;
pub mod classify;
pub mod execute;
pub mod plan;
pub mod prompt;

pub use changes::{extract_changes, FileChange};
pub use classify::{classify_instruction, EntitySet, TaskCategory};
pub use execute::ExecutionContext;
pub use plan::{build_plan, GitPolicy, PlanStep, SearchCriteria};

use deepcoder_models::ModelBackend;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Settings;
use crate::files::FileManager;

/// Orchestrates the workflow for one instruction at a time.
///
/// Each invocation of [`process_instruction`](Agent::process_instruction)
/// owns its context; an `Agent` holds no per-run state, so nothing is
/// shared between runs.
pub struct Agent {
    pub(crate) model: Box<dyn ModelBackend>,
    pub(crate) files: FileManager,
    git_policy: GitPolicy,
}

impl Agent {
    pub fn new(
        model: Box<dyn ModelBackend>,
        settings: &Settings,
        project_root: impl AsRef<Path>,
    ) -> Self {
        Self {
            model,
            files: FileManager::new(project_root.as_ref()),
            git_policy: GitPolicy {
                auto_stage: settings.git.auto_stage,
                auto_commit: settings.git.auto_commit,
            },
        }
    }

    pub fn file_manager(&self) -> &FileManager {
        &self.files
    }

    /// Process a natural-language instruction end to end.
    pub async fn process_instruction(&self, instruction: &str) -> ExecutionContext {
        info!(instruction, "processing instruction");

        let (category, entities) = classify_instruction(instruction);
        debug!(?category, ?entities, "classified instruction");

        let plan = build_plan(category, &entities, instruction, self.git_policy);
        debug!(steps = plan.len(), "created plan");

        self.execute_plan(&plan, instruction).await
    }
}
