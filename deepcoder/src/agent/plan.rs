//! Step planning for classified instructions

use serde::{Deserialize, Serialize};

use crate::agent::classify::{EntitySet, TaskCategory};

/// Git automation requested by the caller.
///
/// The planner does not enforce that committing implies staging;
/// reconciling the two flags is the caller's job.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GitPolicy {
    pub auto_stage: bool,
    pub auto_commit: bool,
}

/// What to look for when the instruction named no files outright
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub category: TaskCategory,
    pub entities: EntitySet,
}

/// One unit of work in an ordered execution plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    ReadFile { path: String },
    SearchFiles { criteria: SearchCriteria },
    GenerateChanges { category: TaskCategory, instruction: String },
    PresentChanges,
    ConfirmChanges,
    ApplyChanges,
    GenerateExplanation { instruction: String },
    PresentExplanation,
    GitStageChanges,
    GitCommitChanges { message: String },
}

impl PlanStep {
    /// Action tag used in log lines and error messages
    pub fn action(&self) -> &'static str {
        match self {
            PlanStep::ReadFile { .. } => "read_file",
            PlanStep::SearchFiles { .. } => "search_files",
            PlanStep::GenerateChanges { .. } => "generate_changes",
            PlanStep::PresentChanges => "present_changes",
            PlanStep::ConfirmChanges => "confirm_changes",
            PlanStep::ApplyChanges => "apply_changes",
            PlanStep::GenerateExplanation { .. } => "generate_explanation",
            PlanStep::PresentExplanation => "present_explanation",
            PlanStep::GitStageChanges => "git_stage_changes",
            PlanStep::GitCommitChanges { .. } => "git_commit_changes",
        }
    }
}

/// Build the ordered plan for an instruction. Deterministic given
/// identical inputs.
pub fn build_plan(
    category: TaskCategory,
    entities: &EntitySet,
    instruction: &str,
    git: GitPolicy,
) -> Vec<PlanStep> {
    let mut plan = Vec::new();

    // Gather context: either the files named outright, or a search
    if entities.files.is_empty() {
        plan.push(PlanStep::SearchFiles {
            criteria: SearchCriteria {
                category,
                entities: entities.clone(),
            },
        });
    } else {
        for path in &entities.files {
            plan.push(PlanStep::ReadFile { path: path.clone() });
        }
    }

    match category {
        TaskCategory::Refactor
        | TaskCategory::AddFeature
        | TaskCategory::FixBug
        | TaskCategory::Document => {
            plan.push(PlanStep::GenerateChanges {
                category,
                instruction: instruction.to_string(),
            });
            plan.push(PlanStep::PresentChanges);
            plan.push(PlanStep::ConfirmChanges);
            plan.push(PlanStep::ApplyChanges);

            if git.auto_stage {
                plan.push(PlanStep::GitStageChanges);
            }
            if git.auto_commit {
                plan.push(PlanStep::GitCommitChanges {
                    message: format!("{}: {}", category.label(), instruction),
                });
            }
        }
        TaskCategory::Explain => {
            plan.push(PlanStep::GenerateExplanation {
                instruction: instruction.to_string(),
            });
            plan.push(PlanStep::PresentExplanation);
        }
        // Nothing beyond context gathering for instructions we could not
        // classify
        TaskCategory::Unknown => {}
    }

    plan
}
