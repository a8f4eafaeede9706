//! Command-line driver
//!
//! Everything the executor defers lives here: presenting colorized diffs,
//! asking for confirmation, writing confirmed changes through the file
//! manager and driving git staging/commit per the policy flags.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use crate::agent::{Agent, ExecutionContext, FileChange};
use crate::config::Settings;
use crate::diff::colorize_diff;
use crate::git::GitManager;

/// DeepCoder - an agentic command line interface for code modification.
#[derive(Debug, Parser)]
#[command(
    name = "deepcoder",
    version,
    about = "Agentic CLI for code modification using DeepSeek models"
)]
pub struct Cli {
    /// Natural language instruction for the coding task
    pub instruction: String,

    /// Model platform: deepseek, togetherai or lightningai
    #[arg(short, long)]
    pub platform: Option<String>,

    /// DeepSeek model type: coder-v3, v3-base or r1
    #[arg(long)]
    pub model_type: Option<String>,

    /// Temperature for model generation (0.0-1.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate
    #[arg(short, long)]
    pub max_tokens: Option<u32>,

    /// Log level: trace, debug, info, warn or error
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Project root directory (defaults to the current directory)
    #[arg(short = 'r', long = "root")]
    pub project_root: Option<PathBuf>,

    /// Skip confirmation before applying changes
    #[arg(long)]
    pub no_confirm: bool,

    /// Stage changes in Git after applying
    #[arg(long)]
    pub stage: bool,

    /// Commit changes after applying (implies --stage)
    #[arg(long)]
    pub commit: bool,
}

impl Cli {
    /// Fold the flags over the loaded settings; CLI wins.
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(platform) = &self.platform {
            settings.model.platform = platform.to_lowercase();
        }
        if let Some(model_type) = &self.model_type {
            settings.model.model_type = model_type.clone();
        }
        if let Some(temperature) = self.temperature {
            settings.model.parameters.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.model.parameters.max_tokens = max_tokens;
        }
        settings.logging.level = self.log_level.clone();
        settings.git.auto_stage = self.stage || self.commit;
        settings.git.auto_commit = self.commit;
    }
}

/// Entry point called by `main` once the runtime and tracing are up.
pub async fn run(cli: Cli) -> Result<()> {
    let project_root = match &cli.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to resolve the current directory")?,
    };

    println!("DeepCoder - agentic CLI for code modification");

    let mut settings = Settings::load(&project_root)?;
    cli.apply_to(&mut settings);

    let git = GitManager::new(&project_root);
    if git.is_git_repo() {
        println!("Project at {} is a Git repository", project_root.display());
    } else if settings.git.auto_stage || settings.git.auto_commit {
        warn!("project is not a Git repository, ignoring --stage and --commit");
        settings.git.auto_stage = false;
        settings.git.auto_commit = false;
    }

    settings.validate(true)?;

    println!(
        "Initializing model (platform: {})...",
        settings.model.platform
    );
    let backend = deepcoder_models::create_backend(&settings.model)?;

    let agent = Agent::new(backend, &settings, &project_root);
    println!("Processing instruction: {}", cli.instruction);
    let context = agent.process_instruction(&cli.instruction).await;

    render_result(&agent, &git, &settings, &context, cli.no_confirm).await
}

/// Consume the returned context: error, changes or explanation.
async fn render_result(
    agent: &Agent,
    git: &GitManager,
    settings: &Settings,
    context: &ExecutionContext,
    no_confirm: bool,
) -> Result<()> {
    // When the run failed nothing is presented, even if earlier steps
    // already read files into the context
    if let Some(error) = &context.error {
        eprintln!("Error: {error}");
        return Ok(());
    }

    if !context.changes.is_empty() {
        handle_code_changes(agent, git, settings, &context.changes, no_confirm).await
    } else if let Some(explanation) = &context.explanation {
        println!("\nExplanation:\n{explanation}");
        Ok(())
    } else {
        println!("No changes or explanation generated");
        Ok(())
    }
}

async fn handle_code_changes(
    agent: &Agent,
    git: &GitManager,
    settings: &Settings,
    changes: &[FileChange],
    no_confirm: bool,
) -> Result<()> {
    println!("\nGenerated {} file change(s):", changes.len());
    for (index, change) in changes.iter().enumerate() {
        let kind = if change.is_new_file { "New file" } else { "Modified" };
        println!("\n{}. {}: {}", index + 1, kind, change.file_path);
        if !change.diff.is_empty() {
            print!("{}", colorize_diff(&change.diff));
        }
    }

    if !no_confirm && !confirm("\nApply these changes?")? {
        println!("Changes not applied");
        return Ok(());
    }

    println!("\nApplying changes...");
    let mut applied = Vec::new();
    for change in changes {
        match agent
            .file_manager()
            .write_file(&change.file_path, &change.new_content)
            .await
        {
            Ok(()) => {
                println!("✓ Updated {}", change.file_path);
                applied.push(change.file_path.clone());
            }
            Err(err) => eprintln!("✗ Failed to update {}: {}", change.file_path, err),
        }
    }

    if git.is_git_repo() && !applied.is_empty() && settings.git.auto_stage {
        println!("\nStaging changes in Git...");
        for path in &applied {
            match git.stage_file(path) {
                Ok(()) => println!("✓ Staged {path}"),
                Err(err) => eprintln!("✗ Failed to stage {path}: {err}"),
            }
        }

        if settings.git.auto_commit {
            println!("\nCommitting changes...");
            match git.commit(&format!("DeepCoder: {}", applied[0])) {
                Ok(hash) => {
                    let short = &hash[..hash.len().min(7)];
                    println!("✓ Committed changes: {short}");
                }
                Err(err) => eprintln!("✗ Failed to commit changes: {err}"),
            }
        }
    }

    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
