//! Git helpers driven by the system git binary
//!
//! Only the CLI driver touches these, and only after changes have been
//! confirmed and applied; the executor itself never mutates repository
//! state.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Trailer appended to every generated commit message
const COMMIT_TRAILER: &str = "Generated by DeepCoder CLI";

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not a Git repository: {0}")]
    NotARepository(PathBuf),
    #[error("git {command} failed: {message}")]
    CommandFailed { command: String, message: String },
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Working-tree state as reported by `git status --porcelain`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatus {
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
}

pub struct GitManager {
    project_root: PathBuf,
    is_repo: bool,
}

impl GitManager {
    /// Probe the root once; a missing git binary simply means "not a
    /// repository" here.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let is_repo = Command::new("git")
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(&project_root)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);

        Self {
            project_root,
            is_repo,
        }
    }

    pub fn is_git_repo(&self) -> bool {
        self.is_repo
    }

    /// Status of the working tree.
    pub fn status(&self) -> Result<GitStatus, GitError> {
        self.require_repo()?;
        let output = self.run(&["status", "--porcelain"])?;
        Ok(parse_porcelain(&output))
    }

    /// Stage one file, by path relative to the repository root.
    pub fn stage_file(&self, file_path: &str) -> Result<(), GitError> {
        self.require_repo()?;
        let rel = self.relative(file_path);
        debug!(path = %rel, "staging file");
        self.run(&["add", &rel]).map(|_| ())
    }

    /// Commit staged changes and return the new commit hash.
    pub fn commit(&self, message: &str) -> Result<String, GitError> {
        self.require_repo()?;
        let full_message = format!("{message}\n\n{COMMIT_TRAILER}");
        self.run(&["commit", "-m", &full_message])?;
        Ok(self.run(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    /// Whether git would ignore the path. Any failure counts as "not
    /// ignored".
    pub fn is_file_ignored(&self, file_path: &str) -> bool {
        if !self.is_repo {
            return false;
        }
        let rel = self.relative(file_path);
        Command::new("git")
            .args(["check-ignore", "-q", &rel])
            .current_dir(&self.project_root)
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.project_root)
            .output()?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn require_repo(&self) -> Result<(), GitError> {
        if self.is_repo {
            Ok(())
        } else {
            Err(GitError::NotARepository(self.project_root.clone()))
        }
    }

    fn relative(&self, file_path: &str) -> String {
        Path::new(file_path)
            .strip_prefix(&self.project_root)
            .map(|rel| rel.to_string_lossy().into_owned())
            .unwrap_or_else(|_| file_path.to_string())
    }
}

fn parse_porcelain(output: &str) -> GitStatus {
    let mut status = GitStatus::default();

    for line in output.lines() {
        if line.len() < 3 {
            continue;
        }
        let (code, path) = line.split_at(2);
        let path = path.trim().to_string();
        let mut markers = code.chars();
        let index = markers.next().unwrap_or(' ');
        let worktree = markers.next().unwrap_or(' ');

        if index == '?' {
            status.untracked.push(path);
            continue;
        }
        if index != ' ' {
            status.staged.push(path.clone());
        }
        if worktree != ' ' {
            status.modified.push(path);
        }
    }

    status
}
