//! File access and search for the agent
//!
//! All paths are resolved against the project root. Searches honor an
//! ignore set built from fixed defaults plus the project's `.gitignore`.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

use crate::agent::classify::TaskCategory;
use crate::agent::plan::SearchCriteria;

/// File types considered when searching for context
const CODE_FILE_EXTENSIONS: [&str; 13] = [
    "py", "js", "ts", "java", "c", "cpp", "h", "html", "css", "md", "json", "yml", "yaml",
];

/// Ignored regardless of what .gitignore says
const DEFAULT_IGNORE_PATTERNS: [&str; 9] = [
    "**/node_modules/**",
    "**/.git/**",
    "**/venv/**",
    "**/.env",
    "**/__pycache__/**",
    "**/*.pyc",
    "**/dist/**",
    "**/build/**",
    "**/.DS_Store",
];

/// Cap on fallback search results, so a broad search cannot overwhelm the
/// generation prompt
const SEARCH_RESULT_LIMIT: usize = 5;

/// Errors from file access
#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads, writes and searches files under one project root
pub struct FileManager {
    project_root: PathBuf,
    ignore: GlobSet,
}

impl FileManager {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let ignore = build_ignore_set(&project_root);
        Self {
            project_root,
            ignore,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Read a file's content.
    pub async fn read_file(&self, file_path: &str) -> Result<String, FileError> {
        let path = self.resolve(file_path);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(FileError::NotFound(path))
            }
            Err(source) => Err(FileError::Io { path, source }),
        }
    }

    /// Write content, creating parent directories as needed.
    pub async fn write_file(&self, file_path: &str, content: &str) -> Result<(), FileError> {
        let path = self.resolve(file_path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| FileError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| FileError::Io { path, source })
    }

    /// Find files relevant to the search criteria.
    pub async fn search_files(&self, criteria: &SearchCriteria) -> Result<Vec<String>, FileError> {
        // Explicitly named files win outright; keep the ones that exist
        if !criteria.entities.files.is_empty() {
            return Ok(criteria
                .entities
                .files
                .iter()
                .filter(|path| self.resolve(path).exists())
                .cloned()
                .collect());
        }

        let mut found = Vec::new();

        // Files mentioning one of the named functions
        if !criteria.entities.functions.is_empty() {
            for path in self.list_code_files() {
                if let Ok(content) = tokio::fs::read_to_string(&path).await {
                    if criteria
                        .entities
                        .functions
                        .iter()
                        .any(|name| content.contains(name.as_str()))
                    {
                        if let Some(rel) = relative_to(&path, &self.project_root) {
                            found.push(rel);
                        }
                    }
                }
            }
        }

        // Fallback: the most recently touched code files, trimmed by
        // category and capped to keep the prompt small
        if found.is_empty() {
            let code_files = self.list_code_files();
            let filtered: Vec<PathBuf> = match criteria.category {
                TaskCategory::Refactor | TaskCategory::FixBug => code_files
                    .into_iter()
                    .filter(|p| has_extension(p, &["py", "js", "ts"]))
                    .collect(),
                TaskCategory::Document => code_files
                    .into_iter()
                    .filter(|p| has_extension(p, &["py", "md", "html"]))
                    .collect(),
                _ => code_files,
            };

            found = filtered
                .into_iter()
                .take(SEARCH_RESULT_LIMIT)
                .filter_map(|path| relative_to(&path, &self.project_root))
                .collect();
        }

        Ok(found)
    }

    /// All code files under the root, newest first.
    fn list_code_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<(PathBuf, SystemTime)> = WalkDir::new(&self.project_root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_ignored(entry))
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| has_extension(entry.path(), &CODE_FILE_EXTENSIONS))
            .filter_map(|entry| {
                let modified = entry.metadata().ok()?.modified().ok()?;
                Some((entry.into_path(), modified))
            })
            .collect();

        files.sort_by(|a, b| b.1.cmp(&a.1));
        files.into_iter().map(|(path, _)| path).collect()
    }

    fn is_ignored(&self, entry: &walkdir::DirEntry) -> bool {
        let rel = entry
            .path()
            .strip_prefix(&self.project_root)
            .unwrap_or(entry.path());
        if self.ignore.is_match(rel) {
            return true;
        }
        // A pattern like **/dist/** only matches entries inside the
        // directory, so probe with a synthetic child to prune the walk
        entry.file_type().is_dir() && self.ignore.is_match(rel.join("_"))
    }

    /// Resolve a possibly-relative path against the project root.
    fn resolve(&self, file_path: &str) -> PathBuf {
        let path = Path::new(file_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

fn build_ignore_set(project_root: &Path) -> GlobSet {
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }

    if let Ok(contents) = std::fs::read_to_string(project_root.join(".gitignore")) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match Glob::new(line) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => warn!(pattern = line, %err, "skipping .gitignore pattern"),
            }
        }
    }

    builder.build().unwrap_or_else(|err| {
        warn!(%err, "falling back to an empty ignore set");
        GlobSet::empty()
    })
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

fn relative_to(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().into_owned())
}
