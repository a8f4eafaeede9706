//! Extraction of structured file changes from model output

use std::collections::HashMap;

use tracing::debug;

use crate::diff::create_diff;

/// Marker the generation prompt asks the model to put before each file
/// block
const FILE_MARKER: &str = "FILE: ";
const FENCE: &str = "```";

/// A proposed edit to one file, with the diff shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub file_path: String,
    pub original_content: String,
    pub new_content: String,
    /// Unified diff; empty exactly when old and new content are identical
    pub diff: String,
    pub is_new_file: bool,
}

/// Parse model output into ordered file changes, against the original
/// contents gathered so far.
///
/// Sections the model formatted incorrectly are skipped rather than
/// reported: generation output is best-effort, and a partial result is
/// more useful than none.
pub fn extract_changes(
    response: &str,
    original_files: &HashMap<String, String>,
) -> Vec<FileChange> {
    let mut changes = Vec::new();

    // Everything before the first marker is commentary
    for section in response.split(FILE_MARKER).skip(1) {
        let file_path = section[..section.find('\n').unwrap_or(section.len())].trim();

        let Some(fence_start) = section.find(FENCE) else {
            debug!(file_path, "skipping section without a fenced block");
            continue;
        };
        let body = &section[fence_start + FENCE.len()..];
        let Some(fence_end) = body.find(FENCE) else {
            debug!(file_path, "skipping section with an unterminated fence");
            continue;
        };
        let new_content = body[..fence_end].trim().to_string();

        let change = match original_files.get(file_path) {
            Some(original) => FileChange {
                file_path: file_path.to_string(),
                diff: create_diff(original, &new_content, file_path),
                original_content: original.clone(),
                new_content,
                is_new_file: false,
            },
            None => FileChange {
                file_path: file_path.to_string(),
                diff: create_diff("", &new_content, file_path),
                original_content: String::new(),
                new_content,
                is_new_file: true,
            },
        };
        changes.push(change);
    }

    changes
}
