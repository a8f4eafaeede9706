//! Unified-diff computation, rendering and parsing
//!
//! [`create_diff`] produces the unified diff shown to the user before a
//! change is applied, from a line-level longest-common-subsequence match
//! with three lines of context per hunk. [`colorize_diff`] adds the
//! terminal escapes for presentation and [`parse_diff`] turns diff text
//! back into a flat list of [`DiffEdit`]s. All three are pure functions.

/// Unchanged context lines kept on each side of a hunk
const CONTEXT: usize = 3;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Whether a parsed diff line adds or removes text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffAction {
    Add,
    Delete,
}

/// One `+`/`-` line of a unified diff, anchored in the new file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEdit {
    pub action: DiffAction,
    pub file: String,
    /// 1-indexed start line of the surrounding hunk in the new file
    pub start_line: usize,
    pub line_count: usize,
    /// Line content with the leading marker stripped, newline kept
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpTag {
    Equal,
    Delete,
    Insert,
    Replace,
}

/// A matched or differing span: `a_start..a_end` in the old lines,
/// `b_start..b_end` in the new lines.
#[derive(Debug, Clone, Copy)]
struct Opcode {
    tag: OpTag,
    a_start: usize,
    a_end: usize,
    b_start: usize,
    b_end: usize,
}

/// Create a unified diff between old and new content.
///
/// Returns an empty string when the contents are identical.
pub fn create_diff(old_content: &str, new_content: &str, file_path: &str) -> String {
    let old_lines = split_keepends(old_content);
    let new_lines = split_keepends(new_content);

    let groups = grouped_opcodes(lcs_opcodes(&old_lines, &new_lines));
    if groups.is_empty() {
        return String::new();
    }

    let mut diff = String::new();
    diff.push_str(&format!("--- a/{file_path}\n"));
    diff.push_str(&format!("+++ b/{file_path}\n"));

    for group in &groups {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        diff.push_str(&format!(
            "@@ -{} +{} @@\n",
            format_range(first.a_start, last.a_end),
            format_range(first.b_start, last.b_end),
        ));

        for op in group {
            match op.tag {
                OpTag::Equal => {
                    for line in &old_lines[op.a_start..op.a_end] {
                        diff.push(' ');
                        diff.push_str(line);
                    }
                }
                OpTag::Delete | OpTag::Replace => {
                    for line in &old_lines[op.a_start..op.a_end] {
                        diff.push('-');
                        diff.push_str(line);
                    }
                    if op.tag == OpTag::Replace {
                        for line in &new_lines[op.b_start..op.b_end] {
                            diff.push('+');
                            diff.push_str(line);
                        }
                    }
                }
                OpTag::Insert => {
                    for line in &new_lines[op.b_start..op.b_end] {
                        diff.push('+');
                        diff.push_str(line);
                    }
                }
            }
        }
    }

    diff
}

/// Colorize a diff with ANSI escapes: additions green, deletions red,
/// hunk headers cyan.
pub fn colorize_diff(diff: &str) -> String {
    let mut colorized = String::with_capacity(diff.len());

    for line in diff.split_inclusive('\n') {
        if line.starts_with('+') {
            colorized.push_str(&format!("{GREEN}{line}{RESET}"));
        } else if line.starts_with('-') {
            colorized.push_str(&format!("{RED}{line}{RESET}"));
        } else if line.starts_with('@') {
            colorized.push_str(&format!("{CYAN}{line}{RESET}"));
        } else {
            colorized.push_str(line);
        }
    }

    colorized
}

/// Parse a unified diff into an ordered list of edits.
///
/// The current file is tracked from the most recent `+++ ` header (with
/// the `b/` convention stripped) and every content line is anchored to the
/// new-file start of its hunk.
pub fn parse_diff(diff: &str) -> Vec<DiffEdit> {
    let mut edits = Vec::new();
    let mut current_file: Option<String> = None;
    let mut hunk_start: Option<usize> = None;

    for line in diff.split_inclusive('\n') {
        if line.starts_with("--- ") {
            // Old-file header, nothing to track
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            let name = rest.trim();
            current_file = Some(name.strip_prefix("b/").unwrap_or(name).to_string());
        } else if line.starts_with("@@ ") {
            hunk_start = parse_hunk_new_start(line);
        } else if let (Some(file), Some(start)) = (current_file.as_deref(), hunk_start) {
            if let Some(content) = line.strip_prefix('+') {
                edits.push(DiffEdit {
                    action: DiffAction::Add,
                    file: file.to_string(),
                    start_line: start,
                    line_count: 1,
                    content: content.to_string(),
                });
            } else if let Some(content) = line.strip_prefix('-') {
                edits.push(DiffEdit {
                    action: DiffAction::Delete,
                    file: file.to_string(),
                    start_line: start,
                    line_count: 1,
                    content: content.to_string(),
                });
            }
        }
    }

    edits
}

/// Pull the new-file start line out of `@@ -o,oc +n,nc @@`.
fn parse_hunk_new_start(header: &str) -> Option<usize> {
    let new_range = header.split_whitespace().nth(2)?;
    let new_range = new_range.strip_prefix('+')?;
    new_range.split(',').next()?.parse().ok()
}

/// Split into lines, each keeping its trailing newline. Content without a
/// final newline yields a last line without one, which round-trips through
/// diff text unchanged.
fn split_keepends(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Opcodes from a longest-common-subsequence match of the two line slices.
///
/// Matched runs become `Equal` opcodes; the gaps between them collapse
/// into one `Replace`/`Delete`/`Insert` each, so deletions always precede
/// the insertions that replace them.
fn lcs_opcodes(a: &[&str], b: &[&str]) -> Vec<Opcode> {
    let (n, m) = (a.len(), b.len());

    // lengths[i][j] = LCS length of a[i..] and b[j..]
    let mut lengths = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i][j] = if a[i] == b[j] {
                lengths[i + 1][j + 1] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
        }
    }

    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    let (mut gap_a, mut gap_b) = (0, 0);

    while i < n && j < m {
        if a[i] == b[j] {
            push_gap(&mut ops, gap_a, i, gap_b, j);
            let (run_a, run_b) = (i, j);
            while i < n && j < m && a[i] == b[j] {
                i += 1;
                j += 1;
            }
            ops.push(Opcode {
                tag: OpTag::Equal,
                a_start: run_a,
                a_end: i,
                b_start: run_b,
                b_end: j,
            });
            gap_a = i;
            gap_b = j;
        } else if lengths[i + 1][j] >= lengths[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    push_gap(&mut ops, gap_a, n, gap_b, m);
    ops
}

fn push_gap(ops: &mut Vec<Opcode>, a_start: usize, a_end: usize, b_start: usize, b_end: usize) {
    let tag = match (a_start < a_end, b_start < b_end) {
        (true, true) => OpTag::Replace,
        (true, false) => OpTag::Delete,
        (false, true) => OpTag::Insert,
        (false, false) => return,
    };
    ops.push(Opcode {
        tag,
        a_start,
        a_end,
        b_start,
        b_end,
    });
}

/// Split opcodes into hunk groups with at most [`CONTEXT`] equal lines on
/// either side. An all-equal sequence yields no groups at all.
fn grouped_opcodes(mut codes: Vec<Opcode>) -> Vec<Vec<Opcode>> {
    if codes.is_empty() {
        return Vec::new();
    }

    // Trim leading and trailing context down to the window
    if codes[0].tag == OpTag::Equal {
        let op = &mut codes[0];
        op.a_start = op.a_start.max(op.a_end.saturating_sub(CONTEXT));
        op.b_start = op.b_start.max(op.b_end.saturating_sub(CONTEXT));
    }
    let last = codes.len() - 1;
    if codes[last].tag == OpTag::Equal {
        let op = &mut codes[last];
        op.a_end = op.a_end.min(op.a_start + CONTEXT);
        op.b_end = op.b_end.min(op.b_start + CONTEXT);
    }

    let mut groups = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();

    for mut op in codes {
        // An equal run longer than two context windows separates hunks
        if op.tag == OpTag::Equal && op.a_end - op.a_start > 2 * CONTEXT {
            group.push(Opcode {
                a_end: op.a_end.min(op.a_start + CONTEXT),
                b_end: op.b_end.min(op.b_start + CONTEXT),
                ..op
            });
            groups.push(std::mem::take(&mut group));
            op.a_start = op.a_start.max(op.a_end.saturating_sub(CONTEXT));
            op.b_start = op.b_start.max(op.b_end.saturating_sub(CONTEXT));
        }
        group.push(op);
    }

    if !group.is_empty() && !(group.len() == 1 && group[0].tag == OpTag::Equal) {
        groups.push(group);
    }

    groups
}

/// Format one side of a hunk header: 1-based start plus length, with the
/// length omitted when it is 1 and the start decremented for empty ranges.
fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    if length == 1 {
        return (start + 1).to_string();
    }
    let beginning = if length == 0 { start } else { start + 1 };
    format!("{beginning},{length}")
}
