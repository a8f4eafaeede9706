//! Instruction classification and entity extraction

use serde::{Deserialize, Serialize};

/// Intent of a coding instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Refactor,
    AddFeature,
    FixBug,
    Explain,
    Document,
    Unknown,
}

impl TaskCategory {
    /// Stable tag used in search criteria and prompts
    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Refactor => "refactor",
            TaskCategory::AddFeature => "add_feature",
            TaskCategory::FixBug => "fix_bug",
            TaskCategory::Explain => "explain",
            TaskCategory::Document => "document",
            TaskCategory::Unknown => "unknown",
        }
    }

    /// Human form of the tag, underscores replaced by spaces
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }
}

/// Filename and function-name hints pulled out of an instruction.
/// Both lists keep first-seen order and contain no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub files: Vec<String>,
    pub functions: Vec<String>,
}

/// Keyword sets checked in priority order; the first category with a hit
/// wins, so "fix and refactor" classifies as Refactor.
const CATEGORY_KEYWORDS: [(TaskCategory, &[&str]); 5] = [
    (
        TaskCategory::Refactor,
        &["refactor", "restructure", "rewrite", "improve"],
    ),
    (
        TaskCategory::AddFeature,
        &["add", "create", "implement", "new"],
    ),
    (
        TaskCategory::FixBug,
        &["fix", "resolve", "debug", "issue", "bug"],
    ),
    (
        TaskCategory::Explain,
        &["explain", "understand", "interpret"],
    ),
    (
        TaskCategory::Document,
        &["document", "documentation", "comment"],
    ),
];

/// Extensions that mark a whitespace token as a filename
const FILE_EXTENSIONS: [&str; 13] = [
    ".py", ".js", ".ts", ".java", ".c", ".cpp", ".h", ".html", ".css", ".md", ".json", ".yml",
    ".yaml",
];

/// Classify an instruction and extract its entity hints.
pub fn classify_instruction(instruction: &str) -> (TaskCategory, EntitySet) {
    let lowered = instruction.to_lowercase();

    let category = CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(TaskCategory::Unknown);

    (category, extract_entities(instruction))
}

fn extract_entities(instruction: &str) -> EntitySet {
    let tokens: Vec<&str> = instruction.split_whitespace().collect();
    let mut entities = EntitySet::default();

    for token in &tokens {
        if FILE_EXTENSIONS.iter().any(|ext| token.ends_with(ext))
            && !entities.files.iter().any(|f| f == token)
        {
            entities.files.push(token.to_string());
        }
    }

    // A token directly before "function" or "method" names the function;
    // windows(2) naturally skips a keyword in first position.
    for pair in tokens.windows(2) {
        let keyword = pair[1];
        if keyword.eq_ignore_ascii_case("function") || keyword.eq_ignore_ascii_case("method") {
            let name = pair[0];
            if !entities.functions.iter().any(|f| f == name) {
                entities.functions.push(name.to_string());
            }
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refactor_wins_over_fix() {
        let (category, entities) = classify_instruction("please fix and refactor parser.py");
        assert_eq!(category, TaskCategory::Refactor);
        assert_eq!(entities.files, vec!["parser.py"]);
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let (category, _) = classify_instruction("Fix the login flow");
        assert_eq!(category, TaskCategory::FixBug);
    }

    #[test]
    fn each_category_has_a_trigger() {
        let cases = [
            ("restructure this module", TaskCategory::Refactor),
            ("implement pagination", TaskCategory::AddFeature),
            ("resolve the crash", TaskCategory::FixBug),
            ("explain how this works", TaskCategory::Explain),
            ("comment the parser", TaskCategory::Document),
        ];
        for (instruction, expected) in cases {
            assert_eq!(classify_instruction(instruction).0, expected, "{instruction}");
        }
    }

    #[test]
    fn unmatched_instruction_is_unknown() {
        let (category, entities) = classify_instruction("hello there");
        assert_eq!(category, TaskCategory::Unknown);
        assert!(entities.files.is_empty());
        assert!(entities.functions.is_empty());
    }

    #[test]
    fn repeated_filenames_are_collected_once() {
        let (_, entities) =
            classify_instruction("fix auth.py and clean auth.py then test auth.py again");
        assert_eq!(entities.files, vec!["auth.py"]);
    }

    #[test]
    fn filenames_keep_first_seen_order() {
        let (_, entities) = classify_instruction("rewrite b.py using a.js and b.py");
        assert_eq!(entities.files, vec!["b.py", "a.js"]);
    }

    #[test]
    fn function_hint_is_the_preceding_token() {
        let (_, entities) = classify_instruction("fix the login function in auth.py");
        assert_eq!(entities.functions, vec!["login"]);
    }

    #[test]
    fn method_keyword_also_triggers_extraction() {
        let (_, entities) = classify_instruction("document the save method and the save method");
        assert_eq!(entities.functions, vec!["save"]);
    }

    #[test]
    fn leading_function_keyword_is_ignored() {
        let (_, entities) = classify_instruction("function names should be short");
        assert!(entities.functions.is_empty());
    }

    #[test]
    fn category_label_replaces_underscores() {
        assert_eq!(TaskCategory::AddFeature.label(), "add feature");
        assert_eq!(TaskCategory::Refactor.label(), "refactor");
    }
}
