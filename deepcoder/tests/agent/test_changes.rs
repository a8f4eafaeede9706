//! Change-extraction tests through the full pipeline

use super::common::*;
use deepcoder::agent::Agent;
use deepcoder::diff::{parse_diff, DiffAction};
use tempfile::TempDir;

#[tokio::test]
async fn generation_can_modify_and_create_files_in_one_reply() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "app.py", "import helpers\n");

    let backend = ScriptedBackend::with_content(
        "Adding the module now.\n\
         FILE: app.py\n```\nimport helpers\n\nhelpers.run()\n```\nWired it up.\n\
         FILE: helpers.py\n```\ndef run():\n    pass\n```\nNew module.",
    );
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent
        .process_instruction("add a helpers module to app.py")
        .await;

    assert!(context.error.is_none());
    assert_eq!(context.changes.len(), 2);

    let modified = &context.changes[0];
    assert_eq!(modified.file_path, "app.py");
    assert!(!modified.is_new_file);
    assert_eq!(modified.original_content, "import helpers\n");
    assert!(modified.diff.contains("+helpers.run()"));

    let created = &context.changes[1];
    assert_eq!(created.file_path, "helpers.py");
    assert!(created.is_new_file);
    assert_eq!(created.original_content, "");
    assert!(created.diff.contains("--- a/helpers.py"));
}

#[tokio::test]
async fn malformed_sections_are_skipped_without_failing_the_run() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "main.py", "pass\n");

    let backend = ScriptedBackend::with_content(
        "FILE: broken.py\nforgot the fence\n\
         FILE: main.py\n```\nprint('ok')\n```\nFixed.",
    );
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix main.py").await;

    assert!(context.error.is_none());
    assert_eq!(context.changes.len(), 1);
    assert_eq!(context.changes[0].file_path, "main.py");
}

#[tokio::test]
async fn document_category_runs_the_change_pipeline() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "utils.py", "def helper():\n    pass\n");

    let backend = ScriptedBackend::with_content(
        "FILE: utils.py\n```\ndef helper():\n    # Does nothing yet\n    pass\n```\nCommented.",
    );
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("comment utils.py").await;

    assert!(context.error.is_none());
    assert_eq!(context.changes.len(), 1);
    assert!(context.changes[0].diff.contains("+    # Does nothing yet"));
}

#[tokio::test]
async fn extracted_diffs_parse_back_into_edits() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "calc.py", "def add(a, b):\n    return a - b\n");

    let backend = ScriptedBackend::with_content(
        "FILE: calc.py\n```\ndef add(a, b):\n    return a + b\n```\nFixed the operator.",
    );
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix calc.py").await;
    let edits = parse_diff(&context.changes[0].diff);

    assert!(edits
        .iter()
        .any(|e| e.action == DiffAction::Delete && e.content.contains("a - b")));
    assert!(edits
        .iter()
        .any(|e| e.action == DiffAction::Add && e.content.contains("a + b")));
    assert!(edits.iter().all(|e| e.file == "calc.py"));
}
