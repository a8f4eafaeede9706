//! Execution-path tests: context threading, fail-fast, search fallback

use super::common::*;
use deepcoder::agent::Agent;
use tempfile::TempDir;

#[tokio::test]
async fn named_file_is_read_and_changes_are_extracted() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "main.py", "def main():\n    pass\n");

    let backend = ScriptedBackend::with_content(
        "FILE: main.py\n```\ndef main():\n    return 0\n```\nReturned an exit code.",
    );
    let probe = backend.probe();
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix the crash in main.py").await;

    assert!(context.error.is_none());
    assert!(context.explanation.is_none());
    assert_eq!(context.files["main.py"], "def main():\n    pass\n");
    assert_eq!(context.changes.len(), 1);

    let change = &context.changes[0];
    assert_eq!(change.file_path, "main.py");
    assert!(!change.is_new_file);
    assert_eq!(change.original_content, "def main():\n    pass\n");
    assert!(change.diff.contains("+    return 0"));

    assert_eq!(probe.calls(), 1);
    assert!(probe.prompts()[0].contains("--- main.py ---"));
}

#[tokio::test]
async fn missing_file_halts_the_plan_before_generation() {
    let dir = TempDir::new().unwrap();

    let backend = ScriptedBackend::with_content("never used");
    let probe = backend.probe();
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix missing.py").await;

    let error = context.error.expect("read failure must surface");
    assert!(error.contains("Error in read_file"));
    assert!(error.contains("File not found"));
    assert!(context.changes.is_empty());
    assert!(context.explanation.is_none());
    assert_eq!(probe.calls(), 0);
}

#[tokio::test]
async fn context_read_before_a_failure_is_retained() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "a.py", "a = 1\n");

    let backend = ScriptedBackend::with_content("never used");
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix a.py and missing.py").await;

    assert!(context.error.is_some());
    // The successful read stays in the context, nothing is rolled back
    assert_eq!(context.files["a.py"], "a = 1\n");
    assert!(!context.files.contains_key("missing.py"));
}

#[tokio::test]
async fn explain_instruction_produces_an_explanation_only() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "code.py", "x = 1\n");

    let backend = ScriptedBackend::with_content("It assigns one to x.");
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("explain code.py").await;

    assert!(context.error.is_none());
    assert!(context.changes.is_empty());
    assert_eq!(context.explanation.as_deref(), Some("It assigns one to x."));
}

#[tokio::test]
async fn flagged_model_response_halts_with_an_error() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "main.py", "pass\n");

    let backend = ScriptedBackend::with_api_error("API Error (429): rate limited");
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix main.py").await;

    let error = context.error.expect("flagged response must surface");
    assert!(error.contains("Error in generate_changes"));
    assert!(error.contains("Model error"));
    assert!(error.contains("rate limited"));
    assert!(context.changes.is_empty());
}

#[tokio::test]
async fn transport_failure_halts_with_an_error() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "main.py", "pass\n");

    let backend = ScriptedBackend::failing();
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix main.py").await;

    let error = context.error.expect("transport failure must surface");
    assert!(error.contains("Error in generate_changes"));
    assert!(context.changes.is_empty());
}

#[tokio::test]
async fn unknown_instruction_only_gathers_context() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "a.py", "a = 1\n");

    let backend = ScriptedBackend::with_content("never used");
    let probe = backend.probe();
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("hello there").await;

    assert!(context.error.is_none());
    assert!(context.changes.is_empty());
    assert!(context.explanation.is_none());
    // The search step still ran and pulled in context
    assert!(context.files.contains_key("a.py"));
    assert_eq!(probe.calls(), 0);
}

#[tokio::test]
async fn search_fallback_feeds_the_generation_prompt() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "auth.py", "def login():\n    pass\n");

    let backend = ScriptedBackend::with_content("no structured changes");
    let probe = backend.probe();
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix the login flow").await;

    assert!(context.error.is_none());
    assert!(context.files.contains_key("auth.py"));
    assert!(probe.prompts()[0].contains("--- auth.py ---"));
}

#[tokio::test]
async fn unparseable_generation_output_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    write_project_file(dir.path(), "main.py", "pass\n");

    let backend = ScriptedBackend::with_content("I would not change anything here.");
    let agent = Agent::new(Box::new(backend), &test_settings(), dir.path());

    let context = agent.process_instruction("fix main.py").await;

    // Zero parseable sections is a valid outcome, not a failure
    assert!(context.error.is_none());
    assert!(context.changes.is_empty());
}
