//! DeepCoder - an agentic CLI for code modification
//!
//! The library is organised around a small plan-execution engine: [`agent`]
//! classifies a natural-language instruction, plans the steps that satisfy
//! it and executes them against the file manager and a model backend, while
//! [`diff`] computes, renders and parses the unified diffs shown to the
//! user before any file is touched. [`cli`] drives the interactive side:
//! presenting changes, asking for confirmation, applying writes and
//! optionally staging and committing through [`git`].

pub mod agent;
pub mod cli;
pub mod config;
pub mod diff;
pub mod files;
pub mod git;
