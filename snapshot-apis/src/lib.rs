//! Normalized problem snapshot, in the shape the judging platform consumes it.
//!
//! Everything here is plain data: importer builds it, callers serialize it.
pub mod content;
pub mod testing;
pub mod verifier;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use content::{Attachment, Editorial, Script, Solution, SolutionKind, Statement, Template};
pub use testing::{FeedbackPolicy, Generator, ScoringMode, Test, TestData, Testset};
pub use verifier::{Checker, Interactor};

/// Result of a single import
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Snapshot {
    pub problem: Problem,
    pub testing: TestingConfig,
    pub checker: Checker,
    /// None if the problem is not interactive
    pub interactor: Option<Interactor>,
    pub statements: Vec<Statement>,
    pub templates: Vec<Template>,
    pub attachments: Vec<Attachment>,
    pub testsets: Vec<Testset>,
    pub tests: Vec<Test>,
    pub editorials: Vec<Editorial>,
    pub solutions: Vec<Solution>,
    pub scripts: Vec<Script>,
}

/// Problem-level metadata
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Problem {
    /// Machine-readable name, as given by the package
    pub short_name: String,
    /// Maps locale to title
    pub titles: BTreeMap<String, String>,
    /// Package tags which are not importer directives
    pub tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TestingConfig {
    /// How many times each submission is run, at least 1
    pub run_count: u32,
}

impl Default for TestingConfig {
    fn default() -> Self {
        TestingConfig { run_count: 1 }
    }
}
