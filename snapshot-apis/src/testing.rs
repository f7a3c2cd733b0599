//! Test-sets and tests.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a test-set awards credit
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMode {
    /// Each passed test adds its score
    Each,
    /// Score is awarded only if all tests pass
    All,
    /// Credit equals the worst test
    Worst,
}

/// How much of the result is disclosed to the participant
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackPolicy {
    /// Every test is reported in detail
    Complete,
    /// Pass/fail with the first failed test
    Icpc,
    /// Like `Icpc`, but with resource usage and verdict of the failed test
    IcpcExpanded,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Testset {
    pub id: Uuid,
    /// 0 is reserved for samples
    pub index: u32,
    /// Milliseconds
    pub cpu_limit: u32,
    /// Bytes
    pub memory_limit: u64,
    /// Bytes
    pub file_size_limit: u64,
    pub scoring_mode: ScoringMode,
    pub feedback_policy: FeedbackPolicy,
    /// Indices of test-sets which must pass before this one is judged
    pub dependencies: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Test {
    pub testset_id: Uuid,
    /// Position in the package, starting from 0
    pub index: u32,
    /// Test is shown to participants as an example
    pub example: bool,
    pub score: f32,
    pub input: TestData,
    pub answer: TestData,
}

/// Where test data comes from
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TestData {
    /// Uploaded object
    Object { link: String },
    /// Produced by running a script
    Generator(Generator),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    pub script_name: String,
    pub arguments: Vec<String>,
}
