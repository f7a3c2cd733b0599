//! Texts and source files attached to the problem.
use serde::{Deserialize, Serialize};

/// Problem statement in a single locale
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Statement {
    pub locale: String,
    pub title: String,
    pub author: String,
    /// LaTeX markup
    pub latex: String,
}

/// Editorial (tutorial) in a single locale
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Editorial {
    pub locale: String,
    pub latex: String,
}

/// Initial source code offered to participants
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub runtime: String,
    pub source: String,
}

/// Auxiliary program, e.g. a test generator
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: String,
    pub runtime: String,
    pub source: String,
}

/// Expected outcome of a reference solution
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SolutionKind {
    Correct,
    Incorrect,
    WrongAnswer,
    Timeout,
    TimeoutOrAccepted,
    Overflow,
    Failure,
    DontRun,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub name: String,
    pub runtime: String,
    pub source: String,
    pub kind: SolutionKind,
}

/// File published together with the statement
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub link: String,
}
