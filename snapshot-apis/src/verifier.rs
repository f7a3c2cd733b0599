//! How answers are judged.
use serde::{Deserialize, Serialize};

/// Checker configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Checker {
    /// Compares whitespace-separated tokens. Numbers are compared with
    /// `precision` digits after the decimal point (0 means exact).
    Tokens { precision: u32, case_sensitive: bool },
    /// Compares output line by line
    Lines,
    /// Custom program, shipped as source
    Program { runtime: String, source: String },
}

/// Interactor is always a custom program
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Interactor {
    pub runtime: String,
    pub source: String,
}
