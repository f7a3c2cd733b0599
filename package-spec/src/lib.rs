//! Parsed representation of a Polygon problem package.
//!
//! The tree is produced once per import and is read-only afterwards.
mod pattern;
mod properties;
mod xml;

use anyhow::{bail, Context as _};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub use pattern::format_path;
pub use properties::{ProblemProperties, PROPERTIES_FILE_NAME};
pub use xml::parse;

/// Name of the package manifest
pub const MANIFEST_FILE_NAME: &str = "problem.xml";

/// Reads and parses `problem.xml` from an extracted package.
#[tracing::instrument]
pub async fn load(package_dir: &Path) -> anyhow::Result<Specification> {
    let manifest_path = package_dir.join(MANIFEST_FILE_NAME);
    let manifest = tokio::fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    parse(&manifest).with_context(|| format!("failed to parse {}", manifest_path.display()))
}

/// Resolves `relative` against `root`. Absolute paths and `..` components
/// are rejected, so the result never leaves `root`.
pub fn package_path(root: &Path, relative: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
    let relative = relative.as_ref();
    let mut path = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                bail!("path {} points outside of the package", relative.display())
            }
        }
    }
    Ok(path)
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Specification {
    pub short_name: String,
    pub names: Vec<Name>,
    pub statements: Vec<Document>,
    pub tutorials: Vec<Document>,
    pub judging: Judging,
    /// `<files><resources>`
    pub resources: Vec<SourceFile>,
    /// Sources of `<files><executables>`, e.g. generators
    pub executables: Vec<SourceFile>,
    pub checker: Checker,
    pub interactor: Interactor,
    pub solutions: Vec<Solution>,
    pub materials: Vec<Material>,
    pub tags: Vec<String>,
}

/// Problem title in one language
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Name {
    pub language: String,
    pub value: String,
}

/// Statement or tutorial
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Document {
    pub language: String,
    /// MIME type, e.g. `application/x-tex`
    pub kind: String,
    /// Relative to package root
    pub path: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Judging {
    /// Absent in most packages
    pub run_count: Option<i64>,
    pub testsets: Vec<Testset>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Testset {
    pub name: String,
    /// Milliseconds
    pub time_limit: u32,
    /// Bytes
    pub memory_limit: u64,
    /// printf-like pattern, e.g. `tests/%02d`
    pub input_path_pattern: String,
    pub answer_path_pattern: String,
    pub tests: Vec<Test>,
    pub groups: Vec<Group>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TestMethod {
    Manual,
    Generated,
}

impl Default for TestMethod {
    fn default() -> Self {
        TestMethod::Manual
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Test {
    pub method: TestMethod,
    /// Generator command line, for generated tests
    pub command: String,
    pub sample: bool,
    pub points: Option<f32>,
    /// Empty if the test does not belong to a group
    pub group: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Group {
    pub name: String,
    /// `complete-group` or `each-test`
    pub points_policy: String,
    /// `complete`, `icpc`, `points`, `none` or `icpc-expanded`
    pub feedback_policy: String,
    /// Names of groups this group depends on
    pub dependencies: Vec<String>,
}

/// Source file reference with its Polygon type (e.g. `cpp.g++17`)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Checker {
    /// Either standard name like `std::ncmp.cpp` or a custom file name
    pub name: String,
    pub sources: Vec<SourceFile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Interactor {
    pub sources: Vec<SourceFile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Solution {
    /// `main`, `accepted`, `wrong-answer`, ...
    pub tag: String,
    pub source: SourceFile,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Material {
    pub path: String,
    /// `with-statement`, `with-tutorial` or `no`
    pub publish: String,
}

impl Specification {
    /// Testset used for judging: the one called `tests`, or the first one.
    pub fn main_testset(&self) -> Option<&Testset> {
        self.judging
            .testsets
            .iter()
            .find(|set| set.name.eq_ignore_ascii_case("tests"))
            .or_else(|| self.judging.testsets.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testset(name: &str) -> Testset {
        Testset {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn paths_stay_inside_package() {
        let root = Path::new("/tmp/package");
        assert_eq!(
            package_path(root, "statements/english/pic.png").unwrap(),
            root.join("statements/english/pic.png")
        );
        assert_eq!(
            package_path(root, "./files/gen.cpp").unwrap(),
            root.join("files/gen.cpp")
        );
        assert!(package_path(root, "/etc/passwd").is_err());
        assert!(package_path(root, "../secret").is_err());
        assert!(package_path(root, "files/../../secret").is_err());
    }

    #[test]
    fn main_testset_prefers_tests() {
        let mut spec = Specification::default();
        assert!(spec.main_testset().is_none());
        spec.judging.testsets = vec![testset("pretests"), testset("Tests")];
        assert_eq!(spec.main_testset().unwrap().name, "Tests");
        spec.judging.testsets = vec![testset("pretests"), testset("other")];
        assert_eq!(spec.main_testset().unwrap().name, "pretests");
    }
}
