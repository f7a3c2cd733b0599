//! Checker and interactor classification.
use crate::{error::ClassifyError, files::read_text};
use package_spec::{package_path, SourceFile, Specification};
use runtime_map::{Runtime, RUNTIMES};
use snapshot_apis::{Checker, Interactor};
use std::path::Path;

/// Verifier equivalent to a standard checker, if `name` is one.
pub fn standard_checker(name: &str) -> Option<Checker> {
    let tokens = |precision, case_sensitive| Checker::Tokens {
        precision,
        case_sensitive,
    };
    let checker = match name {
        // integers
        "std::ncmp.cpp" => tokens(0, true),
        // doubles with absolute or relative error
        "std::rcmp4.cpp" => tokens(4, true),
        "std::rcmp6.cpp" => tokens(6, true),
        "std::rcmp9.cpp" => tokens(9, true),
        "std::wcmp.cpp" => tokens(0, true),
        "std::nyesno.cpp" | "std::yesno.cpp" => tokens(0, false),
        "std::fcmp.cpp" | "std::hcmp.cpp" | "std::lcmp.cpp" => Checker::Lines,
        _ => return None,
    };
    Some(checker)
}

/// Picks the first runtime (in table order) which compiles one of the
/// sources.
pub fn find_program(sources: &[SourceFile]) -> Option<(&'static Runtime, &SourceFile)> {
    RUNTIMES.iter().find_map(|runtime| {
        sources
            .iter()
            .find(|source| runtime.accepts(&source.kind))
            .map(|source| (runtime, source))
    })
}

async fn read_source(package: &Path, source: &SourceFile) -> anyhow::Result<String> {
    let path = package_path(package, &source.path)?;
    read_text(&path).await
}

pub(crate) async fn checker(package: &Path, spec: &Specification) -> anyhow::Result<Checker> {
    let name = &spec.checker.name;
    if let Some(checker) = standard_checker(name) {
        return Ok(checker);
    }
    match find_program(&spec.checker.sources) {
        Some((runtime, source)) => {
            tracing::debug!(checker = %name, runtime = runtime.name, "custom checker");
            Ok(Checker::Program {
                runtime: runtime.name.to_string(),
                source: read_source(package, source).await?,
            })
        }
        None => Err(ClassifyError::UnsupportedChecker { name: name.clone() }.into()),
    }
}

/// Interactor is optional; declared but unusable one is an error.
pub(crate) async fn interactor(
    package: &Path,
    spec: &Specification,
) -> anyhow::Result<Option<Interactor>> {
    let sources = &spec.interactor.sources;
    if sources.is_empty() {
        return Ok(None);
    }
    let (runtime, source) = find_program(sources).ok_or(ClassifyError::UnsupportedInteractor)?;
    Ok(Some(Interactor {
        runtime: runtime.name.to_string(),
        source: read_source(package, source).await?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &str, kind: &str) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn standard_table() {
        assert_eq!(
            standard_checker("std::yesno.cpp"),
            Some(Checker::Tokens {
                precision: 0,
                case_sensitive: false
            })
        );
        assert_eq!(
            standard_checker("std::rcmp6.cpp"),
            Some(Checker::Tokens {
                precision: 6,
                case_sensitive: true
            })
        );
        assert_eq!(standard_checker("std::lcmp.cpp"), Some(Checker::Lines));
        assert_eq!(standard_checker("check.cpp"), None);
    }

    #[test]
    fn program_follows_table_order() {
        let sources = vec![
            source("files/check.py", "python.3"),
            source("files/check.cpp", "cpp.g++17"),
            source("files/check.txt", "unknown"),
        ];
        let (runtime, picked) = find_program(&sources).unwrap();
        assert_eq!(runtime.name, "cpp:17-gnu10");
        assert_eq!(picked.path, "files/check.cpp");
        assert!(find_program(&[source("a", "unknown")]).is_none());
    }

    #[tokio::test]
    async fn custom_checker_embeds_source() {
        let package = tempfile::tempdir().unwrap();
        std::fs::create_dir(package.path().join("files")).unwrap();
        std::fs::write(package.path().join("files/check.cpp"), "int main() {}").unwrap();
        let mut spec = Specification::default();
        spec.checker.name = "check.cpp".to_string();
        spec.checker.sources = vec![source("files/check.cpp", "cpp.g++17")];
        assert_eq!(
            checker(package.path(), &spec).await.unwrap(),
            Checker::Program {
                runtime: "cpp:17-gnu10".to_string(),
                source: "int main() {}".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn checker_source_outside_package() {
        let outside = tempfile::tempdir().unwrap();
        let path = outside.path().join("check.cpp");
        std::fs::write(&path, "secret").unwrap();
        let package = tempfile::tempdir().unwrap();
        let mut spec = Specification::default();
        spec.checker.name = "check.cpp".to_string();
        spec.checker.sources = vec![source(&path.display().to_string(), "cpp.g++17")];
        assert!(checker(package.path(), &spec).await.is_err());
    }

    #[tokio::test]
    async fn unsupported_checker_is_named() {
        let package = tempfile::tempdir().unwrap();
        let mut spec = Specification::default();
        spec.checker.name = "check.bf".to_string();
        spec.checker.sources = vec![source("files/check.bf", "brainfuck")];
        let err = checker(package.path(), &spec).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ClassifyError>(),
            Some(&ClassifyError::UnsupportedChecker {
                name: "check.bf".to_string()
            })
        );
        assert!(err.to_string().contains("check.bf"));
    }

    #[tokio::test]
    async fn interactor_is_optional() {
        let package = tempfile::tempdir().unwrap();
        let mut spec = Specification::default();
        assert_eq!(interactor(package.path(), &spec).await.unwrap(), None);

        spec.interactor.sources = vec![source("files/interactor.bf", "brainfuck")];
        let err = interactor(package.path(), &spec).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ClassifyError>(),
            Some(&ClassifyError::UnsupportedInteractor)
        );
    }
}
