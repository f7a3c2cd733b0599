//! Solutions, scripts, templates and attachments.
use crate::files::read_text;
use anyhow::Context;
use asset_client::AssetUploader;
use package_spec::{package_path, SourceFile, Specification};
use runtime_map::{runtime_for_source_type, runtimes_of_language, Runtime};
use snapshot_apis::{Attachment, Script, Solution, SolutionKind, Template};
use std::{path::Path, str::FromStr};
use strum::EnumString;

/// Name of the script which is built from the main solution
pub const MAIN_SOLUTION_SCRIPT: &str = "solution";

const TEMPLATE_PREFIX: &str = "template_";
const PUBLISHED_MATERIAL: &str = "with-statement";

/// Solution tags which have a counterpart in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "kebab-case")]
enum SolutionTag {
    Main,
    Accepted,
    Rejected,
    WrongAnswer,
    TimeLimitExceeded,
    TimeLimitExceededOrAccepted,
    MemoryLimitExceeded,
    Failed,
    TimeLimitExceededOrMemoryLimitExceeded,
    PresentationError,
}

impl SolutionTag {
    fn kind(self) -> SolutionKind {
        match self {
            SolutionTag::Main | SolutionTag::Accepted => SolutionKind::Correct,
            SolutionTag::Rejected => SolutionKind::Incorrect,
            SolutionTag::WrongAnswer => SolutionKind::WrongAnswer,
            SolutionTag::TimeLimitExceeded => SolutionKind::Timeout,
            SolutionTag::TimeLimitExceededOrAccepted => SolutionKind::TimeoutOrAccepted,
            SolutionTag::MemoryLimitExceeded => SolutionKind::Overflow,
            SolutionTag::Failed => SolutionKind::Failure,
            SolutionTag::TimeLimitExceededOrMemoryLimitExceeded
            | SolutionTag::PresentationError => SolutionKind::DontRun,
        }
    }
}

/// Kind of solution with given tag, `None` for tags which are not imported.
pub fn solution_kind(tag: &str) -> Option<SolutionKind> {
    SolutionTag::from_str(tag).ok().map(SolutionTag::kind)
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Runtime for a source, logging sources which are skipped.
fn runtime_of(source: &SourceFile) -> Option<&'static Runtime> {
    let runtime = runtime_for_source_type(&source.kind);
    if runtime.is_none() {
        tracing::debug!(path = %source.path, kind = %source.kind, "skipping source of unknown type");
    }
    runtime
}

async fn read_source(package: &Path, source: &SourceFile) -> anyhow::Result<String> {
    let context = || format!("unable to read source {:?}", source.path);
    let path = package_path(package, &source.path).with_context(context)?;
    read_text(&path).await.with_context(context)
}

pub(crate) async fn solutions(
    package: &Path,
    spec: &Specification,
) -> anyhow::Result<Vec<Solution>> {
    let mut solutions = Vec::new();
    for solution in &spec.solutions {
        let runtime = match runtime_of(&solution.source) {
            Some(runtime) => runtime,
            None => continue,
        };
        let kind = match solution_kind(&solution.tag) {
            Some(kind) => kind,
            None => {
                tracing::debug!(tag = %solution.tag, "skipping solution");
                continue;
            }
        };
        solutions.push(Solution {
            name: file_name(&solution.source.path),
            runtime: runtime.name.to_string(),
            source: read_source(package, &solution.source).await?,
            kind,
        });
    }
    Ok(solutions)
}

/// Every executable becomes a script named by its stem; main solution
/// becomes [`MAIN_SOLUTION_SCRIPT`].
pub(crate) async fn scripts(package: &Path, spec: &Specification) -> anyhow::Result<Vec<Script>> {
    let mut scripts = Vec::new();
    for executable in &spec.executables {
        let runtime = match runtime_of(executable) {
            Some(runtime) => runtime,
            None => continue,
        };
        scripts.push(Script {
            name: file_stem(&executable.path),
            runtime: runtime.name.to_string(),
            source: read_source(package, executable).await?,
        });
    }
    let main = spec
        .solutions
        .iter()
        .filter(|solution| solution.tag == "main");
    for solution in main {
        let runtime = match runtime_of(&solution.source) {
            Some(runtime) => runtime,
            None => continue,
        };
        scripts.push(Script {
            name: MAIN_SOLUTION_SCRIPT.to_string(),
            runtime: runtime.name.to_string(),
            source: read_source(package, &solution.source).await?,
        });
    }
    Ok(scripts)
}

/// Files named `template_*` become templates for every runtime of their
/// language.
pub(crate) async fn templates(
    package: &Path,
    spec: &Specification,
) -> anyhow::Result<Vec<Template>> {
    let mut templates = Vec::new();
    let files = spec.resources.iter().chain(spec.executables.iter());
    for file in files {
        if !file_stem(&file.path).starts_with(TEMPLATE_PREFIX) {
            continue;
        }
        let runtime = match runtime_of(file) {
            Some(runtime) => runtime,
            None => continue,
        };
        let source = read_source(package, file).await?;
        for sibling in runtimes_of_language(runtime.language()) {
            templates.push(Template {
                runtime: sibling.name.to_string(),
                source: source.clone(),
            });
        }
    }
    Ok(templates)
}

pub(crate) async fn attachments(
    package: &Path,
    spec: &Specification,
    assets: &AssetUploader,
) -> anyhow::Result<Vec<Attachment>> {
    let mut attachments = Vec::new();
    for material in &spec.materials {
        if material.publish != PUBLISHED_MATERIAL {
            continue;
        }
        let path = package_path(package, &material.path)?;
        let link = assets
            .upload_file(&path)
            .await
            .with_context(|| format!("unable to upload material {:?}", material.path))?;
        attachments.push(Attachment {
            name: file_name(&material.path),
            link,
        });
    }
    Ok(attachments)
}
