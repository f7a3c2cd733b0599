//! Assembles statements and editorials.
use crate::{files::read_text, images, samples};
use asset_client::AssetUploader;
use package_spec::{package_path, Document, ProblemProperties, Specification};
use runtime_map::locale_from_language;
use snapshot_apis::{Editorial, Statement};
use std::path::{Path, PathBuf};

/// The only supported document format
pub const LATEX_TYPE: &str = "application/x-tex";

/// Joins statement sections. Legend goes first, other sections are
/// included when not empty.
pub fn compose_sections(props: &ProblemProperties) -> Vec<String> {
    let mut parts = vec![props.legend.clone()];
    let sections = [
        ("\\InputFile", &props.input),
        ("\\Interaction", &props.interaction),
        ("\\OutputFile", &props.output),
        ("\\Note", &props.notes),
        ("\\Scoring", &props.scoring),
    ];
    for (marker, text) in sections.iter() {
        if !text.is_empty() {
            parts.push(format!("{}\n\n{}", marker, text));
        }
    }
    parts
}

/// Locale of a document which can be imported.
fn document_locale(document: &Document) -> Option<&'static str> {
    if document.kind != LATEX_TYPE {
        tracing::debug!(path = %document.path, kind = %document.kind, "skipping document");
        return None;
    }
    let locale = locale_from_language(&document.language);
    if locale.is_none() {
        tracing::warn!(
            path = %document.path,
            language = %document.language,
            "skipping document in unsupported language"
        );
    }
    locale
}

fn document_dir(package: &Path, document: &Document) -> anyhow::Result<PathBuf> {
    let parent = Path::new(&document.path)
        .parent()
        .unwrap_or_else(|| Path::new(""));
    package_path(package, parent)
}

#[tracing::instrument(skip(package, spec, assets))]
pub(crate) async fn statements(
    package: &Path,
    spec: &Specification,
    assets: &AssetUploader,
) -> anyhow::Result<Vec<Statement>> {
    let interactive = !spec.interactor.sources.is_empty();
    let mut statements = Vec::new();
    for document in &spec.statements {
        let locale = match document_locale(document) {
            Some(locale) => locale,
            None => continue,
        };
        let dir = document_dir(package, document)?;
        let props = ProblemProperties::load(&dir).await?;

        let mut parts = compose_sections(&props);
        if interactive {
            // interactive problems have no sample tests in the testset
            let pairs = match samples::find_samples(&dir).await {
                Ok(pairs) => pairs,
                Err(err) => {
                    tracing::warn!(error = %format_args!("{:#}", err), "unable to find examples");
                    Vec::new()
                }
            };
            parts.push(samples::render_examples(&pairs).await?);
        }

        let latex = images::upload_images(&dir, parts.join("\n\n"), assets).await;
        statements.push(Statement {
            locale: locale.to_string(),
            title: props.name,
            author: props.author_name,
            latex,
        });
    }
    Ok(statements)
}

#[tracing::instrument(skip(package, spec, assets))]
pub(crate) async fn editorials(
    package: &Path,
    spec: &Specification,
    assets: &AssetUploader,
) -> anyhow::Result<Vec<Editorial>> {
    let mut editorials = Vec::new();
    for document in &spec.tutorials {
        let locale = match document_locale(document) {
            Some(locale) => locale,
            None => continue,
        };
        let text = read_text(&package_path(package, &document.path)?).await?;
        let dir = document_dir(package, document)?;
        let latex = images::upload_images(&dir, text, assets).await;
        editorials.push(Editorial {
            locale: locale.to_string(),
            latex,
        });
    }
    Ok(editorials)
}
