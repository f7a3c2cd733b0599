//! Importer turns an extracted Polygon package into a [`Snapshot`].
//!
//! Stages run one after another, and the first failing stage aborts the
//! whole import.

mod checker;
mod error;
mod files;
mod groups;
mod images;
mod samples;
mod scoring;
mod sources;
mod statements;
mod testing;

use asset_client::{AssetBackend, MultipartUpload, ObjectUploader};
use package_spec::Specification;
use snapshot_apis::{Problem, Snapshot, TestingConfig};
use std::{collections::BTreeMap, path::Path, sync::Arc};

pub use checker::{find_program, standard_checker};
pub use error::{ClassifyError, ImportError};
pub use groups::{GroupIndex, SAMPLES_INDEX};
pub use images::{scan as scan_images, ImageRef};
pub use samples::{find_samples, render_examples, SamplePair};
pub use scoring::{distribute_evenly, FULL_CREDIT};
pub use sources::{solution_kind, MAIN_SOLUTION_SCRIPT};
pub use statements::{compose_sections, LATEX_TYPE};
pub use testing::{
    build_testsets, is_control_tag, Overrides, ANSWER_GENERATOR, FILE_SIZE_LIMIT,
};

/// Remote services used during import
#[derive(Clone)]
pub struct Clients {
    /// Receives statement images and attachments
    pub assets: AssetBackend,
    /// Receives test data
    pub blobs: Arc<dyn MultipartUpload>,
}

/// Builds snapshot of the package extracted to `package`.
#[tracing::instrument(skip(spec, clients), fields(problem = %spec.short_name))]
pub async fn snapshot(
    spec: &Specification,
    package: &Path,
    clients: &Clients,
) -> Result<Snapshot, ImportError> {
    let assets = clients.assets.uploader();
    let objects = ObjectUploader::new(clients.blobs.clone());

    let checker = checker::checker(package, spec)
        .await
        .map_err(ImportError::Checker)?;
    let interactor = checker::interactor(package, spec)
        .await
        .map_err(ImportError::Interactor)?;
    let statements = statements::statements(package, spec, &assets)
        .await
        .map_err(ImportError::Statements)?;
    let templates = sources::templates(package, spec)
        .await
        .map_err(ImportError::Templates)?;
    let attachments = sources::attachments(package, spec, &assets)
        .await
        .map_err(ImportError::Attachments)?;
    let (testsets, tests) = testing::import(package, spec, &objects)
        .await
        .map_err(ImportError::Testing)?;
    let editorials = statements::editorials(package, spec, &assets)
        .await
        .map_err(ImportError::Editorials)?;
    let solutions = sources::solutions(package, spec)
        .await
        .map_err(ImportError::Solutions)?;
    let scripts = sources::scripts(package, spec)
        .await
        .map_err(ImportError::Scripts)?;

    tracing::info!(
        testsets = testsets.len(),
        tests = tests.len(),
        statements = statements.len(),
        "snapshot is ready"
    );
    Ok(Snapshot {
        problem: problem(spec),
        testing: testing_config(spec),
        checker,
        interactor,
        statements,
        templates,
        attachments,
        testsets,
        tests,
        editorials,
        solutions,
        scripts,
    })
}

fn problem(spec: &Specification) -> Problem {
    let mut titles = BTreeMap::new();
    for name in &spec.names {
        if let Some(locale) = runtime_map::locale_from_language(&name.language) {
            titles.insert(locale.to_string(), name.value.clone());
        }
    }
    Problem {
        short_name: spec.short_name.clone(),
        titles,
        tags: spec
            .tags
            .iter()
            .filter(|tag| !is_control_tag(tag))
            .cloned()
            .collect(),
    }
}

fn testing_config(spec: &Specification) -> TestingConfig {
    match spec.judging.run_count {
        Some(runs) if runs > 0 => TestingConfig {
            run_count: runs as u32,
        },
        _ => TestingConfig::default(),
    }
}
