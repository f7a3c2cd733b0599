//! This library is responsible for bringing problem packages into a
//! per-import workspace.

mod unpack;

use anyhow::Context;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// How the package is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Already extracted package
    Directory,
    Zip,
    /// `.tar.gz` or `.tgz`
    TarGz,
}

impl PackageKind {
    pub fn detect(path: &Path) -> anyhow::Result<PackageKind> {
        if path.is_dir() {
            return Ok(PackageKind::Directory);
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.ends_with(".zip") {
            return Ok(PackageKind::Zip);
        }
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            return Ok(PackageKind::TarGz);
        }
        anyhow::bail!("unknown package format: {}", path.display())
    }
}

/// Used in [`from_config`](Loader::from_config) constructor
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct LoaderConfig {
    /// Parent directory for workspaces, system temporary directory if unset
    #[serde(default)]
    pub workspace_root: Option<PathBuf>,
}

/// Directory holding one extracted package. It is removed by
/// [`release`](Workspace::release), or on drop as a last resort.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the workspace. Failure is only reported, because the import
    /// itself is already finished at this point.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(err) = self.dir.close() {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "unable to cleanup workspace"
            );
        }
    }
}

pub struct Loader {
    workspace_root: PathBuf,
}

impl Loader {
    pub async fn from_config(conf: &LoaderConfig) -> anyhow::Result<Loader> {
        let workspace_root = conf
            .workspace_root
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        tokio::fs::create_dir_all(&workspace_root)
            .await
            .with_context(|| {
                format!(
                    "failed to create workspace root at {}",
                    workspace_root.display()
                )
            })?;
        Ok(Loader { workspace_root })
    }

    /// Copies or unpacks package located at `package` into a fresh
    /// workspace.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, package: &Path) -> anyhow::Result<Workspace> {
        let kind = PackageKind::detect(package)?;
        let dir = tempfile::Builder::new()
            .prefix("polygon-import-")
            .tempdir_in(&self.workspace_root)
            .context("unable to create workspace")?;
        let workspace = Workspace { dir };
        tracing::info!(?kind, workspace = %workspace.path().display(), "preparing package");

        let src = package.to_path_buf();
        let dest = workspace.path().to_path_buf();
        let res = tokio::task::spawn_blocking(move || match kind {
            PackageKind::Directory => unpack::copy_dir(&src, &dest),
            PackageKind::Zip => unpack::unzip(&src, &dest),
            PackageKind::TarGz => unpack::untar(&src, &dest),
        })
        .await
        .context("unpack task panicked")
        .and_then(|res| res);
        match res {
            Ok(()) => Ok(workspace),
            Err(err) => {
                workspace.release();
                Err(err.context(format!("unable to unpack {}", package.display())))
            }
        }
    }
}
