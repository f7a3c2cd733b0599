//! Uploads images referenced from LaTeX documents.
use asset_client::AssetUploader;
use package_spec::package_path;
use once_cell::sync::Lazy;
use regex::Regex;
use std::{collections::HashSet, path::Path};

static IMAGE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\\includegraphics.*?\{)(.+?)(\})").expect("image reference pattern is valid")
});

/// Image reference, e.g. `\includegraphics[width=12cm]{image.png}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRef<'a> {
    /// Whole reference
    pub full: &'a str,
    /// Everything up to and including the opening brace
    pub prefix: &'a str,
    /// Path relative to the document
    pub path: &'a str,
    pub suffix: &'a str,
}

impl ImageRef<'_> {
    fn with_path(&self, path: &str) -> String {
        format!("{}{}{}", self.prefix, path, self.suffix)
    }
}

/// Finds all image references in text order.
pub fn scan(text: &str) -> Vec<ImageRef<'_>> {
    IMAGE_REFERENCE
        .captures_iter(text)
        .filter_map(|caps| {
            Some(ImageRef {
                full: caps.get(0)?.as_str(),
                prefix: caps.get(1)?.as_str(),
                path: caps.get(2)?.as_str(),
                suffix: caps.get(3)?.as_str(),
            })
        })
        .collect()
}

/// Uploads images referenced by `text` (relative to `dir`) and replaces
/// references with links. Images which can not be uploaded, or which lie
/// outside of `dir`, are left as is.
pub(crate) async fn upload_images(dir: &Path, text: String, assets: &AssetUploader) -> String {
    let mut out = text.clone();
    let mut seen = HashSet::new();
    for image in scan(&text) {
        if !seen.insert(image.full) {
            continue;
        }
        let uploaded = match package_path(dir, image.path) {
            Ok(path) => assets.upload_image(&path).await,
            Err(err) => Err(err),
        };
        match uploaded {
            Ok(link) => out = out.replace(image.full, &image.with_path(&link)),
            Err(err) => {
                tracing::warn!(
                    image = image.path,
                    error = %format_args!("{:#}", err),
                    "unable to upload image"
                );
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_client::{AssetBackend, MemoryStore, Operation};
    use std::sync::Arc;

    #[test]
    fn scan_references() {
        let text = "see \\includegraphics[width=12cm]{pic.png} and \\includegraphics{b.jpg}.";
        let refs = scan(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].full, "\\includegraphics[width=12cm]{pic.png}");
        assert_eq!(refs[0].prefix, "\\includegraphics[width=12cm]{");
        assert_eq!(refs[0].path, "pic.png");
        assert_eq!(refs[0].suffix, "}");
        assert_eq!(refs[1].path, "b.jpg");
        assert!(scan("no pictures {here}").is_empty());
    }

    #[tokio::test]
    async fn same_image_uploaded_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.png"), "png").unwrap();
        let store = Arc::new(MemoryStore::new());
        let assets = AssetBackend::Direct(store.clone()).uploader();

        let text = "\\includegraphics{pic.png}\n\ntext\n\n\\includegraphics{pic.png}".to_string();
        let out = upload_images(dir.path(), text, &assets).await;
        assert_eq!(store.count(Operation::UploadImage), 1);
        let refs = scan(&out);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].path, refs[1].path);
        assert!(refs[0].path.starts_with("memory://images/"));
        assert_eq!(store.object(refs[0].path), Some(b"png".to_vec()));
    }

    #[tokio::test]
    async fn missing_image_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.png"), "png").unwrap();
        let store = Arc::new(MemoryStore::new());
        let assets = AssetBackend::Direct(store.clone()).uploader();

        let text = "\\includegraphics{gone.png} \\includegraphics{ok.png}".to_string();
        let out = upload_images(dir.path(), text, &assets).await;
        assert!(out.starts_with("\\includegraphics{gone.png} "));
        let refs = scan(&out);
        assert_eq!(store.object(refs[1].path), Some(b"png".to_vec()));
    }

    #[tokio::test]
    async fn images_outside_document_are_not_uploaded() {
        let outside = tempfile::tempdir().unwrap();
        let secret = outside.path().join("secret.png");
        std::fs::write(&secret, "host secret").unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("english")).unwrap();
        std::fs::write(dir.path().join("pic.png"), "png").unwrap();
        let store = Arc::new(MemoryStore::new());
        let assets = AssetBackend::Direct(store.clone()).uploader();

        let text = format!(
            "\\includegraphics{{{}}} \\includegraphics{{../pic.png}}",
            secret.display()
        );
        let out = upload_images(&dir.path().join("english"), text.clone(), &assets).await;
        assert_eq!(out, text);
        assert_eq!(store.count(Operation::UploadImage), 0);
    }

    #[tokio::test]
    async fn failed_upload_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.png"), "png").unwrap();
        let store = Arc::new(MemoryStore::new());
        store.fail(Operation::UploadImage);
        let assets = AssetBackend::Direct(store.clone()).uploader();

        let text = "\\includegraphics{pic.png}".to_string();
        assert_eq!(upload_images(dir.path(), text.clone(), &assets).await, text);
    }
}
