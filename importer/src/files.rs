//! Reading text files of a package.
use anyhow::Context;
use std::path::Path;

/// Reads a text file. Packages often carry sources in legacy encodings,
/// so invalid UTF-8 sequences are replaced instead of failing the import.
pub(crate) async fn read_text(path: &Path) -> anyhow::Result<String> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("unable to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn legacy_encoding_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.cpp");
        // "// Решение" in windows-1251
        std::fs::write(&path, b"// \xd0\xe5\xf8\xe5\xed\xe8\xe5\nint main() {}\n").unwrap();
        let text = read_text(&path).await.unwrap();
        assert!(text.starts_with("// "));
        assert!(text.contains('\u{fffd}'));
        assert!(text.ends_with("int main() {}\n"));
    }

    #[tokio::test]
    async fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_text(&dir.path().join("nope")).await.is_err());
    }
}
