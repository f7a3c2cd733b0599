use anyhow::Context;
use std::{fs::File, io, path::Path};

/// Copies content of `src` into `dest`.
pub(crate) fn copy_dir(src: &Path, dest: &Path) -> anyhow::Result<()> {
    let mut options = fs_extra::dir::CopyOptions::new();
    options.content_only = true;
    fs_extra::dir::copy(src, dest, &options)
        .with_context(|| format!("failed to copy {}", src.display()))?;
    Ok(())
}

/// Extracts zip archive. Entries escaping `dest` are rejected.
pub(crate) fn unzip(archive: &Path, dest: &Path) -> anyhow::Result<()> {
    let file = File::open(archive).context("unable to open archive")?;
    let mut zip = zip::ZipArchive::new(io::BufReader::new(file)).context("invalid zip archive")?;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).context("unable to read archive entry")?;
        let name = entry
            .enclosed_name()
            .map(Path::to_path_buf)
            .with_context(|| format!("entry {:?} escapes the workspace", entry.name()))?;
        let path = dest.join(&name);
        if entry.is_dir() {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("unable to create folder {}", name.display()))?;
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("unable to create folder {}", parent.display()))?;
        }
        let mut out = File::create(&path)
            .with_context(|| format!("unable to open {} for writing", name.display()))?;
        io::copy(&mut entry, &mut out)
            .with_context(|| format!("unable to write {}", name.display()))?;
    }
    Ok(())
}

/// Extracts gzipped tarball.
pub(crate) fn untar(archive: &Path, dest: &Path) -> anyhow::Result<()> {
    let file = File::open(archive).context("unable to open archive")?;
    let decoder = flate2::read::GzDecoder::new(io::BufReader::new(file));
    let mut tarball = tar::Archive::new(decoder);
    tarball.unpack(dest).context("failed to unpack")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unzip_nested_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pkg.zip");
        {
            let mut writer = zip::ZipWriter::new(File::create(&archive).unwrap());
            let options = zip::write::FileOptions::default();
            writer.add_directory("tests/", options).unwrap();
            writer.start_file("tests/01", options).unwrap();
            writer.write_all(b"1 2\n").unwrap();
            writer.start_file("problem.xml", options).unwrap();
            writer.write_all(b"<problem/>").unwrap();
            writer.finish().unwrap();
        }
        let dest = dir.path().join("out");
        std::fs::create_dir(&dest).unwrap();
        unzip(&archive, &dest).unwrap();
        assert_eq!(std::fs::read(dest.join("tests/01")).unwrap(), b"1 2\n");
        assert!(dest.join("problem.xml").exists());
    }

    #[test]
    fn untar_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("pkg.tar.gz");
        {
            let encoder = flate2::write::GzEncoder::new(
                File::create(&archive).unwrap(),
                flate2::Compression::default(),
            );
            let mut builder = tar::Builder::new(encoder);
            let data = b"<problem/>";
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, "problem.xml", &data[..])
                .unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        }
        let dest = dir.path().join("out");
        std::fs::create_dir(&dest).unwrap();
        untar(&archive, &dest).unwrap();
        assert!(dest.join("problem.xml").exists());
    }
}
