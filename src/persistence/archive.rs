use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::ZipArchive;

fn add_file_to_zip(
    zip: &mut ZipWriter<File>,
    file_path: &Path,
    base_path: &Path,
) -> Result<()> {
    let mut file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)
        .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

    let relative_path = file_path
        .strip_prefix(base_path)
        .context("File outside the data directory")?
        .to_string_lossy()
        .into_owned();

    zip.start_file(relative_path, SimpleFileOptions::default())
        .context("Failed to start zip entry")?;
    zip.write_all(&buffer).context("Failed to write zip entry")?;

    Ok(())
}

/// Archive the data directory (dashboard.json plus ringtones) into a
/// zip file at `dst`.
pub fn export_data(src: &Path, dst: &Path) -> Result<()> {
    let zip_file = File::create(dst)
        .with_context(|| format!("Failed to create archive: {}", dst.display()))?;
    let mut zip = ZipWriter::new(zip_file);

    for entry in fs::read_dir(src)
        .with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            add_file_to_zip(&mut zip, &path, src)?;
        } else if path.is_dir() {
            for nested in fs::read_dir(&path)? {
                let nested = nested?.path();
                if nested.is_file() {
                    add_file_to_zip(&mut zip, &nested, src)?;
                }
            }
        }
    }

    zip.finish().context("Failed to finish archive")?;

    Ok(())
}

/// Unpack an exported archive into the data directory, overwriting
/// what is there.
pub fn import_data(src: &Path, dst: &Path) -> Result<()> {
    let file = File::open(src)
        .with_context(|| format!("Failed to open archive: {}", src.display()))?;
    let mut archive = ZipArchive::new(file).context("Not a readable zip archive")?;

    fs::create_dir_all(dst)
        .with_context(|| format!("Failed to create directory: {}", dst.display()))?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let Some(name) = file.enclosed_name() else {
            // Entries escaping the target directory are skipped
            continue;
        };
        let outpath = dst.join(name);

        if file.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)
                .with_context(|| format!("Failed to create file: {}", outpath.display()))?;
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)?;
            outfile.write_all(&buffer)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_then_import_restores_files() {
        let src = tempdir().unwrap();
        fs::write(src.path().join("dashboard.json"), "{}").unwrap();
        fs::create_dir(src.path().join("ringtones")).unwrap();
        fs::write(src.path().join("ringtones").join("chime.mp3"), b"riff").unwrap();

        let archive_dir = tempdir().unwrap();
        let archive_path = archive_dir.path().join("data.zip");
        export_data(src.path(), &archive_path).unwrap();
        assert!(archive_path.exists());

        let dst = tempdir().unwrap();
        import_data(&archive_path, dst.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dst.path().join("dashboard.json")).unwrap(),
            "{}"
        );
        assert_eq!(
            fs::read(dst.path().join("ringtones").join("chime.mp3")).unwrap(),
            b"riff"
        );
    }

    #[test]
    fn test_import_missing_archive_fails() {
        let dst = tempdir().unwrap();
        let result = import_data(Path::new("/nonexistent/data.zip"), dst.path());
        assert!(result.is_err());
    }
}
