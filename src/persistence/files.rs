use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Get the gridpad directory - checks for local .gridpad first, then falls back to global ~/.gridpad
pub fn get_gridpad_dir() -> Result<PathBuf> {
    // Check for local .gridpad directory
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_gridpad(&current_dir) {
        return Ok(local_dir);
    }

    // Fall back to global ~/.gridpad
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".gridpad"))
}

/// Find local .gridpad directory by walking up the directory tree
fn find_local_gridpad(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let gridpad_dir = current.join(".gridpad");
        if gridpad_dir.exists() && gridpad_dir.is_dir() {
            return Some(gridpad_dir);
        }

        current = current.parent()?;
    }
}

/// Ensure the gridpad directory (and its ringtones subdirectory) exists
pub fn ensure_gridpad_dir() -> Result<PathBuf> {
    let dir = get_gridpad_dir()?;
    let ringtones = dir.join("ringtones");
    if !ringtones.exists() {
        fs::create_dir_all(&ringtones)
            .with_context(|| format!("Failed to create directory: {}", ringtones.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .gridpad directory in the current directory
pub fn init_local_gridpad() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let gridpad_dir = current_dir.join(".gridpad");

    if gridpad_dir.exists() {
        anyhow::bail!("Gridpad directory already exists: {}", gridpad_dir.display());
    }

    fs::create_dir_all(gridpad_dir.join("ringtones"))
        .with_context(|| format!("Failed to create directory: {}", gridpad_dir.display()))?;

    Ok(gridpad_dir)
}

/// Path to the dashboard document
pub fn dashboard_file() -> Result<PathBuf> {
    Ok(ensure_gridpad_dir()?.join("dashboard.json"))
}

/// Directory holding imported ringtone files
pub fn ringtones_dir() -> Result<PathBuf> {
    Ok(ensure_gridpad_dir()?.join("ringtones"))
}

/// Path to the ringtone with the given file name
pub fn ringtone_path(name: &str) -> Result<PathBuf> {
    Ok(ringtones_dir()?.join(name))
}

/// Copy a ringtone into the ringtones directory, returning the stored
/// file name. An existing file with the same name is overwritten.
pub fn import_ringtone(source: &Path) -> Result<String> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .context("Ringtone path has no file name")?
        .to_string();

    let dest = ringtone_path(&name)?;
    fs::copy(source, &dest)
        .with_context(|| format!("Failed to copy ringtone: {}", source.display()))?;

    Ok(name)
}

/// Delete a stored ringtone file. Missing files are not an error.
pub fn remove_ringtone(name: &str) -> Result<()> {
    let path = ringtone_path(name)?;
    if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove ringtone: {}", path.display()))?;
    }
    Ok(())
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    // Create temp file in the same directory
    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    // Atomically rename temp file to target
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}
