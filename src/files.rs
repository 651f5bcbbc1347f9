use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const APP_DIR: &str = "planner";

/// Directory holding config.toml (e.g. ~/.config/planner)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_DIR))
}

/// Path of the config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory for log files; falls back to the cache dir where there is no
/// state dir (macOS, Windows)
pub fn log_dir() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .context("Could not determine a log directory")?;
    Ok(base.join(APP_DIR))
}

/// Where exports land unless the config says otherwise
pub fn default_download_dir() -> Result<PathBuf> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .context("Could not determine download directory")
}

/// Create a directory (and parents) if missing
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    // Create temp file in the same directory
    let mut temp_file = NamedTempFile::new_in(dir).context("Failed to create temporary file")?;

    temp_file
        .write_all(content)
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return None if the file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Pick a path in `dir` for `name` that doesn't clobber an existing file:
/// `tasks.json`, then `tasks (1).json`, `tasks (2).json`, ...
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    (1..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_under_app_dir() {
        if let Ok(path) = config_file() {
            assert!(path.ends_with("planner/config.toml"));
        }
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nested").join("test.txt");

        atomic_write(&test_file, b"Hello, world!").unwrap();

        let read_content = read_file(&test_file).unwrap();
        assert_eq!(read_content.as_deref(), Some("Hello, world!"));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nonexistent.txt");

        assert_eq!(read_file(&test_file).unwrap(), None);
    }

    #[test]
    fn test_unique_path_avoids_existing_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();

        assert_eq!(unique_path(dir, "tasks.json"), dir.join("tasks.json"));

        fs::write(dir.join("tasks.json"), "{}").unwrap();
        assert_eq!(unique_path(dir, "tasks.json"), dir.join("tasks (1).json"));

        fs::write(dir.join("tasks (1).json"), "{}").unwrap();
        assert_eq!(unique_path(dir, "tasks.json"), dir.join("tasks (2).json"));

        fs::write(dir.join("export"), "").unwrap();
        assert_eq!(unique_path(dir, "export"), dir.join("export (1)"));
    }
}
