use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::{ProjectDirs, UserDirs};

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "tabedit")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create dir: {}", dir.display()))?;
    Ok(dir)
}

pub fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    ensure_dir(base_data_dir.join("webview2"))
}

pub fn default_webview_data_dir() -> Result<PathBuf> {
    ensure_webview_data_dir(project_dirs()?.data_local_dir())
}

pub fn default_logs_dir() -> Result<PathBuf> {
    ensure_dir(project_dirs()?.data_local_dir().join("logs"))
}

/// The user's download folder, or the app data dir when there is none.
pub fn default_export_dir() -> Result<PathBuf> {
    if let Some(downloads) = UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf)) {
        return Ok(downloads);
    }
    ensure_dir(project_dirs()?.data_local_dir().join("exports"))
}
