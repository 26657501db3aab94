use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where CSV exports land unless configured otherwise
    pub fn export_dir() -> PathBuf {
        ProjectDirs::from("", "", "uxstudy")
            .map(|proj_dirs| proj_dirs.data_local_dir().join("exports"))
            .unwrap_or_else(|| PathBuf::from("uxstudy-exports"))
    }
}
