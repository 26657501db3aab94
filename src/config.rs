use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudyConfig {
    pub calibration_lockout_ms: u64,
    pub placement_secs: u32,
    pub slide_secs: u64,
    pub export_dir: Option<PathBuf>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            calibration_lockout_ms: 1500,
            placement_secs: 5,
            slide_secs: 5,
            export_dir: None,
        }
    }
}

impl StudyConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            calibration_lockout: Duration::from_millis(self.calibration_lockout_ms),
            placement_secs: self.placement_secs,
            slide_period: Duration::from_secs(self.slide_secs),
        }
    }
}

/// Durations handed to pages when they are entered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    pub calibration_lockout: Duration,
    pub placement_secs: u32,
    pub slide_period: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        StudyConfig::default().timings()
    }
}

pub trait ConfigStore {
    fn load(&self) -> StudyConfig;
    fn save(&self, cfg: &StudyConfig) -> crate::error::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> StudyConfig {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<StudyConfig>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring unparsable config")
                }
            },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "config not readable, using defaults")
            }
        }
        StudyConfig::default()
    }

    fn save(&self, cfg: &StudyConfig) -> crate::error::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
