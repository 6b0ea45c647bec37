use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::audio_models::AudioEncodingProfile;
use super::error::RecorderError;

const APP_DIR_NAME: &str = "screen-recorder";
const RECORDINGS_DIR_NAME: &str = "Recordings";

/// Recorder settings, loadable from a JSON file.
///
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecorderSettings {
    /// Directory where recording files are written.
    pub recordings_dir: PathBuf,

    /// Bundle identifier of the host application, used for self-exclusion.
    pub host_bundle_identifier: Option<String>,

    /// Capture audio alongside the display (default: true).
    pub audio_capture_enabled: bool,

    /// Exclude the host application from captured content (default: true).
    pub app_excluded: bool,

    pub audio_profile: AudioEncodingProfile,
}

impl RecorderSettings {
    pub fn load(path: &Path) -> Result<Self, RecorderError> {
        let json = fs::read_to_string(path)
            .map_err(|e| RecorderError::ConfigurationFailed(format!("failed to read settings: {}", e)))?;
        let settings: Self = serde_json::from_str(&json)
            .map_err(|e| RecorderError::ConfigurationFailed(format!("failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), RecorderError> {
        self.audio_profile
            .validate()
            .map_err(RecorderError::ConfigurationFailed)?;
        if self.recordings_dir.as_os_str().is_empty() {
            return Err(RecorderError::ConfigurationFailed(
                "recordings directory must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Full path for a caller-supplied recording file name.
    pub fn recording_path(&self, file_name: &str) -> PathBuf {
        self.recordings_dir.join(file_name)
    }
}

/// Per-user data directory for recordings.
pub fn default_recordings_dir() -> PathBuf {
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(RECORDINGS_DIR_NAME)
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            recordings_dir: default_recordings_dir(),
            host_bundle_identifier: None,
            audio_capture_enabled: true,
            app_excluded: true,
            audio_profile: AudioEncodingProfile::default(),
        }
    }
}
