use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::audio_models::AudioEncodingProfile;

/// Result returned when a recording's audio file is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub file_path: PathBuf,
    pub duration_secs: f64,
    pub metadata: RecordingMetadata,
    pub checksum: String,
}

/// Metadata stored alongside a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingMetadata {
    pub id: String,
    pub duration_secs: f64,
    pub file_path: String,
    pub checksum: String,
    pub created_at: String,
    pub sample_rate: f64,
    pub channels: u16,
    /// Frames in the file, at `sample_rate`.
    pub frames_written: u64,
    /// Audio lost to drops, also in frames at `sample_rate`.
    pub frames_dropped: u64,
}

impl RecordingMetadata {
    pub fn new(
        file_path: &str,
        checksum: &str,
        profile: &AudioEncodingProfile,
        frames_written: u64,
        frames_dropped: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            duration_secs: frames_written as f64 / profile.sample_rate,
            file_path: file_path.to_string(),
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            sample_rate: profile.sample_rate,
            channels: profile.channels,
            frames_written,
            frames_dropped,
        }
    }
}
