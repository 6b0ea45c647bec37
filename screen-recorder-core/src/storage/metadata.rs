//! JSON sidecar files stored next to a recording.
//!
//! `meeting.wav` gets `meeting.metadata.json` and `meeting.transcript.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::error::RecorderError;
use crate::models::recording_result::RecordingMetadata;
use crate::models::transcript::Transcript;

pub fn metadata_path(recording_path: &Path) -> PathBuf {
    recording_path.with_extension("metadata.json")
}

pub fn transcript_path(recording_path: &Path) -> PathBuf {
    recording_path.with_extension("transcript.json")
}

pub fn write_metadata(metadata: &RecordingMetadata, recording_path: &Path) -> Result<(), RecorderError> {
    write_sidecar(metadata, &metadata_path(recording_path), "metadata")
}

pub fn read_metadata(recording_path: &Path) -> Result<RecordingMetadata, RecorderError> {
    read_sidecar(&metadata_path(recording_path), "metadata")
}

/// Attach a transcript to a recording, replacing any previous one.
pub fn write_transcript(transcript: &Transcript, recording_path: &Path) -> Result<(), RecorderError> {
    write_sidecar(transcript, &transcript_path(recording_path), "transcript")
}

/// Read a recording's transcript. Each segment and the segment order are
/// validated while parsing.
pub fn read_transcript(recording_path: &Path) -> Result<Transcript, RecorderError> {
    read_sidecar(&transcript_path(recording_path), "transcript")
}

fn write_sidecar<T: Serialize>(value: &T, path: &Path, kind: &str) -> Result<(), RecorderError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| RecorderError::StorageError(format!("failed to serialize {}: {}", kind, e)))?;
    fs::write(path, json).map_err(|e| RecorderError::StorageError(format!("failed to write {}: {}", kind, e)))
}

fn read_sidecar<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<T, RecorderError> {
    let json = fs::read_to_string(path)
        .map_err(|e| RecorderError::StorageError(format!("failed to read {}: {}", kind, e)))?;
    serde_json::from_str(&json).map_err(|e| RecorderError::StorageError(format!("failed to parse {}: {}", kind, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audio_models::AudioEncodingProfile;
    use crate::models::transcript::AudioSegment;

    fn temp_recording_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("screen_recorder_sidecar_{}.wav", name))
    }

    #[test]
    fn sidecar_paths_replace_extension() {
        let path = Path::new("/recordings/meeting.wav");
        assert_eq!(metadata_path(path), PathBuf::from("/recordings/meeting.metadata.json"));
        assert_eq!(transcript_path(path), PathBuf::from("/recordings/meeting.transcript.json"));
    }

    #[test]
    fn metadata_survives_write_and_read() {
        let recording = temp_recording_path("metadata");
        let metadata = RecordingMetadata::new(
            &recording.to_string_lossy(),
            "deadbeef",
            &AudioEncodingProfile::default(),
            4800,
            0,
        );

        write_metadata(&metadata, &recording).unwrap();
        assert_eq!(read_metadata(&recording).unwrap(), metadata);

        fs::remove_file(metadata_path(&recording)).ok();
    }

    #[test]
    fn transcript_is_revalidated_on_read() {
        let recording = temp_recording_path("tampered");
        fs::write(
            transcript_path(&recording),
            r#"{"segments":[{"startTimeMs":500,"endTimeMs":900,"text":"b"},{"startTimeMs":0,"endTimeMs":400,"text":"a"}]}"#,
        )
        .unwrap();

        assert!(read_transcript(&recording).is_err());

        fs::write(
            transcript_path(&recording),
            r#"{"segments":[{"startTimeMs":900,"endTimeMs":100,"text":"inverted"}]}"#,
        )
        .unwrap();
        let err = read_transcript(&recording).unwrap_err();
        assert!(matches!(err, RecorderError::StorageError(_)));

        let transcript = Transcript::new(vec![AudioSegment::new(0, 400, "a").unwrap()]).unwrap();
        write_transcript(&transcript, &recording).unwrap();
        assert_eq!(read_transcript(&recording).unwrap(), transcript);

        fs::remove_file(transcript_path(&recording)).ok();
    }

    #[test]
    fn missing_sidecar_is_a_storage_error() {
        let err = read_metadata(&temp_recording_path("missing")).unwrap_err();
        assert!(matches!(err, RecorderError::StorageError(_)));
    }
}
