use crate::models::audio_models::AudioFrame;
use crate::models::error::RecorderError;

/// Container muxer backing an `AudioFileWriter`.
///
/// Append-only: one session per muxer.
pub trait AudioMuxer: Send {
    /// Begin the muxing session at time zero.
    fn start_session(&mut self) -> Result<(), RecorderError>;

    /// Whether another buffer can be appended without blocking.
    fn is_ready_for_more_data(&self) -> bool;

    /// Append one frame. Returns the number of sample frames written.
    fn append(&mut self, frame: AudioFrame<'_>) -> Result<u64, RecorderError>;

    /// Finalize and close the container. Returns its SHA-256 checksum.
    fn finish(&mut self) -> Result<String, RecorderError>;
}
