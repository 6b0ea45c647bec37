use std::sync::Arc;

use crate::models::audio_models::AudioFrame;
use crate::models::config::{ContentFilter, StreamConfiguration};
use crate::models::content::AvailableContent;
use crate::models::error::RecorderError;

/// Callback invoked when the engine delivers an audio buffer.
///
/// Fires on the engine's own delivery thread, concurrently with recorder
/// transitions. Keep processing minimal.
pub type AudioBufferCallback = Arc<dyn Fn(AudioFrame<'_>) + Send + Sync + 'static>;

/// Platform screen/audio capture service.
///
/// The recorder drives one session at a time: `start_capture` opens it,
/// `stop_capture` ends it. Stream demuxing, encoding and frame delivery are
/// the engine's concern.
pub trait CaptureEngine: Send {
    /// Displays and applications currently shareable.
    fn available_content(&self) -> Result<AvailableContent, RecorderError>;

    /// Begin a capture session. Audio buffers are delivered via `on_audio`.
    fn start_capture(
        &mut self,
        config: &StreamConfiguration,
        filter: &ContentFilter,
        on_audio: AudioBufferCallback,
    ) -> Result<(), RecorderError>;

    /// Apply a new configuration/filter to the active session.
    fn update(&mut self, config: &StreamConfiguration, filter: &ContentFilter) -> Result<(), RecorderError>;

    fn pause_capture(&mut self) -> Result<(), RecorderError>;

    fn resume_capture(&mut self) -> Result<(), RecorderError>;

    /// End the session and release its resources.
    fn stop_capture(&mut self) -> Result<(), RecorderError>;
}
