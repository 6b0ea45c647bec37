//! # screen-recorder-core
//!
//! Platform-agnostic screen/audio capture core.
//!
//! Provides the capture state machine, configuration and content-filter
//! construction, and the audio file sink. Platform backends implement the
//! `CaptureEngine` and `PermissionProvider` traits and plug into the generic
//! `ScreenRecorder`.
//!
//! ## Architecture
//!
//! ```text
//! screen-recorder-core (this crate)
//! ├── traits/       ← CaptureEngine, PermissionProvider, RecorderDelegate, AudioMuxer
//! ├── models/       ← RecorderError, RecorderState, StreamConfiguration, ContentFilter, etc.
//! ├── processing/   ← PCM conversion, WAV header layout
//! ├── session/      ← ScreenRecorder (capture state machine)
//! └── storage/      ← AudioFileWriter, WavMuxer, JSON sidecars
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioEncodingProfile, AudioFrame};
pub use models::config::{ContentFilter, StreamConfiguration};
pub use models::content::{AvailableContent, Display, DisplayId, RunningApplication};
pub use models::error::RecorderError;
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use models::settings::RecorderSettings;
pub use models::state::RecorderState;
pub use models::transcript::{AudioSegment, Transcript};
pub use session::screen_recorder::ScreenRecorder;
pub use storage::audio_file_writer::AudioFileWriter;
pub use storage::wav_muxer::WavMuxer;
pub use traits::audio_muxer::AudioMuxer;
pub use traits::capture_engine::{AudioBufferCallback, CaptureEngine};
pub use traits::permissions::{Permission, PermissionProvider, PermissionStatus};
pub use traits::recorder_delegate::RecorderDelegate;
