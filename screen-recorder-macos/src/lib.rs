//! # screen-recorder-macos
//!
//! macOS host bindings for screen-recorder.
//!
//! Provides:
//! - `SystemPermissions`: screen recording (Core Graphics) and microphone
//!   (`AVCaptureDevice`) access checks
//! - `SettingsPaneDelegate`: opens System Settings when access is denied
//!
//! Other platforms get permissive stubs so the crate builds and tests
//! everywhere.
//!
//! ## Usage
//! ```ignore
//! use screen_recorder_core::{RecorderSettings, ScreenRecorder};
//! use screen_recorder_macos::{SettingsPaneDelegate, SystemPermissions};
//!
//! let mut recorder = ScreenRecorder::new(engine, SystemPermissions, RecorderSettings::default());
//! recorder.set_delegate(SettingsPaneDelegate::new(None));
//! recorder.start_recording("standup.wav")?;
//! ```

pub mod permissions;
pub mod settings_pane;

pub use permissions::{AuthorizationStatus, SystemPermissions};
pub use settings_pane::{open_settings_pane, settings_pane_url, SettingsPaneDelegate};
