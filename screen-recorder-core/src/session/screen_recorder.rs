use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::AudioFrame;
use crate::models::config::{ContentFilter, StreamConfiguration};
use crate::models::content::{AvailableContent, Display, RunningApplication};
use crate::models::error::RecorderError;
use crate::models::recording_result::RecordingResult;
use crate::models::settings::RecorderSettings;
use crate::models::state::RecorderState;
use crate::storage::audio_file_writer::AudioFileWriter;
use crate::storage::metadata;
use crate::traits::capture_engine::{AudioBufferCallback, CaptureEngine};
use crate::traits::permissions::{Permission, PermissionProvider};
use crate::traits::recorder_delegate::RecorderDelegate;

/// Writer for the current recording, shared with the engine's delivery thread.
type WriterSlot = Arc<Mutex<Option<AudioFileWriter>>>;

/// Capture state machine.
///
/// Owns the run state, permission checks and configuration/filter
/// construction, and delegates the capture itself to a `CaptureEngine`.
///
/// ```text
/// start() → permissions → refresh content → engine.start_capture(config, filter)
///                                                 │ audio frames (engine thread)
///                                                 ▼
///                                           [AudioFileWriter]
/// ```
///
/// Transitions take `&mut self`, so callers are serialized by the borrow
/// checker. Hosts sharing a recorder across threads wrap it in a mutex.
pub struct ScreenRecorder<E: CaptureEngine, P: PermissionProvider> {
    engine: E,
    permissions: P,
    settings: RecorderSettings,
    state: RecorderState,
    delegate: Option<Arc<dyn RecorderDelegate>>,

    available_content: AvailableContent,
    selected_display: Option<Display>,
    audio_capture_enabled: bool,
    app_excluded: bool,

    writer: WriterSlot,
}

impl<E: CaptureEngine, P: PermissionProvider> ScreenRecorder<E, P> {
    pub fn new(engine: E, permissions: P, settings: RecorderSettings) -> Self {
        Self {
            engine,
            permissions,
            audio_capture_enabled: settings.audio_capture_enabled,
            app_excluded: settings.app_excluded,
            settings,
            state: RecorderState::Idle,
            delegate: None,
            available_content: AvailableContent::default(),
            selected_display: None,
            writer: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    pub fn available_displays(&self) -> &[Display] {
        &self.available_content.displays
    }

    pub fn available_applications(&self) -> &[RunningApplication] {
        &self.available_content.applications
    }

    pub fn selected_display(&self) -> Option<&Display> {
        self.selected_display.as_ref()
    }

    pub fn is_audio_capture_enabled(&self) -> bool {
        self.audio_capture_enabled
    }

    pub fn is_app_excluded(&self) -> bool {
        self.app_excluded
    }

    /// Query the engine for shareable content and reconcile the display
    /// selection: a display that disappeared falls back to the first one.
    pub fn refresh_available_content(&mut self) -> Result<&AvailableContent, RecorderError> {
        let content = self.engine.available_content()?;

        self.selected_display = match self.selected_display.take() {
            Some(selected) => match content.display(selected.id) {
                Some(current) => Some(current.clone()),
                None => {
                    log::warn!("Selected {} is no longer available", selected.id);
                    content.displays.first().cloned()
                }
            },
            None => content.displays.first().cloned(),
        };

        log::debug!(
            "Refreshed shareable content: {} displays, {} applications",
            content.displays.len(),
            content.applications.len()
        );
        self.available_content = content;
        Ok(&self.available_content)
    }

    /// Stream configuration for the current selection, if a display is selected.
    pub fn configuration(&self) -> Option<StreamConfiguration> {
        let display = self.selected_display.as_ref()?;
        let profile = &self.settings.audio_profile;
        Some(StreamConfiguration::for_display(
            display,
            self.audio_capture_enabled,
            self.app_excluded,
            profile.sample_rate,
            profile.channels,
        ))
    }

    /// Content filter for the current selection, if a display is selected.
    pub fn content_filter(&self) -> Option<ContentFilter> {
        let display = self.selected_display.as_ref()?;
        let excluded = if self.app_excluded {
            self.settings.host_bundle_identifier.as_deref()
        } else {
            None
        };
        Some(ContentFilter::new(display, &self.available_content, excluded))
    }

    /// Start a capture session without writing audio to disk.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        self.start_session(None)
    }

    /// Start a capture session and record its audio to
    /// `settings.recordings_dir/file_name`.
    pub fn start_recording(&mut self, file_name: &str) -> Result<(), RecorderError> {
        self.start_session(Some(file_name))
    }

    /// End the session, finalize any recording and return to idle.
    ///
    /// Engine errors are reported to the delegate but do not prevent
    /// teardown.
    pub fn stop(&mut self) -> Option<RecordingResult> {
        if self.state.is_idle() {
            log::debug!("stop ignored: recorder is idle");
            return None;
        }

        if let Err(e) = self.engine.stop_capture() {
            log::error!("Capture engine failed to stop cleanly: {}", e);
            self.notify_error(&e);
        }
        self.set_state(RecorderState::Idle);

        // Take the writer out first so the delivery thread is never blocked on finalization.
        let writer = self.writer.lock().take();
        let result = writer.and_then(|mut writer| writer.finish_writing());

        if let Some(ref result) = result {
            if let Err(e) = metadata::write_metadata(&result.metadata, &result.file_path) {
                log::warn!("Failed to write recording metadata: {}", e);
            }
            if let Some(ref delegate) = self.delegate {
                delegate.on_recording_finished(result);
            }
        }
        log::info!("Capture stopped");
        result
    }

    /// Pause the running session. Returns `false` if nothing was running.
    pub fn pause(&mut self) -> Result<bool, RecorderError> {
        if !self.state.is_running() {
            log::debug!("pause ignored: recorder is {}", self.state.as_str());
            return Ok(false);
        }
        self.engine.pause_capture()?;
        self.set_state(RecorderState::Paused);
        Ok(true)
    }

    /// Resume a paused session. Permissions and content are not re-checked.
    /// Returns `false` if there was no paused session.
    pub fn resume(&mut self) -> Result<bool, RecorderError> {
        if !self.state.is_paused() {
            log::debug!("resume ignored: recorder is {}", self.state.as_str());
            return Ok(false);
        }
        self.engine.resume_capture()?;
        self.set_state(RecorderState::Running);
        Ok(true)
    }

    /// Stop an active session, or start a new one.
    pub fn toggle(&mut self) -> Result<Option<RecordingResult>, RecorderError> {
        if self.state.has_active_session() {
            Ok(self.stop())
        } else {
            self.start().map(|()| None)
        }
    }

    pub fn set_selected_display(&mut self, display: Display) -> Result<(), RecorderError> {
        self.selected_display = Some(display);
        self.push_configuration()
    }

    pub fn set_app_excluded(&mut self, excluded: bool) -> Result<(), RecorderError> {
        self.app_excluded = excluded;
        self.push_configuration()
    }

    pub fn set_audio_capture_enabled(&mut self, enabled: bool) -> Result<(), RecorderError> {
        self.audio_capture_enabled = enabled;
        self.push_configuration()
    }

    // --- Internal helpers ---

    fn start_session(&mut self, file_name: Option<&str>) -> Result<(), RecorderError> {
        match self.state {
            RecorderState::Running => {
                if let Some(name) = file_name {
                    log::warn!("Already running; not recording to {}", name);
                }
                log::debug!("start ignored: recorder is already running");
                return Ok(());
            }
            RecorderState::Paused => {
                if let Some(name) = file_name {
                    log::warn!("Paused session resumes its own file; not recording to {}", name);
                }
                log::debug!("start while paused resumes the session");
                return self.resume().map(|_| ());
            }
            RecorderState::Idle => {}
        }

        self.ensure_permissions()?;
        self.refresh_available_content()?;

        let (config, filter) = match self.configuration().zip(self.content_filter()) {
            Some(pair) => pair,
            None => {
                log::error!("Cannot build a content filter: no display available");
                return Err(RecorderError::NoDisplayAvailable);
            }
        };

        if let Some(name) = file_name {
            let mut writer = AudioFileWriter::new(self.settings.recording_path(name), self.settings.audio_profile);
            writer.start_writing();
            *self.writer.lock() = Some(writer);
        }

        let callback = self.audio_callback();
        if let Err(e) = self.engine.start_capture(&config, &filter, callback) {
            log::error!("Capture engine failed to start: {}", e);
            let writer = self.writer.lock().take();
            if let Some(writer) = writer {
                writer.discard();
            }
            return Err(e);
        }

        log::info!(
            "Capture started on {} ({}x{}, audio: {})",
            filter.display,
            config.width,
            config.height,
            config.captures_audio
        );
        self.set_state(RecorderState::Running);
        Ok(())
    }

    fn ensure_permissions(&self) -> Result<(), RecorderError> {
        for permission in Permission::REQUIRED {
            if !self.permissions.request_access(permission).is_granted() {
                log::warn!("{} permission denied", permission);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_permission_denied(permission);
                }
                return Err(RecorderError::PermissionDenied(permission));
            }
        }
        Ok(())
    }

    /// Push the recomputed configuration to an active session. Idle changes
    /// are picked up by the next `start`.
    fn push_configuration(&mut self) -> Result<(), RecorderError> {
        if !self.state.has_active_session() {
            return Ok(());
        }
        let (config, filter) = self
            .configuration()
            .zip(self.content_filter())
            .ok_or(RecorderError::NoDisplayAvailable)?;

        self.engine.update(&config, &filter).inspect_err(|e| {
            log::error!("Failed to update capture configuration: {}", e);
        })
    }

    fn audio_callback(&self) -> AudioBufferCallback {
        let slot = Arc::clone(&self.writer);
        Arc::new(move |frame: AudioFrame<'_>| {
            if let Some(writer) = slot.lock().as_mut() {
                writer.handle_audio(frame);
            }
        })
    }

    fn set_state(&mut self, new_state: RecorderState) {
        if self.state == new_state {
            return;
        }
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(new_state);
        }
    }

    fn notify_error(&self, error: &RecorderError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }
}

impl<E: CaptureEngine, P: PermissionProvider> Drop for ScreenRecorder<E, P> {
    fn drop(&mut self) {
        if self.state.has_active_session() {
            log::warn!("Recorder dropped with an active session; stopping");
            self.stop();
        }
    }
}
