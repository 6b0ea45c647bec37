//! System Settings deep links for denied permissions.

use std::sync::Arc;

use screen_recorder_core::{Permission, RecorderDelegate, RecorderError, RecorderState, RecordingResult};

/// Privacy & Security pane for `permission`.
pub fn settings_pane_url(permission: Permission) -> &'static str {
    match permission {
        Permission::ScreenCapture => "x-apple.systempreferences:com.apple.preference.security?Privacy_ScreenCapture",
        Permission::Microphone => "x-apple.systempreferences:com.apple.preference.security?Privacy_Microphone",
    }
}

/// Open System Settings at the pane controlling `permission`.
#[cfg(target_os = "macos")]
pub fn open_settings_pane(permission: Permission) -> Result<(), RecorderError> {
    use std::process::Command;

    Command::new("open")
        .arg(settings_pane_url(permission))
        .spawn()
        .map(|_| ())
        .map_err(|e| RecorderError::Unknown(format!("failed to open System Settings: {}", e)))
}

#[cfg(not(target_os = "macos"))]
pub fn open_settings_pane(permission: Permission) -> Result<(), RecorderError> {
    log::debug!("No settings pane to open for {} on this platform", permission);
    Ok(())
}

/// Delegate that reacts to permission denials by opening the matching
/// settings pane, then forwards every event to an optional UI delegate
/// (which shows the alert).
pub struct SettingsPaneDelegate {
    inner: Option<Arc<dyn RecorderDelegate>>,
}

impl SettingsPaneDelegate {
    pub fn new(inner: Option<Arc<dyn RecorderDelegate>>) -> Arc<Self> {
        Arc::new(Self { inner })
    }
}

impl RecorderDelegate for SettingsPaneDelegate {
    fn on_state_changed(&self, state: RecorderState) {
        log::info!("Recorder is {}", state.as_str());
        if let Some(ref inner) = self.inner {
            inner.on_state_changed(state);
        }
    }

    fn on_permission_denied(&self, permission: Permission) {
        log::warn!("{} access denied; opening System Settings", permission);
        if let Some(ref inner) = self.inner {
            inner.on_permission_denied(permission);
        }
        if let Err(e) = open_settings_pane(permission) {
            log::error!("{}", e);
        }
    }

    fn on_error(&self, error: &RecorderError) {
        log::error!("Recorder error: {}", error);
        if let Some(ref inner) = self.inner {
            inner.on_error(error);
        }
    }

    fn on_recording_finished(&self, result: &RecordingResult) {
        log::info!("Recording saved to {}", result.file_path.display());
        if let Some(ref inner) = self.inner {
            inner.on_recording_finished(result);
        }
    }
}
