use crate::models::error::RecorderError;
use crate::models::recording_result::RecordingResult;
use crate::models::state::RecorderState;
use crate::traits::permissions::Permission;

/// Event delegate for recorder notifications.
///
/// Called on the thread driving the recorder. Implementations should marshal
/// to the UI thread if needed.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the run state changes.
    fn on_state_changed(&self, state: RecorderState);

    /// Called when `start` is refused because `permission` was denied.
    /// Typically alerts the user and opens the matching settings pane.
    fn on_permission_denied(&self, permission: Permission);

    /// Called for errors that do not abort the current operation.
    fn on_error(&self, error: &RecorderError);

    /// Called when a recording's audio file has been finalized.
    fn on_recording_finished(&self, result: &RecordingResult);
}
