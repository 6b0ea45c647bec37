use thiserror::Error;

use crate::traits::permissions::Permission;

/// Errors surfaced by the recorder and its collaborators.
///
/// Audio sink failures are not represented here: the writer degrades to
/// logged no-ops instead of interrupting an active recording.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("{0} permission denied")]
    PermissionDenied(Permission),

    #[error("no display available for capture")]
    NoDisplayAvailable,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("capture engine failure: {0}")]
    EngineFailure(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl RecorderError {
    /// Environment precondition violations that retrying cannot fix.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoDisplayAvailable)
    }

    /// Errors the user can resolve (e.g. by granting access) before retrying.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
