use std::fmt;

/// Host permissions a capture session depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ScreenCapture,
    Microphone,
}

impl Permission {
    /// Order in which `start` requests access.
    pub const REQUIRED: [Permission; 2] = [Permission::ScreenCapture, Permission::Microphone];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScreenCapture => f.write_str("screen capture"),
            Self::Microphone => f.write_str("microphone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl From<bool> for PermissionStatus {
    fn from(granted: bool) -> Self {
        if granted {
            Self::Granted
        } else {
            Self::Denied
        }
    }
}

/// Platform permission-query service.
///
/// `request_access` may block while the OS shows a consent prompt. It only
/// asks; reacting to a denial is the `RecorderDelegate`'s job.
pub trait PermissionProvider: Send + Sync {
    fn request_access(&self, permission: Permission) -> PermissionStatus;
}
