//! macOS privacy (TCC) permission checks.
//!
//! Screen recording access uses `CGPreflightScreenCaptureAccess` /
//! `CGRequestScreenCaptureAccess`. Microphone access goes through
//! `AVCaptureDevice`: the current authorization is read first, and the
//! system prompt is shown only while the user has not decided yet.

#[cfg(target_os = "macos")]
use core_graphics::access::ScreenCaptureAccess;

use screen_recorder_core::{Permission, PermissionProvider, PermissionStatus};

/// Host permission provider backed by the system privacy APIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPermissions;

impl PermissionProvider for SystemPermissions {
    fn request_access(&self, permission: Permission) -> PermissionStatus {
        match permission {
            Permission::ScreenCapture => request_screen_capture_access(),
            Permission::Microphone => request_microphone_access(),
        }
    }
}

/// `AVAuthorizationStatus` as reported by `AVCaptureDevice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    Authorized,
}

impl AuthorizationStatus {
    /// Map the raw `NSInteger`. Values added by newer systems count as denied.
    pub fn from_raw(raw: isize) -> Self {
        match raw {
            0 => Self::NotDetermined,
            1 => Self::Restricted,
            3 => Self::Authorized,
            _ => Self::Denied,
        }
    }

    /// Final answer for this status. `request` runs only while undecided.
    pub fn resolve(self, request: impl FnOnce() -> bool) -> PermissionStatus {
        match self {
            Self::Authorized => PermissionStatus::Granted,
            Self::NotDetermined => PermissionStatus::from(request()),
            Self::Restricted | Self::Denied => PermissionStatus::Denied,
        }
    }
}

/// Check screen recording access, prompting if it has not been decided yet.
#[cfg(target_os = "macos")]
pub fn request_screen_capture_access() -> PermissionStatus {
    let access = ScreenCaptureAccess;
    if access.preflight() {
        return PermissionStatus::Granted;
    }
    log::info!("Requesting screen recording permission");
    PermissionStatus::from(access.request())
}

#[cfg(not(target_os = "macos"))]
pub fn request_screen_capture_access() -> PermissionStatus {
    PermissionStatus::Granted
}

/// Check microphone access, blocking on the system prompt if the user has
/// not decided yet. Restricted and denied devices are reported as denied.
#[cfg(target_os = "macos")]
pub fn request_microphone_access() -> PermissionStatus {
    let status = av::microphone_authorization();
    log::debug!("Microphone authorization: {:?}", status);
    status.resolve(|| {
        log::info!("Requesting microphone permission");
        av::request_microphone()
    })
}

#[cfg(not(target_os = "macos"))]
pub fn request_microphone_access() -> PermissionStatus {
    PermissionStatus::Granted
}

#[cfg(target_os = "macos")]
mod av {
    use std::sync::mpsc;

    use block::ConcreteBlock;
    use objc::runtime::{Object, BOOL, NO};
    use objc::{class, msg_send, sel, sel_impl};

    use super::AuthorizationStatus;

    #[link(name = "AVFoundation", kind = "framework")]
    extern "C" {
        static AVMediaTypeAudio: *mut Object;
    }

    pub fn microphone_authorization() -> AuthorizationStatus {
        let raw: isize = unsafe {
            msg_send![class!(AVCaptureDevice), authorizationStatusForMediaType: AVMediaTypeAudio]
        };
        AuthorizationStatus::from_raw(raw)
    }

    /// Show the system prompt and wait for the completion handler, which
    /// AVFoundation calls on one of its own queues.
    pub fn request_microphone() -> bool {
        let (tx, rx) = mpsc::channel();
        let handler = ConcreteBlock::new(move |granted: BOOL| {
            let _ = tx.send(granted != NO);
        });
        let handler = handler.copy();

        unsafe {
            let _: () = msg_send![
                class!(AVCaptureDevice),
                requestAccessForMediaType: AVMediaTypeAudio
                completionHandler: &*handler
            ];
        }

        rx.recv().unwrap_or_else(|_| {
            log::warn!("Microphone prompt finished without an answer");
            false
        })
    }
}
