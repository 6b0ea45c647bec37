use std::fmt;

use serde::{Deserialize, Serialize};

/// Platform identifier of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayId(pub u32);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display-{}", self.0)
    }
}

/// A display available for capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub id: DisplayId,
    pub width: u32,
    pub height: u32,
}

/// An application running on the host, as reported by the capture service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningApplication {
    pub process_id: i32,
    pub bundle_identifier: String,
    pub name: String,
}

/// Displays and applications currently shareable. Refreshed before each
/// session; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableContent {
    pub displays: Vec<Display>,
    pub applications: Vec<RunningApplication>,
}

impl AvailableContent {
    pub fn display(&self, id: DisplayId) -> Option<&Display> {
        self.displays.iter().find(|d| d.id == id)
    }

    pub fn applications_with_bundle_id<'a>(
        &'a self,
        bundle_identifier: &'a str,
    ) -> impl Iterator<Item = &'a RunningApplication> + 'a {
        self.applications
            .iter()
            .filter(move |app| app.bundle_identifier == bundle_identifier)
    }
}
