use std::time::Duration;

use super::content::{AvailableContent, Display, DisplayId, RunningApplication};

/// Frame interval for video delivery: one frame per second.
pub const MINIMUM_FRAME_INTERVAL: Duration = Duration::from_secs(1);

/// Stream parameters handed to the capture engine.
///
/// Derived from the selected display and the recorder's capture flags;
/// recomputed whenever one of those changes.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfiguration {
    /// Output width in pixels, mirrors the selected display.
    pub width: u32,

    /// Output height in pixels, mirrors the selected display.
    pub height: u32,

    pub minimum_frame_interval: Duration,

    pub captures_audio: bool,

    /// Drop audio produced by the host process itself.
    pub excludes_current_process_audio: bool,

    pub sample_rate: f64,

    pub channel_count: u16,
}

impl StreamConfiguration {
    pub fn for_display(
        display: &Display,
        captures_audio: bool,
        excludes_current_process_audio: bool,
        sample_rate: f64,
        channel_count: u16,
    ) -> Self {
        Self {
            width: display.width,
            height: display.height,
            minimum_frame_interval: MINIMUM_FRAME_INTERVAL,
            captures_audio,
            excludes_current_process_audio,
            sample_rate,
            channel_count,
        }
    }
}

/// Which display to capture and which applications to leave out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter {
    pub display: DisplayId,
    pub excluded_applications: Vec<RunningApplication>,
}

impl ContentFilter {
    /// Builds a filter for `display`. When `exclude_bundle_id` is set, every
    /// running instance of that application is excluded.
    pub fn new(display: &Display, content: &AvailableContent, exclude_bundle_id: Option<&str>) -> Self {
        let excluded_applications = match exclude_bundle_id {
            Some(bundle_id) => content.applications_with_bundle_id(bundle_id).cloned().collect(),
            None => Vec::new(),
        };
        Self {
            display: display.id,
            excluded_applications,
        }
    }

    pub fn excludes(&self, bundle_identifier: &str) -> bool {
        self.excluded_applications
            .iter()
            .any(|app| app.bundle_identifier == bundle_identifier)
    }
}
