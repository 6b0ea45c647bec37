/// Recorder run state.
///
/// State transitions:
/// ```text
/// idle → running ↔ paused
///   ↑       ↓        ↓
///   └───── stop ─────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecorderState {
    #[default]
    Idle,
    Running,
    Paused,
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Whether the capture engine currently holds a session (running or paused).
    pub fn has_active_session(&self) -> bool {
        !self.is_idle()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}
