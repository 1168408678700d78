/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle → recording → stopped
///             ↓
///           error
/// ```
///
/// `Stopped` and `Error` are terminal for a session instance; create a new
/// session to record again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderStatus {
    Idle,
    Recording,
    Stopped,
    Error,
}

impl RecorderStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Error)
    }
}
