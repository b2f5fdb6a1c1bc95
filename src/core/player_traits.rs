// Toolkit-agnostic engine abstraction
// The libmpv adapter implements this; tests drive the session with a mock

use crate::utils::PlayerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Playing,
    Paused,
}

impl TransportState {
    pub fn is_paused(self) -> bool {
        matches!(self, TransportState::Paused)
    }

    pub fn toggled(self) -> Self {
        match self {
            TransportState::Playing => TransportState::Paused,
            TransportState::Paused => TransportState::Playing,
        }
    }

    /// Symbolic icon for the play/pause button while in this state
    pub fn icon_name(self) -> &'static str {
        match self {
            TransportState::Playing => "media-playback-pause-symbolic",
            TransportState::Paused => "media-playback-start-symbolic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekState {
    Idle,
    Seeking,
}

/// Why the engine stopped playing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndFileReason {
    /// Playback reached the end of the stream
    Eof,
    /// Stopped because another file was loaded
    Stop,
    Quit,
    Error,
    Redirect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PositionChanged(f64),
    DurationChanged(f64),
    EndOfFile(EndFileReason),
    Shutdown,
}

/// Commands the playback session issues to a media engine.
///
/// All calls happen on the UI thread. Transient controls report failures but
/// callers are expected to log and carry on.
pub trait MediaEngine {
    fn load(&self, reference: &str) -> Result<(), PlayerError>;
    fn set_paused(&self, paused: bool) -> Result<(), PlayerError>;
    fn seek_absolute(&self, seconds: f64) -> Result<(), PlayerError>;
    fn set_volume(&self, percent: u8) -> Result<(), PlayerError>;
    fn duration(&self) -> Option<f64>;

    /// Pop every queued engine event without blocking.
    fn drain_events(&mut self) -> Vec<EngineEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_toggle_and_icon() {
        let state = TransportState::Playing;
        assert!(!state.is_paused());
        assert_eq!(state.toggled(), TransportState::Paused);
        assert_eq!(state.toggled().toggled(), TransportState::Playing);
        assert_eq!(TransportState::Paused.icon_name(), "media-playback-start-symbolic");
    }
}
