pub mod controls_visibility;
pub mod layout;
pub mod player_traits;
pub mod session;
pub mod time_display;

pub use controls_visibility::{ControlEffect, ControlState, HoverState, OverlayState, TimerTicket};
pub use layout::{Rect, control_bar_geometry};
pub use player_traits::{EndFileReason, EngineEvent, MediaEngine, SeekState, TransportState};
pub use session::{PlaybackSession, SessionUpdate};
pub use time_display::format_time_display;
