#[cfg(feature = "mpv")]
pub mod mpv_player;
pub mod signals;

#[cfg(feature = "mpv")]
pub use mpv_player::{GetProcAddressFn, MpvEngine};
pub use signals::{EngineSignal, FrameGate, SignalReceiver, SignalSender, channel};
