use tracing::{debug, info, warn};

use super::player_traits::{EndFileReason, EngineEvent, MediaEngine, SeekState, TransportState};
use super::time_display::format_time_display;
use crate::constants::{SEEK_SLIDER_MAX, VOLUME_SLIDER_MAX};
use crate::models::{Playlist, display_name, normalize_reference};

/// Display changes produced by the session, applied by the UI once it has
/// released its borrow on the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    TransportChanged(TransportState),
    /// New seek slider position and time readout
    Progress { slider_value: f64, time_text: String },
    DurationChanged(f64),
    /// A load command was accepted by the engine
    PlaybackStarted,
    NowPlaying { title: String, index: usize, len: usize },
}

enum EngineSlot<E> {
    /// Engine not created yet; the latest play request waits here
    Uninitialized { pending: Option<String> },
    Ready(E),
    Terminated,
}

/// Playlist, transport and seek state around one media engine.
///
/// Lives on the UI thread. The engine is attached once the video surface has
/// created it; requests made before that are queued or dropped.
pub struct PlaybackSession<E: MediaEngine> {
    slot: EngineSlot<E>,
    playlist: Playlist,
    transport: TransportState,
    seek: SeekState,
    volume: u8,
    duration: Option<f64>,
}

impl<E: MediaEngine> PlaybackSession<E> {
    pub fn new(initial_volume: u8) -> Self {
        Self {
            slot: EngineSlot::Uninitialized { pending: None },
            playlist: Playlist::new(),
            transport: TransportState::Paused,
            seek: SeekState::Idle,
            volume: initial_volume.min(VOLUME_SLIDER_MAX as u8),
            duration: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.slot, EngineSlot::Ready(_))
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.slot, EngineSlot::Terminated)
    }

    pub fn engine(&self) -> Option<&E> {
        match &self.slot {
            EngineSlot::Ready(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        match &mut self.slot {
            EngineSlot::Ready(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn pending_reference(&self) -> Option<&str> {
        match &self.slot {
            EngineSlot::Uninitialized { pending } => pending.as_deref(),
            _ => None,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn seek_state(&self) -> SeekState {
        self.seek
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Hand the freshly initialised engine to the session.
    ///
    /// Applies the current volume and services a queued play request.
    pub fn attach_engine(&mut self, engine: E) -> Vec<SessionUpdate> {
        let pending = match std::mem::replace(&mut self.slot, EngineSlot::Ready(engine)) {
            EngineSlot::Uninitialized { pending } => pending,
            EngineSlot::Ready(_) => {
                warn!("Replacing an already attached media engine");
                None
            }
            EngineSlot::Terminated => {
                warn!("Session already shut down, discarding engine");
                self.slot = EngineSlot::Terminated;
                return Vec::new();
            }
        };

        info!("Media engine attached");
        self.apply_volume();

        match pending {
            Some(reference) => {
                debug!("Servicing queued play request: {}", reference);
                self.request_play(&reference)
            }
            None => Vec::new(),
        }
    }

    /// Play a file path or URL, appending it to the playlist unless it is
    /// already the current entry.
    pub fn request_play(&mut self, reference: &str) -> Vec<SessionUpdate> {
        let Some(reference) = normalize_reference(reference) else {
            warn!("Ignoring empty media reference");
            return Vec::new();
        };

        match &mut self.slot {
            EngineSlot::Uninitialized { pending } => {
                if let Some(previous) = pending.replace(reference.clone()) {
                    debug!("Queued request {} replaced by {}", previous, reference);
                } else {
                    debug!("Engine not ready, queueing {}", reference);
                }
                return Vec::new();
            }
            EngineSlot::Terminated => {
                debug!("Session shut down, dropping request for {}", reference);
                return Vec::new();
            }
            EngineSlot::Ready(_) => {}
        }

        if self.playlist.select_or_append(&reference) {
            debug!(
                "Appended {} to playlist ({} entries)",
                reference,
                self.playlist.len()
            );
        }
        self.start_current()
    }

    pub fn next(&mut self) -> Vec<SessionUpdate> {
        if !self.is_initialized() || self.playlist.next().is_none() {
            return Vec::new();
        }
        self.start_current()
    }

    pub fn prev(&mut self) -> Vec<SessionUpdate> {
        if !self.is_initialized() || self.playlist.prev().is_none() {
            return Vec::new();
        }
        self.start_current()
    }

    pub fn toggle_pause(&mut self) -> Vec<SessionUpdate> {
        let EngineSlot::Ready(engine) = &self.slot else {
            debug!("Pause toggle before engine init, ignoring");
            return Vec::new();
        };

        let next = self.transport.toggled();
        if let Err(e) = engine.set_paused(next.is_paused()) {
            warn!("Failed to change pause state: {}", e);
            return Vec::new();
        }
        self.transport = next;
        vec![SessionUpdate::TransportChanged(next)]
    }

    /// The user pressed the seek slider; position updates stop moving it.
    pub fn begin_seek(&mut self) {
        self.seek = SeekState::Seeking;
    }

    pub fn end_seek(&mut self) {
        self.seek = SeekState::Idle;
    }

    pub fn is_seeking(&self) -> bool {
        self.seek == SeekState::Seeking
    }

    /// Seek to the point a slider value represents, scaled by the duration.
    pub fn seek_to_slider(&self, value: f64, slider_max: f64) {
        let Some(duration) = self.known_duration() else {
            debug!("Seek requested without a known duration");
            return;
        };
        let EngineSlot::Ready(engine) = &self.slot else {
            return;
        };
        if slider_max <= 0.0 {
            return;
        }

        let seconds = (value / slider_max).clamp(0.0, 1.0) * duration;
        if let Err(e) = engine.seek_absolute(seconds) {
            warn!("Seek to {:.3}s failed: {}", seconds, e);
        }
    }

    pub fn set_volume(&mut self, percent: f64) {
        self.volume = percent.clamp(0.0, VOLUME_SLIDER_MAX) as u8;
        self.apply_volume();
    }

    /// Pull every queued engine event and fold it into session state.
    pub fn drain_engine_events(&mut self) -> Vec<SessionUpdate> {
        let events = match &mut self.slot {
            EngineSlot::Ready(engine) => engine.drain_events(),
            _ => return Vec::new(),
        };

        let mut updates = Vec::new();
        for event in events {
            updates.extend(self.handle_event(event));
        }
        updates
    }

    pub fn handle_event(&mut self, event: EngineEvent) -> Vec<SessionUpdate> {
        match event {
            EngineEvent::PositionChanged(position) => {
                if self.is_seeking() {
                    return Vec::new();
                }
                let Some(duration) = self.known_duration() else {
                    return Vec::new();
                };
                let slider_value = ((position / duration) * SEEK_SLIDER_MAX)
                    .trunc()
                    .clamp(0.0, SEEK_SLIDER_MAX);
                vec![SessionUpdate::Progress {
                    slider_value,
                    time_text: format_time_display(position, duration),
                }]
            }
            EngineEvent::DurationChanged(duration) => {
                if duration > 0.0 {
                    self.duration = Some(duration);
                    vec![SessionUpdate::DurationChanged(duration)]
                } else {
                    Vec::new()
                }
            }
            EngineEvent::EndOfFile(reason) => {
                debug!("End of file: {:?}", reason);
                if reason == EndFileReason::Eof && self.playlist.len() > 1 {
                    info!("Advancing to next playlist entry");
                    self.next()
                } else {
                    Vec::new()
                }
            }
            EngineEvent::Shutdown => {
                debug!("Engine reported shutdown");
                Vec::new()
            }
        }
    }

    /// Destroy the engine. Later requests are dropped.
    pub fn shutdown(&mut self) {
        if let EngineSlot::Ready(_) = std::mem::replace(&mut self.slot, EngineSlot::Terminated) {
            info!("Media engine destroyed");
        }
    }

    fn start_current(&mut self) -> Vec<SessionUpdate> {
        let EngineSlot::Ready(engine) = &self.slot else {
            return Vec::new();
        };
        let (Some(reference), Some(index)) = (self.playlist.current(), self.playlist.current_index())
        else {
            return Vec::new();
        };

        if let Err(e) = engine.load(reference) {
            warn!("Failed to load {}: {}", reference, e);
            return Vec::new();
        }
        if let Err(e) = engine.set_paused(false) {
            warn!("Failed to resume playback: {}", e);
        }

        info!("Playing {}", reference);
        let title = display_name(reference);
        let len = self.playlist.len();
        self.transport = TransportState::Playing;
        self.duration = None;

        vec![
            SessionUpdate::TransportChanged(TransportState::Playing),
            SessionUpdate::PlaybackStarted,
            SessionUpdate::NowPlaying { title, index, len },
        ]
    }

    fn known_duration(&self) -> Option<f64> {
        self.duration
            .or_else(|| self.engine().and_then(|engine| engine.duration()))
            .filter(|duration| *duration > 0.0)
    }

    fn apply_volume(&self) {
        let Some(engine) = self.engine() else {
            debug!("Volume change before engine init, dropping");
            return;
        };
        if let Err(e) = engine.set_volume(self.volume) {
            warn!("Failed to set volume: {}", e);
        }
    }
}
