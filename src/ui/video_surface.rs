use gtk4::{self, gdk, gio, glib, prelude::*};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, trace, warn};

use super::control_bar::ControlBar;
use super::gl;
use crate::config::{InterfaceConfig, PlaybackConfig};
use crate::constants::{APP_NAME, SEEK_SLIDER_MAX};
use crate::core::{
    ControlEffect, OverlayState, PlaybackSession, SessionUpdate, TimerTicket, control_bar_geometry,
};
use crate::models::{parse_uri_list, resolve_dropped_uris};
use crate::player::{EngineSignal, FrameGate, MpvEngine, SignalReceiver, SignalSender, channel};
use crate::utils::PlayerError;

type NowPlayingHandler = Box<dyn Fn(&str)>;

/// Video area with the floating control bar on top.
///
/// Creates the media engine once its GL context exists, forwards engine
/// signals onto the main loop and runs the controls' auto-hide.
#[derive(Clone)]
pub struct VideoSurface {
    inner: Rc<SurfaceInner>,
}

struct SurfaceInner {
    overlay: gtk4::Overlay,
    gl_area: gtk4::GLArea,
    controls: ControlBar,
    session: RefCell<PlaybackSession<MpvEngine>>,
    visibility: RefCell<OverlayState>,
    idle_timer: RefCell<Option<glib::SourceId>>,
    cursor_timer: RefCell<Option<glib::SourceId>>,
    // Handed to the engine when the GL context is realized
    signals: RefCell<Option<SignalSender>>,
    frame_gate: FrameGate,
    playback: PlaybackConfig,
    interface: InterfaceConfig,
    now_playing: RefCell<Option<NowPlayingHandler>>,
}

impl std::fmt::Debug for VideoSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSurface")
            .field("initialized", &self.inner.session.borrow().is_initialized())
            .finish()
    }
}

// Fatal errors leave no degraded playback mode
fn report_engine_error(err: &PlayerError) {
    if err.is_fatal() {
        error!("Cannot start playback: {}", err);
        std::process::exit(1);
    }
    warn!("Media engine setup problem: {}", err);
}

fn toggle_fullscreen(widget: &impl IsA<gtk4::Widget>) {
    if let Some(window) = widget.root().and_downcast::<gtk4::Window>() {
        window.set_fullscreened(!window.is_fullscreen());
    }
}

impl VideoSurface {
    pub fn new(playback: &PlaybackConfig, interface: &InterfaceConfig) -> Self {
        let gl_area = gtk4::GLArea::new();
        gl_area.set_vexpand(true);
        gl_area.set_hexpand(true);
        gl_area.set_auto_render(true);
        gl_area.set_focusable(true);

        let controls = ControlBar::new(playback.initial_volume);

        let overlay = gtk4::Overlay::new();
        overlay.set_vexpand(true);
        overlay.set_hexpand(true);
        overlay.add_css_class("video-surface");
        overlay.set_child(Some(&gl_area));
        overlay.add_overlay(controls.widget());

        let (sender, receiver) = channel();

        let inner = Rc::new(SurfaceInner {
            overlay,
            gl_area,
            controls,
            session: RefCell::new(PlaybackSession::new(playback.initial_volume)),
            visibility: RefCell::new(OverlayState::new()),
            idle_timer: RefCell::new(None),
            cursor_timer: RefCell::new(None),
            frame_gate: receiver.frame_gate(),
            signals: RefCell::new(Some(sender)),
            playback: playback.clone(),
            interface: interface.clone(),
            now_playing: RefCell::new(None),
        });

        SurfaceInner::setup_gl(&inner);
        SurfaceInner::setup_layout(&inner);
        SurfaceInner::setup_controls(&inner);
        SurfaceInner::setup_pointer(&inner);
        SurfaceInner::setup_drop_target(&inner);
        SurfaceInner::spawn_signal_loop(&inner, receiver);

        let effects = inner.visibility.borrow_mut().start();
        inner.apply_effects(effects);

        Self { inner }
    }

    pub fn widget(&self) -> &gtk4::Overlay {
        &self.inner.overlay
    }

    /// Play a path or URL. Queued until the engine exists.
    pub fn request_play(&self, reference: &str) {
        self.inner.request_play(reference);
    }

    pub fn toggle_pause(&self) {
        let updates = self.inner.session.borrow_mut().toggle_pause();
        self.inner.apply_updates(updates);
    }

    /// Called with the display name of every file that starts playing.
    pub fn connect_now_playing<F: Fn(&str) + 'static>(&self, f: F) {
        self.inner.now_playing.replace(Some(Box::new(f)));
    }

    /// Release the render context, then destroy the engine. Must run while
    /// the widgets are still alive.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl SurfaceInner {
    fn setup_gl(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        this.gl_area.connect_realize(move |gl_area| {
            let Some(inner) = weak.upgrade() else { return };
            debug!("GLArea realized - initializing media engine");
            gl_area.make_current();
            let result = match gl_area.error() {
                Some(err) => Err(PlayerError::RenderContext(err.to_string())),
                None => inner.initialize_engine(),
            };
            if let Err(e) = result {
                report_engine_error(&e);
            }
        });

        let weak = Rc::downgrade(this);
        this.gl_area.connect_render(move |gl_area, _context| {
            let Some(inner) = weak.upgrade() else {
                return glib::Propagation::Stop;
            };
            inner.frame_gate.presented();

            let scale = gl_area.scale_factor();
            let (width, height) = (gl_area.width() * scale, gl_area.height() * scale);
            if width <= 0 || height <= 0 {
                return glib::Propagation::Stop;
            }

            if let Some(engine) = inner.session.borrow().engine() {
                gl_area.attach_buffers();
                gl::set_viewport(width, height);
                engine.render_frame(gl::current_framebuffer(), width, height);
            }
            glib::Propagation::Stop
        });

        let weak = Rc::downgrade(this);
        this.gl_area.connect_unrealize(move |gl_area| {
            let Some(inner) = weak.upgrade() else { return };
            debug!("GLArea unrealized - releasing render context");
            gl_area.make_current();
            if let Some(engine) = inner.session.borrow_mut().engine_mut() {
                engine.release_render_context();
            }
        });
    }

    fn initialize_engine(self: &Rc<Self>) -> Result<(), PlayerError> {
        let mut session = self.session.borrow_mut();
        if let Some(engine) = session.engine_mut() {
            // Re-realized after an unrealize; the engine survives
            return engine.create_render_context(gl::get_proc_address);
        }

        let Some(signals) = self.signals.borrow_mut().take() else {
            debug!("Session already shut down, not creating an engine");
            return Ok(());
        };
        let mut engine = MpvEngine::new(&self.playback, signals)?;
        engine.create_render_context(gl::get_proc_address)?;

        let updates = session.attach_engine(engine);
        drop(session);
        self.apply_updates(updates);
        Ok(())
    }

    fn setup_layout(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        this.overlay.connect_get_child_position(move |overlay, child| {
            let inner = weak.upgrade()?;
            if child != inner.controls.widget().upcast_ref::<gtk4::Widget>() {
                return None;
            }

            let min_width = inner.controls.minimum_width();
            let host_width = overlay.width();
            let provisional = control_bar_geometry(host_width, overlay.height(), 0, min_width);
            let bar_height = inner.controls.natural_height(provisional.width.max(min_width));
            let rect = control_bar_geometry(host_width, overlay.height(), bar_height, min_width);

            Some(gdk::Rectangle::new(rect.x, rect.y, rect.width, rect.height))
        });
    }

    fn setup_controls(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        this.controls.connect_play_pause(move || {
            if let Some(inner) = weak.upgrade() {
                let updates = inner.session.borrow_mut().toggle_pause();
                inner.apply_updates(updates);
            }
        });

        let weak = Rc::downgrade(this);
        this.controls.connect_prev(move || {
            if let Some(inner) = weak.upgrade() {
                let updates = inner.session.borrow_mut().prev();
                inner.apply_updates(updates);
            }
        });

        let weak = Rc::downgrade(this);
        this.controls.connect_next(move || {
            if let Some(inner) = weak.upgrade() {
                let updates = inner.session.borrow_mut().next();
                inner.apply_updates(updates);
            }
        });

        let weak = Rc::downgrade(this);
        this.controls.connect_seek_grab(move |pressed| {
            if let Some(inner) = weak.upgrade() {
                let mut session = inner.session.borrow_mut();
                if pressed {
                    session.begin_seek();
                } else {
                    session.end_seek();
                }
            }
        });

        let weak = Rc::downgrade(this);
        this.controls.connect_seek(move |value| {
            if let Some(inner) = weak.upgrade() {
                inner.session.borrow().seek_to_slider(value, SEEK_SLIDER_MAX);
            }
        });

        let weak = Rc::downgrade(this);
        this.controls.connect_volume(move |value| {
            if let Some(inner) = weak.upgrade() {
                inner.session.borrow_mut().set_volume(value);
            }
        });
    }

    fn setup_pointer(this: &Rc<Self>) {
        let surface_motion = gtk4::EventControllerMotion::new();
        // Entering the video counts as activity, same as moving over it
        let weak = Rc::downgrade(this);
        surface_motion.connect_enter(move |_, _, _| {
            if let Some(inner) = weak.upgrade() {
                let effects = inner.visibility.borrow_mut().pointer_moved();
                inner.apply_effects(effects);
            }
        });
        let weak = Rc::downgrade(this);
        surface_motion.connect_motion(move |_, _, _| {
            if let Some(inner) = weak.upgrade() {
                let effects = inner.visibility.borrow_mut().pointer_moved();
                inner.apply_effects(effects);
            }
        });
        let weak = Rc::downgrade(this);
        surface_motion.connect_leave(move |_| {
            if let Some(inner) = weak.upgrade() {
                let effects = inner.visibility.borrow_mut().pointer_left_surface();
                inner.apply_effects(effects);
            }
        });
        this.gl_area.add_controller(surface_motion);

        let controls_motion = gtk4::EventControllerMotion::new();
        let weak = Rc::downgrade(this);
        controls_motion.connect_enter(move |_, _, _| {
            if let Some(inner) = weak.upgrade() {
                let effects = inner.visibility.borrow_mut().pointer_entered_controls();
                inner.apply_effects(effects);
            }
        });
        let weak = Rc::downgrade(this);
        controls_motion.connect_motion(move |_, _, _| {
            if let Some(inner) = weak.upgrade() {
                let effects = inner.visibility.borrow_mut().pointer_moved_over_controls();
                inner.apply_effects(effects);
            }
        });
        let weak = Rc::downgrade(this);
        controls_motion.connect_leave(move |_| {
            if let Some(inner) = weak.upgrade() {
                let effects = inner.visibility.borrow_mut().pointer_left_controls();
                inner.apply_effects(effects);
            }
        });
        this.controls.widget().add_controller(controls_motion);

        let click = gtk4::GestureClick::new();
        click.connect_pressed(|gesture, n_press, _, _| {
            if n_press == 2
                && let Some(widget) = gesture.widget()
            {
                toggle_fullscreen(&widget);
            }
        });
        this.gl_area.add_controller(click);
    }

    fn setup_drop_target(this: &Rc<Self>) {
        let drop_target = gtk4::DropTarget::new(glib::Type::INVALID, gdk::DragAction::COPY);
        drop_target.set_types(&[gdk::FileList::static_type(), glib::Type::STRING]);

        let weak = Rc::downgrade(this);
        drop_target.connect_drop(move |_, value, _, _| {
            let Some(inner) = weak.upgrade() else {
                return false;
            };

            let reference = if let Ok(files) = value.get::<gdk::FileList>() {
                let uris: Vec<String> = files
                    .files()
                    .iter()
                    .map(|file: &gio::File| file.uri().to_string())
                    .collect();
                resolve_dropped_uris(&uris)
            } else if let Ok(text) = value.get::<String>() {
                resolve_dropped_uris(parse_uri_list(&text))
            } else {
                None
            };

            match reference {
                Some(reference) => {
                    info!("Dropped {}", reference);
                    inner.request_play(&reference);
                    true
                }
                None => {
                    debug!("Drop payload contained no usable reference");
                    false
                }
            }
        });
        this.overlay.add_controller(drop_target);
    }

    // Runs until every engine-side sender is gone
    fn spawn_signal_loop(this: &Rc<Self>, mut receiver: SignalReceiver) {
        let weak: Weak<Self> = Rc::downgrade(this);
        glib::spawn_future_local(async move {
            while let Some(signal) = receiver.recv().await {
                let Some(inner) = weak.upgrade() else { break };
                match signal {
                    EngineSignal::Wakeup => {
                        let updates = inner.session.borrow_mut().drain_engine_events();
                        inner.apply_updates(updates);
                    }
                    EngineSignal::Redraw => inner.gl_area.queue_render(),
                }
            }
            debug!("Engine signal channel closed");
        });
    }

    fn request_play(self: &Rc<Self>, reference: &str) {
        let updates = self.session.borrow_mut().request_play(reference);
        self.apply_updates(updates);
    }

    fn apply_updates(self: &Rc<Self>, updates: Vec<SessionUpdate>) {
        for update in updates {
            match update {
                SessionUpdate::TransportChanged(state) => self.controls.set_transport(state),
                SessionUpdate::Progress {
                    slider_value,
                    time_text,
                } => self.controls.set_progress(slider_value, &time_text),
                SessionUpdate::DurationChanged(duration) => {
                    trace!("Duration now {:.1}s", duration);
                    self.controls.set_seekable(true);
                }
                SessionUpdate::PlaybackStarted => {
                    self.controls.reset_progress();
                    let effects = self.visibility.borrow_mut().play_requested();
                    self.apply_effects(effects);
                }
                SessionUpdate::NowPlaying { title, index, len } => {
                    info!("Now playing {} ({}/{})", title, index + 1, len);
                    if let Some(handler) = self.now_playing.borrow().as_ref() {
                        handler(&format!("{} - {}", title, APP_NAME));
                    }
                }
            }
        }
    }

    fn apply_effects(self: &Rc<Self>, effects: Vec<ControlEffect>) {
        for effect in effects {
            match effect {
                ControlEffect::FadeIn => self.controls.fade_in(self.interface.fade_in_ms),
                ControlEffect::FadeOut => {
                    let weak = Rc::downgrade(self);
                    self.controls.fade_out(self.interface.fade_out_ms, move || {
                        if let Some(inner) = weak.upgrade() {
                            let effects = inner.visibility.borrow_mut().fade_out_finished();
                            inner.apply_effects(effects);
                        }
                    });
                }
                ControlEffect::Hide => self.controls.hide(),
                ControlEffect::RestartIdleTimer(ticket) => self.restart_idle_timer(ticket),
                ControlEffect::CancelIdleTimer => cancel_timer(&self.idle_timer),
                ControlEffect::RestartCursorTimer(ticket) => self.restart_cursor_timer(ticket),
                ControlEffect::CancelCursorTimer => cancel_timer(&self.cursor_timer),
                ControlEffect::ShowCursor => self.gl_area.set_cursor_from_name(Some("default")),
                ControlEffect::HideCursor => self.gl_area.set_cursor_from_name(Some("none")),
            }
        }
    }

    fn restart_idle_timer(self: &Rc<Self>, ticket: TimerTicket) {
        cancel_timer(&self.idle_timer);
        let weak = Rc::downgrade(self);
        let delay = self.interface.controls_hide_delay();
        let id = glib::timeout_add_local_once(delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.idle_timer.borrow_mut().take();
                let effects = inner.visibility.borrow_mut().idle_elapsed(ticket);
                inner.apply_effects(effects);
            }
        });
        self.idle_timer.replace(Some(id));
    }

    fn restart_cursor_timer(self: &Rc<Self>, ticket: TimerTicket) {
        cancel_timer(&self.cursor_timer);
        let weak = Rc::downgrade(self);
        let delay = self.interface.cursor_hide_delay();
        let id = glib::timeout_add_local_once(delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.cursor_timer.borrow_mut().take();
                let effects = inner.visibility.borrow_mut().cursor_idle_elapsed(ticket);
                inner.apply_effects(effects);
            }
        });
        self.cursor_timer.replace(Some(id));
    }

    fn shutdown(&self) {
        info!("Shutting down video surface");
        cancel_timer(&self.idle_timer);
        cancel_timer(&self.cursor_timer);
        self.signals.borrow_mut().take();

        if self.gl_area.is_realized() {
            self.gl_area.make_current();
        }
        let mut session = self.session.borrow_mut();
        if let Some(engine) = session.engine_mut() {
            engine.release_render_context();
        }
        session.shutdown();
    }
}

fn cancel_timer(slot: &RefCell<Option<glib::SourceId>>) {
    if let Some(id) = slot.borrow_mut().take() {
        id.remove();
    }
}
