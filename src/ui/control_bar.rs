use gtk4::{self, glib, prelude::*};
use libadwaita as adw;
use libadwaita::prelude::*;
use std::cell::RefCell;
use tracing::trace;

use crate::constants::{SEEK_SLIDER_MAX, VOLUME_SLIDER_MAX};
use crate::core::TransportState;

/// Floating transport controls drawn over the video.
///
/// Owns no playback state; the video surface pushes state in and connects
/// the callbacks.
pub struct ControlBar {
    widget: gtk4::Box,
    play_button: gtk4::Button,
    prev_button: gtk4::Button,
    next_button: gtk4::Button,
    seek_scale: gtk4::Scale,
    time_label: gtk4::Label,
    volume_scale: gtk4::Scale,
    animation: RefCell<Option<adw::TimedAnimation>>,
}

fn transport_button(icon: &str, tooltip: &str) -> gtk4::Button {
    let button = gtk4::Button::from_icon_name(icon);
    button.set_tooltip_text(Some(tooltip));
    button.add_css_class("flat");
    button.add_css_class("circular");
    // Space must keep reaching the window's key handler
    button.set_focusable(false);
    button.set_focus_on_click(false);
    button
}

impl ControlBar {
    pub fn new(initial_volume: u8) -> Self {
        let widget = gtk4::Box::builder()
            .orientation(gtk4::Orientation::Horizontal)
            .spacing(8)
            .build();
        widget.add_css_class("control-bar");
        widget.add_css_class("osd");

        let prev_button = transport_button("media-skip-backward-symbolic", "Previous");
        let play_button = transport_button(TransportState::Paused.icon_name(), "Play/Pause");
        let next_button = transport_button("media-skip-forward-symbolic", "Next");

        let seek_scale =
            gtk4::Scale::with_range(gtk4::Orientation::Horizontal, 0.0, SEEK_SLIDER_MAX, 1.0);
        seek_scale.set_draw_value(false);
        seek_scale.set_hexpand(true);
        seek_scale.set_width_request(160);
        seek_scale.set_focusable(false);
        seek_scale.set_sensitive(false);
        seek_scale.add_css_class("seek-bar");

        let time_label = gtk4::Label::new(Some("00:00 / 00:00"));
        time_label.add_css_class("numeric");
        time_label.add_css_class("dim-label");

        let volume_icon = gtk4::Image::from_icon_name("audio-volume-high-symbolic");
        let volume_scale =
            gtk4::Scale::with_range(gtk4::Orientation::Horizontal, 0.0, VOLUME_SLIDER_MAX, 1.0);
        volume_scale.set_value(f64::from(initial_volume));
        volume_scale.set_draw_value(false);
        volume_scale.set_width_request(90);
        volume_scale.set_focusable(false);

        widget.append(&prev_button);
        widget.append(&play_button);
        widget.append(&next_button);
        widget.append(&seek_scale);
        widget.append(&time_label);
        widget.append(&volume_icon);
        widget.append(&volume_scale);

        Self {
            widget,
            play_button,
            prev_button,
            next_button,
            seek_scale,
            time_label,
            volume_scale,
            animation: RefCell::new(None),
        }
    }

    pub fn widget(&self) -> &gtk4::Box {
        &self.widget
    }

    pub fn connect_play_pause<F: Fn() + 'static>(&self, f: F) {
        self.play_button.connect_clicked(move |_| f());
    }

    pub fn connect_prev<F: Fn() + 'static>(&self, f: F) {
        self.prev_button.connect_clicked(move |_| f());
    }

    pub fn connect_next<F: Fn() + 'static>(&self, f: F) {
        self.next_button.connect_clicked(move |_| f());
    }

    /// `pressed(true)` when the seek slider is grabbed, `pressed(false)` on
    /// release. Seen in the capture phase, before the slider handles it.
    pub fn connect_seek_grab<F: Fn(bool) + 'static>(&self, f: F) {
        let legacy = gtk4::EventControllerLegacy::new();
        legacy.set_propagation_phase(gtk4::PropagationPhase::Capture);
        legacy.connect_event(move |_, event| {
            match event.event_type() {
                gtk4::gdk::EventType::ButtonPress | gtk4::gdk::EventType::TouchBegin => f(true),
                gtk4::gdk::EventType::ButtonRelease
                | gtk4::gdk::EventType::TouchEnd
                | gtk4::gdk::EventType::TouchCancel => f(false),
                _ => {}
            }
            glib::Propagation::Proceed
        });
        self.seek_scale.add_controller(legacy);
    }

    /// Slider moved by the user; programmatic updates do not fire this.
    pub fn connect_seek<F: Fn(f64) + 'static>(&self, f: F) {
        self.seek_scale.connect_change_value(move |_, _, value| {
            f(value.clamp(0.0, SEEK_SLIDER_MAX));
            glib::Propagation::Proceed
        });
    }

    pub fn connect_volume<F: Fn(f64) + 'static>(&self, f: F) {
        self.volume_scale.connect_value_changed(move |scale| f(scale.value()));
    }

    pub fn set_transport(&self, state: TransportState) {
        self.play_button.set_icon_name(state.icon_name());
    }

    pub fn set_progress(&self, slider_value: f64, time_text: &str) {
        self.seek_scale.set_value(slider_value);
        self.time_label.set_text(time_text);
    }

    pub fn set_seekable(&self, seekable: bool) {
        self.seek_scale.set_sensitive(seekable);
    }

    /// Back to the start for a newly loaded file.
    pub fn reset_progress(&self) {
        self.seek_scale.set_value(0.0);
        self.seek_scale.set_sensitive(false);
        self.time_label.set_text("00:00 / 00:00");
    }

    /// Smallest width the bar can be laid out at.
    pub fn minimum_width(&self) -> i32 {
        let (minimum, _, _, _) = self.widget.measure(gtk4::Orientation::Horizontal, -1);
        minimum
    }

    pub fn natural_height(&self, for_width: i32) -> i32 {
        let (_, natural, _, _) = self.widget.measure(gtk4::Orientation::Vertical, for_width);
        natural
    }

    pub fn fade_in(&self, duration_ms: u32) {
        self.widget.set_visible(true);
        let animation = self.animate_opacity(1.0, duration_ms, adw::Easing::EaseOutCubic);
        animation.play();
    }

    /// Fade to transparent; `on_done` runs only if the fade completes.
    pub fn fade_out<F: Fn() + 'static>(&self, duration_ms: u32, on_done: F) {
        let animation = self.animate_opacity(0.0, duration_ms, adw::Easing::EaseInCubic);
        animation.connect_done(move |_| on_done());
        animation.play();
    }

    pub fn hide(&self) {
        self.widget.set_visible(false);
    }

    // A newer fade always supersedes the running one
    fn animate_opacity(&self, to: f64, duration_ms: u32, easing: adw::Easing) -> adw::TimedAnimation {
        if let Some(previous) = self.animation.borrow_mut().take() {
            previous.pause();
        }

        let from = self.widget.opacity();
        trace!("Animating control bar opacity {} -> {}", from, to);
        let target = adw::PropertyAnimationTarget::new(&self.widget, "opacity");
        let animation = adw::TimedAnimation::new(&self.widget, from, to, duration_ms, target);
        animation.set_easing(easing);
        self.animation.replace(Some(animation.clone()));
        animation
    }
}
