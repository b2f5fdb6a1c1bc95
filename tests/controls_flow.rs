use vidglass::constants::{CONTROLS_FADE_OUT_MS, CONTROLS_HIDE_DELAY_MS, CURSOR_HIDE_DELAY_MS};
use vidglass::core::{ControlEffect, ControlState, OverlayState, TimerTicket};

#[derive(Clone, Copy)]
enum Pending {
    Idle(TimerTicket),
    Cursor(TimerTicket),
    FadeDone,
}

/// Drives an `OverlayState` on a simulated millisecond clock, applying
/// effects the way the video surface does.
struct Harness {
    overlay: OverlayState,
    now: u64,
    timers: Vec<(u64, Pending)>,
    cursor_visible: bool,
    bar_shown: bool,
}

impl Harness {
    fn new() -> Self {
        let mut harness = Self {
            overlay: OverlayState::new(),
            now: 0,
            timers: Vec::new(),
            cursor_visible: true,
            bar_shown: true,
        };
        let effects = harness.overlay.start();
        harness.apply(effects);
        harness
    }

    fn apply(&mut self, effects: Vec<ControlEffect>) {
        for effect in effects {
            match effect {
                ControlEffect::FadeIn => {
                    self.bar_shown = true;
                    self.timers.retain(|(_, p)| !matches!(p, Pending::FadeDone));
                }
                ControlEffect::FadeOut => {
                    let due = self.now + u64::from(CONTROLS_FADE_OUT_MS);
                    self.timers.push((due, Pending::FadeDone));
                }
                ControlEffect::Hide => self.bar_shown = false,
                ControlEffect::RestartIdleTimer(ticket) => {
                    self.timers.retain(|(_, p)| !matches!(p, Pending::Idle(_)));
                    let due = self.now + CONTROLS_HIDE_DELAY_MS;
                    self.timers.push((due, Pending::Idle(ticket)));
                }
                ControlEffect::CancelIdleTimer => {
                    self.timers.retain(|(_, p)| !matches!(p, Pending::Idle(_)));
                }
                ControlEffect::RestartCursorTimer(ticket) => {
                    self.timers.retain(|(_, p)| !matches!(p, Pending::Cursor(_)));
                    let due = self.now + CURSOR_HIDE_DELAY_MS;
                    self.timers.push((due, Pending::Cursor(ticket)));
                }
                ControlEffect::CancelCursorTimer => {
                    self.timers.retain(|(_, p)| !matches!(p, Pending::Cursor(_)));
                }
                ControlEffect::ShowCursor => self.cursor_visible = true,
                ControlEffect::HideCursor => self.cursor_visible = false,
            }
        }
    }

    fn advance(&mut self, ms: u64) {
        let until = self.now + ms;
        loop {
            self.timers.sort_by_key(|(due, _)| *due);
            let Some(&(due, pending)) = self.timers.first() else {
                break;
            };
            if due > until {
                break;
            }
            self.timers.remove(0);
            self.now = due;
            let effects = match pending {
                Pending::Idle(ticket) => self.overlay.idle_elapsed(ticket),
                Pending::Cursor(ticket) => self.overlay.cursor_idle_elapsed(ticket),
                Pending::FadeDone => self.overlay.fade_out_finished(),
            };
            self.apply(effects);
        }
        self.now = until;
    }

    fn move_pointer(&mut self) {
        let effects = self.overlay.pointer_moved();
        self.apply(effects);
    }

    fn enter_surface(&mut self) {
        let effects = self.overlay.pointer_moved();
        self.apply(effects);
    }

    fn leave_surface(&mut self) {
        let effects = self.overlay.pointer_left_surface();
        self.apply(effects);
    }

    fn enter_controls(&mut self) {
        let effects = self.overlay.pointer_entered_controls();
        self.apply(effects);
    }

    fn leave_controls(&mut self) {
        let effects = self.overlay.pointer_left_controls();
        self.apply(effects);
    }
}

fn hide_window() -> u64 {
    CONTROLS_HIDE_DELAY_MS + u64::from(CONTROLS_FADE_OUT_MS)
}

#[test]
fn test_controls_hide_after_idle_delay_and_fade() {
    let mut harness = Harness::new();

    harness.advance(hide_window() - 1);
    assert!(harness.bar_shown);

    harness.advance(1);
    assert!(!harness.bar_shown);
    assert_eq!(harness.overlay.control_state(), ControlState::Hidden);
}

#[test]
fn test_motion_postpones_hiding() {
    let mut harness = Harness::new();

    for _ in 0..5 {
        harness.advance(CONTROLS_HIDE_DELAY_MS - 100);
        harness.move_pointer();
    }
    assert!(harness.bar_shown);
    assert_eq!(harness.overlay.control_state(), ControlState::Visible);

    harness.advance(hide_window());
    assert!(!harness.bar_shown);
}

#[test]
fn test_controls_stay_while_hovered() {
    let mut harness = Harness::new();
    harness.move_pointer();
    harness.enter_controls();

    harness.advance(hide_window() * 10);

    assert!(harness.bar_shown);
    assert_eq!(harness.overlay.control_state(), ControlState::Visible);
}

#[test]
fn test_leaving_controls_restarts_countdown() {
    let mut harness = Harness::new();
    harness.enter_controls();
    harness.advance(hide_window() * 3);

    harness.leave_controls();
    harness.advance(hide_window() - 1);
    assert!(harness.bar_shown);

    harness.advance(1);
    assert!(!harness.bar_shown);
}

#[test]
fn test_motion_during_fade_brings_controls_back() {
    let mut harness = Harness::new();
    harness.advance(CONTROLS_HIDE_DELAY_MS);
    assert_eq!(harness.overlay.control_state(), ControlState::FadingOut);

    harness.advance(u64::from(CONTROLS_FADE_OUT_MS) / 2);
    harness.move_pointer();
    harness.advance(u64::from(CONTROLS_FADE_OUT_MS));

    assert!(harness.bar_shown);
    assert_eq!(harness.overlay.control_state(), ControlState::Visible);
}

#[test]
fn test_cursor_hides_and_returns_on_motion() {
    let mut harness = Harness::new();
    harness.move_pointer();

    harness.advance(CURSOR_HIDE_DELAY_MS);
    assert!(!harness.cursor_visible);

    harness.move_pointer();
    assert!(harness.cursor_visible);
}

#[test]
fn test_cursor_stays_over_controls() {
    let mut harness = Harness::new();
    harness.move_pointer();
    harness.enter_controls();

    harness.advance(CURSOR_HIDE_DELAY_MS * 4);

    assert!(harness.cursor_visible);
}

#[test]
fn test_entering_surface_after_hide_shows_controls() {
    let mut harness = Harness::new();
    harness.leave_surface();
    harness.advance(hide_window());
    assert!(!harness.bar_shown);

    harness.enter_surface();

    assert!(harness.bar_shown);
    assert_eq!(harness.overlay.control_state(), ControlState::Visible);
    harness.advance(hide_window());
    assert!(!harness.bar_shown);
}
