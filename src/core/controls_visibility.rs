use tracing::trace;

/// Control visibility state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Controls are shown, or fading in
    Visible,
    /// Fade-out animation running; a fade-in request cancels it
    FadingOut,
    /// Controls are completely hidden
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Inside,
    Outside,
}

/// Identifies one scheduling of a timer. A callback carrying an older
/// ticket than the latest restart is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket(u64);

/// Side effects the UI applies after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEffect {
    FadeIn,
    FadeOut,
    Hide,
    RestartIdleTimer(TimerTicket),
    CancelIdleTimer,
    RestartCursorTimer(TimerTicket),
    CancelCursorTimer,
    ShowCursor,
    HideCursor,
}

#[derive(Debug)]
pub struct OverlayState {
    control: ControlState,
    hover: HoverState,
    target_opacity: f64,
    cursor_hidden: bool,
    idle_generation: u64,
    cursor_generation: u64,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayState {
    pub fn new() -> Self {
        Self {
            control: ControlState::Visible,
            hover: HoverState::Outside,
            target_opacity: 1.0,
            cursor_hidden: false,
            idle_generation: 0,
            cursor_generation: 0,
        }
    }

    pub fn control_state(&self) -> ControlState {
        self.control
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover
    }

    pub fn target_opacity(&self) -> f64 {
        self.target_opacity
    }

    pub fn cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }

    /// Controls start shown with the idle countdown running.
    pub fn start(&mut self) -> Vec<ControlEffect> {
        vec![self.restart_idle_timer()]
    }

    /// Pointer motion over the video surface.
    pub fn pointer_moved(&mut self) -> Vec<ControlEffect> {
        let mut effects = Vec::new();
        if self.cursor_hidden {
            self.cursor_hidden = false;
            effects.push(ControlEffect::ShowCursor);
        }
        effects.push(self.restart_cursor_timer());
        self.fade_in(&mut effects);
        if self.hover == HoverState::Outside {
            effects.push(self.restart_idle_timer());
        }
        effects
    }

    pub fn pointer_left_surface(&mut self) -> Vec<ControlEffect> {
        self.cursor_generation += 1;
        let mut effects = vec![ControlEffect::CancelCursorTimer];
        if self.cursor_hidden {
            self.cursor_hidden = false;
            effects.push(ControlEffect::ShowCursor);
        }
        effects
    }

    pub fn pointer_entered_controls(&mut self) -> Vec<ControlEffect> {
        self.hover = HoverState::Inside;
        let mut effects = Vec::new();
        if self.cursor_hidden {
            self.cursor_hidden = false;
            effects.push(ControlEffect::ShowCursor);
        }
        self.fade_in(&mut effects);
        self.idle_generation += 1;
        effects.push(ControlEffect::CancelIdleTimer);
        effects
    }

    pub fn pointer_left_controls(&mut self) -> Vec<ControlEffect> {
        self.hover = HoverState::Outside;
        vec![self.restart_idle_timer()]
    }

    /// Motion inside the control bar keeps it shown but never arms the idle
    /// timer; that only happens once the pointer leaves.
    pub fn pointer_moved_over_controls(&mut self) -> Vec<ControlEffect> {
        let mut effects = Vec::new();
        self.fade_in(&mut effects);
        effects
    }

    pub fn idle_elapsed(&mut self, ticket: TimerTicket) -> Vec<ControlEffect> {
        if ticket.0 != self.idle_generation {
            trace!("Ignoring stale idle timer");
            return Vec::new();
        }
        if self.hover == HoverState::Inside || self.control != ControlState::Visible {
            return Vec::new();
        }
        self.control = ControlState::FadingOut;
        self.target_opacity = 0.0;
        vec![ControlEffect::FadeOut]
    }

    /// The fade-out animation completed. Only hides if nothing asked for the
    /// controls back in the meantime.
    pub fn fade_out_finished(&mut self) -> Vec<ControlEffect> {
        if self.control == ControlState::FadingOut
            && self.hover == HoverState::Outside
            && self.target_opacity == 0.0
        {
            self.control = ControlState::Hidden;
            vec![ControlEffect::Hide]
        } else {
            Vec::new()
        }
    }

    pub fn cursor_idle_elapsed(&mut self, ticket: TimerTicket) -> Vec<ControlEffect> {
        if ticket.0 != self.cursor_generation
            || self.hover == HoverState::Inside
            || self.cursor_hidden
        {
            return Vec::new();
        }
        self.cursor_hidden = true;
        vec![ControlEffect::HideCursor]
    }

    /// A play request from a menu, drop or the command line.
    pub fn play_requested(&mut self) -> Vec<ControlEffect> {
        let mut effects = Vec::new();
        self.fade_in(&mut effects);
        if self.hover == HoverState::Outside {
            effects.push(self.restart_idle_timer());
        }
        effects
    }

    fn fade_in(&mut self, effects: &mut Vec<ControlEffect>) {
        if self.control == ControlState::Visible && self.target_opacity == 1.0 {
            return;
        }
        self.control = ControlState::Visible;
        self.target_opacity = 1.0;
        effects.push(ControlEffect::FadeIn);
    }

    fn restart_idle_timer(&mut self) -> ControlEffect {
        self.idle_generation += 1;
        ControlEffect::RestartIdleTimer(TimerTicket(self.idle_generation))
    }

    fn restart_cursor_timer(&mut self) -> ControlEffect {
        self.cursor_generation += 1;
        ControlEffect::RestartCursorTimer(TimerTicket(self.cursor_generation))
    }
}
