// Playback and control-bar tuning constants

pub const APP_ID: &str = "io.github.vidglass";
pub const APP_NAME: &str = "vidglass";

// === Engine ===
pub const DEFAULT_HWDEC: &str = "auto-safe";
pub const DEFAULT_VOLUME: u8 = 50;

// Observed property reply ids
pub const OBSERVE_TIME_POS: u64 = 1;
pub const OBSERVE_DURATION: u64 = 2;

// === Control bar ===
pub const SEEK_SLIDER_MAX: f64 = 1000.0;
pub const VOLUME_SLIDER_MAX: f64 = 100.0;
pub const CONTROL_BAR_MARGIN: i32 = 40;
pub const CONTROL_BAR_WIDTH_RATIO: f64 = 0.40;

pub const CONTROLS_HIDE_DELAY_MS: u64 = 2000;
pub const CURSOR_HIDE_DELAY_MS: u64 = 2000;
pub const CONTROLS_FADE_IN_MS: u32 = 200;
pub const CONTROLS_FADE_OUT_MS: u32 = 300;

// Time readout switches to hh:mm:ss at one hour of total duration
pub const LONG_MEDIA_THRESHOLD_SECS: f64 = 3600.0;

// === Window ===
pub const DEFAULT_WINDOW_WIDTH: i32 = 1280;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 720;

pub const VIDEO_FILE_PATTERNS: &[&str] = &[
    "*.mp4", "*.mkv", "*.avi", "*.mov", "*.webm", "*.flv", "*.wmv", "*.m4v", "*.mpg", "*.mpeg",
    "*.ts",
];
