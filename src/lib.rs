// Playback logic is toolkit independent; the GTK front end and the libmpv
// adapter sit behind the `gtk` and `mpv` features.

pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod player;
pub mod utils;

#[cfg(feature = "gtk")]
pub mod app;
#[cfg(feature = "gtk")]
pub mod ui;
