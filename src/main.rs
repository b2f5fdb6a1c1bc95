use gtk4::glib;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vidglass::app::VidglassApp;
use vidglass::config::Config;
use vidglass::models::reference_from_arg;

fn main() -> glib::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vidglass=info")),
        )
        .init();

    info!("Starting vidglass");

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {:#}, using defaults", e);
        Config::default()
    });

    // Optional single argument: a path or URL to start playing
    let initial_reference = std::env::args_os()
        .nth(1)
        .and_then(|arg| reference_from_arg(&arg));

    VidglassApp::new(config, initial_reference).run()
}
