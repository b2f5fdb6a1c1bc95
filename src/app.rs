use gtk4::prelude::*;
use libadwaita as adw;
use libadwaita::prelude::*;
use adw::glib;
use std::cell::RefCell;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::APP_ID;
use crate::ui::MainWindow;

pub struct VidglassApp {
    app: adw::Application,
}

impl VidglassApp {
    /// `initial_reference` is played as soon as the engine is ready.
    pub fn new(config: Config, initial_reference: Option<String>) -> Self {
        let app = adw::Application::builder()
            .application_id(APP_ID)
            .flags(gtk4::gio::ApplicationFlags::NON_UNIQUE)
            .build();

        app.connect_startup(|_| {
            adw::StyleManager::default().set_color_scheme(adw::ColorScheme::ForceDark);

            let css_provider = gtk4::CssProvider::new();
            css_provider.load_from_string(include_str!("ui/style.css"));
            match gtk4::gdk::Display::default() {
                Some(display) => gtk4::style_context_add_provider_for_display(
                    &display,
                    &css_provider,
                    gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
                ),
                None => warn!("No default display, skipping stylesheet"),
            }
        });

        let initial_reference = RefCell::new(initial_reference);
        app.connect_activate(move |app| {
            info!("Application activated - Creating main window");
            let window = MainWindow::new(app, &config);
            window.present();

            if let Some(reference) = initial_reference.borrow_mut().take() {
                info!("Playing command line argument: {}", reference);
                window.request_play(&reference);
            }
        });

        Self { app }
    }

    pub fn run(&self) -> glib::ExitCode {
        info!("Running vidglass");
        // The media argument is consumed by us, not by GApplication
        let program = std::env::args_os()
            .next()
            .map(|arg| arg.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::constants::APP_NAME.to_string());
        self.app.run_with_args(&[program])
    }
}
