use gtk4::{self, gdk, gio, glib, glib::clone, prelude::*};
use libadwaita as adw;
use libadwaita::prelude::*;
use tracing::{debug, info};

use super::dialogs;
use super::video_surface::VideoSurface;
use crate::config::Config;
use crate::constants::APP_NAME;

/// Top-level window: menu bar above the video surface.
pub struct MainWindow {
    window: adw::ApplicationWindow,
    surface: VideoSurface,
}

fn build_menu() -> gio::Menu {
    let file_menu = gio::Menu::new();

    let open_section = gio::Menu::new();
    open_section.append(Some("Open File…"), Some("win.open"));
    open_section.append(Some("Open URL…"), Some("win.open-url"));
    file_menu.append_section(None, &open_section);

    let quit_section = gio::Menu::new();
    quit_section.append(Some("Quit"), Some("win.quit"));
    file_menu.append_section(None, &quit_section);

    let menu = gio::Menu::new();
    menu.append_submenu(Some("_File"), &file_menu);
    menu
}

impl MainWindow {
    pub fn new(app: &adw::Application, config: &Config) -> Self {
        let surface = VideoSurface::new(&config.playback, &config.interface);

        let menubar = gtk4::PopoverMenuBar::from_model(Some(&build_menu()));

        let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
        content.append(&menubar);
        content.append(surface.widget());

        let window = adw::ApplicationWindow::builder()
            .application(app)
            .title(APP_NAME)
            .default_width(config.interface.window_width)
            .default_height(config.interface.window_height)
            .content(&content)
            .build();

        let main_window = Self { window, surface };
        main_window.setup_actions(app);
        main_window.setup_shortcuts();

        main_window.window.connect_fullscreened_notify(move |window| {
            menubar.set_visible(!window.is_fullscreen());
        });

        let window = main_window.window.clone();
        main_window.surface.connect_now_playing(clone!(
            #[weak]
            window,
            move |title| window.set_title(Some(title))
        ));

        let surface = main_window.surface.clone();
        main_window.window.connect_close_request(move |_| {
            info!("Window closing");
            surface.shutdown();
            glib::Propagation::Proceed
        });

        main_window
    }

    pub fn present(&self) {
        self.window.present();
    }

    pub fn request_play(&self, reference: &str) {
        self.surface.request_play(reference);
    }

    fn setup_actions(&self, app: &adw::Application) {
        let window = self.window.clone();

        let open_action = gio::SimpleAction::new("open", None);
        let surface = self.surface.clone();
        open_action.connect_activate(clone!(
            #[weak]
            window,
            move |_, _| {
                let surface = surface.clone();
                dialogs::choose_video_file(&window, move |path| surface.request_play(&path));
            }
        ));
        self.window.add_action(&open_action);

        let open_url_action = gio::SimpleAction::new("open-url", None);
        let surface = self.surface.clone();
        open_url_action.connect_activate(clone!(
            #[weak]
            window,
            move |_, _| {
                let surface = surface.clone();
                dialogs::ask_for_url(&window, move |url| surface.request_play(&url));
            }
        ));
        self.window.add_action(&open_url_action);

        let quit_action = gio::SimpleAction::new("quit", None);
        quit_action.connect_activate(clone!(
            #[weak]
            window,
            move |_, _| window.close()
        ));
        self.window.add_action(&quit_action);

        app.set_accels_for_action("win.open", &["<primary>o"]);
        app.set_accels_for_action("win.open-url", &["<primary>u"]);
        app.set_accels_for_action("win.quit", &["<primary>q"]);
    }

    fn setup_shortcuts(&self) {
        let key_controller = gtk4::EventControllerKey::new();
        let surface = self.surface.clone();

        key_controller.connect_key_pressed(move |controller, keyval, _keycode, _state| {
            let Some(window) = controller.widget().and_downcast::<gtk4::Window>() else {
                return glib::Propagation::Proceed;
            };

            match keyval {
                gdk::Key::f | gdk::Key::F => {
                    window.set_fullscreened(!window.is_fullscreen());
                    glib::Propagation::Stop
                }
                // Escape only ever leaves fullscreen
                gdk::Key::Escape => {
                    if window.is_fullscreen() {
                        window.unfullscreen();
                        glib::Propagation::Stop
                    } else {
                        glib::Propagation::Proceed
                    }
                }
                gdk::Key::space => {
                    debug!("Space pressed, toggling pause");
                    surface.toggle_pause();
                    glib::Propagation::Stop
                }
                _ => glib::Propagation::Proceed,
            }
        });

        self.window.add_controller(key_controller);
    }
}
