use gtk4::{self, gio, prelude::*};
use libadwaita as adw;
use libadwaita::prelude::*;
use tracing::{debug, info};

use crate::constants::VIDEO_FILE_PATTERNS;
use crate::models::normalize_reference;

fn video_filters() -> (gio::ListStore, gtk4::FileFilter) {
    let videos = gtk4::FileFilter::new();
    videos.set_name(Some("Video Files"));
    for pattern in VIDEO_FILE_PATTERNS {
        videos.add_pattern(pattern);
    }

    let all = gtk4::FileFilter::new();
    all.set_name(Some("All Files"));
    all.add_pattern("*");

    let filters = gio::ListStore::new::<gtk4::FileFilter>();
    filters.append(&videos);
    filters.append(&all);
    (filters, videos)
}

/// Ask for a local video file; `on_selected` receives its path.
pub fn choose_video_file<F: Fn(String) + 'static>(parent: &impl IsA<gtk4::Window>, on_selected: F) {
    let (filters, videos) = video_filters();
    let dialog = gtk4::FileDialog::builder()
        .title("Open Video")
        .modal(true)
        .filters(&filters)
        .default_filter(&videos)
        .build();

    if let Some(home) = dirs::home_dir() {
        dialog.set_initial_folder(Some(&gio::File::for_path(home)));
    }

    dialog.open(Some(parent), gio::Cancellable::NONE, move |result| match result {
        Ok(file) => {
            if let Some(path) = file.path() {
                info!("Selected file: {:?}", path);
                on_selected(path.to_string_lossy().into_owned());
            }
        }
        Err(e) => debug!("File dialog dismissed: {}", e),
    });
}

/// Ask for a stream URL; only non-blank input is accepted.
pub fn ask_for_url<F: Fn(String) + 'static>(parent: &impl IsA<gtk4::Widget>, on_accepted: F) {
    let dialog = adw::AlertDialog::new(Some("Open URL"), Some("Enter the address of a video or stream"));
    dialog.add_response("cancel", "_Cancel");
    dialog.add_response("open", "_Open");
    dialog.set_response_appearance("open", adw::ResponseAppearance::Suggested);
    dialog.set_default_response(Some("open"));
    dialog.set_close_response("cancel");

    let entry = gtk4::Entry::builder()
        .placeholder_text("https://")
        .activates_default(true)
        .build();
    dialog.set_extra_child(Some(&entry));

    dialog.connect_response(None, move |_, response| {
        if response != "open" {
            return;
        }
        match normalize_reference(&entry.text()) {
            Some(url) => on_accepted(url),
            None => debug!("Ignoring empty URL"),
        }
    });

    dialog.present(Some(parent));
}
