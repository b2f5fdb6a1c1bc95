pub mod media_reference;
pub mod playlist;

pub use media_reference::{
    display_name, normalize_reference, parse_uri_list, reference_from_arg,
    resolve_dropped_uris,
};
pub use playlist::Playlist;
