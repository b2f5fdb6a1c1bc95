use std::ffi::OsStr;
use std::path::Path;
use url::Url;

/// Trim user input; blank input is not a media reference.
pub fn normalize_reference(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reference from a command-line argument. Paths that are not valid UTF-8
/// are converted lossily rather than rejected.
pub fn reference_from_arg(arg: &OsStr) -> Option<String> {
    normalize_reference(&arg.to_string_lossy())
}

/// Lines of a `text/uri-list` payload, without blanks and `#` comments.
pub fn parse_uri_list(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Pick the reference to play from a drop payload.
///
/// Only the first URI is used. `file://` URIs become local paths, anything
/// else is handed to the engine as a remote reference.
pub fn resolve_dropped_uris<I, S>(uris: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let first = uris
        .into_iter()
        .find_map(|uri| normalize_reference(uri.as_ref()))?;

    match Url::parse(&first) {
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(()) => Some(first),
        },
        _ => Some(first),
    }
}

/// Short human-readable name for a reference, used in the window title.
pub fn display_name(reference: &str) -> String {
    if let Ok(url) = Url::parse(reference)
        && url.scheme() != "file"
        && url.has_host()
    {
        let segment = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(str::to_string);
        return segment.unwrap_or_else(|| url.host_str().unwrap_or(reference).to_string());
    }

    Path::new(reference)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| reference.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rejects_blank_input() {
        assert_eq!(normalize_reference("   "), None);
        assert_eq!(normalize_reference(""), None);
        assert_eq!(
            normalize_reference("  https://example.com/a.mp4\n"),
            Some("https://example.com/a.mp4".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_argument_is_converted_lossily() {
        use std::os::unix::ffi::OsStrExt;

        let arg = OsStr::from_bytes(b"/tmp/clip\xff.mkv");
        assert_eq!(
            reference_from_arg(arg).as_deref(),
            Some("/tmp/clip\u{FFFD}.mkv")
        );
    }

    #[test]
    fn test_argument_is_trimmed() {
        assert_eq!(
            reference_from_arg(OsStr::new(" /videos/a.mkv ")).as_deref(),
            Some("/videos/a.mkv")
        );
        assert_eq!(reference_from_arg(OsStr::new("  ")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_uri_resolves_to_local_path() {
        let reference = resolve_dropped_uris(["file:///home/user/My%20Videos/clip.mkv"]);
        assert_eq!(reference.as_deref(), Some("/home/user/My Videos/clip.mkv"));
    }

    #[test]
    fn test_remote_uri_falls_back_to_url() {
        let reference = resolve_dropped_uris(["https://example.com/stream.m3u8"]);
        assert_eq!(reference.as_deref(), Some("https://example.com/stream.m3u8"));
    }

    #[cfg(unix)]
    #[test]
    fn test_first_uri_wins() {
        let reference = resolve_dropped_uris(["file:///tmp/first.mp4", "file:///tmp/second.mp4"]);
        assert_eq!(reference.as_deref(), Some("/tmp/first.mp4"));
    }

    #[test]
    fn test_uri_list_skips_comments_and_blank_lines() {
        let payload = "# dragged from browser\r\n\r\nhttps://example.com/a.webm\r\nhttps://example.com/b.webm\r\n";
        let uris: Vec<&str> = parse_uri_list(payload).collect();
        assert_eq!(uris, ["https://example.com/a.webm", "https://example.com/b.webm"]);
        assert_eq!(
            resolve_dropped_uris(parse_uri_list(payload)).as_deref(),
            Some("https://example.com/a.webm")
        );
    }

    #[test]
    fn test_empty_payload_has_no_reference() {
        assert_eq!(resolve_dropped_uris(Vec::<String>::new()), None);
        assert_eq!(resolve_dropped_uris(parse_uri_list("# nothing\n")), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("/videos/holiday.mp4"), "holiday.mp4");
        assert_eq!(display_name("https://example.com/live/index.m3u8"), "index.m3u8");
        assert_eq!(display_name("https://example.com/"), "example.com");
    }
}
