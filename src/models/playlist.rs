/// Ordered list of media references with a cursor on the entry being played.
///
/// Entries keep insertion order. The cursor is `None` only while the list is
/// empty; `next`/`prev` wrap around at both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    entries: Vec<String>,
    current_index: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&str> {
        self.current_index
            .and_then(|index| self.entries.get(index))
            .map(String::as_str)
    }

    /// Make `reference` the current entry, appending it unless it already is
    /// the current one. Returns true when a new entry was appended.
    pub fn select_or_append(&mut self, reference: &str) -> bool {
        if self.current() == Some(reference) {
            return false;
        }

        self.entries.push(reference.to_string());
        self.current_index = Some(self.entries.len() - 1);
        true
    }

    /// Move the cursor forward, wrapping to the first entry.
    pub fn next(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        let next = match self.current_index {
            Some(index) if index + 1 < self.entries.len() => index + 1,
            _ => 0,
        };
        self.current_index = Some(next);
        self.current()
    }

    /// Move the cursor backward, wrapping to the last entry.
    pub fn prev(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        let prev = match self.current_index {
            Some(index) if index > 0 => index - 1,
            _ => self.entries.len() - 1,
        };
        self.current_index = Some(prev);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist_of(items: &[&str]) -> Playlist {
        let mut playlist = Playlist::new();
        for item in items {
            playlist.select_or_append(item);
        }
        playlist
    }

    #[test]
    fn test_empty_playlist_navigation_is_noop() {
        let mut playlist = Playlist::new();
        assert_eq!(playlist.next(), None);
        assert_eq!(playlist.prev(), None);
        assert_eq!(playlist.current_index(), None);
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_append_moves_cursor_to_new_entry() {
        let playlist = playlist_of(&["a.mkv", "b.mkv"]);
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.current_index(), Some(1));
        assert_eq!(playlist.current(), Some("b.mkv"));
    }

    #[test]
    fn test_same_reference_twice_is_idempotent() {
        let mut playlist = playlist_of(&["a.mkv"]);
        assert!(!playlist.select_or_append("a.mkv"));
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.current_index(), Some(0));
    }

    #[test]
    fn test_reference_equal_to_older_entry_is_appended_again() {
        // Only the current entry is deduplicated
        let mut playlist = playlist_of(&["a.mkv", "b.mkv"]);
        assert!(playlist.select_or_append("a.mkv"));
        assert_eq!(playlist.entries(), ["a.mkv", "b.mkv", "a.mkv"]);
        assert_eq!(playlist.current_index(), Some(2));
    }

    #[test]
    fn test_next_wraps_to_start() {
        let mut playlist = playlist_of(&["a", "b", "c"]);
        assert_eq!(playlist.current_index(), Some(2));
        assert_eq!(playlist.next(), Some("a"));
        assert_eq!(playlist.current_index(), Some(0));
    }

    #[test]
    fn test_prev_wraps_to_end() {
        let mut playlist = playlist_of(&["a", "b", "c"]);
        playlist.next();
        assert_eq!(playlist.current_index(), Some(0));
        assert_eq!(playlist.prev(), Some("c"));
        assert_eq!(playlist.current_index(), Some(2));
    }

    #[test]
    fn test_single_entry_wraps_onto_itself() {
        let mut playlist = playlist_of(&["only"]);
        assert_eq!(playlist.next(), Some("only"));
        assert_eq!(playlist.prev(), Some("only"));
        assert_eq!(playlist.current_index(), Some(0));
    }
}
