//! Editable text buffer.
//!
//! # Invariants
//! - `cursor` is a byte offset that always sits on a char boundary of `text`.

/// Plain-text content plus a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    /// Creates a buffer with the cursor at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces all content. The cursor is kept where possible and snapped
    /// back to the nearest char boundary otherwise.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = floor_boundary(&self.text, self.cursor);
    }

    /// Moves the cursor to `offset`, clamped and snapped to a char boundary.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = floor_boundary(&self.text, offset);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::TextBuffer;

    #[test]
    fn new_places_cursor_at_end() {
        let buffer = TextBuffer::new("crawl");
        assert_eq!(buffer.cursor(), 5);
    }

    #[test]
    fn cursor_snaps_to_char_boundary() {
        let mut buffer = TextBuffer::new("星の海");
        buffer.set_cursor(4);
        assert_eq!(buffer.cursor(), 3);
        buffer.set_cursor(1_000);
        assert_eq!(buffer.cursor(), buffer.text().len());
    }

    #[test]
    fn clear_resets_cursor() {
        let mut buffer = TextBuffer::new("crawl");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn replace_keeps_cursor_inside_new_text() {
        let mut buffer = TextBuffer::new("a long time ago");
        buffer.replace("é");
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(buffer.text(), "é");
    }
}
