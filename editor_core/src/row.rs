//! A single line of text and its derived render form.
//!
//! Rows are byte oriented: a tab in `raw` expands to spaces in `render` up
//! to the next multiple of [`TAB_STOP`], every other byte is copied as is.
//! `highlight` carries one tag per rendered byte and is owned by the
//! highlighter.

use crate::syntax::Highlight;

/// Width of a tab stop in rendered columns.
pub const TAB_STOP: usize = 8;

/// One line of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Editable bytes, without a line terminator.
    raw: Vec<u8>,
    /// Display bytes after tab expansion.
    render: Vec<u8>,
    /// One tag per byte of `render`.
    pub(crate) highlight: Vec<Highlight>,
    /// Position of this row in its buffer.
    pub(crate) index: usize,
    /// Whether the row ends inside an unterminated block comment.
    pub(crate) comment_open: bool,
}

impl Row {
    /// Creates a row at `index` holding `raw`, with its render form built.
    ///
    /// Highlight tags start out empty; the owning buffer runs the
    /// highlighter once the row is in place.
    pub(crate) fn new(index: usize, raw: Vec<u8>) -> Self {
        let mut row = Self {
            raw,
            render: Vec::new(),
            highlight: Vec::new(),
            index,
            comment_open: false,
        };
        row.update_render();
        row
    }

    /// Returns the editable bytes.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Returns the rendered (tab expanded) bytes.
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Returns the highlight tags, one per rendered byte.
    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Returns the row's position in its buffer.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true if the row ends inside a block comment.
    pub fn has_open_comment(&self) -> bool {
        self.comment_open
    }

    /// Length of the raw content in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the row has no content.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Length of the rendered content in columns.
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    /// Converts a raw byte offset into a rendered column.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.raw
            .iter()
            .take(cx)
            .fold(0, |rx, &byte| advance_column(rx, byte))
    }

    /// Converts a rendered column into a raw byte offset.
    ///
    /// Returns the first offset whose accumulated column passes `rx`, or the
    /// row length if the column lies past the end of the row.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &byte) in self.raw.iter().enumerate() {
            cur_rx = advance_column(cur_rx, byte);
            if cur_rx > rx {
                return cx;
            }
        }
        self.raw.len()
    }

    /// Rebuilds `render` from `raw`.
    pub(crate) fn update_render(&mut self) {
        let tabs = self.raw.iter().filter(|&&b| b == b'\t').count();
        let mut render = Vec::with_capacity(self.raw.len() + tabs * (TAB_STOP - 1));
        for &byte in &self.raw {
            if byte == b'\t' {
                render.push(b' ');
                while render.len() % TAB_STOP != 0 {
                    render.push(b' ');
                }
            } else {
                render.push(byte);
            }
        }
        self.render = render;
    }

    /// Inserts `byte` at `at`, clamped to the row length.
    ///
    /// Returns false, leaving the row untouched, if the row could not grow.
    pub(crate) fn insert_byte(&mut self, at: usize, byte: u8) -> bool {
        if self.raw.try_reserve(1).is_err() {
            return false;
        }
        let at = at.min(self.raw.len());
        self.raw.insert(at, byte);
        self.update_render();
        true
    }

    /// Removes the byte at `at`. Returns false if `at` is out of range.
    pub(crate) fn remove_byte(&mut self, at: usize) -> bool {
        if at >= self.raw.len() {
            return false;
        }
        self.raw.remove(at);
        self.update_render();
        true
    }

    /// Appends `bytes` to the end of the row.
    ///
    /// Returns false, leaving the row untouched, if the row could not grow.
    pub(crate) fn append(&mut self, bytes: &[u8]) -> bool {
        if self.raw.try_reserve(bytes.len()).is_err() {
            return false;
        }
        self.raw.extend_from_slice(bytes);
        self.update_render();
        true
    }

    /// Cuts the row at `at` (clamped) and returns the bytes after the cut.
    pub(crate) fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.raw.len());
        let tail = self.raw.split_off(at);
        self.update_render();
        tail
    }
}

/// Column reached after drawing `byte` starting at column `rx`.
fn advance_column(rx: usize, byte: u8) -> usize {
    if byte == b'\t' {
        rx + (TAB_STOP - rx % TAB_STOP)
    } else {
        rx + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(text: &str) -> Row {
        Row::new(0, text.as_bytes().to_vec())
    }

    #[test]
    fn test_render_plain() {
        let r = row("hello");
        assert_eq!(r.render(), b"hello");
        assert_eq!(r.render_len(), 5);
    }

    #[test]
    fn test_render_expands_tabs_to_tab_stop() {
        let r = row("\tx");
        assert_eq!(r.render_len(), TAB_STOP + 1);
        assert!(r.render()[..TAB_STOP].iter().all(|&b| b == b' '));

        let r = row("ab\tc");
        assert_eq!(r.render(), b"ab      c");
    }

    #[test]
    fn test_cx_to_rx() {
        let r = row("a\tb");
        assert_eq!(r.cx_to_rx(0), 0);
        assert_eq!(r.cx_to_rx(1), 1);
        assert_eq!(r.cx_to_rx(2), 8);
        assert_eq!(r.cx_to_rx(3), 9);
        // Past the end walks only the bytes that exist.
        assert_eq!(r.cx_to_rx(10), 9);
    }

    #[test]
    fn test_rx_to_cx() {
        let r = row("a\tb");
        assert_eq!(r.rx_to_cx(0), 0);
        // Every column inside the tab maps back to the tab byte.
        for rx in 1..8 {
            assert_eq!(r.rx_to_cx(rx), 1);
        }
        assert_eq!(r.rx_to_cx(8), 2);
        assert_eq!(r.rx_to_cx(50), 3);
    }

    #[test]
    fn test_column_round_trip() {
        let r = row("\tint x;\t\t// y\tz");
        for cx in 0..=r.len() {
            assert_eq!(r.rx_to_cx(r.cx_to_rx(cx)), cx);
        }
        // Each column maps to the byte whose expansion covers it.
        for rx in 0..r.render_len() {
            let cx = r.rx_to_cx(rx);
            assert!(r.cx_to_rx(cx) <= rx);
            assert!(r.cx_to_rx(cx + 1) > rx);
        }
        assert_eq!(r.rx_to_cx(r.render_len()), r.len());
    }

    #[test]
    fn test_insert_byte_clamps() {
        let mut r = row("ab");
        assert!(r.insert_byte(99, b'c'));
        assert_eq!(r.raw(), b"abc");
        assert!(r.insert_byte(0, b'\t'));
        assert_eq!(r.render_len(), TAB_STOP + 3);
    }

    #[test]
    fn test_remove_byte_out_of_range() {
        let mut r = row("ab");
        assert!(!r.remove_byte(2));
        assert!(r.remove_byte(0));
        assert_eq!(r.raw(), b"b");
    }

    #[test]
    fn test_split_off() {
        let mut r = row("hello world");
        let tail = r.split_off(5);
        assert_eq!(r.raw(), b"hello");
        assert_eq!(r.render(), b"hello");
        assert_eq!(tail, b" world");
    }
}
