//! Row-oriented text buffer.
//!
//! The buffer owns every structural edit. Each edit rebuilds the render form
//! of the rows it touches and re-lexes them, continuing into following rows
//! only while a row's block comment exit state keeps changing.

use crate::row::Row;
use crate::syntax::{highlight_row, Highlight, Syntax};

/// An ordered collection of rows with a dirty counter.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rows: Vec<Row>,
    /// Mutations since the last save. Zero means clean.
    dirty: usize,
    syntax: Option<&'static Syntax>,
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clean buffer from lines of text.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut buffer = Self::new();
        for line in lines {
            buffer.insert_row(buffer.len(), line.as_ref());
        }
        buffer.mark_clean();
        buffer
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the buffer has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `at`, if it exists.
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// Returns all rows in document order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of unsaved mutations.
    pub fn dirty(&self) -> usize {
        self.dirty
    }

    /// Returns true if there are unsaved mutations.
    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Marks the buffer as saved.
    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    /// Returns the active syntax, if any.
    pub fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    /// Activates a syntax and re-lexes every row.
    pub fn set_syntax(&mut self, syntax: Option<&'static Syntax>) {
        log::debug!(
            "Syntax set to {}",
            syntax.map_or("none", |s| s.file_type)
        );
        self.syntax = syntax;
        let mut comment_open = false;
        for row in &mut self.rows {
            highlight_row(row, syntax, comment_open);
            comment_open = row.comment_open;
        }
    }

    // ==================== Structural edits ====================

    /// Inserts a new row holding `bytes` at `at`.
    ///
    /// Does nothing if `at` is past the end of the buffer.
    pub fn insert_row(&mut self, at: usize, bytes: &[u8]) {
        if at > self.rows.len() {
            log::trace!("insert_row({at}) out of range");
            return;
        }
        if self.rows.try_reserve(1).is_err() {
            log::error!("Out of memory inserting row {at}");
            return;
        }

        let mut row = Row::new(at, bytes.to_vec());
        // Start from the exit state the following row was lexed against, so
        // the cascade runs exactly when that assumption breaks.
        row.comment_open = self.exit_state_before(at);
        self.rows.insert(at, row);
        for row in &mut self.rows[at + 1..] {
            row.index += 1;
        }

        self.rehighlight_from(at);
        self.dirty += 1;
        self.check_indices();
    }

    /// Removes the row at `at`. Does nothing if `at` is out of range.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            log::trace!("delete_row({at}) out of range");
            return;
        }

        let removed = self.rows.remove(at);
        for row in &mut self.rows[at..] {
            row.index -= 1;
        }

        if at < self.rows.len() && removed.comment_open != self.exit_state_before(at) {
            self.rehighlight_from(at);
        }
        self.dirty += 1;
        self.check_indices();
    }

    /// Inserts `ch` into row `row` at byte offset `at` (clamped to the row).
    pub fn insert_char(&mut self, row: usize, at: usize, ch: u8) {
        let Some(target) = self.rows.get_mut(row) else {
            return;
        };
        if !target.insert_byte(at, ch) {
            log::error!("Out of memory growing row {row}");
            return;
        }
        self.rehighlight_from(row);
        self.dirty += 1;
    }

    /// Removes the byte at offset `at` of row `row`.
    pub fn delete_char(&mut self, row: usize, at: usize) {
        let Some(target) = self.rows.get_mut(row) else {
            return;
        };
        if !target.remove_byte(at) {
            return;
        }
        self.rehighlight_from(row);
        self.dirty += 1;
    }

    /// Appends `bytes` to the end of row `row`.
    pub fn append_bytes(&mut self, row: usize, bytes: &[u8]) {
        let Some(target) = self.rows.get_mut(row) else {
            return;
        };
        if !target.append(bytes) {
            log::error!("Out of memory growing row {row}");
            return;
        }
        self.rehighlight_from(row);
        self.dirty += 1;
    }

    /// Splits row `row` at byte offset `cx`: the bytes from `cx` on move to
    /// a new row inserted right below.
    pub fn split_at_cursor(&mut self, row: usize, cx: usize) {
        let Some(target) = self.rows.get(row) else {
            return;
        };
        let cx = cx.min(target.len());
        let tail = target.raw()[cx..].to_vec();

        let before = self.rows.len();
        self.insert_row(row + 1, &tail);
        if self.rows.len() == before {
            return;
        }

        self.rows[row].split_off(cx);
        self.rehighlight_from(row);
    }

    /// Serializes every row followed by a `\n`.
    pub fn rows_to_text(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|row| row.len() + 1).sum();
        let mut text = Vec::with_capacity(total);
        for row in &self.rows {
            text.extend_from_slice(row.raw());
            text.push(b'\n');
        }
        text
    }

    // ==================== Highlighting ====================

    /// Overwrites `len` tags of row `row` starting at rendered column
    /// `start` with `tag`, returning the row's previous tags.
    pub(crate) fn overlay_highlight(
        &mut self,
        row: usize,
        start: usize,
        len: usize,
        tag: Highlight,
    ) -> Option<Vec<Highlight>> {
        let target = self.rows.get_mut(row)?;
        let snapshot = target.highlight.clone();
        let end = (start + len).min(target.highlight.len());
        let start = start.min(end);
        target.highlight[start..end].fill(tag);
        Some(snapshot)
    }

    /// Puts back tags previously returned by
    /// [`overlay_highlight`](Self::overlay_highlight).
    pub(crate) fn restore_highlight(&mut self, row: usize, snapshot: Vec<Highlight>) {
        let Some(target) = self.rows.get_mut(row) else {
            return;
        };
        if target.highlight.len() == snapshot.len() {
            target.highlight = snapshot;
        } else {
            // The row was edited since the snapshot; lex it afresh.
            self.rehighlight_from(row);
        }
    }

    /// Exit state of the row preceding `at`.
    fn exit_state_before(&self, at: usize) -> bool {
        at > 0 && self.rows[at - 1].comment_open
    }

    /// Re-lexes row `start` and every following row whose entry state
    /// changed as a result.
    fn rehighlight_from(&mut self, start: usize) {
        let mut at = start;
        while at < self.rows.len() {
            let comment_open_before = self.exit_state_before(at);
            let changed = highlight_row(&mut self.rows[at], self.syntax, comment_open_before);
            at += 1;
            if !changed {
                break;
            }
        }
        if at > start + 1 {
            log::debug!("Highlight cascade from row {start} touched {} rows", at - start);
        }
    }

    fn check_indices(&self) {
        debug_assert!(
            self.rows.iter().enumerate().all(|(i, row)| row.index == i),
            "row index out of sync with position"
        );
    }
}
