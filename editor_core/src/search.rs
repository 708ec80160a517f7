//! Incremental search over rendered rows.
//!
//! A match is shown by overwriting its span with [`Highlight::Match`]. The
//! row's tags are snapshotted first and put back before the next step or
//! when the search ends, so at most one row carries a match overlay.

use crate::buffer::TextBuffer;
use crate::syntax::Highlight;

/// Direction in which rows are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// A match in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Row containing the match.
    pub row: usize,
    /// Offset of the match in the row's rendered bytes.
    pub offset: usize,
    /// Length of the match in rendered bytes.
    pub len: usize,
}

/// What the user asked the search to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// The query changed; search again from the top.
    Restart,
    /// Move to the next match.
    Next,
    /// Move to the previous match.
    Previous,
    /// The search is over (accepted or cancelled).
    Finish,
}

/// Finds the first row after `last_match` (in `direction`, wrapping) whose
/// rendered text contains `query`.
///
/// Without a previous match the scan runs forward from row 0.
pub fn find(
    buffer: &TextBuffer,
    query: &[u8],
    direction: SearchDirection,
    last_match: Option<usize>,
) -> Option<SearchMatch> {
    let rows = buffer.len();
    if query.is_empty() || rows == 0 {
        return None;
    }

    let (direction, mut current) = match last_match {
        Some(row) if row < rows => (direction, row),
        _ => (SearchDirection::Forward, rows - 1),
    };

    for _ in 0..rows {
        current = match direction {
            SearchDirection::Forward => (current + 1) % rows,
            SearchDirection::Backward => (current + rows - 1) % rows,
        };
        let render = buffer.row(current)?.render();
        if let Some(offset) = find_bytes(render, query) {
            return Some(SearchMatch {
                row: current,
                offset,
                len: query.len(),
            });
        }
    }
    None
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Tags saved from the row currently showing a match.
#[derive(Debug, Clone)]
struct SavedHighlight {
    row: usize,
    tags: Vec<Highlight>,
}

/// Search state kept between steps of one interactive search.
#[derive(Debug, Clone, Default)]
pub struct Search {
    last_match: Option<usize>,
    direction: SearchDirection,
    saved: Option<SavedHighlight>,
}

impl Search {
    /// Creates a new idle search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the row of the last match, if any.
    pub fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Returns true while a row carries a match overlay.
    pub fn is_highlighting(&self) -> bool {
        self.saved.is_some()
    }

    /// Runs one step of an interactive search.
    ///
    /// The previous overlay is always removed first. On a match, the span
    /// is tagged [`Highlight::Match`] and the match is returned.
    pub fn step(
        &mut self,
        buffer: &mut TextBuffer,
        query: &[u8],
        step: SearchStep,
    ) -> Option<SearchMatch> {
        self.restore(buffer);

        match step {
            SearchStep::Finish => {
                self.reset();
                return None;
            }
            SearchStep::Next => self.direction = SearchDirection::Forward,
            SearchStep::Previous => self.direction = SearchDirection::Backward,
            SearchStep::Restart => self.reset(),
        }

        let found = find(buffer, query, self.direction, self.last_match)?;
        self.last_match = Some(found.row);
        let overlay =
            buffer.overlay_highlight(found.row, found.offset, found.len, Highlight::Match);
        if let Some(tags) = overlay {
            self.saved = Some(SavedHighlight { row: found.row, tags });
        }
        Some(found)
    }

    /// Removes the current match overlay, if any.
    pub fn restore(&mut self, buffer: &mut TextBuffer) {
        if let Some(saved) = self.saved.take() {
            buffer.restore_highlight(saved.row, saved.tags);
        }
    }

    fn reset(&mut self) {
        self.last_match = None;
        self.direction = SearchDirection::Forward;
    }
}
