//! Cursor position and viewport scrolling.

use crate::buffer::TextBuffer;

/// Direction of a single-step cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
}

/// Cursor position.
///
/// `x` is a byte offset into the raw row, `y` a row index. `y` may equal the
/// row count: the virtual line just past the end of the buffer. `rx` is the
/// rendered column for `x`, refreshed by [`Cursor::update_rx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub rx: usize,
}

impl Cursor {
    /// Creates a cursor at the top-left of the buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves one step, wrapping across row ends for Left and Right.
    pub fn move_by(&mut self, buffer: &TextBuffer, movement: Movement) {
        match movement {
            Movement::Left => {
                if self.x > 0 {
                    self.x -= 1;
                } else if self.y > 0 {
                    self.y -= 1;
                    self.x = row_len(buffer, self.y);
                }
            }
            Movement::Right => {
                if let Some(row) = buffer.row(self.y) {
                    if self.x < row.len() {
                        self.x += 1;
                    } else {
                        self.y += 1;
                        self.x = 0;
                    }
                }
            }
            Movement::Up => {
                self.y = self.y.saturating_sub(1);
            }
            Movement::Down => {
                if self.y < buffer.len() {
                    self.y += 1;
                }
            }
        }
        self.snap_to_row(buffer);
    }

    /// Moves to the start of the current row.
    pub fn move_to_line_start(&mut self) {
        self.x = 0;
    }

    /// Moves to the end of the current row.
    pub fn move_to_line_end(&mut self, buffer: &TextBuffer) {
        self.x = row_len(buffer, self.y);
    }

    /// Clamps `x` to the length of the row the cursor is on.
    pub fn snap_to_row(&mut self, buffer: &TextBuffer) {
        self.y = self.y.min(buffer.len());
        self.x = self.x.min(row_len(buffer, self.y));
    }

    /// Recomputes `rx` from `x`.
    pub fn update_rx(&mut self, buffer: &TextBuffer) {
        self.rx = buffer.row(self.y).map_or(0, |row| row.cx_to_rx(self.x));
    }
}

fn row_len(buffer: &TextBuffer, y: usize) -> usize {
    buffer.row(y).map_or(0, |row| row.len())
}

/// The visible window onto the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    pub row_off: usize,
    /// First visible rendered column.
    pub col_off: usize,
    /// Number of text rows on screen.
    pub rows: usize,
    /// Number of columns on screen.
    pub cols: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

impl Viewport {
    /// Creates a viewport of the given size at the top-left.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            row_off: 0,
            col_off: 0,
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Adjusts offsets so the cursor's row and rendered column are visible.
    pub fn scroll_to(&mut self, cursor: &Cursor) {
        if cursor.y < self.row_off {
            self.row_off = cursor.y;
        }
        if cursor.y >= self.row_off + self.rows {
            self.row_off = cursor.y + 1 - self.rows;
        }
        if cursor.rx < self.col_off {
            self.col_off = cursor.rx;
        }
        if cursor.rx >= self.col_off + self.cols {
            self.col_off = cursor.rx + 1 - self.cols;
        }
    }
}
