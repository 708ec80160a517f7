//! Main editor logic.

use crate::buffer::TextBuffer;
use crate::cursor::{Cursor, Movement, Viewport};
use crate::search::{Search, SearchMatch, SearchStep};
use crate::syntax::Syntax;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Cursor and scroll offsets captured before an interactive search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedView {
    cursor: Cursor,
    row_off: usize,
    col_off: usize,
}

/// The editing state of one open document.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    /// The text buffer.
    buffer: TextBuffer,
    /// The cursor.
    cursor: Cursor,
    /// Visible window.
    viewport: Viewport,
    /// Current file path, if any.
    file_name: Option<PathBuf>,
    /// Interactive search state.
    search: Search,
}

impl EditorSession {
    /// Creates a new empty session with a default screen size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty session for a text area of `rows` x `cols`.
    pub fn with_screen_size(rows: usize, cols: usize) -> Self {
        Self {
            viewport: Viewport::new(rows, cols),
            ..Self::default()
        }
    }

    /// Returns a reference to the buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns the cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resizes the text area.
    pub fn set_screen_size(&mut self, rows: usize, cols: usize) {
        self.viewport.rows = rows.max(1);
        self.viewport.cols = cols.max(1);
    }

    /// Returns the current file path.
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// Returns the name of the active file type, or "text".
    pub fn file_type(&self) -> &'static str {
        self.buffer.syntax().map_or("text", |syntax| syntax.file_type)
    }

    // ==================== File Operations ====================

    /// Binds the session to `path` and re-highlights with the matching syntax.
    pub fn set_file_name<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        let syntax = Syntax::for_filename(&path.to_string_lossy());
        self.clear_match_overlay();
        self.file_name = Some(path.to_path_buf());
        self.buffer.set_syntax(syntax);
    }

    /// Opens a file, replacing the current contents.
    ///
    /// A file that does not exist yet opens as an empty buffer bound to
    /// `path`, so the first save creates it.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => Some(file),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("{} does not exist, starting a new file", path.display());
                None
            }
            Err(err) => return Err(err),
        };

        self.buffer = TextBuffer::new();
        self.cursor = Cursor::new();
        self.viewport.row_off = 0;
        self.viewport.col_off = 0;
        self.search = Search::new();
        self.set_file_name(path);

        if let Some(file) = file {
            self.load_lines(BufReader::new(file))?;
        }
        log::info!("opened {} ({} lines)", path.display(), self.buffer.len());
        Ok(())
    }

    /// Appends every line of `reader` as a row, dropping line terminators.
    ///
    /// The buffer is clean afterwards.
    pub fn load_lines<R: BufRead>(&mut self, mut reader: R) -> io::Result<()> {
        self.clear_match_overlay();
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            while matches!(line.last(), Some(b'\n' | b'\r')) {
                line.pop();
            }
            self.buffer.insert_row(self.buffer.len(), &line);
        }
        self.buffer.mark_clean();
        Ok(())
    }

    /// Saves the buffer to the current file path and returns the bytes written.
    pub fn save(&mut self) -> io::Result<usize> {
        let Some(path) = self.file_name.clone() else {
            return Err(io::Error::new(io::ErrorKind::Other, "No file name set"));
        };
        let text = self.buffer.rows_to_text();
        let mut file = File::create(&path)?;
        file.write_all(&text)?;
        file.flush()?;
        self.buffer.mark_clean();
        log::info!("wrote {} bytes to {}", text.len(), path.display());
        Ok(text.len())
    }

    /// Saves the buffer to a new file path.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> io::Result<usize> {
        self.set_file_name(path);
        self.save()
    }

    // ==================== Text Editing ====================

    /// Inserts `ch` at the cursor.
    pub fn insert_char(&mut self, ch: u8) {
        self.clear_match_overlay();
        if self.cursor.y == self.buffer.len() {
            self.buffer.insert_row(self.buffer.len(), b"");
        }
        let before = self.buffer.row(self.cursor.y).map_or(0, |row| row.len());
        self.buffer.insert_char(self.cursor.y, self.cursor.x, ch);
        if self.buffer.row(self.cursor.y).map_or(0, |row| row.len()) > before {
            self.cursor.x += 1;
        }
    }

    /// Breaks the current row at the cursor.
    pub fn insert_newline(&mut self) {
        self.clear_match_overlay();
        if self.cursor.x == 0 {
            self.buffer.insert_row(self.cursor.y, b"");
        } else {
            self.buffer.split_at_cursor(self.cursor.y, self.cursor.x);
        }
        self.cursor.y += 1;
        self.cursor.x = 0;
    }

    /// Deletes the byte before the cursor, joining rows at a row start.
    pub fn delete_backward(&mut self) {
        self.clear_match_overlay();
        if self.cursor.y == self.buffer.len() {
            return;
        }
        if self.cursor.x == 0 && self.cursor.y == 0 {
            return;
        }

        if self.cursor.x > 0 {
            self.buffer.delete_char(self.cursor.y, self.cursor.x - 1);
            self.cursor.x -= 1;
        } else {
            let y = self.cursor.y;
            let Some(tail) = self.buffer.row(y).map(|row| row.raw().to_vec()) else {
                return;
            };
            let join_at = self.buffer.row(y - 1).map_or(0, |row| row.len());
            self.buffer.append_bytes(y - 1, &tail);
            if self.buffer.row(y - 1).map_or(0, |row| row.len()) != join_at + tail.len() {
                return;
            }
            self.buffer.delete_row(y);
            self.cursor.y -= 1;
            self.cursor.x = join_at;
        }
    }

    /// Deletes the byte under the cursor.
    pub fn delete_forward(&mut self) {
        let before = self.cursor;
        self.move_cursor(Movement::Right);
        if self.cursor != before {
            self.delete_backward();
        }
    }

    // ==================== Cursor Movement ====================

    /// Moves the cursor one step.
    pub fn move_cursor(&mut self, movement: Movement) {
        self.cursor.move_by(&self.buffer, movement);
    }

    /// Moves the cursor to the start of the current row.
    pub fn move_to_line_start(&mut self) {
        self.cursor.move_to_line_start();
    }

    /// Moves the cursor to the end of the current row.
    pub fn move_to_line_end(&mut self) {
        self.cursor.move_to_line_end(&self.buffer);
    }

    /// Jumps to the top of the screen, then up one screenful.
    pub fn page_up(&mut self) {
        self.cursor.y = self.viewport.row_off;
        for _ in 0..self.viewport.rows {
            self.move_cursor(Movement::Up);
        }
    }

    /// Jumps to the bottom of the screen, then down one screenful.
    pub fn page_down(&mut self) {
        self.cursor.y = (self.viewport.row_off + self.viewport.rows - 1).min(self.buffer.len());
        for _ in 0..self.viewport.rows {
            self.move_cursor(Movement::Down);
        }
    }

    /// Refreshes the rendered cursor column and scrolls it into view.
    pub fn scroll(&mut self) {
        self.cursor.snap_to_row(&self.buffer);
        self.cursor.update_rx(&self.buffer);
        self.viewport.scroll_to(&self.cursor);
    }

    // ==================== Search ====================

    /// Runs one step of an incremental search for `query`.
    ///
    /// On a match the cursor lands on it and the next [`scroll`](Self::scroll)
    /// brings the match row to the top of the screen.
    pub fn find_step(&mut self, query: &[u8], step: SearchStep) -> Option<SearchMatch> {
        let found = self.search.step(&mut self.buffer, query, step)?;
        self.cursor.y = found.row;
        self.cursor.x = self
            .buffer
            .row(found.row)
            .map_or(0, |row| row.rx_to_cx(found.offset));
        self.viewport.row_off = self.buffer.len();
        Some(found)
    }

    /// Puts back the tags under the current match before the buffer changes.
    ///
    /// The saved tags belong to one row at one index; an edit may move or
    /// re-lex that row.
    fn clear_match_overlay(&mut self) {
        if self.search.is_highlighting() {
            log::debug!("buffer edited during search, removing match overlay");
            self.search.restore(&mut self.buffer);
        }
    }

    /// Captures the cursor and scroll offsets.
    pub fn save_view(&self) -> SavedView {
        SavedView {
            cursor: self.cursor,
            row_off: self.viewport.row_off,
            col_off: self.viewport.col_off,
        }
    }

    /// Puts back a view captured by [`save_view`](Self::save_view).
    pub fn restore_view(&mut self, view: SavedView) {
        self.cursor = view.cursor;
        self.viewport.row_off = view.row_off;
        self.viewport.col_off = view.col_off;
        self.cursor.snap_to_row(&self.buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Highlight;
    use std::io::Cursor as IoCursor;

    fn session(lines: &[&str]) -> EditorSession {
        let mut session = EditorSession::new();
        session
            .load_lines(IoCursor::new(lines.join("\n").into_bytes()))
            .unwrap();
        session
    }

    fn text(session: &EditorSession) -> String {
        String::from_utf8(session.buffer().rows_to_text()).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("milli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_insert_into_empty_buffer() {
        let mut s = EditorSession::new();
        s.insert_char(b'h');
        s.insert_char(b'i');
        assert_eq!(text(&s), "hi\n");
        assert_eq!((s.cursor().x, s.cursor().y), (2, 0));
        assert!(s.buffer().is_dirty());
    }

    #[test]
    fn test_load_lines_strips_terminators() {
        let mut s = EditorSession::new();
        s.load_lines(IoCursor::new(b"a\r\nb\n\nc".to_vec())).unwrap();
        let rows: Vec<&[u8]> = s.buffer().rows().iter().map(|r| r.raw()).collect();
        assert_eq!(rows, [&b"a"[..], b"b", b"", b"c"]);
    }

    #[test]
    fn test_newline_splits_row() {
        let mut s = session(&["hello"]);
        s.move_cursor(Movement::Right);
        s.move_cursor(Movement::Right);
        s.insert_newline();
        assert_eq!(text(&s), "he\nllo\n");
        assert_eq!((s.cursor().x, s.cursor().y), (0, 1));
    }

    #[test]
    fn test_newline_at_row_start_inserts_above() {
        let mut s = session(&["abc"]);
        s.insert_newline();
        assert_eq!(text(&s), "\nabc\n");
        assert_eq!(s.cursor().y, 1);
    }

    #[test]
    fn test_delete_backward_joins_rows() {
        let mut s = session(&["ab", "cd"]);
        s.move_cursor(Movement::Down);
        s.delete_backward();
        assert_eq!(text(&s), "abcd\n");
        assert_eq!((s.cursor().x, s.cursor().y), (2, 0));
    }

    #[test]
    fn test_delete_backward_noops() {
        let mut s = session(&["ab"]);
        s.delete_backward();
        assert_eq!(text(&s), "ab\n");
        s.move_cursor(Movement::Down);
        assert_eq!(s.cursor().y, 1);
        s.delete_backward();
        assert_eq!(text(&s), "ab\n");
    }

    #[test]
    fn test_delete_forward() {
        let mut s = session(&["abc", "d"]);
        s.delete_forward();
        assert_eq!(text(&s), "bc\nd\n");
        s.move_to_line_end();
        s.delete_forward();
        assert_eq!(text(&s), "bcd\n");
    }

    #[test]
    fn test_typing_comment_opener_cascades() {
        let mut s = session(&["int a;", "int b;", "int c;"]);
        s.set_file_name("t.c");
        s.insert_char(b'/');
        s.insert_char(b'*');
        for row in s.buffer().rows() {
            assert!(row.highlight().iter().all(|&t| t == Highlight::BlockComment));
        }
        s.delete_backward();
        s.delete_backward();
        assert_eq!(s.buffer().row(2).unwrap().highlight()[0], Highlight::Keyword2);
    }

    #[test]
    fn test_file_type() {
        let mut s = EditorSession::new();
        assert_eq!(s.file_type(), "text");
        s.set_file_name("main.rs");
        assert_eq!(s.file_type(), "rust");
    }

    #[test]
    fn test_page_down_and_up() {
        let lines: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut s = session(&refs);
        s.set_screen_size(10, 80);
        s.page_down();
        s.scroll();
        assert_eq!(s.cursor().y, 19);
        assert_eq!(s.viewport().row_off, 10);
        s.page_up();
        s.scroll();
        assert_eq!(s.cursor().y, 0);
    }

    #[test]
    fn test_scroll_follows_tabs() {
        let mut s = session(&["\t\tx"]);
        s.set_screen_size(10, 10);
        s.move_to_line_end();
        s.scroll();
        assert_eq!(s.cursor().rx, 17);
        assert_eq!(s.viewport().col_off, 8);
    }

    #[test]
    fn test_find_step_moves_cursor_to_match() {
        let mut s = session(&["one", "\tneedle", "three"]);
        s.set_screen_size(1, 80);
        let m = s.find_step(b"needle", SearchStep::Restart).unwrap();
        assert_eq!(m.offset, 8);
        assert_eq!((s.cursor().x, s.cursor().y), (1, 1));
        s.scroll();
        assert_eq!(s.viewport().row_off, 1);
        assert!(s.find_step(b"needle", SearchStep::Finish).is_none());
        assert!(s.buffer().row(1).unwrap().highlight().iter().all(|&t| t != Highlight::Match));
    }

    #[test]
    fn test_edit_during_search_keeps_fresh_highlight() {
        let mut s = session(&["foo", "bar"]);
        s.set_file_name("t.c");
        s.find_step(b"foo", SearchStep::Restart).unwrap();
        assert_eq!(s.buffer().row(0).unwrap().highlight(), &[Highlight::Match; 3]);

        s.delete_forward();
        s.insert_char(b'1');
        assert_eq!(s.buffer().row(0).unwrap().raw(), b"1oo");
        s.find_step(b"foo", SearchStep::Finish);
        assert_eq!(
            s.buffer().row(0).unwrap().highlight(),
            &[Highlight::Number, Highlight::Normal, Highlight::Normal]
        );
    }

    #[test]
    fn test_restore_view_after_cancelled_search() {
        let mut s = session(&["a", "b", "needle"]);
        let view = s.save_view();
        s.find_step(b"needle", SearchStep::Restart);
        assert_eq!(s.cursor().y, 2);
        s.find_step(b"needle", SearchStep::Finish);
        s.restore_view(view);
        assert_eq!((s.cursor().x, s.cursor().y), (0, 0));
        assert_eq!(s.viewport().row_off, 0);
    }

    #[test]
    fn test_open_save_round_trip() {
        let path = temp_path("round-trip.c");
        std::fs::write(&path, "int x;\r\n/* c */\n").unwrap();

        let mut s = EditorSession::new();
        s.open(&path).unwrap();
        assert_eq!(s.buffer().len(), 2);
        assert_eq!(s.file_type(), "c");
        assert!(!s.buffer().is_dirty());

        s.insert_char(b'x');
        assert_eq!(s.save().unwrap(), 16);
        assert!(!s.buffer().is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "xint x;\n/* c */\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let path = temp_path("missing.txt");
        let _ = std::fs::remove_file(&path);
        let mut s = EditorSession::new();
        s.open(&path).unwrap();
        assert!(s.buffer().is_empty());
        assert_eq!(s.file_name(), Some(path.as_path()));
    }

    #[test]
    fn test_save_without_name_fails() {
        let mut s = session(&["a"]);
        assert!(s.save().is_err());
    }
}
