//! Main application loop.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{command_for_key, EditorCommand};
use crate::renderer::draw_frame;
use crate::status::StatusMessage;
use crate::terminal::{window_size, RawTerminal, TerminalInput};
use milli_core::{read_key, ByteSource, EditorSession, Key, Movement, SearchStep};
use std::io::{self, Write};
use std::path::Path;

/// Message shown when the editor starts.
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-F = find | Ctrl-Q = quit";

/// Main application state.
pub struct EditorApp<S: ByteSource, W: Write> {
    session: EditorSession,
    source: S,
    out: W,
    config: Config,
    status: StatusMessage,
    /// Ctrl-Q presses still needed to quit a dirty buffer.
    quit_times: u32,
}

impl<S: ByteSource, W: Write> EditorApp<S, W> {
    /// Creates a new application over an input source and an output sink.
    pub fn new(session: EditorSession, source: S, out: W, config: Config) -> Self {
        let quit_times = config.quit_times;
        Self {
            session,
            source,
            out,
            config,
            status: StatusMessage::default(),
            quit_times,
        }
    }

    /// Returns the editing session.
    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Returns the output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Returns the current status message text.
    pub fn status_text(&self) -> &str {
        &self.status.text
    }

    /// Sets the message bar text.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = StatusMessage::new(text);
    }

    /// Opens `path` into the session.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        self.session.open(path)?;
        Ok(())
    }

    /// Draws frames and handles keys until the user quits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.refresh_screen()?;
            if !self.process_keypress()? {
                log::info!("quit requested");
                return Ok(());
            }
        }
    }

    /// Scrolls the cursor into view and draws one frame.
    pub fn refresh_screen(&mut self) -> Result<()> {
        self.session.scroll();
        let message = self.status.visible_text(self.config.status_timeout);
        draw_frame(&mut self.out, &self.session, message, &self.config.welcome)?;
        Ok(())
    }

    fn next_key(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = read_key(&mut self.source).map_err(Error::from_read)? {
                return Ok(key);
            }
        }
    }

    /// Reads one key and applies it. Returns false when the editor should exit.
    pub fn process_keypress(&mut self) -> Result<bool> {
        let key = self.next_key()?;
        let Some(command) = command_for_key(key) else {
            self.quit_times = self.config.quit_times;
            return Ok(true);
        };

        if command == EditorCommand::Quit {
            if self.session.buffer().is_dirty() && self.quit_times > 0 {
                self.set_status(format!(
                    "WARNING! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
                    self.quit_times
                ));
                self.quit_times -= 1;
                return Ok(true);
            }
            return Ok(false);
        }
        self.quit_times = self.config.quit_times;

        match command {
            EditorCommand::Save => self.save()?,
            EditorCommand::Find => self.find()?,
            EditorCommand::InsertChar(ch) => self.session.insert_char(ch),
            EditorCommand::InsertNewline => self.session.insert_newline(),
            EditorCommand::DeleteBackward => self.session.delete_backward(),
            EditorCommand::DeleteForward => self.session.delete_forward(),
            EditorCommand::MoveLeft => self.session.move_cursor(Movement::Left),
            EditorCommand::MoveRight => self.session.move_cursor(Movement::Right),
            EditorCommand::MoveUp => self.session.move_cursor(Movement::Up),
            EditorCommand::MoveDown => self.session.move_cursor(Movement::Down),
            EditorCommand::MoveToLineStart => self.session.move_to_line_start(),
            EditorCommand::MoveToLineEnd => self.session.move_to_line_end(),
            EditorCommand::MovePageUp => self.session.page_up(),
            EditorCommand::MovePageDown => self.session.page_down(),
            EditorCommand::Quit => {}
        }
        Ok(true)
    }

    // ==================== Prompt ====================

    /// Reads a line in the message bar.
    ///
    /// Returns `None` if the user pressed ESC. `callback` sees the current
    /// input and the key after every keypress, including the final one.
    pub fn prompt<F>(
        &mut self,
        prefix: &str,
        suffix: &str,
        mut callback: F,
    ) -> Result<Option<String>>
    where
        F: FnMut(&mut EditorSession, &str, Key),
    {
        let mut input = String::new();
        loop {
            self.set_status(format!("{}{}{}", prefix, input, suffix));
            self.refresh_screen()?;

            let key = self.next_key()?;
            match key {
                Key::Backspace | Key::Delete => {
                    input.pop();
                }
                k if k.is_ctrl(b'h') => {
                    input.pop();
                }
                Key::Escape => {
                    self.set_status("");
                    callback(&mut self.session, &input, key);
                    return Ok(None);
                }
                Key::Char(b'\r') if !input.is_empty() => {
                    self.set_status("");
                    callback(&mut self.session, &input, key);
                    return Ok(Some(input));
                }
                Key::Char(ch) if ch.is_ascii() && !ch.is_ascii_control() => {
                    input.push(char::from(ch));
                }
                _ => {}
            }
            callback(&mut self.session, &input, key);
        }
    }

    // ==================== File Operations ====================

    fn save(&mut self) -> Result<()> {
        if self.session.file_name().is_none() {
            match self.prompt("Save as: ", " (ESC to cancel)", |_, _, _| {})? {
                Some(name) => self.session.set_file_name(name),
                None => {
                    self.set_status("Save aborted");
                    return Ok(());
                }
            }
        }

        match self.session.save() {
            Ok(bytes) => self.set_status(format!("{} bytes written to disk", bytes)),
            Err(err) => {
                log::error!("save failed: {}", err);
                self.set_status(format!("Can't save! I/O error: {}", err));
            }
        }
        Ok(())
    }

    // ==================== Search ====================

    fn find(&mut self) -> Result<()> {
        let view = self.session.save_view();
        let query = self.prompt(
            "Search: ",
            " (ESC to cancel | Arrows to navigate | Enter to accept)",
            |session, query, key| {
                let step = match key {
                    Key::Char(b'\r') | Key::Escape => SearchStep::Finish,
                    Key::ArrowRight | Key::ArrowDown => SearchStep::Next,
                    Key::ArrowLeft | Key::ArrowUp => SearchStep::Previous,
                    _ => SearchStep::Restart,
                };
                session.find_step(query.as_bytes(), step);
            },
        )?;

        if query.is_none() {
            self.session.restore_view(view);
        }
        Ok(())
    }
}

/// Runs the editor on the real terminal until the user quits.
pub fn run(path: Option<&Path>, config: Config) -> Result<()> {
    let (rows, cols) = window_size()?;
    let _terminal = RawTerminal::enable()?;
    let input = TerminalInput::spawn(config.input_timeout);
    let session = EditorSession::with_screen_size(rows, cols);
    let mut app = EditorApp::new(session, input, io::stdout(), config);

    if let Some(path) = path {
        app.open(path)?;
    }
    app.set_status(HELP_MESSAGE);
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use milli_core::{Highlight, ReadOutcome};
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Replays scripted input. `None` entries read as a timeout; running out
    /// reads as closed input.
    struct Script(VecDeque<Option<u8>>);

    impl Script {
        fn new(bytes: &[u8]) -> Self {
            Self(bytes.iter().copied().map(Some).collect())
        }

        fn pause(mut self) -> Self {
            self.0.push_back(None);
            self
        }

        fn then(mut self, bytes: &[u8]) -> Self {
            self.0.extend(bytes.iter().copied().map(Some));
            self
        }
    }

    impl ByteSource for Script {
        fn next_byte(&mut self) -> io::Result<ReadOutcome> {
            match self.0.pop_front() {
                Some(Some(byte)) => Ok(ReadOutcome::Byte(byte)),
                Some(None) => Ok(ReadOutcome::WouldBlock),
                None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "script done")),
            }
        }
    }

    fn app(text: &str, script: Script) -> EditorApp<Script, Vec<u8>> {
        let mut session = EditorSession::with_screen_size(10, 80);
        session.load_lines(Cursor::new(text.as_bytes().to_vec())).unwrap();
        EditorApp::new(session, script, Vec::new(), Config::default())
    }

    fn text(app: &EditorApp<Script, Vec<u8>>) -> String {
        String::from_utf8(app.session().buffer().rows_to_text()).unwrap()
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("milli-ui-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_typing_and_editing() {
        let mut app = app("", Script::new(b"ab\rc\x7f\x1b[Ax"));
        let err = app.run().unwrap_err();
        assert!(matches!(err, Error::InputClosed));
        assert_eq!(text(&app), "xab\n\n");
    }

    #[test]
    fn test_quit_clean_buffer() {
        let mut app = app("a", Script::new(&[0x11]));
        app.run().unwrap();
    }

    #[test]
    fn test_quit_dirty_buffer_needs_confirmation() {
        let mut app = app("a", Script::new(&[b'x', 0x11, 0x11, 0x11]));
        assert!(matches!(app.run(), Err(Error::InputClosed)));
        assert!(app.status_text().contains("1 more times"));

        let mut app = self::app("a", Script::new(&[b'x', 0x11, 0x11, 0x11, 0x11]));
        app.run().unwrap();
    }

    #[test]
    fn test_other_key_resets_quit_count() {
        let mut app = app("a", Script::new(&[b'x', 0x11, 0x11, b'y', 0x11]));
        assert!(matches!(app.run(), Err(Error::InputClosed)));
        assert!(app.status_text().contains("3 more times"));
    }

    #[test]
    fn test_find_moves_cursor_and_restores_highlight() {
        let script = Script::new(&[0x06]).then(b"two\r");
        let mut app = app("one\ntwo\nthree", script);
        let _ = app.run();
        assert_eq!(app.session().cursor().y, 1);
        assert!(app
            .session()
            .buffer()
            .rows()
            .iter()
            .all(|row| !row.highlight().contains(&Highlight::Match)));
    }

    #[test]
    fn test_find_cancel_restores_cursor() {
        let script = Script::new(&[0x06]).then(b"thr").then(b"\x1b").pause();
        let mut app = app("one\ntwo\nthree", script);
        let _ = app.run();
        assert_eq!(app.session().cursor().y, 0);
        assert_eq!(app.status_text(), "");
    }

    #[test]
    fn test_find_navigates_with_arrows() {
        let script = Script::new(&[0x06]).then(b"o").then(b"\x1b[B\r");
        let mut app = app("one\ntwo\nthree", script);
        let _ = app.run();
        assert_eq!(app.session().cursor().y, 1);
        assert_eq!(app.session().cursor().x, 2);
    }

    #[test]
    fn test_prompt_editing_keys() {
        let script = Script::new(b"ab\x7fc\x08d\r");
        let mut app = app("", script);
        let mut seen = Vec::new();
        let input = app
            .prompt("> ", "", |_, query, _| seen.push(query.to_string()))
            .unwrap();
        assert_eq!(input.as_deref(), Some("ad"));
        assert_eq!(seen.last().map(String::as_str), Some("ad"));
    }

    #[test]
    fn test_prompt_enter_on_empty_input_keeps_prompting() {
        let script = Script::new(b"\r\x1b").pause();
        let mut app = app("", script);
        let input = app.prompt("> ", "", |_, _, _| {}).unwrap();
        assert_eq!(input, None);
    }

    #[test]
    fn test_save_as_prompt_writes_file() {
        let path = temp_path("save-as.txt");
        let _ = std::fs::remove_file(&path);
        let name = path.to_string_lossy().into_owned();

        let script = Script::new(b"hi\x13").then(name.as_bytes()).then(b"\r");
        let mut app = app("", script);
        let _ = app.run();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi\n");
        assert_eq!(app.status_text(), "3 bytes written to disk");
        assert!(!app.session().buffer().is_dirty());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_as_cancelled() {
        let script = Script::new(b"hi\x13\x1b").pause();
        let mut app = app("", script);
        let _ = app.run();
        assert_eq!(app.status_text(), "Save aborted");
        assert!(app.session().file_name().is_none());
    }

    #[test]
    fn test_frames_written_to_output() {
        let mut app = app("", Script::new(b""));
        app.set_status(HELP_MESSAGE);
        let _ = app.run();
        let out = String::from_utf8_lossy(app.output()).into_owned();
        assert!(out.contains(HELP_MESSAGE));
        assert!(out.contains("Milli editor -- version"));
    }
}
