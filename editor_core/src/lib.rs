//! Milli Core - Pure text editor logic.
//!
//! This crate contains the row buffer, syntax highlighting, key decoding
//! and search without any dependency on a real terminal.

pub mod buffer;
pub mod cursor;
pub mod editor;
pub mod input;
pub mod row;
pub mod search;
pub mod syntax;

pub use buffer::TextBuffer;
pub use cursor::{Cursor, Movement, Viewport};
pub use editor::{EditorSession, SavedView};
pub use input::{ctrl_key, read_key, ByteSource, Key, ReadOutcome};
pub use row::{Row, TAB_STOP};
pub use search::{find, Search, SearchDirection, SearchMatch, SearchStep};
pub use syntax::{AnsiColor, Highlight, Syntax};
