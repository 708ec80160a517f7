//! Terminal key decoding.
//!
//! Raw terminal input arrives as bytes. Most keys are a single byte; the
//! navigation keys arrive as escape sequences (`ESC [ A`, `ESC [ 3 ~`, ...).
//! [`read_key`] pulls bytes from a [`ByteSource`] and folds a sequence into
//! one [`Key`]. A sequence cut short by the source running dry is reported
//! as a plain [`Key::Escape`] rather than waited on.

use std::collections::VecDeque;
use std::io;

const ESC: u8 = 0x1b;
const DEL: u8 = 127;

/// Returns the byte produced by pressing Ctrl together with `key`.
pub const fn ctrl_key(key: u8) -> u8 {
    key & 0x1f
}

/// A logical key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Any byte without a dedicated meaning, including control bytes
    /// such as `\r`, `\t` and Ctrl combinations.
    Char(u8),
    Backspace,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Key {
    /// Maps a byte that is not part of an escape sequence.
    fn from_byte(byte: u8) -> Self {
        match byte {
            ESC => Self::Escape,
            DEL => Self::Backspace,
            other => Self::Char(other),
        }
    }

    /// Returns true for `Char(b)` where `b` is Ctrl + `key`.
    pub fn is_ctrl(self, key: u8) -> bool {
        self == Self::Char(ctrl_key(key))
    }
}

/// Result of asking a source for one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    Byte(u8),
    /// Nothing arrived within the source's read window.
    WouldBlock,
}

/// A non-blocking (or bounded-wait) supplier of raw input bytes.
pub trait ByteSource {
    /// Returns the next byte, [`ReadOutcome::WouldBlock`] if none is
    /// available yet, or an error if the source failed.
    fn next_byte(&mut self) -> io::Result<ReadOutcome>;
}

impl ByteSource for VecDeque<u8> {
    fn next_byte(&mut self) -> io::Result<ReadOutcome> {
        Ok(self.pop_front().map_or(ReadOutcome::WouldBlock, ReadOutcome::Byte))
    }
}

/// Progress through an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    SeenEsc,
    SeenBracket,
    SeenO,
    SeenDigit(u8),
}

/// Decodes one key from `source`.
///
/// Returns `Ok(None)` if no byte is available yet. Once an `ESC` has been
/// read, a missing follow-up byte or an unrecognized sequence yields
/// [`Key::Escape`]; the bytes examined so far are consumed.
pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Option<Key>> {
    let first = match source.next_byte()? {
        ReadOutcome::Byte(byte) => byte,
        ReadOutcome::WouldBlock => return Ok(None),
    };
    if first != ESC {
        return Ok(Some(Key::from_byte(first)));
    }

    let mut state = DecodeState::SeenEsc;
    loop {
        let byte = match source.next_byte()? {
            ReadOutcome::Byte(byte) => byte,
            ReadOutcome::WouldBlock => return Ok(Some(Key::Escape)),
        };

        let key = match (state, byte) {
            (DecodeState::SeenEsc, b'[') => {
                state = DecodeState::SeenBracket;
                continue;
            }
            (DecodeState::SeenEsc, b'O') => {
                state = DecodeState::SeenO;
                continue;
            }
            (DecodeState::SeenBracket, digit @ b'0'..=b'9') => {
                state = DecodeState::SeenDigit(digit);
                continue;
            }
            (DecodeState::SeenBracket, b'A') => Key::ArrowUp,
            (DecodeState::SeenBracket, b'B') => Key::ArrowDown,
            (DecodeState::SeenBracket, b'C') => Key::ArrowRight,
            (DecodeState::SeenBracket, b'D') => Key::ArrowLeft,
            (DecodeState::SeenBracket | DecodeState::SeenO, b'H') => Key::Home,
            (DecodeState::SeenBracket | DecodeState::SeenO, b'F') => Key::End,
            (DecodeState::SeenDigit(digit), b'~') => match digit {
                b'1' | b'7' => Key::Home,
                b'4' | b'8' => Key::End,
                b'3' => Key::Delete,
                b'5' => Key::PageUp,
                b'6' => Key::PageDown,
                _ => Key::Escape,
            },
            _ => Key::Escape,
        };
        return Ok(Some(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Option<Key> {
        let mut source: VecDeque<u8> = bytes.iter().copied().collect();
        read_key(&mut source).unwrap()
    }

    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut source: VecDeque<u8> = bytes.iter().copied().collect();
        let mut keys = Vec::new();
        while let Some(key) = read_key(&mut source).unwrap() {
            keys.push(key);
        }
        keys
    }

    #[test]
    fn test_no_data() {
        assert_eq!(decode(b""), None);
    }

    #[test]
    fn test_arrows() {
        assert_eq!(decode(b"\x1b[A"), Some(Key::ArrowUp));
        assert_eq!(decode(b"\x1b[B"), Some(Key::ArrowDown));
        assert_eq!(decode(b"\x1b[C"), Some(Key::ArrowRight));
        assert_eq!(decode(b"\x1b[D"), Some(Key::ArrowLeft));
    }

    #[test]
    fn test_tilde_sequences() {
        assert_eq!(decode(b"\x1b[1~"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[7~"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[4~"), Some(Key::End));
        assert_eq!(decode(b"\x1b[8~"), Some(Key::End));
        assert_eq!(decode(b"\x1b[3~"), Some(Key::Delete));
        assert_eq!(decode(b"\x1b[5~"), Some(Key::PageUp));
        assert_eq!(decode(b"\x1b[6~"), Some(Key::PageDown));
    }

    #[test]
    fn test_home_end_letter_forms() {
        assert_eq!(decode(b"\x1b[H"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[F"), Some(Key::End));
        assert_eq!(decode(b"\x1bOH"), Some(Key::Home));
        assert_eq!(decode(b"\x1bOF"), Some(Key::End));
    }

    #[test]
    fn test_lone_escape() {
        assert_eq!(decode(b"\x1b"), Some(Key::Escape));
    }

    #[test]
    fn test_truncated_sequences() {
        assert_eq!(decode(b"\x1b["), Some(Key::Escape));
        assert_eq!(decode(b"\x1b[3"), Some(Key::Escape));
        assert_eq!(decode(b"\x1bO"), Some(Key::Escape));
    }

    #[test]
    fn test_unrecognized_sequences() {
        assert_eq!(decode(b"\x1b[2~"), Some(Key::Escape));
        assert_eq!(decode(b"\x1b[3x"), Some(Key::Escape));
        assert_eq!(decode(b"\x1b[Z"), Some(Key::Escape));
        assert_eq!(decode(b"\x1bOA"), Some(Key::Escape));
        assert_eq!(decode(b"\x1bx"), Some(Key::Escape));
    }

    #[test]
    fn test_single_bytes() {
        assert_eq!(decode(b"a"), Some(Key::Char(b'a')));
        assert_eq!(decode(b"\t"), Some(Key::Char(b'\t')));
        assert_eq!(decode(b"\r"), Some(Key::Char(b'\r')));
        assert_eq!(decode(&[127]), Some(Key::Backspace));
        assert_eq!(decode(&[ctrl_key(b'q')]), Some(Key::Char(17)));
    }

    #[test]
    fn test_ctrl_key() {
        assert_eq!(ctrl_key(b'q'), 0x11);
        assert_eq!(ctrl_key(b'h'), 0x08);
        assert!(Key::Char(0x13).is_ctrl(b's'));
        assert!(!Key::Char(b's').is_ctrl(b's'));
    }

    #[test]
    fn test_stream_of_keys() {
        let keys = decode_all(b"ab\x1b[Ac\x1b[3~\x7f");
        assert_eq!(
            keys,
            [
                Key::Char(b'a'),
                Key::Char(b'b'),
                Key::ArrowUp,
                Key::Char(b'c'),
                Key::Delete,
                Key::Backspace,
            ]
        );
    }

    struct FailingSource;

    impl ByteSource for FailingSource {
        fn next_byte(&mut self) -> io::Result<ReadOutcome> {
            Err(io::Error::new(io::ErrorKind::Other, "read failed"))
        }
    }

    #[test]
    fn test_read_error_propagates() {
        assert!(read_key(&mut FailingSource).is_err());
    }
}
