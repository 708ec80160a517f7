//! Highlight tags and their fixed color mapping.

/// Classification attached to each rendered byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    /// Plain text.
    #[default]
    Normal,
    /// Single-line comment.
    Comment,
    /// Block (multi-line) comment.
    BlockComment,
    /// Primary keyword (control flow, declarations).
    Keyword1,
    /// Secondary keyword (types).
    Keyword2,
    /// String or character literal.
    String,
    /// Numeric literal.
    Number,
    /// Current search match.
    Match,
}

/// The eight standard terminal foreground colors used by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnsiColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiColor {
    /// Returns the SGR foreground code for this color.
    pub fn sgr_code(self) -> u8 {
        match self {
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
        }
    }
}

impl Highlight {
    /// Returns the color this tag is drawn with.
    pub fn color(self) -> AnsiColor {
        match self {
            Self::Number => AnsiColor::Red,
            Self::Keyword2 => AnsiColor::Green,
            Self::Keyword1 => AnsiColor::Yellow,
            Self::Match => AnsiColor::Blue,
            Self::String => AnsiColor::Magenta,
            Self::Comment | Self::BlockComment => AnsiColor::Cyan,
            Self::Normal => AnsiColor::White,
        }
    }
}
