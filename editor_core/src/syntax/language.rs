//! Syntax definitions and filename based selection.

use bitflags::bitflags;

bitflags! {
    /// Optional lexical classes a syntax highlights.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HighlightFlags: u8 {
        /// Highlight numeric literals.
        const NUMBERS = 0b0000_0001;
        /// Highlight string and character literals.
        const STRINGS = 0b0000_0010;
    }
}

/// Which keyword highlight a keyword receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordClass {
    /// Tagged [`Highlight::Keyword1`](super::Highlight::Keyword1).
    Primary,
    /// Tagged [`Highlight::Keyword2`](super::Highlight::Keyword2).
    Secondary,
}

/// A keyword and its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keyword {
    pub text: &'static str,
    pub class: KeywordClass,
}

impl Keyword {
    pub const fn primary(text: &'static str) -> Self {
        Self {
            text,
            class: KeywordClass::Primary,
        }
    }

    pub const fn secondary(text: &'static str) -> Self {
        Self {
            text,
            class: KeywordClass::Secondary,
        }
    }
}

/// Lexical description of a file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
    /// Name shown in the status bar.
    pub file_type: &'static str,
    /// Patterns matched against a filename. Entries starting with `.` are
    /// extensions, anything else matches as a substring.
    pub file_match: &'static [&'static str],
    /// Marker starting a comment that runs to the end of the row.
    pub single_line_comment: Option<&'static str>,
    /// Start and end markers of a block comment.
    pub block_comment: Option<(&'static str, &'static str)>,
    pub keywords: &'static [Keyword],
    pub flags: HighlightFlags,
}

const C_KEYWORDS: &[Keyword] = &[
    Keyword::primary("switch"),
    Keyword::primary("while"),
    Keyword::primary("for"),
    Keyword::primary("if"),
    Keyword::primary("break"),
    Keyword::primary("continue"),
    Keyword::primary("return"),
    Keyword::primary("else"),
    Keyword::primary("struct"),
    Keyword::primary("union"),
    Keyword::primary("typedef"),
    Keyword::primary("static"),
    Keyword::primary("extern"),
    Keyword::primary("enum"),
    Keyword::primary("class"),
    Keyword::primary("case"),
    Keyword::primary("register"),
    Keyword::primary("auto"),
    Keyword::primary("do"),
    Keyword::primary("default"),
    Keyword::primary("goto"),
    Keyword::primary("inline"),
    Keyword::primary("restrict"),
    Keyword::primary("sizeof"),
    Keyword::primary("volatile"),
    Keyword::primary("const"),
    Keyword::secondary("int"),
    Keyword::secondary("float"),
    Keyword::secondary("double"),
    Keyword::secondary("long"),
    Keyword::secondary("char"),
    Keyword::secondary("unsigned"),
    Keyword::secondary("signed"),
    Keyword::secondary("void"),
    Keyword::secondary("short"),
    Keyword::secondary("int8_t"),
    Keyword::secondary("int16_t"),
    Keyword::secondary("int32_t"),
    Keyword::secondary("int64_t"),
    Keyword::secondary("uint8_t"),
    Keyword::secondary("uint16_t"),
    Keyword::secondary("uint32_t"),
    Keyword::secondary("uint64_t"),
    Keyword::secondary("size_t"),
    Keyword::secondary("time_t"),
    Keyword::secondary("FILE"),
];

const RUST_KEYWORDS: &[Keyword] = &[
    Keyword::primary("as"),
    Keyword::primary("break"),
    Keyword::primary("const"),
    Keyword::primary("continue"),
    Keyword::primary("crate"),
    Keyword::primary("else"),
    Keyword::primary("enum"),
    Keyword::primary("extern"),
    Keyword::primary("fn"),
    Keyword::primary("for"),
    Keyword::primary("if"),
    Keyword::primary("impl"),
    Keyword::primary("in"),
    Keyword::primary("let"),
    Keyword::primary("loop"),
    Keyword::primary("match"),
    Keyword::primary("mod"),
    Keyword::primary("move"),
    Keyword::primary("mut"),
    Keyword::primary("pub"),
    Keyword::primary("ref"),
    Keyword::primary("return"),
    Keyword::primary("self"),
    Keyword::primary("static"),
    Keyword::primary("struct"),
    Keyword::primary("super"),
    Keyword::primary("trait"),
    Keyword::primary("type"),
    Keyword::primary("unsafe"),
    Keyword::primary("use"),
    Keyword::primary("where"),
    Keyword::primary("while"),
    Keyword::secondary("bool"),
    Keyword::secondary("char"),
    Keyword::secondary("str"),
    Keyword::secondary("u8"),
    Keyword::secondary("u16"),
    Keyword::secondary("u32"),
    Keyword::secondary("u64"),
    Keyword::secondary("usize"),
    Keyword::secondary("i8"),
    Keyword::secondary("i16"),
    Keyword::secondary("i32"),
    Keyword::secondary("i64"),
    Keyword::secondary("isize"),
    Keyword::secondary("f32"),
    Keyword::secondary("f64"),
    Keyword::secondary("Self"),
    Keyword::secondary("String"),
    Keyword::secondary("Vec"),
    Keyword::secondary("Option"),
    Keyword::secondary("Result"),
];

const PYTHON_KEYWORDS: &[Keyword] = &[
    Keyword::primary("and"),
    Keyword::primary("as"),
    Keyword::primary("assert"),
    Keyword::primary("break"),
    Keyword::primary("class"),
    Keyword::primary("continue"),
    Keyword::primary("def"),
    Keyword::primary("del"),
    Keyword::primary("elif"),
    Keyword::primary("else"),
    Keyword::primary("except"),
    Keyword::primary("finally"),
    Keyword::primary("for"),
    Keyword::primary("from"),
    Keyword::primary("global"),
    Keyword::primary("if"),
    Keyword::primary("import"),
    Keyword::primary("in"),
    Keyword::primary("is"),
    Keyword::primary("lambda"),
    Keyword::primary("not"),
    Keyword::primary("or"),
    Keyword::primary("pass"),
    Keyword::primary("raise"),
    Keyword::primary("return"),
    Keyword::primary("try"),
    Keyword::primary("while"),
    Keyword::primary("with"),
    Keyword::primary("yield"),
    Keyword::secondary("True"),
    Keyword::secondary("False"),
    Keyword::secondary("None"),
    Keyword::secondary("int"),
    Keyword::secondary("float"),
    Keyword::secondary("str"),
    Keyword::secondary("list"),
    Keyword::secondary("dict"),
    Keyword::secondary("self"),
];

/// Built-in syntax database.
pub static SYNTAXES: &[Syntax] = &[
    Syntax {
        file_type: "c",
        file_match: &[".c", ".h", ".cpp", ".hpp"],
        single_line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        keywords: C_KEYWORDS,
        flags: HighlightFlags::NUMBERS.union(HighlightFlags::STRINGS),
    },
    Syntax {
        file_type: "rust",
        file_match: &[".rs"],
        single_line_comment: Some("//"),
        block_comment: Some(("/*", "*/")),
        keywords: RUST_KEYWORDS,
        flags: HighlightFlags::NUMBERS.union(HighlightFlags::STRINGS),
    },
    Syntax {
        file_type: "python",
        file_match: &[".py"],
        single_line_comment: Some("#"),
        block_comment: None,
        keywords: PYTHON_KEYWORDS,
        flags: HighlightFlags::NUMBERS.union(HighlightFlags::STRINGS),
    },
];

impl Syntax {
    /// Selects the syntax for a filename from the built-in database.
    pub fn for_filename(name: &str) -> Option<&'static Syntax> {
        SYNTAXES.iter().find(|syntax| syntax.matches(name))
    }

    /// Returns true if one of this syntax's patterns matches `name`.
    pub fn matches(&self, name: &str) -> bool {
        let ext = name.rfind('.').map(|dot| &name[dot..]);
        self.file_match.iter().any(|pattern| {
            if pattern.starts_with('.') {
                ext == Some(*pattern)
            } else {
                name.contains(pattern)
            }
        })
    }

    pub fn highlights_numbers(&self) -> bool {
        self.flags.contains(HighlightFlags::NUMBERS)
    }

    pub fn highlights_strings(&self) -> bool {
        self.flags.contains(HighlightFlags::STRINGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_filename() {
        assert_eq!(Syntax::for_filename("main.c").unwrap().file_type, "c");
        assert_eq!(Syntax::for_filename("milli.h").unwrap().file_type, "c");
        assert_eq!(Syntax::for_filename("lib.rs").unwrap().file_type, "rust");
        assert_eq!(Syntax::for_filename("setup.py").unwrap().file_type, "python");
        assert!(Syntax::for_filename("README.md").is_none());
        assert!(Syntax::for_filename("Makefile").is_none());
    }

    #[test]
    fn test_extension_uses_last_dot() {
        assert_eq!(
            Syntax::for_filename("/path/to/archive.tar.c").unwrap().file_type,
            "c"
        );
        // Extension must match exactly, not as a prefix.
        assert!(Syntax::for_filename("notes.cfg").is_none());
    }

    #[test]
    fn test_substring_pattern() {
        const MAKE: Syntax = Syntax {
            file_type: "make",
            file_match: &["Makefile"],
            single_line_comment: Some("#"),
            block_comment: None,
            keywords: &[],
            flags: HighlightFlags::empty(),
        };
        assert!(MAKE.matches("src/Makefile"));
        assert!(!MAKE.matches("src/makefile"));
    }

    #[test]
    fn test_flags() {
        let c = Syntax::for_filename("x.c").unwrap();
        assert!(c.highlights_numbers());
        assert!(c.highlights_strings());
    }
}
