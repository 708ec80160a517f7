//! Row lexer producing highlight tags.
//!
//! A row is scanned once from left to right. The only state carried from
//! one row to the next is whether a block comment is still open; the
//! buffer uses the return value of [`highlight_row`] to decide whether the
//! following row must be scanned again.

use super::language::{KeywordClass, Syntax};
use super::theme::Highlight;
use crate::row::Row;

/// Bytes that delimit tokens besides whitespace and NUL.
const SEPARATORS: &[u8] = b",.()+-/*=~%<>[];{}'\"";

/// Returns true if `byte` ends a token.
pub fn is_separator(byte: u8) -> bool {
    byte == 0 || byte.is_ascii_whitespace() || byte == 0x0b || SEPARATORS.contains(&byte)
}

/// Recomputes `row.highlight` and `row.comment_open`.
///
/// `comment_open_before` is the exit state of the previous row (false for
/// the first row). Returns true if the row's exit state changed, meaning
/// the next row was lexed against a stale state.
pub fn highlight_row(row: &mut Row, syntax: Option<&Syntax>, comment_open_before: bool) -> bool {
    let render = row.render();
    let mut tags = vec![Highlight::Normal; render.len()];

    let Some(syntax) = syntax else {
        row.highlight = tags;
        row.comment_open = false;
        return false;
    };

    let line_comment = syntax.single_line_comment.map(str::as_bytes).filter(|m| !m.is_empty());
    let block_comment = syntax
        .block_comment
        .map(|(start, end)| (start.as_bytes(), end.as_bytes()))
        .filter(|(start, end)| !start.is_empty() && !end.is_empty());

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = comment_open_before && block_comment.is_some();

    let mut i = 0;
    while i < render.len() {
        let byte = render[i];
        let prev_tag = if i > 0 { tags[i - 1] } else { Highlight::Normal };
        let rest = &render[i..];

        if let Some(marker) = line_comment {
            if in_string.is_none() && !in_comment && rest.starts_with(marker) {
                tags[i..].fill(Highlight::Comment);
                break;
            }
        }

        if let Some((start, end)) = block_comment {
            if in_string.is_none() {
                if in_comment {
                    if rest.starts_with(end) {
                        tags[i..i + end.len()].fill(Highlight::BlockComment);
                        i += end.len();
                        in_comment = false;
                        prev_sep = true;
                    } else {
                        tags[i] = Highlight::BlockComment;
                        i += 1;
                    }
                    continue;
                } else if rest.starts_with(start) {
                    tags[i..i + start.len()].fill(Highlight::BlockComment);
                    i += start.len();
                    in_comment = true;
                    continue;
                }
            }
        }

        if syntax.highlights_strings() {
            if let Some(quote) = in_string {
                tags[i] = Highlight::String;
                if byte == b'\\' && i + 1 < render.len() {
                    tags[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if byte == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if byte == b'"' || byte == b'\'' {
                in_string = Some(byte);
                tags[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlights_numbers()
            && ((byte.is_ascii_digit() && (prev_sep || prev_tag == Highlight::Number))
                || (byte == b'.' && prev_tag == Highlight::Number))
        {
            tags[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some((len, tag)) = keyword_at(syntax, rest) {
                tags[i..i + len].fill(tag);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(byte);
        i += 1;
    }

    row.highlight = tags;
    let changed = row.comment_open != in_comment;
    row.comment_open = in_comment;
    changed
}

/// Matches a whole keyword at the start of `text`.
fn keyword_at(syntax: &Syntax, text: &[u8]) -> Option<(usize, Highlight)> {
    syntax.keywords.iter().find_map(|keyword| {
        let word = keyword.text.as_bytes();
        let whole = text.starts_with(word)
            && text.get(word.len()).map_or(true, |&b| is_separator(b));
        if !whole || word.is_empty() {
            return None;
        }
        let tag = match keyword.class {
            KeywordClass::Primary => Highlight::Keyword1,
            KeywordClass::Secondary => Highlight::Keyword2,
        };
        Some((word.len(), tag))
    })
}
