//! Frame drawing.
//!
//! A frame is queued command by command onto the writer and flushed once:
//! text rows, then the inverted status bar, then the message bar.

use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use milli_core::{AnsiColor, EditorSession, Highlight, Row};
use std::io::{self, Write};

/// Terminal color for a highlight class.
///
/// SGR foreground codes 31..=37 are palette entries 1..=7.
pub fn terminal_color(color: AnsiColor) -> Color {
    Color::AnsiValue(color.sgr_code() - 30)
}

/// Draws one full frame and positions the cursor.
pub fn draw_frame<W: Write>(
    out: &mut W,
    session: &EditorSession,
    message: Option<&str>,
    welcome: &str,
) -> io::Result<()> {
    queue!(out, cursor::Hide, cursor::MoveTo(0, 0))?;
    draw_rows(out, session, welcome)?;
    draw_status_bar(out, session)?;
    draw_message_bar(out, session.viewport().cols, message)?;

    let viewport = session.viewport();
    let cursor = session.cursor();
    let row = cursor.y.saturating_sub(viewport.row_off);
    let col = cursor.rx.saturating_sub(viewport.col_off);
    queue!(
        out,
        cursor::MoveTo(to_u16(col), to_u16(row)),
        cursor::Show
    )?;
    out.flush()
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn draw_rows<W: Write>(out: &mut W, session: &EditorSession, welcome: &str) -> io::Result<()> {
    let viewport = session.viewport();
    let buffer = session.buffer();

    for y in 0..viewport.rows {
        match buffer.row(y + viewport.row_off) {
            Some(row) => draw_text_row(out, row, viewport.col_off, viewport.cols)?,
            None if buffer.is_empty() && y == viewport.rows / 3 => {
                draw_welcome(out, welcome, viewport.cols)?
            }
            None => queue!(out, Print('~'))?,
        }
        queue!(out, terminal::Clear(terminal::ClearType::UntilNewLine), Print("\r\n"))?;
    }
    Ok(())
}

fn draw_welcome<W: Write>(out: &mut W, welcome: &str, cols: usize) -> io::Result<()> {
    let text: String = welcome.chars().take(cols).collect();
    let mut padding = (cols - text.chars().count()) / 2;
    if padding > 0 {
        queue!(out, Print('~'))?;
        padding -= 1;
    }
    queue!(out, Print(" ".repeat(padding)), Print(text))
}

fn draw_text_row<W: Write>(out: &mut W, row: &Row, col_off: usize, cols: usize) -> io::Result<()> {
    let render = row.render();
    let start = col_off.min(render.len());
    let end = (col_off + cols).min(render.len());
    let mut current: Option<AnsiColor> = None;

    for (&byte, &tag) in render[start..end].iter().zip(&row.highlight()[start..end]) {
        if byte.is_ascii_control() {
            let symbol = if byte <= 26 { char::from(b'@' + byte) } else { '?' };
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(symbol),
                SetAttribute(Attribute::Reset)
            )?;
            if let Some(color) = current {
                queue!(out, SetForegroundColor(terminal_color(color)))?;
            }
        } else if tag == Highlight::Normal {
            if current.take().is_some() {
                queue!(out, SetForegroundColor(Color::Reset))?;
            }
            out.write_all(&[byte])?;
        } else {
            let color = tag.color();
            if current != Some(color) {
                current = Some(color);
                queue!(out, SetForegroundColor(terminal_color(color)))?;
            }
            out.write_all(&[byte])?;
        }
    }
    queue!(out, SetForegroundColor(Color::Reset))
}

/// Left and right halves of the status bar.
pub fn status_text(session: &EditorSession) -> (String, String) {
    let name = session
        .file_name()
        .map_or_else(|| "[ No name ]".to_string(), |path| path.display().to_string());
    let left = format!(
        "{:.20} - {} lines {}",
        name,
        session.buffer().len(),
        if session.buffer().is_dirty() { "[ modified ]" } else { "" }
    );
    let cursor = session.cursor();
    let right = format!(
        "[ {} | Ln: {}, Col: {} ]",
        session.file_type(),
        cursor.y + 1,
        cursor.x
    );
    (left, right)
}

fn draw_status_bar<W: Write>(out: &mut W, session: &EditorSession) -> io::Result<()> {
    let cols = session.viewport().cols;
    let (left, right) = status_text(session);
    let mut line: String = left.chars().take(cols).collect();
    let mut len = line.chars().count();
    let right_len = right.chars().count();

    while len < cols {
        if cols - len == right_len {
            line.push_str(&right);
            break;
        }
        line.push(' ');
        len += 1;
    }

    queue!(
        out,
        SetAttribute(Attribute::Bold),
        SetAttribute(Attribute::Reverse),
        Print(line),
        SetAttribute(Attribute::Reset),
        Print("\r\n")
    )
}

fn draw_message_bar<W: Write>(out: &mut W, cols: usize, message: Option<&str>) -> io::Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::UntilNewLine))?;
    if let Some(text) = message {
        let text: String = text.chars().take(cols).collect();
        queue!(out, Print(text))?;
    }
    Ok(())
}
