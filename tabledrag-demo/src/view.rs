use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use tabledrag::{Document, Dom};
use unicode_width::UnicodeWidthChar;

pub const TABLE: &str = "tasks";
pub const DRAG_CLASS: &str = "dragging";

/// Lines above the table.
pub const HEADER_LINES: i32 = 2;

pub const LABEL_WIDTH: usize = 40;

/// Draw the header and every visible row of the table.
pub fn draw(out: &mut impl Write, doc: &Document, width: u16) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    queue!(
        out,
        SetAttribute(Attribute::Bold),
        Print("Drag rows by their label, tick boxes to drag several. q quits."),
        SetAttribute(Attribute::Reset)
    )?;

    let viewport = doc.viewport();
    for row in doc.rows(TABLE) {
        let Some(rect) = doc.rect(&row) else {
            continue;
        };
        let line = rect.y - viewport.scroll_y;
        if line < 0 || line >= viewport.height {
            continue;
        }

        let checked = doc.is_checked(&check_id(&row));
        let label = doc.text(&label_id(&row)).unwrap_or_default();
        let text = format!("[{}] {}", if checked { 'x' } else { ' ' }, pad(label, LABEL_WIDTH));

        let screen_y = u16::try_from(line + HEADER_LINES).unwrap_or(u16::MAX);
        let screen_x = u16::try_from(rect.x).unwrap_or(0);
        if screen_x >= width {
            continue;
        }

        queue!(out, MoveTo(screen_x, screen_y))?;
        if doc.has_class(&row, DRAG_CLASS) {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(text),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(out, Print(text))?;
        }
    }

    Ok(())
}

pub fn check_id(row: &str) -> String {
    format!("{row}-check")
}

pub fn label_id(row: &str) -> String {
    format!("{row}-label")
}

/// Pad or cut `text` to exactly `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("ab", 4), "ab  ");
    }

    #[test]
    fn pad_counts_wide_chars() {
        assert_eq!(UnicodeWidthStr::width(pad("日本語", 5).as_str()), 5);
        assert_eq!(pad("日本語", 5), "日本 ");
    }
}
