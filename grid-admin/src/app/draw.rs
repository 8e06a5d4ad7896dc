//! Painting a frame to the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use grid_engine::render::truncate;

use super::toast::Toasts;

/// Everything on screen for one redraw.
pub struct Frame<'a> {
    pub title: String,
    /// Grid lines from the layout: header, separator, body, footer.
    pub lines: Vec<String>,
    /// Grid line to highlight.
    pub cursor: Option<usize>,
    /// Filter prompt or help text.
    pub status: String,
    pub toasts: &'a Toasts,
}

/// Grid line index of the body row at `index`.
pub fn body_line(index: usize) -> usize {
    index + 2
}

pub fn draw(out: &mut impl Write, frame: &Frame<'_>, width: u16, height: u16) -> io::Result<()> {
    let width = usize::from(width);
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    queue!(
        out,
        SetAttribute(Attribute::Bold),
        Print(truncate(&frame.title, width)),
        SetAttribute(Attribute::Reset)
    )?;

    let mut y: u16 = 2;
    for (index, line) in frame.lines.iter().enumerate() {
        if y >= height.saturating_sub(2) {
            break;
        }
        queue!(out, MoveTo(0, y))?;
        if frame.cursor == Some(index) {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(truncate(line, width)),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(out, Print(truncate(line, width)))?;
        }
        y += 1;
    }

    let toast_rows = u16::try_from(frame.toasts.len()).unwrap_or(0);
    let mut toast_y = height.saturating_sub(2 + toast_rows);
    for toast in frame.toasts.iter() {
        queue!(
            out,
            MoveTo(0, toast_y),
            SetForegroundColor(toast.color()),
            Print(truncate(&toast.text(), width)),
            ResetColor
        )?;
        toast_y += 1;
    }

    queue!(
        out,
        MoveTo(0, height.saturating_sub(1)),
        SetForegroundColor(Color::DarkGrey),
        Print(truncate(&frame.status, width)),
        ResetColor
    )?;
    out.flush()
}
