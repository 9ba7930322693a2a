//! In-place terminal rendering with crossterm.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use super::format::cpu_color;
use super::table::{column_header, footer_line, header_lines, row_cells, separator};
use super::{Frame, Renderer};

/// Width used when the terminal size cannot be queried (not a tty).
const FALLBACK_WIDTH: usize = 120;

/// Clears the screen and redraws the whole table every frame.
pub struct TerminalRenderer<W: Write> {
    out: W,
    color: bool,
    cursor_hidden: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            cursor_hidden: false,
        }
    }

    fn width() -> usize {
        terminal::size()
            .map(|(w, _)| w as usize)
            .unwrap_or(FALLBACK_WIDTH)
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text), Print("\n"))
    }

    fn colored_line(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetForegroundColor(color),
                Print(text),
                ResetColor,
                Print("\n")
            )
        } else {
            self.line(text)
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn display(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let width = Self::width();

        if !self.cursor_hidden {
            queue!(self.out, Hide)?;
            self.cursor_hidden = true;
        }
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;

        let mut header = header_lines(frame).into_iter();
        if let Some(title) = header.next() {
            self.colored_line(&title, Color::White)?;
        }
        for line in header {
            self.colored_line(&line, Color::Cyan)?;
        }

        let sep = separator();
        self.line(&sep)?;
        self.line(&column_header())?;
        self.line(&sep)?;

        for entry in frame.processes {
            let cells = row_cells(entry, width);
            if self.color {
                queue!(
                    self.out,
                    Print(&cells.lead),
                    SetForegroundColor(cpu_color(entry.metric.cpu_percent)),
                    Print(&cells.cpu),
                    ResetColor,
                    Print(&cells.tail),
                    Print("\n")
                )?;
            } else {
                self.line(&cells.joined())?;
            }
        }

        self.line(&sep)?;
        self.line(&footer_line(frame))?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.cursor_hidden {
            queue!(self.out, Show)?;
            self.cursor_hidden = false;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }
}
