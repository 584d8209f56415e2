//! Raw-mode terminal that redraws a frame of text lines.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{cursor, style::Print, terminal, QueueableCommand};

pub struct TerminalScreen {
    stdout: io::Stdout,
    last: Option<Vec<String>>,
}

impl Default for TerminalScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalScreen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `lines`, rewriting only the lines that changed since the last
    /// frame.
    pub fn draw(&mut self, lines: Vec<String>) -> Result<()> {
        let full = match self.last.as_ref() {
            Some(prev) if prev == &lines => return Ok(()),
            Some(prev) => prev.len() != lines.len(),
            None => true,
        };

        if full {
            self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
        }
        for (y, line) in lines.iter().enumerate() {
            let changed = full
                || self
                    .last
                    .as_ref()
                    .and_then(|prev| prev.get(y))
                    .map_or(true, |prev| prev != line);
            if changed {
                let y = u16::try_from(y).unwrap_or(u16::MAX);
                self.stdout.queue(cursor::MoveTo(0, y))?;
                self.stdout.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
                self.stdout.queue(Print(line))?;
            }
        }
        self.stdout.flush()?;

        self.last = Some(lines);
        Ok(())
    }
}
