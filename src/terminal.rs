// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl Pen {
    fn of(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            bold: cell.bold,
        }
    }
}

pub struct Terminal {
    stdout: Stdout,
    last_size: Option<(u16, u16)>,
    pen: Option<Pen>,
    order: Vec<usize>,
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last_size: None,
            pen: None,
            order: Vec::new(),
            run_buf: String::with_capacity(64),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    fn apply_pen(&mut self, pen: Pen) -> Result<()> {
        let prev = self.pen;
        if prev.map(|p| p.fg) != Some(pen.fg) {
            self.stdout
                .queue(SetForegroundColor(pen.fg.unwrap_or(Color::Reset)))?;
        }
        if prev.map(|p| p.bg) != Some(pen.bg) {
            self.stdout
                .queue(SetBackgroundColor(pen.bg.unwrap_or(Color::Reset)))?;
        }
        if prev.map(|p| p.bold) != Some(pen.bold) {
            self.stdout.queue(SetAttribute(if pen.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
        }
        self.pen = Some(pen);
        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let size = (frame.width, frame.height);
        let resized = self.last_size != Some(size);
        self.pen = None;

        if resized {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last_size = Some(size);
        }

        if resized || frame.is_dirty_all() {
            for y in 0..frame.height {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..frame.width {
                    let idx = y as usize * frame.width as usize + x as usize;
                    let cell = frame.cell_at_index(idx);
                    self.apply_pen(Pen::of(&cell))?;
                    self.stdout.queue(Print(cell.ch))?;
                }
            }
        } else {
            self.order.clear();
            self.order.extend_from_slice(frame.dirty_indices());
            self.order.sort_unstable();

            let width = frame.width as usize;
            let mut i = 0usize;
            while i < self.order.len() {
                let start = self.order[i];
                let first = frame.cell_at_index(start);
                let pen = Pen::of(&first);

                self.run_buf.clear();
                self.run_buf.push(first.ch);
                let mut end = start;
                let mut j = i + 1;
                while j < self.order.len() {
                    let next = self.order[j];
                    if next != end + 1 || next % width == 0 {
                        break;
                    }
                    let cell = frame.cell_at_index(next);
                    if Pen::of(&cell) != pen {
                        break;
                    }
                    self.run_buf.push(cell.ch);
                    end = next;
                    j += 1;
                }

                let x = (start % width) as u16;
                let y = (start / width) as u16;
                self.stdout.queue(cursor::MoveTo(x, y))?;
                self.apply_pen(pen)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;
                i = j;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.flush();
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
