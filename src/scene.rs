// Copyright (c) 2026 rezky_nightky

use crate::canvas::Canvas;
use crate::cell::Cell;
use crate::frame::Frame;
use crate::palette::Rgb;
use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneCell {
    ch: char,
    fg: Rgb,
    alpha: f32,
    bg: Rgb,
    bold: bool,
}

pub struct Scene {
    pub cols: u16,
    pub rows: u16,
    cells: Vec<SceneCell>,
}

impl Scene {
    pub fn new(cols: u16, rows: u16, bg: Rgb) -> Self {
        let blank = SceneCell {
            ch: ' ',
            fg: bg,
            alpha: 1.0,
            bg,
            bold: false,
        };
        Self {
            cols,
            rows,
            cells: vec![blank; cols as usize * rows as usize],
        }
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut SceneCell> {
        if x < 0 || y < 0 || x >= self.cols as i32 || y >= self.rows as i32 {
            return None;
        }
        self.cells
            .get_mut(y as usize * self.cols as usize + x as usize)
    }

    #[cfg(test)]
    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(self.cells[y as usize * self.cols as usize + x as usize].ch)
    }

    pub fn fill(&mut self, rect: Rect, bg: Rgb) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if let Some(c) = self.cell_mut(x as i32, y as i32) {
                    *c = SceneCell {
                        ch: ' ',
                        fg: bg,
                        alpha: 1.0,
                        bg,
                        bold: false,
                    };
                }
            }
        }
    }

    pub fn text(&mut self, x: i32, y: i32, s: &str, fg: Rgb, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            if let Some(c) = self.cell_mut(x + i as i32, y) {
                c.ch = ch;
                c.fg = fg;
                c.alpha = 1.0;
                c.bold = bold;
            }
        }
    }

    pub fn text_centered(&mut self, rect: Rect, y: u16, s: &str, fg: Rgb, bold: bool) {
        let len = s.chars().count();
        let width = rect.w as usize;
        let shown: String = s.chars().take(width).collect();
        let pad = width.saturating_sub(len) / 2;
        self.text(rect.x as i32 + pad as i32, y as i32, &shown, fg, bold);
    }

    pub fn layer(&mut self, canvas: &Canvas, x: u16, y: u16) {
        for row in 0..canvas.rows {
            for col in 0..canvas.cols {
                let Some(ink) = canvas.get(col, row) else {
                    continue;
                };
                if let Some(c) = self.cell_mut(x as i32 + col as i32, y as i32 + row as i32) {
                    c.ch = ink.ch;
                    c.fg = ink.rgb;
                    c.alpha = ink.alpha;
                    c.bold = false;
                }
            }
        }
    }

    pub fn blit(&self, frame: &mut Frame, mode: ColorMode) {
        let cols = self.cols.min(frame.width);
        let rows = self.rows.min(frame.height);
        for y in 0..rows {
            for x in 0..cols {
                let c = &self.cells[y as usize * self.cols as usize + x as usize];
                let fg = if c.ch == ' ' {
                    None
                } else {
                    c.fg.over(c.bg, c.alpha).to_color(mode)
                };
                frame.set(
                    x,
                    y,
                    Cell {
                        ch: c.ch,
                        fg,
                        bg: c.bg.to_color(mode),
                        bold: c.bold,
                    },
                );
            }
        }
    }
}
