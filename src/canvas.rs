// Copyright (c) 2026 rezky_nightky

use crate::palette::Rgb;

/// Virtual pixel size of one terminal cell. Animations simulate in pixels so
/// their speeds read the same regardless of terminal size.
pub const CELL_W_PX: f32 = 8.0;
pub const CELL_H_PX: f32 = 16.0;

const MIN_VISIBLE_ALPHA: f32 = 0.06;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ink {
    pub ch: char,
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Ink {
    pub fn new(ch: char, rgb: Rgb, alpha: f32) -> Self {
        Self {
            ch,
            rgb,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    pub cols: u16,
    pub rows: u16,
    cells: Vec<Option<Ink>>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols as usize * rows as usize],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells.clear();
        self.cells.resize(cols as usize * rows as usize, None);
    }

    pub fn width_px(&self) -> f32 {
        self.cols as f32 * CELL_W_PX
    }

    pub fn height_px(&self) -> f32 {
        self.rows as f32 * CELL_H_PX
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn fade(&mut self, alpha: f32) {
        let keep = (1.0 - alpha).clamp(0.0, 1.0);
        for slot in &mut self.cells {
            if let Some(ink) = slot {
                ink.alpha *= keep;
                if ink.alpha < MIN_VISIBLE_ALPHA {
                    *slot = None;
                }
            }
        }
    }

    pub fn get(&self, col: u16, row: u16) -> Option<Ink> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    pub fn put(&mut self, col: i32, row: i32, ink: Ink) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.cols as usize + col as usize] = Some(ink);
    }

    pub fn put_str(&mut self, col: i32, row: i32, text: &str, rgb: Rgb, alpha: f32) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, Ink::new(ch, rgb, alpha));
        }
    }

    pub fn plot(&mut self, x_px: f32, y_px: f32, ink: Ink) {
        if !x_px.is_finite() || !y_px.is_finite() {
            return;
        }
        let col = (x_px / CELL_W_PX).floor();
        let row = (y_px / CELL_H_PX).floor();
        if col < 0.0 || row < 0.0 {
            return;
        }
        self.put(col as i32, row as i32, ink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::WHITE;

    #[test]
    fn plot_maps_pixels_to_cells() {
        let mut c = Canvas::new(4, 3);
        c.plot(17.0, 33.0, Ink::new('*', WHITE, 1.0));
        assert_eq!(c.get(2, 2).map(|i| i.ch), Some('*'));
        c.plot(-1.0, 0.0, Ink::new('x', WHITE, 1.0));
        c.plot(0.0, 48.0, Ink::new('x', WHITE, 1.0));
        assert_eq!(c.get(0, 0), None);
    }

    #[test]
    fn fade_darkens_then_drops_ink() {
        let mut c = Canvas::new(1, 1);
        c.put(0, 0, Ink::new('*', WHITE, 1.0));
        c.fade(0.2);
        let a = c.get(0, 0).unwrap().alpha;
        assert!((a - 0.8).abs() < 1e-6);
        for _ in 0..20 {
            c.fade(0.2);
        }
        assert!(c.is_blank());
    }

    #[test]
    fn resize_clears_content() {
        let mut c = Canvas::new(2, 2);
        c.put(1, 1, Ink::new('*', WHITE, 1.0));
        c.resize(3, 3);
        assert!(c.is_blank());
        assert_eq!(c.width_px(), 24.0);
        assert_eq!(c.height_px(), 48.0);
    }
}
