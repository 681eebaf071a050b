// Copyright (c) 2026 rezky_nightky

use std::f64::consts::PI;

use rand::rngs::StdRng;

use crate::canvas::{Canvas, Ink, CELL_H_PX, CELL_W_PX};
use crate::geo::{lerp, City, LatLng};
use crate::palette::{HEART_PINK, TEXT, WHITE};
use crate::scheduler::{FrameLoop, FrameTick};

pub const LOOP_PERIOD_MS: u64 = 12_000;
const MAP_PADDING_PX: f64 = 20.0;

pub fn ping_pong(elapsed_ms: u64, period_ms: u64) -> f64 {
    let period = period_ms.max(1);
    let t = (elapsed_ms % period) as f64 / period as f64;
    if t < 0.5 {
        t * 2.0
    } else {
        1.0 - (t - 0.5) * 2.0
    }
}

pub fn plane_position(from: LatLng, to: LatLng, elapsed_ms: u64, period_ms: u64) -> LatLng {
    lerp(from, to, ping_pong(elapsed_ms, period_ms))
}

fn mercator(p: LatLng) -> (f64, f64) {
    let lat = p.lat.clamp(-85.0511, 85.0511).to_radians();
    let x = (p.lng + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (x, y)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    center: (f64, f64),
    scale: f64,
    width_px: f64,
    height_px: f64,
}

impl MapView {
    pub fn fit(a: LatLng, b: LatLng, width_px: f32, height_px: f32) -> Self {
        let (ax, ay) = mercator(a);
        let (bx, by) = mercator(b);
        let (w, h) = (width_px as f64, height_px as f64);
        let avail_w = (w - 2.0 * MAP_PADDING_PX).max(1.0);
        let avail_h = (h - 2.0 * MAP_PADDING_PX).max(1.0);
        let span_x = (ax - bx).abs().max(1e-9);
        let span_y = (ay - by).abs().max(1e-9);
        Self {
            center: ((ax + bx) / 2.0, (ay + by) / 2.0),
            scale: (avail_w / span_x).min(avail_h / span_y),
            width_px: w,
            height_px: h,
        }
    }

    pub fn project(&self, p: LatLng) -> (f32, f32) {
        let (x, y) = mercator(p);
        (
            ((x - self.center.0) * self.scale + self.width_px / 2.0) as f32,
            ((y - self.center.1) * self.scale + self.height_px / 2.0) as f32,
        )
    }
}

pub struct PlaneTrack {
    from: City,
    to: City,
    period_ms: u64,
    position: LatLng,
    canvas: Canvas,
}

impl PlaneTrack {
    pub fn new(from: City, to: City, cols: u16, rows: u16) -> Self {
        Self {
            from,
            to,
            period_ms: LOOP_PERIOD_MS,
            position: from.coords,
            canvas: Canvas::new(cols, rows),
        }
    }

    fn draw(&mut self) {
        self.canvas.clear();
        if self.canvas.cols == 0 || self.canvas.rows == 0 {
            return;
        }
        let view = MapView::fit(
            self.from.coords,
            self.to.coords,
            self.canvas.width_px(),
            self.canvas.height_px(),
        );
        let a = view.project(self.from.coords);
        let b = view.project(self.to.coords);

        let steps = (self.canvas.cols as usize * 2).max(2);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            self.canvas.plot(x, y, Ink::new('·', HEART_PINK, 0.8));
        }

        for (city, (x, y)) in [(self.from, a), (self.to, b)] {
            self.canvas.plot(x, y, Ink::new('●', WHITE, 1.0));
            let col = (x / CELL_W_PX).floor() as i32;
            let row = (y / CELL_H_PX).floor() as i32;
            let len = city.name.chars().count() as i32;
            let label_col = (col - len / 2).clamp(0, (self.canvas.cols as i32 - len).max(0));
            let label_row = if row > 0 { row - 1 } else { row + 1 };
            self.canvas.put_str(label_col, label_row, city.name, TEXT, 0.9);
        }

        let (px, py) = view.project(self.position);
        self.canvas.plot(px, py, Ink::new('✈', WHITE, 1.0));
    }
}

impl FrameLoop for PlaneTrack {
    fn name(&self) -> &'static str {
        "plane"
    }

    fn is_running(&self) -> bool {
        true
    }

    fn frame(&mut self, tick: &FrameTick, _rng: &mut StdRng) {
        self.position = plane_position(
            self.from.coords,
            self.to.coords,
            tick.elapsed_ms,
            self.period_ms,
        );
        self.draw();
    }

    fn resize(&mut self, cols: u16, rows: u16, _rng: &mut StdRng) {
        self.canvas.resize(cols, rows);
    }

    fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}
