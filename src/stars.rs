// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::{rngs::StdRng, Rng};

use crate::canvas::{Canvas, Ink};
use crate::palette::WHITE;
use crate::scheduler::{FrameLoop, FrameTick};

pub const STAR_COUNT: usize = 180;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub phase: f32,
    pub speed: f32,
}

impl Star {
    fn random<R: Rng + ?Sized>(rng: &mut R, width_px: f32, height_px: f32) -> Self {
        Self {
            x: rng.random::<f32>() * width_px,
            y: rng.random::<f32>() * height_px,
            radius: rng.random::<f32>() * 1.2 + 0.3,
            phase: rng.random::<f32>() * TAU,
            speed: rng.random::<f32>() * 0.02 + 0.005,
        }
    }

    pub fn twinkle(&self) -> f32 {
        (self.phase.sin() + 1.0) / 2.0
    }

    fn ink(&self) -> Ink {
        let tw = self.twinkle();
        let size = self.radius * (0.5 + tw * 0.5);
        let ch = if size > 1.1 {
            '✦'
        } else if size > 0.7 {
            '·'
        } else {
            '.'
        };
        Ink::new(ch, WHITE, 0.5 + tw * 0.5)
    }
}

pub struct StarField {
    stars: Vec<Star>,
    canvas: Canvas,
}

impl StarField {
    pub fn new(cols: u16, rows: u16, rng: &mut StdRng) -> Self {
        let mut field = Self {
            stars: Vec::with_capacity(STAR_COUNT),
            canvas: Canvas::new(cols, rows),
        };
        field.reseed(rng);
        field
    }

    #[cfg(test)]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    fn reseed(&mut self, rng: &mut StdRng) {
        let (w, h) = (self.canvas.width_px(), self.canvas.height_px());
        self.stars.clear();
        self.stars
            .extend((0..STAR_COUNT).map(|_| Star::random(rng, w, h)));
    }
}

impl FrameLoop for StarField {
    fn name(&self) -> &'static str {
        "stars"
    }

    fn is_running(&self) -> bool {
        true
    }

    fn frame(&mut self, _tick: &FrameTick, _rng: &mut StdRng) {
        self.canvas.clear();
        for star in &mut self.stars {
            star.phase += star.speed;
            self.canvas.plot(star.x, star.y, star.ink());
        }
    }

    fn resize(&mut self, cols: u16, rows: u16, rng: &mut StdRng) {
        self.canvas.resize(cols, rows);
        self.reseed(rng);
    }

    fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}
