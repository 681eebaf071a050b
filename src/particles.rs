// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::{rngs::StdRng, Rng};

use crate::canvas::{Canvas, Ink};
use crate::palette::{HEART_PINK, PETAL_PINK, WHITE};
use crate::runtime::ParticleKind;
use crate::scheduler::{FrameLoop, FrameTick};

pub const POPULATION_CAP: usize = 120;
pub const SPAWN_BATCH: usize = 4;

const SPAWN_Y_PX: f32 = -20.0;
const EXIT_MARGIN_PX: f32 = 40.0;
const PHASE_STEP: f32 = 0.03;
const DRIFT: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub vx: f32,
    pub vy: f32,
    pub phase: f32,
}

impl Particle {
    fn spawn<R: Rng + ?Sized>(rng: &mut R, width_px: f32) -> Self {
        Self {
            x: rng.random::<f32>() * width_px,
            y: SPAWN_Y_PX,
            scale: rng.random::<f32>() * 1.2 + 0.6,
            vy: rng.random::<f32>() * 0.7 + 0.6,
            vx: (rng.random::<f32>() - 0.5) * 0.5,
            phase: rng.random::<f32>() * TAU,
        }
    }

    fn advance(&mut self) {
        self.phase += PHASE_STEP;
        self.x += self.vx + self.phase.sin() * DRIFT;
        self.y += self.vy;
    }

    pub fn tilt(&self) -> f32 {
        self.phase.sin() * 0.2
    }

    fn ink(&self, kind: ParticleKind) -> Ink {
        match kind {
            ParticleKind::Hearts => {
                let ch = if self.scale > 1.2 { '♥' } else { '♡' };
                Ink::new(ch, HEART_PINK, 1.0)
            }
            ParticleKind::Snow => {
                let ch = if self.scale > 1.3 { '❄' } else { '*' };
                Ink::new(ch, WHITE, 0.9)
            }
            ParticleKind::Petals => {
                let ch = if self.tilt() >= 0.0 { '✿' } else { '❀' };
                Ink::new(ch, PETAL_PINK, 1.0)
            }
        }
    }
}

pub struct ParticleSystem {
    running: bool,
    kind: ParticleKind,
    particles: Vec<Particle>,
    canvas: Canvas,
}

impl ParticleSystem {
    pub fn new(cols: u16, rows: u16, kind: ParticleKind) -> Self {
        Self {
            running: false,
            kind,
            particles: Vec::with_capacity(POPULATION_CAP),
            canvas: Canvas::new(cols, rows),
        }
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ParticleKind) {
        self.kind = kind;
    }

    #[cfg(test)]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Flips running state. Either way the population is dropped; the canvas
    /// keeps whatever was drawn last.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.particles.clear();
        self.running
    }

    fn top_up(&mut self, rng: &mut StdRng) {
        let room = POPULATION_CAP.saturating_sub(self.particles.len());
        let width = self.canvas.width_px();
        for _ in 0..room.min(SPAWN_BATCH) {
            self.particles.push(Particle::spawn(rng, width));
        }
    }
}

impl FrameLoop for ParticleSystem {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn frame(&mut self, _tick: &FrameTick, rng: &mut StdRng) {
        if !self.running {
            return;
        }
        self.top_up(rng);

        let exit_y = self.canvas.height_px() + EXIT_MARGIN_PX;
        self.canvas.clear();
        for p in &mut self.particles {
            p.advance();
            self.canvas.plot(p.x, p.y, p.ink(self.kind));
        }
        self.particles.retain(|p| p.y < exit_y);
    }

    fn resize(&mut self, cols: u16, rows: u16, _rng: &mut StdRng) {
        self.canvas.resize(cols, rows);
    }

    fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}
