// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use rand::{rngs::StdRng, Rng};

use crate::canvas::{Canvas, Ink};
use crate::palette::{hsl, Rgb};
use crate::scheduler::{FrameLoop, FrameTick};

pub const SHOW_DURATION_MS: u64 = 10_000;
pub const LAUNCH_CHANCE: f64 = 0.05;
pub const SHELL_GRAVITY: f32 = 0.15;
pub const SPARK_GRAVITY: f32 = 0.05;
pub const SPARKS_PER_BURST: usize = 80;
pub const SPARK_LIFE: u32 = 60;
pub const TRAIL_FADE: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shell {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Rgb,
    pub life: f32,
    pub spent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spark {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: u32,
    pub color: Rgb,
}

pub struct Fireworks {
    active: bool,
    deadline_ms: u64,
    shells: Vec<Shell>,
    sparks: Vec<Spark>,
    canvas: Canvas,
}

impl Fireworks {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            active: false,
            deadline_ms: 0,
            shells: Vec::new(),
            sparks: Vec::new(),
            canvas: Canvas::new(cols, rows),
        }
    }

    #[cfg(test)]
    pub fn shells(&self) -> &[Shell] {
        &self.shells
    }

    #[cfg(test)]
    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    /// Starts the show. A no-op while one is already running.
    pub fn trigger(&mut self, now_ms: u64) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.deadline_ms = now_ms + SHOW_DURATION_MS;
        tracing::debug!(deadline_ms = self.deadline_ms, "fireworks triggered");
        true
    }

    fn launch(&mut self, rng: &mut StdRng) {
        let w = self.canvas.width_px();
        let hue = rng.random_range(0..360) as f32;
        self.shells.push(Shell {
            x: rng.random::<f32>() * w * 0.8 + w * 0.1,
            y: self.canvas.height_px(),
            vx: (rng.random::<f32>() - 0.5) * 2.0,
            vy: -(rng.random::<f32>() * 6.0 + 9.0),
            color: hsl(hue, 0.9, 0.6),
            life: rng.random::<f32>() * 20.0 + 40.0,
            spent: false,
        });
    }

    fn burst(sparks: &mut Vec<Spark>, x: f32, y: f32, color: Rgb, rng: &mut StdRng) {
        sparks.extend((0..SPARKS_PER_BURST).map(|_| {
            let angle = rng.random::<f32>() * TAU;
            let speed = rng.random::<f32>() * 4.0 + 2.0;
            Spark {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life: SPARK_LIFE,
                color,
            }
        }));
    }
}

impl FrameLoop for Fireworks {
    fn name(&self) -> &'static str {
        "fireworks"
    }

    fn is_running(&self) -> bool {
        self.active
    }

    fn frame(&mut self, tick: &FrameTick, rng: &mut StdRng) {
        if !self.active {
            return;
        }
        let now_ms = tick.elapsed_ms;
        let in_show = now_ms <= self.deadline_ms;

        self.canvas.fade(TRAIL_FADE);
        if in_show && rng.random_bool(LAUNCH_CHANCE) {
            self.launch(rng);
        }

        for s in &mut self.shells {
            s.x += s.vx;
            s.y += s.vy;
            s.vy += SHELL_GRAVITY;
            s.life -= 1.0;
            if s.life <= 0.0 {
                Self::burst(&mut self.sparks, s.x, s.y, s.color, rng);
                s.spent = true;
            }
        }
        let floor = self.canvas.height_px();
        self.shells.retain(|s| s.y < floor && !s.spent);

        for sp in &mut self.sparks {
            sp.x += sp.vx;
            sp.y += sp.vy;
            sp.vy += SPARK_GRAVITY;
            sp.life = sp.life.saturating_sub(1);
            let ch = if sp.life > SPARK_LIFE / 2 { '■' } else { '▪' };
            self.canvas.plot(sp.x, sp.y, Ink::new(ch, sp.color, 1.0));
        }
        self.sparks.retain(|sp| sp.life > 0);

        if !in_show && self.shells.is_empty() && self.sparks.is_empty() {
            self.active = false;
            self.canvas.clear();
            tracing::debug!(now_ms, "fireworks finished");
        }
    }

    fn resize(&mut self, cols: u16, rows: u16, _rng: &mut StdRng) {
        self.canvas.resize(cols, rows);
    }

    fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const FRAME_MS: u64 = 16;

    fn run_until_idle(fw: &mut Fireworks, rng: &mut StdRng, start_ms: u64) -> (u64, usize) {
        let mut now = start_ms;
        let mut peak_sparks = 0;
        while fw.is_running() {
            fw.frame(&FrameTick { elapsed_ms: now }, rng);
            peak_sparks = peak_sparks.max(fw.sparks().len());
            now += FRAME_MS;
            assert!(now < start_ms + SHOW_DURATION_MS * 10, "show never ended");
        }
        (now, peak_sparks)
    }

    #[test]
    fn trigger_is_idempotent_while_active() {
        let mut fw = Fireworks::new(40, 20);
        assert!(!fw.is_running());
        assert!(fw.trigger(1_000));
        assert!(!fw.trigger(2_000));
        assert!(fw.is_running());
    }

    #[test]
    fn show_terminates_shortly_after_deadline() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut fw = Fireworks::new(80, 24);
        fw.trigger(0);
        let (ended_ms, peak_sparks) = run_until_idle(&mut fw, &mut rng, 0);

        // Longest fuse plus a full spark life after the last possible launch.
        let bound = SHOW_DURATION_MS + (60 + SPARK_LIFE as u64 + 2) * FRAME_MS;
        assert!(ended_ms <= bound, "ended at {ended_ms}, bound {bound}");
        assert!(ended_ms > SHOW_DURATION_MS);
        assert!(peak_sparks >= SPARKS_PER_BURST);
        assert!(fw.canvas().is_blank());
        assert!(fw.shells().is_empty() && fw.sparks().is_empty());
    }

    #[test]
    fn can_be_triggered_again_after_finishing() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut fw = Fireworks::new(40, 20);
        fw.trigger(0);
        let (ended_ms, _) = run_until_idle(&mut fw, &mut rng, 0);
        assert!(fw.trigger(ended_ms));
        assert!(fw.is_running());
    }

    #[test]
    fn spent_shell_bursts_into_sparks_of_its_colour() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut fw = Fireworks::new(40, 20);
        fw.trigger(0);
        let color = Rgb(10, 20, 30);
        fw.shells.push(Shell {
            x: 100.0,
            y: 200.0,
            vx: 0.0,
            vy: -5.0,
            color,
            life: 1.0,
            spent: false,
        });
        fw.frame(&FrameTick { elapsed_ms: 16 }, &mut rng);

        let ours: Vec<&Spark> = fw.sparks().iter().filter(|s| s.color == color).collect();
        assert_eq!(ours.len(), SPARKS_PER_BURST);
        assert!(ours.iter().all(|s| s.life == SPARK_LIFE - 1));
        assert!(fw.shells().iter().all(|s| s.color != color));
    }

    #[test]
    fn shells_decelerate_under_gravity() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut fw = Fireworks::new(40, 20);
        fw.trigger(0);
        fw.shells.push(Shell {
            x: 100.0,
            y: 300.0,
            vx: 0.5,
            vy: -10.0,
            color: Rgb(1, 2, 3),
            life: 50.0,
            spent: false,
        });
        fw.frame(&FrameTick { elapsed_ms: 16 }, &mut rng);
        let s = fw
            .shells()
            .iter()
            .find(|s| s.color == Rgb(1, 2, 3))
            .copied()
            .unwrap();
        assert_eq!(s.y, 290.0);
        assert_eq!(s.x, 100.5);
        assert!((s.vy - (-10.0 + SHELL_GRAVITY)).abs() < 1e-6);
        assert_eq!(s.life, 49.0);
    }
}
