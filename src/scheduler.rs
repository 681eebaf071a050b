// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use crate::canvas::Canvas;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    pub elapsed_ms: u64,
}

impl FrameTick {
    pub fn since(start: Instant, now: Instant) -> Self {
        Self {
            elapsed_ms: now.saturating_duration_since(start).as_millis() as u64,
        }
    }
}

pub trait FrameLoop {
    fn name(&self) -> &'static str;

    fn is_running(&self) -> bool;

    fn frame(&mut self, tick: &FrameTick, rng: &mut StdRng);

    fn resize(&mut self, cols: u16, rows: u16, rng: &mut StdRng);

    fn canvas(&self) -> &Canvas;
}

pub fn run_frame(loops: &mut [&mut dyn FrameLoop], tick: &FrameTick, rng: &mut StdRng) {
    for l in loops.iter_mut() {
        if l.is_running() {
            l.frame(tick, rng);
        }
    }
}

/// Fixed-period timer. Fires on the first poll, then once per period.
/// After a stall it fires once and re-anchors instead of bursting.
#[derive(Clone, Debug)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            None => {
                self.next_due = Some(now + self.period);
                true
            }
            Some(due) if now >= due => {
                let mut next = due + self.period;
                if now > next {
                    next = now + self.period;
                }
                self.next_due = Some(next);
                true
            }
            Some(_) => false,
        }
    }
}
