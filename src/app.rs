// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::fireworks::Fireworks;
use crate::frame::Frame;
use crate::geo::{DistanceModel, LAUSANNE, QUEBEC};
use crate::messages::{daily_quote, MessageRotator};
use crate::overlay::PhotoOverlay;
use crate::palette::SKY;
use crate::panel::{self, PanelLayout, PanelText};
use crate::particles::ParticleSystem;
use crate::plane::PlaneTrack;
use crate::runtime::{ColorMode, ParticleKind};
use crate::scene::Scene;
use crate::scheduler::{run_frame, FrameLoop, FrameTick, Interval};
use crate::stars::StarField;
use crate::terminal::{restore_terminal_best_effort, Terminal};
use crate::trip::{format_in_zone, CountdownClock, TripWindow};

pub const MIN_COLS: u16 = 20;
pub const MIN_ROWS: u16 = 10;
pub const READOUT_PERIOD: Duration = Duration::from_secs(1);
pub const MESSAGE_PERIOD: Duration = Duration::from_secs(4);

const ZONE_CLOCKS: [(&str, Tz); 2] = [
    ("Lausanne", chrono_tz::Europe::Zurich),
    ("Québec", chrono_tz::America::Toronto),
];

#[derive(Clone, Debug)]
pub struct DashboardSettings {
    pub fps: f64,
    pub duration: Option<Duration>,
    pub color_mode: ColorMode,
    pub particles: bool,
    pub particle_kind: ParticleKind,
    pub photos: Vec<String>,
    pub window: TripWindow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub struct Dashboard {
    cols: u16,
    rows: u16,
    color_mode: ColorMode,
    clock: CountdownClock,
    distance: DistanceModel,
    rotator: MessageRotator,
    overlay: PhotoOverlay,
    stars: StarField,
    particles: ParticleSystem,
    fireworks: Fireworks,
    plane: PlaneTrack,
    layout: PanelLayout,
    text: PanelText,
    readouts: Interval,
    message_timer: Interval,
    rng: StdRng,
    started: Instant,
}

impl Dashboard {
    pub fn new(
        settings: &DashboardSettings,
        cols: u16,
        rows: u16,
        started: Instant,
        mut rng: StdRng,
    ) -> Self {
        let layout = panel::layout(cols, rows);
        let mut particles = ParticleSystem::new(cols, rows, settings.particle_kind);
        if settings.particles {
            particles.toggle();
        }
        let mut dash = Self {
            cols,
            rows,
            color_mode: settings.color_mode,
            clock: CountdownClock::new(settings.window.clone()),
            distance: DistanceModel::between(LAUSANNE.coords, QUEBEC.coords),
            rotator: MessageRotator::default(),
            overlay: PhotoOverlay::new(settings.photos.clone()),
            stars: StarField::new(cols, rows, &mut rng),
            particles,
            fireworks: Fireworks::new(cols, rows),
            plane: PlaneTrack::new(LAUSANNE, QUEBEC, layout.map.w, layout.map.h),
            layout,
            text: PanelText::default(),
            readouts: Interval::new(READOUT_PERIOD),
            message_timer: Interval::new(MESSAGE_PERIOD),
            rng,
            started,
        };
        dash.refresh_footer();
        dash
    }

    #[cfg(test)]
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    #[cfg(test)]
    pub fn text(&self) -> &PanelText {
        &self.text
    }

    #[cfg(test)]
    pub fn fireworks(&self) -> &Fireworks {
        &self.fireworks
    }

    #[cfg(test)]
    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    #[cfg(test)]
    pub fn overlay(&self) -> &PhotoOverlay {
        &self.overlay
    }

    pub fn update(&mut self, now: Instant, wall: DateTime<Utc>) {
        let tick = FrameTick::since(self.started, now);
        if self.readouts.poll(now) {
            self.refresh_readouts(&tick, wall);
        }
        if self.message_timer.poll(now) {
            self.text.message = self.rotator.next_message().to_string();
        }

        let mut loops: [&mut dyn FrameLoop; 4] = [
            &mut self.stars,
            &mut self.particles,
            &mut self.plane,
            &mut self.fireworks,
        ];
        run_frame(&mut loops, &tick, &mut self.rng);
    }

    fn refresh_readouts(&mut self, tick: &FrameTick, wall: DateTime<Utc>) {
        let reading = self.clock.tick(wall);
        if reading.completed_now && self.fireworks.trigger(tick.elapsed_ms) {
            tracing::info!("countdown reached zero, starting fireworks");
        }

        self.text.countdown = reading.countdown.to_string();
        self.text.percent = reading.progress.percent;
        self.text.progress_label = reading.progress.label();
        self.text.clocks = ZONE_CLOCKS
            .iter()
            .map(|(label, tz)| format!("{}: {}", label, format_in_zone(wall, *tz)))
            .collect();
        self.text.distance = format!(
            "Distance réelle: {:.0} km · symbolique: {:.0} km",
            self.distance.real_km(),
            self.distance.symbolic_km(self.clock.window(), wall)
        );
        self.text.quote = format!("« {} »", daily_quote(wall));
    }

    fn refresh_footer(&mut self) {
        let state = if self.particles.is_running() {
            "on"
        } else {
            "off"
        };
        self.text.footer = format!(
            "q: quitter · h: {} {} · m: motif · p: photo",
            self.particles.kind().label(),
            state
        );
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.layout = panel::layout(cols, rows);
        let map = self.layout.map;
        let layers: [(&mut dyn FrameLoop, u16, u16); 4] = [
            (&mut self.stars, cols, rows),
            (&mut self.particles, cols, rows),
            (&mut self.fireworks, cols, rows),
            (&mut self.plane, map.w, map.h),
        ];
        for (layer, w, h) in layers {
            tracing::debug!(layer = layer.name(), cols = w, rows = h, "resizing layer");
            layer.resize(w, h, &mut self.rng);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
        match (code, modifiers) {
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                return KeyOutcome::Quit
            }
            (KeyCode::Char('q'), _) => return KeyOutcome::Quit,
            (KeyCode::Esc, _) => {
                if !self.overlay.is_visible() {
                    return KeyOutcome::Quit;
                }
                self.overlay.close();
            }
            (KeyCode::Char('x'), _) => self.overlay.close(),
            (KeyCode::Char('p'), _) => {
                let photo = self.overlay.show_next();
                tracing::debug!(photo, "showing photo");
            }
            (KeyCode::Char('h'), _) => {
                let on = self.particles.toggle();
                tracing::debug!(on, "particles toggled");
                self.refresh_footer();
            }
            (KeyCode::Char('m'), _) => {
                let kind = self.particles.kind().next();
                self.particles.set_kind(kind);
                self.refresh_footer();
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    pub fn render(&self, frame: &mut Frame) {
        let mut scene = Scene::new(self.cols, self.rows, SKY);
        scene.layer(self.stars.canvas(), 0, 0);
        scene.layer(self.particles.canvas(), 0, 0);
        panel::draw_panel(&mut scene, &self.layout, &self.text);
        scene.layer(self.plane.canvas(), self.layout.map.x, self.layout.map.y);
        scene.layer(self.fireworks.canvas(), 0, 0);
        if let Some((i, source)) = self.overlay.current() {
            panel::draw_overlay(&mut scene, i + 1, self.overlay.count(), source);
        }
        scene.blit(frame, self.color_mode);
    }
}

pub fn install_terminal_guards() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal_best_effort();
        default_hook(info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            tracing::warn!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

pub fn run(settings: DashboardSettings) -> anyhow::Result<()> {
    install_terminal_guards();

    let mut term = Terminal::new().context("failed to initialize terminal")?;
    let (w, h) = term.size().context("failed to query terminal size")?;
    if w < MIN_COLS || h < MIN_ROWS {
        drop(term);
        bail!(
            "terminal too small: {}x{} (need at least {}x{})",
            w,
            h,
            MIN_COLS,
            MIN_ROWS
        );
    }

    let start_time = Instant::now();
    let bg = SKY.to_color(settings.color_mode);
    let mut dash = Dashboard::new(&settings, w, h, start_time, StdRng::from_os_rng());
    let mut frame = Frame::new(w, h, bg);
    tracing::info!(
        cols = w,
        rows = h,
        fps = settings.fps,
        start = %settings.window.start(),
        target = %settings.window.end(),
        "dashboard started"
    );

    let end_time = settings.duration.map(|d| start_time + d);
    let target_period = Duration::from_secs_f64(1.0 / settings.fps);
    let mut next_frame = start_time;
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if dash.handle_key(k.code, k.modifiers) == KeyOutcome::Quit {
                            running = false;
                            break;
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            dash.resize(nw, nh);
            frame = Frame::new(nw, nh, bg);
        }

        let now = Instant::now();
        dash.update(now, Utc::now());
        dash.render(&mut frame);
        if frame.is_dirty_all() || !frame.dirty_indices().is_empty() {
            term.draw(&mut frame)?;
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    tracing::info!(
        elapsed_s = start_time.elapsed().as_secs_f64(),
        "dashboard stopped"
    );
    Ok(())
}
