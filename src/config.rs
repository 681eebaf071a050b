// Copyright (c) 2026 rezky_nightky

use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, ensure, Context};
use clap::{Parser, Subcommand};

use crate::app::DashboardSettings;
use crate::runtime::{ColorMode, ParticleKind};
use crate::server::ServeSettings;
use crate::trip::{
    TripWindow, DEFAULT_START, DEFAULT_START_ZONE, DEFAULT_TARGET, DEFAULT_TARGET_ZONE,
};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  rendezvous --fps 60 --particle-kind hearts --start 2025-08-24T10:00:00 --start-zone Europe/Zurich --target 2025-12-20T16:00:00 --target-zone America/Toronto\n  rendezvous serve --dist dist --port 3000 --host 0.0.0.0";

pub fn color_enabled_stdout() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_usage(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        if !line.starts_with(' ') && line.ends_with(':') {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("  rendezvous") {
            out.push_str("  \x1b[1;34mrendezvous\x1b[0m");
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_usage(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rendezvous",
    version,
    about = "Countdown dashboard for the Lausanne ✈ Québec reunion",
    args_conflicts_with_subcommands = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub dashboard: DashboardArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the built web page as static files
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct DashboardArgs {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Append tracing output to this file (filter via RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        short = 'p',
        long = "particles",
        help_heading = "APPEARANCE",
        help = "Start with falling particles enabled"
    )]
    pub particles: bool,

    #[arg(
        long = "particle-kind",
        value_enum,
        default_value_t = ParticleKind::Hearts,
        help_heading = "APPEARANCE",
        help = "Falling particle kind"
    )]
    pub particle_kind: ParticleKind,

    #[arg(
        long = "photo",
        help_heading = "APPEARANCE",
        help = "Photo path or URL for the overlay (repeatable)"
    )]
    pub photos: Vec<String>,

    #[arg(
        long = "start",
        default_value = DEFAULT_START,
        help_heading = "TRIP",
        help = "Trip start as local time YYYY-MM-DDTHH:MM[:SS]"
    )]
    pub start: String,

    #[arg(
        long = "start-zone",
        default_value = DEFAULT_START_ZONE,
        help_heading = "TRIP",
        help = "IANA time zone of --start"
    )]
    pub start_zone: String,

    #[arg(
        long = "target",
        default_value = DEFAULT_TARGET,
        help_heading = "TRIP",
        help = "Reunion time as local time YYYY-MM-DDTHH:MM[:SS]"
    )]
    pub target: String,

    #[arg(
        long = "target-zone",
        default_value = DEFAULT_TARGET_ZONE,
        help_heading = "TRIP",
        help = "IANA time zone of --target"
    )]
    pub target_zone: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "dist", help = "Directory with the built page")]
    pub dist: PathBuf,

    #[arg(long, env = "PORT", default_value_t = 3000, help = "Port to listen on")]
    pub port: u16,

    #[arg(long, default_value = "0.0.0.0", help = "Address to bind")]
    pub host: String,
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> anyhow::Result<f64> {
    ensure!(
        v.is_finite(),
        "failed to apply {} {} (must be a finite number)",
        name,
        v
    );
    ensure!(
        (min..=max).contains(&v),
        "failed to apply {} {} (min {} max {})",
        name,
        v,
        min,
        max
    );
    Ok(v)
}

pub fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }

    ColorMode::Color256
}

pub fn parse_color_mode(m: Option<u16>) -> anyhow::Result<ColorMode> {
    let Some(m) = m else {
        return Ok(detect_color_mode_auto());
    };
    Ok(match m {
        0 => ColorMode::Mono,
        16 => ColorMode::Color16,
        8 | 256 => ColorMode::Color256,
        24 | 32 => ColorMode::TrueColor,
        _ => bail!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m),
    })
}

impl DashboardArgs {
    pub fn settings(&self) -> anyhow::Result<DashboardSettings> {
        let fps = require_f64_range("--fps", self.fps, 1.0, 240.0)?;
        let duration = match self.duration {
            Some(s) if !s.is_finite() => {
                bail!("failed to apply --duration {} (must be a finite number)", s)
            }
            Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
            _ => None,
        };

        let window = TripWindow::from_local(
            &self.start,
            &self.start_zone,
            &self.target,
            &self.target_zone,
        )
        .context("invalid trip window")?;

        Ok(DashboardSettings {
            fps,
            duration,
            color_mode: parse_color_mode(self.colormode)?,
            particles: self.particles,
            particle_kind: self.particle_kind,
            photos: self.photos.clone(),
            window,
        })
    }
}

impl ServeArgs {
    pub fn settings(&self) -> ServeSettings {
        ServeSettings {
            dist: self.dist.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_build_the_reunion_window() {
        let args = parse(&["rendezvous", "--colormode", "24"]);
        assert!(args.command.is_none());
        let s = args.dashboard.settings().unwrap();
        assert_eq!(s.fps, 60.0);
        assert_eq!(s.duration, None);
        assert_eq!(s.color_mode, ColorMode::TrueColor);
        assert_eq!(s.particle_kind, ParticleKind::Hearts);
        assert!(!s.particles);
        assert_eq!(s.window.start().to_rfc3339(), "2025-08-24T10:00:00+02:00");
        assert_eq!(s.window.end().to_rfc3339(), "2025-12-20T16:00:00-05:00");
    }

    #[test]
    fn dashboard_flags_parse() {
        let args = parse(&[
            "rendezvous",
            "--fps",
            "30",
            "--duration",
            "2.5",
            "--particles",
            "--particle-kind",
            "snow",
            "--photo",
            "a.jpg",
            "--photo",
            "b.jpg",
            "--colormode",
            "16",
        ]);
        let s = args.dashboard.settings().unwrap();
        assert_eq!(s.fps, 30.0);
        assert_eq!(s.duration, Some(Duration::from_millis(2500)));
        assert!(s.particles);
        assert_eq!(s.particle_kind, ParticleKind::Snow);
        assert_eq!(s.photos, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
        assert_eq!(s.color_mode, ColorMode::Color16);
    }

    #[test]
    fn non_positive_duration_disables_the_limit() {
        let args = parse(&["rendezvous", "--duration", "0", "--colormode", "0"]);
        assert_eq!(args.dashboard.settings().unwrap().duration, None);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let args = parse(&["rendezvous", "--fps", "500"]);
        let err = args.dashboard.settings().unwrap_err().to_string();
        assert!(err.contains("--fps"), "{err}");

        let args = parse(&["rendezvous", "--colormode", "7"]);
        assert!(args.dashboard.settings().is_err());

        let args = parse(&["rendezvous", "--duration", "100000"]);
        assert!(args.dashboard.settings().is_err());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let args = parse(&[
            "rendezvous",
            "--colormode",
            "0",
            "--start",
            "2026-01-01T00:00",
            "--target",
            "2025-01-01T00:00",
        ]);
        let err = args.dashboard.settings().unwrap_err();
        assert!(format!("{err:#}").contains("trip window"));
    }

    #[test]
    fn serve_subcommand_parses() {
        let args = parse(&["rendezvous", "serve", "--dist", "site", "--port", "8080"]);
        let Some(Command::Serve(serve)) = args.command else {
            panic!("expected serve");
        };
        let s = serve.settings();
        assert_eq!(s.dist, PathBuf::from("site"));
        assert_eq!(s.port, 8080);
        assert_eq!(s.host, "0.0.0.0");
    }

    #[test]
    fn colormode_aliases() {
        assert_eq!(parse_color_mode(Some(8)).unwrap(), ColorMode::Color256);
        assert_eq!(parse_color_mode(Some(256)).unwrap(), ColorMode::Color256);
        assert_eq!(parse_color_mode(Some(32)).unwrap(), ColorMode::TrueColor);
    }
}
