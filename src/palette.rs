// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const SKY: Rgb = Rgb(11, 16, 32);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const HEART_PINK: Rgb = Rgb(236, 72, 153);
pub const PETAL_PINK: Rgb = Rgb(244, 114, 182);
pub const TEXT: Rgb = Rgb(229, 231, 235);
pub const MUTED: Rgb = Rgb(148, 163, 184);
pub const TRACK: Rgb = Rgb(51, 65, 85);

impl Rgb {
    pub fn over(self, under: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        Rgb(
            lerp_u8(under.0, self.0, a),
            lerp_u8(under.1, self.1, a),
            lerp_u8(under.2, self.2, a),
        )
    }

    pub fn to_color(self, mode: ColorMode) -> Option<Color> {
        let Rgb(r, g, b) = self;
        match mode {
            ColorMode::Mono => None,
            ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
            ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
            ColorMode::Color16 => Some(rgb_to_color16(r, g, b)),
        }
    }
}

pub fn hsl(hue_deg: f32, s: f32, l: f32) -> Rgb {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(to_u8(r1), to_u8(g1), to_u8(b1))
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| (((v as u16 * 5) + 127) / 255) as u8;
    let (r6, g6, b6) = (level(r), level(g), level(b));
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;
    let cube_dist = dist2(
        r,
        g,
        b,
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gv) = match avg {
        0..=7 => (16, 0),
        239..=255 => (231, 255),
        _ => {
            let step = (avg - 8) / 10;
            (232 + step, 8 + 10 * step)
        }
    };
    let gray_dist = dist2(r, g, b, gv, gv, gv);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, (cr, cg, cb))| dist2(r, g, b, *cr, *cg, *cb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}
