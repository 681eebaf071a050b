// Copyright (c) 2026 rezky_nightky

use crate::palette::{Rgb, HEART_PINK, MUTED, PETAL_PINK, TEXT, TRACK, WHITE};
use crate::scene::{Rect, Scene};

pub const PANEL_MAX_WIDTH: u16 = 68;
pub const MAP_MAX_ROWS: u16 = 5;
pub const TITLE: &str = "♥ Lausanne ✈ Québec ♥";

const CARD: Rgb = Rgb(17, 24, 39);
const MIN_PANEL_WIDTH: u16 = 20;
const TEXT_ROWS: u16 = 11;
const CHROME_ROWS: u16 = TEXT_ROWS + 3;
const OVERLAY_MAX_WIDTH: u16 = 60;
const OVERLAY_ROWS: u16 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PanelLayout {
    pub panel: Rect,
    pub inner: Rect,
    pub map: Rect,
}

pub fn layout(cols: u16, rows: u16) -> PanelLayout {
    let w = cols
        .saturating_sub(4)
        .min(PANEL_MAX_WIDTH)
        .max(cols.min(MIN_PANEL_WIDTH));
    let map_h = rows.saturating_sub(CHROME_ROWS + 2).min(MAP_MAX_ROWS);
    let h = (CHROME_ROWS + map_h).min(rows);
    let panel = Rect::new((cols - w) / 2, (rows - h) / 2, w, h);
    let inner = Rect::new(
        panel.x + 1,
        panel.y + 1,
        w.saturating_sub(2),
        h.saturating_sub(2),
    );
    let map = Rect::new(inner.x, inner.y + TEXT_ROWS, inner.w, map_h);
    PanelLayout { panel, inner, map }
}

#[derive(Clone, Debug, Default)]
pub struct PanelText {
    pub countdown: String,
    pub percent: f64,
    pub progress_label: String,
    pub message: String,
    pub clocks: Vec<String>,
    pub distance: String,
    pub quote: String,
    pub footer: String,
}

fn frame_box(scene: &mut Scene, rect: Rect, border: Rgb) {
    if rect.w < 2 || rect.h < 2 {
        return;
    }
    scene.fill(rect, CARD);
    let inner_w = rect.w as usize - 2;
    let top = format!("╭{}╮", "─".repeat(inner_w));
    let bottom = format!("╰{}╯", "─".repeat(inner_w));
    scene.text(rect.x as i32, rect.y as i32, &top, border, false);
    scene.text(rect.x as i32, rect.bottom() as i32 - 1, &bottom, border, false);
    for y in rect.y + 1..rect.bottom() - 1 {
        scene.text(rect.x as i32, y as i32, "│", border, false);
        scene.text(rect.right() as i32 - 1, y as i32, "│", border, false);
    }
}

pub fn progress_bar(percent: f64, width: usize) -> (usize, String) {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    (filled, "█".repeat(filled) + &"░".repeat(width - filled))
}

pub fn draw_panel(scene: &mut Scene, layout: &PanelLayout, text: &PanelText) {
    frame_box(scene, layout.panel, HEART_PINK);
    let inner = layout.inner;
    let line = |i: u16| inner.y + i;
    let visible = |y: u16| y < inner.bottom();

    let bar_w = inner.w.saturating_sub(4) as usize;
    let (filled, bar) = progress_bar(text.percent, bar_w);
    let bar_x = inner.x as i32 + 2;

    let mut rows: Vec<(u16, &str, Rgb, bool)> = vec![
        (0, TITLE, HEART_PINK, true),
        (2, text.countdown.as_str(), TEXT, true),
        (4, text.progress_label.as_str(), MUTED, false),
        (5, text.message.as_str(), PETAL_PINK, false),
        (9, text.distance.as_str(), MUTED, false),
        (10, text.quote.as_str(), MUTED, false),
    ];
    for (i, clock) in text.clocks.iter().take(2).enumerate() {
        rows.push((7 + i as u16, clock.as_str(), TEXT, false));
    }
    for (i, s, fg, bold) in rows {
        if visible(line(i)) {
            scene.text_centered(inner, line(i), s, fg, bold);
        }
    }

    if visible(line(3)) && bar_w > 0 {
        let done: String = bar.chars().take(filled).collect();
        let rest: String = bar.chars().skip(filled).collect();
        scene.text(bar_x, line(3) as i32, &done, HEART_PINK, false);
        scene.text(bar_x + filled as i32, line(3) as i32, &rest, TRACK, false);
    }

    let footer_y = layout.map.bottom();
    if visible(footer_y) {
        scene.text_centered(inner, footer_y, &text.footer, MUTED, false);
    }
}

pub fn draw_overlay(scene: &mut Scene, position: usize, count: usize, source: &str) {
    let w = scene
        .cols
        .saturating_sub(4)
        .min(OVERLAY_MAX_WIDTH)
        .max(scene.cols.min(MIN_PANEL_WIDTH));
    let h = OVERLAY_ROWS.min(scene.rows);
    let rect = Rect::new((scene.cols - w) / 2, (scene.rows - h) / 2, w, h);
    frame_box(scene, rect, WHITE);

    let inner = Rect::new(rect.x + 1, rect.y + 1, w.saturating_sub(2), h.saturating_sub(2));
    let lines = [
        (format!("Photo {position}/{count}"), WHITE, true),
        (source.to_string(), TEXT, false),
        (String::new(), TEXT, false),
        ("p: suivante · x/Échap: fermer".to_string(), MUTED, false),
    ];
    for (i, (s, fg, bold)) in lines.iter().enumerate() {
        let y = inner.y + 1 + i as u16;
        if y < inner.bottom() {
            scene.text_centered(inner, y, s, *fg, *bold);
        }
    }
}
