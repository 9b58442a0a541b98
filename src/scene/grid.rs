use eframe::egui::{Color32, Pos2};

use super::surface::{Surface, fade};
use super::trackers::Viewport;
use crate::config::MIN_GRID_SPACING;

const BASE_OPACITY: f32 = 0.1;
const OPACITY_SWING: f32 = 0.05;
const FRAME_RATE: f32 = 0.01;
const OFFSET_RATE: f32 = 0.01;

pub struct GridLayer {
    spacing: f32,
    color: Color32,
}

impl GridLayer {
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing,
            color: Color32::from_rgba_unmultiplied(56, 189, 248, 26),
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, viewport: Viewport, frame: u64) {
        if !viewport.is_drawable() || !(self.spacing >= MIN_GRID_SPACING) {
            return;
        }

        let mut x = 0.0;
        while x < viewport.width {
            let color = fade(self.color, line_opacity(frame, x));
            surface.line(Pos2::new(x, 0.0), Pos2::new(x, viewport.height), 1.0, color);
            x += self.spacing;
        }

        let mut y = 0.0;
        while y < viewport.height {
            let color = fade(self.color, line_opacity(frame, y));
            surface.line(Pos2::new(0.0, y), Pos2::new(viewport.width, y), 1.0, color);
            y += self.spacing;
        }
    }
}

/// Opacity of the grid line at `offset` after `frame` ticks.
pub fn line_opacity(frame: u64, offset: f32) -> f32 {
    let phase = (frame as f64 * FRAME_RATE as f64) + (offset as f64 * OFFSET_RATE as f64);
    BASE_OPACITY + (phase.sin() as f32 * OPACITY_SWING)
}
