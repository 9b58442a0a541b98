use std::f32::consts::TAU;

use eframe::egui::{Align2, Color32, FontId, Mesh, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use crate::scene::Surface;

const GLOW_SEGMENTS: u32 = 32;

/// Collects surface draws as screen-space egui shapes anchored at `origin`.
///
/// The shapes are kept after the tick so frames without a tick can replay them.
pub(super) struct PainterSurface<'a> {
    painter: &'a Painter,
    origin: Vec2,
    shapes: Vec<Shape>,
}

impl<'a> PainterSurface<'a> {
    /// Fails when the rect cannot host a drawing (non-finite or empty).
    pub(super) fn acquire(painter: &'a Painter, rect: Rect) -> Option<Self> {
        if !rect.is_finite() || !rect.is_positive() {
            return None;
        }

        Some(Self {
            painter,
            origin: rect.min.to_vec2(),
            shapes: Vec::new(),
        })
    }

    pub(super) fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }

    fn to_screen(&self, point: Pos2) -> Pos2 {
        point + self.origin
    }
}

impl Surface for PainterSurface<'_> {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        if color.a() == 0 {
            return;
        }
        self.shapes.push(Shape::line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(width, color),
        ));
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        if radius <= 0.0 || color.a() == 0 {
            return;
        }
        self.shapes
            .push(Shape::circle_filled(self.to_screen(center), radius, color));
    }

    fn radial_glow(&mut self, center: Pos2, radius: f32, inner: Color32, outer: Color32) {
        if radius <= 0.0 {
            return;
        }

        let center = self.to_screen(center);
        let mut mesh = Mesh::default();
        mesh.colored_vertex(center, inner);
        for segment in 0..GLOW_SEGMENTS {
            let angle = (segment as f32 / GLOW_SEGMENTS as f32) * TAU;
            mesh.colored_vertex(center + vec2(angle.cos(), angle.sin()) * radius, outer);
        }
        for segment in 0..GLOW_SEGMENTS {
            let next = (segment + 1) % GLOW_SEGMENTS;
            mesh.add_triangle(0, segment + 1, next + 1);
        }
        self.shapes.push(Shape::mesh(mesh));
    }

    fn glyph(&mut self, position: Pos2, symbol: char, size: f32, color: Color32) {
        if color.a() == 0 {
            return;
        }
        let galley = self
            .painter
            .layout_no_wrap(symbol.to_string(), FontId::monospace(size), color);
        let rect = Align2::LEFT_BOTTOM.anchor_size(self.to_screen(position), galley.size());
        self.shapes.push(Shape::galley(rect.min, galley, color));
    }
}
