use eframe::egui::{Color32, Pos2};

/// 2D raster target the layers paint into. Opacity is baked into every color.
pub trait Surface {
    fn clear(&mut self);
    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32);
    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);
    fn radial_glow(&mut self, center: Pos2, radius: f32, inner: Color32, outer: Color32);
    fn glyph(&mut self, position: Pos2, symbol: char, size: f32, color: Color32);
}

/// Scales the alpha of `color` by `opacity`, like a canvas global alpha.
pub fn fade(color: Color32, opacity: f32) -> Color32 {
    if !opacity.is_finite() {
        return Color32::TRANSPARENT;
    }
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
pub(crate) mod recording {
    use eframe::egui::{Color32, Pos2};

    use super::Surface;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum DrawCall {
        Clear,
        Line { from: Pos2, to: Pos2, color: Color32 },
        Circle { center: Pos2, radius: f32, color: Color32 },
        Glow { center: Pos2, radius: f32, inner: Color32 },
        Glyph { position: Pos2, symbol: char, color: Color32 },
    }

    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        pub(crate) fn lines(&self) -> impl Iterator<Item = (Pos2, Pos2)> + '_ {
            self.calls.iter().filter_map(|call| match call {
                DrawCall::Line { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
        }
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn line(&mut self, from: Pos2, to: Pos2, _width: f32, color: Color32) {
            self.calls.push(DrawCall::Line { from, to, color });
        }

        fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
            self.calls.push(DrawCall::Circle {
                center,
                radius,
                color,
            });
        }

        fn radial_glow(&mut self, center: Pos2, radius: f32, inner: Color32, _outer: Color32) {
            self.calls.push(DrawCall::Glow {
                center,
                radius,
                inner,
            });
        }

        fn glyph(&mut self, position: Pos2, symbol: char, _size: f32, color: Color32) {
            self.calls.push(DrawCall::Glyph {
                position,
                symbol,
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::fade;

    #[test]
    fn fade_scales_alpha_and_clamps() {
        let color = Color32::from_rgba_unmultiplied(56, 189, 248, 200);
        assert_eq!(fade(color, 1.0), color);
        assert_eq!(fade(color, 0.0).a(), 0);
        assert_eq!(fade(color, 4.0), color);
        assert!(fade(color, 0.5).a() < color.a());
        assert_eq!(fade(color, f32::NAN), Color32::TRANSPARENT);
    }
}
