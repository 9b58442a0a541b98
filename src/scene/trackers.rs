use eframe::egui::Pos2;

/// Current drawing-surface size. Written only by the resize handler.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// Zero-area viewports turn every draw of the tick into a no-op.
    pub fn is_drawable(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn clamp(self, point: Pos2) -> Pos2 {
        Pos2::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }

    /// Returns true when the stored size actually changed.
    pub fn handle_resize(&mut self, width: f32, height: f32) -> bool {
        let next = Self::new(width, height);
        if next == *self {
            return false;
        }

        log::debug!(
            "viewport resized {}x{} -> {}x{}",
            self.width,
            self.height,
            next.width,
            next.height
        );
        *self = next;
        true
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Last known pointer position in surface coordinates; absent until the first move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    position: Option<Pos2>,
}

impl PointerState {
    pub fn position(self) -> Option<Pos2> {
        self.position
    }

    /// Last writer wins. Non-finite coordinates are dropped and the old value kept.
    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            log::trace!("discarding non-finite pointer position ({x}, {y})");
            return false;
        }

        self.position = Some(Pos2::new(x, y));
        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::{PointerState, Viewport};

    #[test]
    fn resize_reports_changes_and_rejects_garbage() {
        let mut viewport = Viewport::new(800.0, 600.0);
        assert!(!viewport.handle_resize(800.0, 600.0));
        assert!(viewport.handle_resize(400.0, 300.0));
        assert_eq!(viewport, Viewport::new(400.0, 300.0));

        viewport.handle_resize(-5.0, f32::NAN);
        assert_eq!(viewport.width, 0.0);
        assert_eq!(viewport.height, 0.0);
        assert!(!viewport.is_drawable());
    }

    #[test]
    fn pointer_keeps_last_finite_position() {
        let mut pointer = PointerState::default();
        assert_eq!(pointer.position(), None);

        assert!(pointer.handle_pointer_move(10.0, 20.0));
        assert!(pointer.handle_pointer_move(30.0, 40.0));
        assert!(!pointer.handle_pointer_move(f32::INFINITY, 1.0));
        assert!(!pointer.handle_pointer_move(1.0, f32::NAN));

        assert_eq!(pointer.position(), Some(pos2(30.0, 40.0)));
    }
}
