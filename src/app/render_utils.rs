use eframe::egui::{Color32, Mesh, Painter, Rect, Shape};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_premultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Static diagonal gradient behind the animation; stays visible when nothing animates.
pub(super) fn draw_backdrop(painter: &Painter, rect: Rect) {
    if !rect.is_finite() || !rect.is_positive() {
        return;
    }

    let start = Color32::from_rgba_unmultiplied(0, 0, 0, 242);
    let end = Color32::from_rgba_unmultiplied(17, 24, 39, 204);
    let middle = blend_color(start, end, 0.5);

    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), start);
    mesh.colored_vertex(rect.right_top(), middle);
    mesh.colored_vertex(rect.right_bottom(), end);
    mesh.colored_vertex(rect.left_bottom(), middle);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::blend_color;

    #[test]
    fn blend_interpolates_channels() {
        let black = Color32::from_rgba_premultiplied(0, 0, 0, 255);
        let white = Color32::from_rgba_premultiplied(200, 200, 200, 255);
        assert_eq!(blend_color(black, white, 0.0), black);
        assert_eq!(blend_color(black, white, 2.0), white);
        assert_eq!(
            blend_color(black, white, 0.5),
            Color32::from_rgba_premultiplied(100, 100, 100, 255)
        );
    }
}
