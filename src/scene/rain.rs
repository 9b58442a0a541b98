use eframe::egui::{Color32, Pos2};
use rand::Rng;

use super::surface::{Surface, fade};
use super::trackers::Viewport;

const SYMBOLS: [char; 2] = ['0', '1'];
const CELL_SPACING: f32 = 15.0;
const FONT_SIZE: f32 = 12.0;
const WRAP_MARGIN: f32 = 100.0;
const DRAW_MARGIN: f32 = 20.0;

pub struct RainCell {
    pub symbol: char,
    pub opacity: f32,
}

pub struct RainColumn {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub opacity: f32,
    pub cells: Vec<RainCell>,
}

impl RainColumn {
    fn random(viewport: Viewport, rng: &mut impl Rng) -> Self {
        let cell_count = rng.random_range(5..25usize);
        let cells = (0..cell_count)
            .map(|index| RainCell {
                symbol: SYMBOLS[rng.random_range(0..SYMBOLS.len())],
                opacity: (1.0 - (index as f32 / cell_count as f32)).max(0.0),
            })
            .collect();

        Self {
            x: random_below(rng, viewport.width),
            y: random_below(rng, viewport.height),
            speed: rng.random::<f32>() * 2.0 + 1.0,
            opacity: rng.random::<f32>() * 0.5 + 0.1,
            cells,
        }
    }

    fn advance(&mut self, viewport: Viewport, rng: &mut impl Rng) {
        self.y += self.speed;
        if self.y > viewport.height + WRAP_MARGIN {
            self.y = -WRAP_MARGIN;
            self.x = random_below(rng, viewport.width);
        }
    }
}

fn random_below(rng: &mut impl Rng, limit: f32) -> f32 {
    if limit > 0.0 {
        rng.random_range(0.0..limit)
    } else {
        0.0
    }
}

/// Falling binary symbol columns. Column and cell counts never change after creation.
pub struct RainLayer {
    columns: Vec<RainColumn>,
    color: Color32,
}

impl RainLayer {
    pub fn new(column_count: usize, viewport: Viewport, rng: &mut impl Rng) -> Self {
        let columns = (0..column_count)
            .map(|_| RainColumn::random(viewport, rng))
            .collect();
        Self::from_columns(columns)
    }

    pub fn from_columns(columns: Vec<RainColumn>) -> Self {
        Self {
            columns,
            color: Color32::from_rgba_unmultiplied(56, 189, 248, 77),
        }
    }

    #[cfg(test)]
    pub fn columns(&self) -> &[RainColumn] {
        &self.columns
    }

    pub fn update(&mut self, viewport: Viewport, rng: &mut impl Rng) {
        for column in &mut self.columns {
            column.advance(viewport, rng);
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, viewport: Viewport) {
        if !viewport.is_drawable() {
            return;
        }

        for column in &self.columns {
            for (index, cell) in column.cells.iter().enumerate() {
                let y = column.y + (index as f32 * CELL_SPACING);
                if y <= -DRAW_MARGIN || y >= viewport.height + DRAW_MARGIN {
                    continue;
                }

                let color = fade(self.color, cell.opacity * column.opacity);
                surface.glyph(Pos2::new(column.x, y), cell.symbol, FONT_SIZE, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::super::surface::recording::{DrawCall, RecordingSurface};
    use super::super::trackers::Viewport;
    use super::{RainCell, RainColumn, RainLayer};

    fn column_at(x: f32, y: f32, cells: usize) -> RainColumn {
        RainColumn {
            x,
            y,
            speed: 1.5,
            opacity: 0.5,
            cells: (0..cells)
                .map(|index| RainCell {
                    symbol: '1',
                    opacity: 1.0 - (index as f32 / cells as f32),
                })
                .collect(),
        }
    }

    #[test]
    fn column_below_margin_wraps_to_top() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut rain = RainLayer::from_columns(vec![column_at(42.0, 750.0, 5)]);

        rain.update(viewport, &mut rng);

        let column = &rain.columns()[0];
        assert_eq!(column.y, -100.0);
        assert!((0.0..800.0).contains(&column.x));
    }

    #[test]
    fn column_inside_surface_just_falls() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(11);
        let mut rain = RainLayer::from_columns(vec![column_at(42.0, 100.0, 5)]);

        rain.update(viewport, &mut rng);

        assert_eq!(rain.columns()[0].y, 101.5);
        assert_eq!(rain.columns()[0].x, 42.0);
    }

    #[test]
    fn random_columns_have_a_front_to_back_fade() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut rng = StdRng::seed_from_u64(5);
        let rain = RainLayer::new(50, viewport, &mut rng);

        assert_eq!(rain.columns().len(), 50);
        for column in rain.columns() {
            assert!((5..25).contains(&column.cells.len()));
            assert!((1.0..3.0).contains(&column.speed));
            assert!((0.1..0.6).contains(&column.opacity));
            assert_eq!(column.cells[0].opacity, 1.0);
            assert!(
                column
                    .cells
                    .windows(2)
                    .all(|pair| pair[0].opacity > pair[1].opacity)
            );
        }
    }

    #[test]
    fn offscreen_cells_are_skipped() {
        let viewport = Viewport::new(800.0, 600.0);
        // cells at -30, -15, 0, 15
        let rain = RainLayer::from_columns(vec![column_at(10.0, -30.0, 4)]);
        let mut surface = RecordingSurface::default();

        rain.draw(&mut surface, viewport);

        let drawn = surface
            .calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Glyph { position, .. } => Some(position.y),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(drawn, vec![-15.0, 0.0, 15.0]);
    }
}
