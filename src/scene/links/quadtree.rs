use eframe::egui::{Pos2, Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 12;
const QUADTREE_MAX_DEPTH: usize = 10;
// Absorbs f32 rounding in child bounds so boundary points are never pruned.
const BOUNDS_SLACK: f32 = 0.5;

#[derive(Clone, Copy)]
struct QuadBounds {
    center: Pos2,
    half_extent: f32,
}

impl QuadBounds {
    fn from_points(points: &[Pos2]) -> Option<Self> {
        let mut min = Pos2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Pos2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let span = (max - min).max(vec2(1.0, 1.0));
        Some(Self {
            center: min + (max - min) * 0.5,
            half_extent: (span.x.max(span.y) * 0.5) + 1.0,
        })
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => vec2(-quarter, -quarter),
            1 => vec2(quarter, -quarter),
            2 => vec2(-quarter, quarter),
            _ => vec2(quarter, quarter),
        };

        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Pos2) -> usize {
        match (point.x >= self.center.x, point.y >= self.center.y) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    /// Smallest possible distance (squared) between a point in `self` and one in `other`.
    fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half_extent + other.half_extent + BOUNDS_SLACK;
        let gap = Vec2::new(
            ((self.center.x - other.center.x).abs() - reach).max(0.0),
            ((self.center.y - other.center.y).abs() - reach).max(0.0),
        );
        gap.length_sq()
    }
}

pub(super) struct QuadNode {
    bounds: QuadBounds,
    indices: Vec<usize>,
    children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Pos2]) -> Option<Self> {
        let bounds = QuadBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, 0))
    }

    fn build_node(bounds: QuadBounds, indices: Vec<usize>, positions: &[Pos2], depth: usize) -> Self {
        let mut node = Self {
            bounds,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.quadrant_for(positions[index])].push(index);
        }

        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            node.children[quadrant] = Some(Box::new(Self::build_node(
                bounds.child(quadrant),
                bucket,
                positions,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}

/// Dual-tree walk reporting every pair `(a, b, distance)` with `a < b` and
/// `distance < max_distance`.
pub(super) fn collect_close_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Pos2],
    max_distance: f32,
    pairs: &mut Vec<(usize, usize, f32)>,
) {
    if node_a.bounds.gap_sq(node_b.bounds) >= max_distance * max_distance {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    push_if_close(from, to, positions, max_distance, pairs);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    push_if_close(from, to, positions, max_distance, pairs);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_deref() else {
                continue;
            };

            collect_close_pairs(child_a, child_a, true, positions, max_distance, pairs);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_deref() else {
                    continue;
                };
                collect_close_pairs(child_a, child_b, false, positions, max_distance, pairs);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            collect_close_pairs(child, node_b, false, positions, max_distance, pairs);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            collect_close_pairs(node_a, child, false, positions, max_distance, pairs);
        }
    }
}

fn push_if_close(
    from: usize,
    to: usize,
    positions: &[Pos2],
    max_distance: f32,
    pairs: &mut Vec<(usize, usize, f32)>,
) {
    let (low, high) = if from < to { (from, to) } else { (to, from) };
    let distance = positions[low].distance(positions[high]);
    if distance < max_distance {
        pairs.push((low, high, distance));
    }
}
