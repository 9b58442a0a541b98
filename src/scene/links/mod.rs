mod quadtree;

use eframe::egui::Pos2;

use quadtree::{QuadNode, collect_close_pairs};

pub const DEFAULT_LINK_DISTANCE: f32 = 120.0;
const SPATIAL_INDEX_MIN_NODES: usize = 160;

/// Proximity relation from one node to `other`, valid for the current frame only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub other: usize,
    pub distance: f32,
    pub strength: f32,
}

/// Per-node link lists, each sorted by `other`.
pub type LinkGraph = Vec<Vec<Link>>;

pub fn build_links(positions: &[Pos2], link_distance: f32) -> LinkGraph {
    let mut graph = vec![Vec::new(); positions.len()];
    if !(link_distance > 0.0) {
        return graph;
    }

    if positions.len() < SPATIAL_INDEX_MIN_NODES {
        for from in 0..positions.len() {
            for to in (from + 1)..positions.len() {
                let distance = positions[from].distance(positions[to]);
                if distance < link_distance {
                    record_pair(&mut graph, from, to, distance, link_distance);
                }
            }
        }
        return graph;
    }

    build_links_indexed(positions, link_distance, graph)
}

fn build_links_indexed(positions: &[Pos2], link_distance: f32, mut graph: LinkGraph) -> LinkGraph {
    let Some(tree) = QuadNode::build(positions) else {
        return graph;
    };

    let mut pairs = Vec::new();
    collect_close_pairs(&tree, &tree, true, positions, link_distance, &mut pairs);
    for (from, to, distance) in pairs {
        record_pair(&mut graph, from, to, distance, link_distance);
    }
    for links in &mut graph {
        links.sort_unstable_by_key(|link| link.other);
    }
    graph
}

fn record_pair(graph: &mut LinkGraph, from: usize, to: usize, distance: f32, link_distance: f32) {
    let strength = 1.0 - (distance / link_distance);
    graph[from].push(Link {
        other: to,
        distance,
        strength,
    });
    graph[to].push(Link {
        other: from,
        distance,
        strength,
    });
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Pos2, pos2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::{DEFAULT_LINK_DISTANCE, build_links, build_links_indexed};

    #[test]
    fn half_threshold_gives_half_strength() {
        let graph = build_links(&[pos2(100.0, 100.0), pos2(160.0, 100.0)], DEFAULT_LINK_DISTANCE);

        assert_eq!(graph[0].len(), 1);
        assert_eq!(graph[0][0].other, 1);
        assert_eq!(graph[0][0].distance, 60.0);
        assert!((graph[0][0].strength - 0.5).abs() < 1e-6);
        assert_eq!(graph[1][0].other, 0);
        assert_eq!(graph[1][0].strength, graph[0][0].strength);
    }

    #[test]
    fn pairs_at_or_beyond_threshold_are_not_linked() {
        let graph = build_links(
            &[pos2(0.0, 0.0), pos2(120.0, 0.0), pos2(400.0, 400.0)],
            DEFAULT_LINK_DISTANCE,
        );
        assert!(graph.iter().all(Vec::is_empty));
    }

    #[test]
    fn coincident_nodes_link_at_full_strength() {
        let graph = build_links(&[pos2(5.0, 5.0), pos2(5.0, 5.0)], DEFAULT_LINK_DISTANCE);
        assert_eq!(graph[0][0].strength, 1.0);
    }

    #[test]
    fn spatial_index_matches_pairwise_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut positions = (0..400)
            .map(|_| pos2(rng.random_range(0.0..1600.0), rng.random_range(0.0..900.0)))
            .collect::<Vec<Pos2>>();
        // clustered duplicates exercise the depth limit
        positions.extend(std::iter::repeat_n(pos2(800.0, 450.0), 30));

        let indexed = build_links(&positions, DEFAULT_LINK_DISTANCE);

        let mut pairwise = vec![Vec::new(); positions.len()];
        for from in 0..positions.len() {
            for to in 0..positions.len() {
                if from == to {
                    continue;
                }
                let distance = positions[from].distance(positions[to]);
                if distance < DEFAULT_LINK_DISTANCE {
                    pairwise[from].push((to, distance));
                }
            }
        }

        for (links, expected) in indexed.iter().zip(&pairwise) {
            let actual = links
                .iter()
                .map(|link| (link.other, link.distance))
                .collect::<Vec<_>>();
            assert_eq!(&actual, expected);
        }
    }

    #[test]
    fn indexed_path_handles_small_inputs() {
        let graph = build_links_indexed(
            &[pos2(0.0, 0.0), pos2(30.0, 40.0)],
            DEFAULT_LINK_DISTANCE,
            vec![Vec::new(); 2],
        );
        assert_eq!(graph[0][0].distance, 50.0);
        assert!(build_links_indexed(&[], DEFAULT_LINK_DISTANCE, Vec::new()).is_empty());
    }
}
