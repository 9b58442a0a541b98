use std::f32::consts::TAU;

use eframe::egui::{Color32, Pos2, Vec2, vec2};
use rand::Rng;

use super::links::LinkGraph;
use super::surface::{Surface, fade};
use super::trackers::{PointerState, Viewport};

const INFLUENCE_RADIUS: f32 = 150.0;
const ENERGY_GAIN: f32 = 0.02;
const ENERGY_DECAY: f32 = 0.95;
const PULSE_STEP: f32 = 0.05;
const GLOW_THRESHOLD: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct Node {
    pub position: Pos2,
    pub velocity: Vec2,
    pub radius: f32,
    pub energy: f32,
    pub pulse_phase: f32,
    pub active: bool,
}

impl Node {
    fn random(viewport: Viewport, rng: &mut impl Rng) -> Self {
        Self {
            position: Pos2::new(
                rng.random::<f32>() * viewport.width,
                rng.random::<f32>() * viewport.height,
            ),
            velocity: vec2(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 0.3,
            radius: rng.random::<f32>() * 4.0 + 2.0,
            energy: rng.random::<f32>(),
            pulse_phase: rng.random::<f32>() * TAU,
            active: false,
        }
    }

    fn step(&mut self, viewport: Viewport, pointer: PointerState) {
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > viewport.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > viewport.height {
            self.velocity.y = -self.velocity.y;
        }
        self.position = viewport.clamp(self.position);

        let pointer_distance = pointer
            .position()
            .map_or(f32::INFINITY, |pointer| pointer.distance(self.position));
        self.active = pointer_distance < INFLUENCE_RADIUS;
        if self.active {
            let force = (INFLUENCE_RADIUS - pointer_distance) / INFLUENCE_RADIUS;
            self.energy = (self.energy + force * ENERGY_GAIN).min(1.0);
        } else {
            self.energy *= ENERGY_DECAY;
        }

        self.pulse_phase = (self.pulse_phase + PULSE_STEP).rem_euclid(TAU);
    }

    fn core_radius(&self) -> f32 {
        (self.radius + self.pulse_phase.sin() * 2.0).max(0.0)
    }

    fn glow_radius(&self) -> f32 {
        self.radius + self.energy * 10.0
    }
}

#[derive(Clone, Copy, Debug)]
pub struct NodePalette {
    pub primary: Color32,
    pub secondary: Color32,
    pub connection: Color32,
}

/// Fixed population of drifting nodes that charge up near the pointer.
pub struct NodeField {
    nodes: Vec<Node>,
    palette: NodePalette,
    positions: Vec<Pos2>,
}

impl NodeField {
    pub fn new(count: usize, viewport: Viewport, palette: NodePalette, rng: &mut impl Rng) -> Self {
        let nodes = (0..count).map(|_| Node::random(viewport, rng)).collect();
        Self::from_nodes(nodes, palette)
    }

    pub fn from_nodes(nodes: Vec<Node>, palette: NodePalette) -> Self {
        Self {
            positions: Vec::with_capacity(nodes.len()),
            nodes,
            palette,
        }
    }

    #[cfg(test)]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn update(&mut self, viewport: Viewport, pointer: PointerState) {
        for node in &mut self.nodes {
            node.step(viewport, pointer);
        }
    }

    /// Positions snapshot for the link builder; reuses one buffer across frames.
    pub fn positions(&mut self) -> &[Pos2] {
        self.positions.clear();
        self.positions
            .extend(self.nodes.iter().map(|node| node.position));
        &self.positions
    }

    pub fn draw(&self, surface: &mut dyn Surface, links: &LinkGraph) {
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(node_links) = links.get(index) else {
                continue;
            };
            for link in node_links {
                let Some(other) = self.nodes.get(link.other) else {
                    continue;
                };
                let opacity = link.strength * 0.3 * (node.energy + other.energy);
                surface.line(
                    node.position,
                    other.position,
                    1.0,
                    fade(self.palette.connection, opacity),
                );
            }
        }

        for node in &self.nodes {
            let color = if node.active {
                self.palette.primary
            } else {
                self.palette.secondary
            };

            if node.energy > GLOW_THRESHOLD {
                surface.radial_glow(
                    node.position,
                    node.glow_radius(),
                    fade(color, node.energy * 0.5),
                    Color32::TRANSPARENT,
                );
            }

            surface.fill_circle(
                node.position,
                node.core_radius(),
                fade(color, 0.8 + node.energy * 0.2),
            );
        }
    }
}
