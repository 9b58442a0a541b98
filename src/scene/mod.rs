mod grid;
mod links;
mod nodes;
mod rain;
mod surface;
mod trackers;

use rand::rngs::StdRng;

pub use links::DEFAULT_LINK_DISTANCE;
pub use surface::Surface;
pub use trackers::Viewport;

use grid::GridLayer;
use links::build_links;
use nodes::{NodeField, NodePalette};
use rain::RainLayer;
use trackers::PointerState;

use crate::config::BackdropConfig;

/// Identifies one armed tick. Only the currently armed ticket may run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket(u64);

impl FrameTicket {
    #[cfg(test)]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Host primitive that invokes the next tick at its own discretion.
pub trait FrameScheduler {
    fn schedule(&mut self, ticket: FrameTicket);
    fn cancel(&mut self);
}

/// Owns every layer and tracker and runs them once per tick in a fixed order.
pub struct RenderLoop {
    viewport: Viewport,
    pointer: PointerState,
    grid: GridLayer,
    rain: RainLayer,
    nodes: NodeField,
    link_distance: f32,
    rng: StdRng,
    frame: u64,
    armed: Option<FrameTicket>,
    next_ticket: u64,
    listening: bool,
}

impl RenderLoop {
    pub fn new(config: &BackdropConfig, viewport: Viewport, mut rng: StdRng) -> Self {
        let palette = NodePalette {
            primary: config.primary_color,
            secondary: config.secondary_color,
            connection: config.connection_color,
        };

        Self {
            grid: GridLayer::new(config.grid_spacing),
            rain: RainLayer::new(config.rain_columns, viewport, &mut rng),
            nodes: NodeField::new(config.node_count, viewport, palette, &mut rng),
            link_distance: config.link_distance,
            viewport,
            pointer: PointerState::default(),
            rng,
            frame: 0,
            armed: None,
            next_ticket: 0,
            listening: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.armed.is_some()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Attaches the input handlers and arms the first tick.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.is_running() {
            return;
        }

        log::info!(
            "render loop started at {}x{}",
            self.viewport.width,
            self.viewport.height
        );
        self.listening = true;
        self.arm(scheduler);
    }

    /// After this returns no tick runs and input handlers are detached.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.listening && self.armed.is_none() {
            return;
        }

        log::info!("render loop stopped after {} frames", self.frame);
        self.armed = None;
        self.listening = false;
        scheduler.cancel();
    }

    pub fn handle_resize(&mut self, width: f32, height: f32) {
        if self.listening {
            self.viewport.handle_resize(width, height);
        }
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) {
        if self.listening {
            self.pointer.handle_pointer_move(x, y);
        }
    }

    /// Runs one frame if `ticket` is the armed one. Returns whether it ran.
    pub fn tick(
        &mut self,
        ticket: FrameTicket,
        surface: &mut dyn Surface,
        scheduler: &mut dyn FrameScheduler,
    ) -> bool {
        if self.armed != Some(ticket) {
            return false;
        }
        self.armed = None;
        self.frame += 1;

        if self.viewport.is_drawable() {
            surface.clear();
            self.grid.draw(surface, self.viewport, self.frame);
            self.rain.update(self.viewport, &mut self.rng);
            self.rain.draw(surface, self.viewport);
            self.nodes.update(self.viewport, self.pointer);
            let links = build_links(self.nodes.positions(), self.link_distance);
            self.nodes.draw(surface, &links);
        }

        self.arm(scheduler);
        true
    }

    fn arm(&mut self, scheduler: &mut dyn FrameScheduler) {
        let ticket = FrameTicket(self.next_ticket);
        self.next_ticket += 1;
        self.armed = Some(ticket);
        scheduler.schedule(ticket);
    }
}
