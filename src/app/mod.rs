use std::time::{Duration, Instant};

use eframe::egui::{
    self, Align2, Color32, Context, FontId, Key, Painter, Rect, Sense, Shape, vec2,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::BackdropConfig;
use crate::idle::{
    FrameDeadline, IdleTaskQueue, PendingAsset, SharedAssetCache, collect_preloaded,
    schedule_cleanup, schedule_preload,
};
use crate::scene::{FrameScheduler, RenderLoop, Viewport};
use crate::util::format_bytes;

mod fps;
mod painter_surface;
mod render_utils;
mod scheduler;

use fps::FpsCounter;
use painter_surface::PainterSurface;
use render_utils::draw_backdrop;
use scheduler::RepaintScheduler;

const IDLE_BUDGET: Duration = Duration::from_millis(4);
const IDLE_RETRY: Duration = Duration::from_millis(50);
const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

pub struct BackdropApp {
    config: BackdropConfig,
    render_loop: Option<RenderLoop>,
    scheduler: RepaintScheduler,
    idle: IdleTaskQueue,
    assets: SharedAssetCache,
    pending_assets: Vec<PendingAsset>,
    /// Shapes of the last tick, repeated on frames that do not tick.
    last_frame: Vec<Shape>,
    last_cleanup: Instant,
    fps: FpsCounter,
    surface_warned: bool,
}

impl BackdropApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: BackdropConfig) -> Self {
        Self::with_context(cc.egui_ctx.clone(), config)
    }

    fn with_context(ctx: Context, config: BackdropConfig) -> Self {
        let scheduler = RepaintScheduler::new(ctx, config.max_fps);
        let mut idle = IdleTaskQueue::default();
        let pending_assets = schedule_preload(&mut idle, &config.preload, config.preload_priority);

        Self {
            config,
            render_loop: None,
            scheduler,
            idle,
            assets: SharedAssetCache::default(),
            pending_assets,
            last_frame: Vec::new(),
            last_cleanup: Instant::now(),
            fps: FpsCounter::default(),
            surface_warned: false,
        }
    }

    fn toggle_running(&mut self) {
        let Some(render_loop) = self.render_loop.as_mut() else {
            return;
        };

        if render_loop.is_running() {
            render_loop.stop(&mut self.scheduler);
        } else {
            render_loop.start(&mut self.scheduler);
        }
    }

    fn show_backdrop(&mut self, ctx: &Context, painter: &Painter, rect: Rect) {
        draw_backdrop(painter, rect);

        if self.render_loop.is_none() {
            // a minimized first frame would pile every node onto the origin
            let viewport = Viewport::new(rect.width(), rect.height());
            if !viewport.is_drawable() {
                return;
            }
            let mut render_loop = RenderLoop::new(&self.config, viewport, StdRng::from_os_rng());
            render_loop.start(&mut self.scheduler);
            self.render_loop = Some(render_loop);
        }
        let Some(render_loop) = self.render_loop.as_mut() else {
            return;
        };

        render_loop.handle_resize(rect.width(), rect.height());
        if let Some(pointer) = ctx.input(|input| input.pointer.hover_pos()) {
            let local = pointer - rect.min;
            render_loop.handle_pointer_move(local.x, local.y);
        }

        if let Some(ticket) = self.scheduler.take_due(Instant::now()) {
            match PainterSurface::acquire(painter, rect) {
                Some(mut surface) => {
                    if render_loop.tick(ticket, &mut surface, &mut self.scheduler) {
                        self.last_frame = surface.into_shapes();
                    }
                }
                None => {
                    if !self.surface_warned {
                        log::warn!(
                            "drawing surface unavailable for rect {rect:?}; animation paused"
                        );
                        self.surface_warned = true;
                    }
                    self.scheduler.schedule(ticket);
                }
            }
        }

        // egui repaints from scratch; between ticks and while paused the last tick stays on screen
        painter.extend(self.last_frame.iter().cloned());
    }

    fn show_overlay(&self, painter: &Painter, rect: Rect) {
        if !self.config.show_fps {
            return;
        }

        let mut parts = Vec::new();
        if let Some(fps) = self.fps.display_text() {
            parts.push(fps);
        }
        if let Some(render_loop) = self.render_loop.as_ref()
            && !render_loop.is_running()
        {
            parts.push(format!("paused at frame {}", render_loop.frame()));
        }
        if !self.idle.is_empty() {
            parts.push(format!("{} idle tasks", self.idle.len()));
        }
        let assets = self.assets.borrow();
        if assets.len() > 0 {
            parts.push(format!(
                "{} assets ({})",
                assets.len(),
                format_bytes(assets.total_bytes())
            ));
        }
        if parts.is_empty() {
            return;
        }

        painter.text(
            rect.left_top() + vec2(10.0, 10.0),
            Align2::LEFT_TOP,
            parts.join(" | "),
            FontId::monospace(12.0),
            Color32::from_gray(170),
        );
    }

    fn run_idle_chores(&mut self, ctx: &Context) {
        collect_preloaded(&mut self.pending_assets, &mut self.idle, &self.assets);
        if self.last_cleanup.elapsed() >= CACHE_CLEANUP_INTERVAL {
            schedule_cleanup(&mut self.idle, &self.assets);
            self.last_cleanup = Instant::now();
        }

        if self.idle.is_empty() {
            return;
        }

        self.idle.drain(&FrameDeadline::after(IDLE_BUDGET));
        if !self.idle.is_empty() || !self.pending_assets.is_empty() {
            ctx.request_repaint_after(IDLE_RETRY);
        }
    }

    fn show(&mut self, ctx: &Context) {
        if ctx.input(|input| input.key_pressed(Key::Space)) {
            self.toggle_running();
        }
        self.fps.record(ctx.input(|input| input.stable_dt));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                // hover-only: the backdrop never takes clicks or drags
                let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
                let rect = response.rect;
                self.show_backdrop(ctx, &painter, rect);
                self.show_overlay(&painter, rect);
            });

        self.run_idle_chores(ctx);
    }

    fn shutdown(&mut self) {
        if let Some(render_loop) = self.render_loop.as_mut() {
            render_loop.stop(&mut self.scheduler);
        }
        self.idle.clear();
        self.pending_assets.clear();
        self.last_frame.clear();
    }
}

impl eframe::App for BackdropApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}
