use std::time::{Duration, Instant};

use eframe::egui::Context;

use crate::scene::{FrameScheduler, FrameTicket};

/// Delivers armed ticks through egui repaints, optionally capped to a fixed interval.
pub(super) struct RepaintScheduler {
    ctx: Context,
    frame_interval: Option<Duration>,
    pending: Option<(FrameTicket, Instant)>,
    last_delivered: Option<Instant>,
}

impl RepaintScheduler {
    pub(super) fn new(ctx: Context, max_fps: Option<f32>) -> Self {
        Self {
            ctx,
            frame_interval: max_fps.map(|fps| Duration::from_secs_f32(1.0 / fps)),
            pending: None,
            last_delivered: None,
        }
    }

    /// Hands out the pending ticket once it is due.
    pub(super) fn take_due(&mut self, now: Instant) -> Option<FrameTicket> {
        let (ticket, due_at) = self.pending?;
        if now < due_at {
            self.ctx.request_repaint_after(due_at - now);
            return None;
        }

        self.pending = None;
        self.last_delivered = Some(now);
        Some(ticket)
    }

    #[cfg(test)]
    pub(super) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl FrameScheduler for RepaintScheduler {
    fn schedule(&mut self, ticket: FrameTicket) {
        let now = Instant::now();
        // the interval counts from the last delivered tick, so the first one is immediate
        let due_at = match (self.frame_interval, self.last_delivered) {
            (Some(interval), Some(last)) => (last + interval).max(now),
            _ => now,
        };

        self.pending = Some((ticket, due_at));
        if due_at > now {
            self.ctx.request_repaint_after(due_at - now);
        } else {
            self.ctx.request_repaint();
        }
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use eframe::egui::Context;

    use super::RepaintScheduler;
    use crate::scene::{FrameScheduler, FrameTicket};

    #[test]
    fn uncapped_ticks_are_due_immediately() {
        let mut scheduler = RepaintScheduler::new(Context::default(), None);
        assert_eq!(scheduler.take_due(Instant::now()), None);

        for id in 0..3 {
            scheduler.schedule(FrameTicket::new(id));
            assert_eq!(
                scheduler.take_due(Instant::now()),
                Some(FrameTicket::new(id))
            );
        }
    }

    #[test]
    fn capped_ticks_wait_one_interval_after_the_last_delivery() {
        let mut scheduler = RepaintScheduler::new(Context::default(), Some(10.0));

        scheduler.schedule(FrameTicket::new(0));
        let first = Instant::now();
        assert_eq!(scheduler.take_due(first), Some(FrameTicket::new(0)));

        scheduler.schedule(FrameTicket::new(1));
        assert_eq!(scheduler.take_due(first + Duration::from_millis(40)), None);
        assert!(scheduler.has_pending());
        assert_eq!(
            scheduler.take_due(first + Duration::from_millis(100)),
            Some(FrameTicket::new(1))
        );
    }

    #[test]
    fn cancel_drops_the_pending_ticket() {
        let mut scheduler = RepaintScheduler::new(Context::default(), None);
        scheduler.schedule(FrameTicket::new(7));
        scheduler.cancel();

        assert!(!scheduler.has_pending());
        assert_eq!(scheduler.take_due(Instant::now()), None);
    }
}
