use std::collections::VecDeque;

const FPS_SAMPLE_WINDOW: usize = 180;

#[derive(Default)]
pub(super) struct FpsCounter {
    current: f32,
    samples: VecDeque<f32>,
}

impl FpsCounter {
    pub(super) fn record(&mut self, dt: f32) {
        if !(dt > f32::EPSILON) {
            return;
        }

        self.current = (1.0 / dt).clamp(0.0, 1000.0);
        self.samples.push_back(self.current);
        while self.samples.len() > FPS_SAMPLE_WINDOW {
            self.samples.pop_front();
        }
    }

    pub(super) fn display_text(&self) -> Option<String> {
        if self.samples.is_empty() {
            return None;
        }

        let mut parts = vec![format!("FPS {:.0}", self.current)];

        let avg = self.samples.iter().sum::<f32>() / self.samples.len() as f32;
        parts.push(format!("avg {avg:.1}"));

        if let Some(low) = self.samples.iter().copied().reduce(f32::min) {
            parts.push(format!("low {low:.0}"));
        }
        if let Some(high) = self.samples.iter().copied().reduce(f32::max) {
            parts.push(format!("high {high:.0}"));
        }
        if self.current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.current));
        }

        Some(parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::{FPS_SAMPLE_WINDOW, FpsCounter};

    #[test]
    fn summarises_recent_frames() {
        let mut fps = FpsCounter::default();
        assert_eq!(fps.display_text(), None);

        fps.record(0.0);
        assert_eq!(fps.display_text(), None);

        fps.record(1.0 / 30.0);
        fps.record(1.0 / 60.0);
        assert_eq!(
            fps.display_text().unwrap(),
            "FPS 60 | avg 45.0 | low 30 | high 60 | 16.7 ms"
        );
    }

    #[test]
    fn keeps_a_bounded_window() {
        let mut fps = FpsCounter::default();
        for _ in 0..FPS_SAMPLE_WINDOW + 50 {
            fps.record(0.02);
        }
        assert_eq!(fps.samples.len(), FPS_SAMPLE_WINDOW);
    }
}
