//! Self-gated starfield driver.
//!
//! # Responsibility
//! - Turn host frame callbacks into at most one simulation step per budget.
//! - Convert the absolute scroll scalar into the per-frame delta the field
//!   consumes.
//! - Apply debounced resizes and stop cleanly on teardown.
//!
//! # Invariants
//! - After `teardown`, no frame touches the field and no resize fires.
//! - A frame without a target or with an empty canvas draws nothing and
//!   never panics; it still consumes the scroll delta.

use crate::config::StarfieldConfig;
use crate::scroll::coordinator::ScrollObserver;
use crate::starfield::field::{CanvasSize, ParticleField};
use crate::starfield::frame::{FrameGate, ResizeDebouncer};
use crate::starfield::render::RenderTarget;
use log::{debug, info};

/// Result of one host frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The field stepped and `stars` circles were painted.
    Drawn { stars: usize },
    /// Inside the frame budget; nothing ran.
    Skipped,
    /// No drawing surface or an empty canvas.
    Unavailable,
    /// Torn down; the host must not schedule another frame.
    Stopped,
}

impl FrameOutcome {
    /// Whether the host should request the next frame callback.
    pub fn wants_next_frame(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

pub struct StarfieldAnimator {
    field: ParticleField,
    gate: FrameGate,
    resize: ResizeDebouncer<CanvasSize>,
    scroll_scalar: f64,
    last_scroll_read: f64,
    torn_down: bool,
}

impl StarfieldAnimator {
    pub fn new(config: StarfieldConfig) -> Self {
        let gate = FrameGate::new(config.frame_budget_ms);
        let resize = ResizeDebouncer::new(config.resize_debounce_ms);
        Self {
            field: ParticleField::new(config),
            gate,
            resize,
            scroll_scalar: 0.0,
            last_scroll_read: 0.0,
            torn_down: false,
        }
    }

    /// Sizes the canvas immediately, bypassing the debounce (first mount).
    pub fn mount(&mut self, width: f32, height: f32) {
        if self.torn_down {
            return;
        }
        self.resize.cancel();
        self.field.initialize(width, height);
    }

    /// Queues a resize; the field regenerates after the quiet period.
    pub fn request_resize(&mut self, now_ms: f64, width: f32, height: f32) {
        if self.torn_down {
            return;
        }
        self.resize.request(now_ms, CanvasSize::new(width, height));
    }

    /// Applies a pending resize whose quiet period has elapsed.
    ///
    /// Returns true when the field was regenerated.
    pub fn poll_resize(&mut self, now_ms: f64) -> bool {
        if self.torn_down {
            return false;
        }
        match self.resize.poll(now_ms) {
            Some(size) => {
                debug!(
                    "event=canvas_resize module=starfield status=ok width={} height={}",
                    size.width, size.height
                );
                self.field.initialize(size.width, size.height);
                true
            }
            None => false,
        }
    }

    /// Runs one host frame callback at `timestamp_ms`.
    pub fn on_frame<T: RenderTarget + ?Sized>(
        &mut self,
        timestamp_ms: f64,
        target: Option<&mut T>,
    ) -> FrameOutcome {
        if self.torn_down {
            return FrameOutcome::Stopped;
        }
        self.poll_resize(timestamp_ms);

        if !self.gate.admit(timestamp_ms) {
            return FrameOutcome::Skipped;
        }

        let delta = self.scroll_scalar - self.last_scroll_read;
        self.last_scroll_read = self.scroll_scalar;

        let target = match target {
            Some(target) if !self.field.bounds().is_empty() => target,
            _ => return FrameOutcome::Unavailable,
        };

        self.field.step(delta);
        self.field.render(target);
        FrameOutcome::Drawn {
            stars: self.field.len(),
        }
    }

    /// Stops the loop: pending resizes are dropped and later frames stop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.resize.cancel();
        self.gate.reset();
        info!("event=animator_teardown module=starfield status=ok");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn has_pending_resize(&self) -> bool {
        self.resize.is_pending()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn scroll_scalar(&self) -> f64 {
        self.scroll_scalar
    }
}

impl ScrollObserver for StarfieldAnimator {
    fn on_scroll(&mut self, scalar: f64) {
        self.scroll_scalar = scalar;
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameOutcome, StarfieldAnimator};
    use crate::config::StarfieldConfig;
    use crate::scroll::coordinator::ScrollObserver;
    use crate::starfield::render::DrawList;

    fn animator() -> StarfieldAnimator {
        StarfieldAnimator::new(StarfieldConfig {
            seed: Some(21),
            ..StarfieldConfig::default()
        })
    }

    #[test]
    fn frames_inside_budget_are_skipped() {
        let mut animator = animator();
        animator.mount(400.0, 300.0);
        let mut list = DrawList::new();

        assert_eq!(
            animator.on_frame(0.0, Some(&mut list)),
            FrameOutcome::Drawn { stars: 60 }
        );
        assert_eq!(animator.on_frame(10.0, Some(&mut list)), FrameOutcome::Skipped);
        assert!(FrameOutcome::Skipped.wants_next_frame());
        assert!(matches!(
            animator.on_frame(16.0, Some(&mut list)),
            FrameOutcome::Drawn { .. }
        ));
    }

    #[test]
    fn missing_target_is_unavailable() {
        let mut animator = animator();
        animator.mount(400.0, 300.0);
        let outcome = animator.on_frame::<DrawList>(0.0, None);
        assert_eq!(outcome, FrameOutcome::Unavailable);
    }

    #[test]
    fn scroll_delta_is_consumed_once_per_admitted_frame() {
        let mut animator = animator();
        animator.mount(400.0, 300.0);
        let mut list = DrawList::new();
        animator.on_scroll(-120.0);
        assert_eq!(animator.on_frame(5.0, Some(&mut list)), FrameOutcome::Drawn { stars: 60 });
        let after_first = animator.field().stars().to_vec();

        // No new scroll: the next admitted frame must not move anything.
        animator.on_frame(40.0, Some(&mut list));
        assert_eq!(animator.field().stars(), after_first.as_slice());
    }

    #[test]
    fn resize_is_debounced_until_quiet_period_elapses() {
        let mut animator = animator();
        animator.mount(400.0, 300.0);
        animator.request_resize(100.0, 800.0, 600.0);
        assert!(!animator.poll_resize(250.0));
        assert_eq!(animator.field().len(), 60);
        assert!(animator.poll_resize(300.0));
        assert_eq!(animator.field().len(), 240);
    }

    #[test]
    fn teardown_stops_frames_and_drops_pending_resize() {
        let mut animator = animator();
        animator.mount(400.0, 300.0);
        animator.request_resize(0.0, 800.0, 600.0);
        animator.teardown();

        let mut list = DrawList::new();
        let outcome = animator.on_frame(1_000.0, Some(&mut list));
        assert_eq!(outcome, FrameOutcome::Stopped);
        assert!(!outcome.wants_next_frame());
        assert!(!animator.has_pending_resize());
        assert!(list.is_empty());
        assert_eq!(animator.field().len(), 60);
    }
}
