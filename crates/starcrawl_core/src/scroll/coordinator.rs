//! Scroll/input coordinator.
//!
//! # Responsibility
//! - Fold wheel and touch gestures into one scroll scalar.
//! - Hold the edge-of-content lock and suppress downward input while locked.
//! - Hand the scalar to every dependent view in the same input tick.
//!
//! # Invariants
//! - Only input handlers mutate `ScrollState`.
//! - Content scrolls opposite to the wheel: `scalar -= delta_y`.
//! - Locked + downward input leaves the scalar untouched.

use crate::config::ScrollConfig;
use log::trace;

/// Anything that must follow the scroll scalar.
pub trait ScrollObserver {
    fn on_scroll(&mut self, scalar: f64);
}

/// Cumulative scroll offset plus the derived lock flag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub scalar: f64,
    pub locked: bool,
}

/// What the host should do with the input event that was just handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    /// Scalar moved to the contained value.
    Applied(f64),
    /// Locked at the content edge; the host must cancel default scrolling.
    Suppressed,
    /// Zero or non-finite delta; nothing changed.
    Ignored,
}

impl WheelOutcome {
    pub fn prevent_default(self) -> bool {
        matches!(self, Self::Suppressed)
    }

    pub fn changed(self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Lock predicate: true once the viewport bottom is within `edge_threshold`
/// of the content bottom.
pub fn evaluate_lock(
    scroll_top: f64,
    container_height: f64,
    content_height: f64,
    edge_threshold: f64,
) -> bool {
    scroll_top + container_height >= content_height - edge_threshold
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchGesture {
    start_y: f64,
    last_y: f64,
}

pub struct ScrollCoordinator {
    state: ScrollState,
    edge_threshold: f64,
    touch: Option<TouchGesture>,
}

impl ScrollCoordinator {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            state: ScrollState::default(),
            edge_threshold: config.edge_threshold_px,
            touch: None,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn scalar(&self) -> f64 {
        self.state.scalar
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    /// Handles one wheel event.
    pub fn on_wheel(&mut self, delta_y: f64) -> WheelOutcome {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return WheelOutcome::Ignored;
        }
        if self.state.locked && delta_y > 0.0 {
            trace!("event=wheel module=scroll status=suppressed delta_y={delta_y}");
            return WheelOutcome::Suppressed;
        }
        self.state.scalar -= delta_y;
        WheelOutcome::Applied(self.state.scalar)
    }

    /// Handles one touch-move sample of the gesture that began at `start_y`.
    ///
    /// A finger moving up behaves like a positive wheel delta. Each sample
    /// applies only the movement since the previous one.
    pub fn on_touch_drag(&mut self, start_y: f64, current_y: f64) -> WheelOutcome {
        if !start_y.is_finite() || !current_y.is_finite() {
            return WheelOutcome::Ignored;
        }
        let gesture = match self.touch {
            Some(gesture) if gesture.start_y == start_y => gesture,
            _ => TouchGesture {
                start_y,
                last_y: start_y,
            },
        };

        let outcome = self.on_wheel(gesture.last_y - current_y);
        // A suppressed sample keeps its anchor so reversing direction later
        // is measured from the last applied point.
        let last_y = if outcome.prevent_default() {
            gesture.last_y
        } else {
            current_y
        };
        self.touch = Some(TouchGesture { start_y, last_y });
        outcome
    }

    /// Ends the active touch gesture, if any.
    pub fn on_touch_end(&mut self) {
        self.touch = None;
    }

    pub fn has_active_touch(&self) -> bool {
        self.touch.is_some()
    }

    /// Re-measures the lock from the content geometry and stores it.
    pub fn evaluate_lock(
        &mut self,
        scroll_top: f64,
        container_height: f64,
        content_height: f64,
    ) -> bool {
        let locked = evaluate_lock(
            scroll_top,
            container_height,
            content_height,
            self.edge_threshold,
        );
        self.state.locked = locked;
        locked
    }

    /// Pushes the current scalar to `observers`, in order, synchronously.
    pub fn notify(&self, observers: &mut [&mut dyn ScrollObserver]) {
        for observer in observers.iter_mut() {
            observer.on_scroll(self.state.scalar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate_lock, ScrollCoordinator, ScrollObserver, WheelOutcome};
    use crate::config::ScrollConfig;

    #[derive(Default)]
    struct Recorder(Vec<f64>);

    impl ScrollObserver for Recorder {
        fn on_scroll(&mut self, scalar: f64) {
            self.0.push(scalar);
        }
    }

    #[test]
    fn wheel_moves_scalar_opposite_to_delta() {
        let mut coordinator = ScrollCoordinator::new(&ScrollConfig::default());
        assert_eq!(coordinator.on_wheel(50.0), WheelOutcome::Applied(-50.0));
        assert_eq!(coordinator.on_wheel(-20.0), WheelOutcome::Applied(-30.0));
        assert_eq!(coordinator.on_wheel(f64::NAN), WheelOutcome::Ignored);
        assert_eq!(coordinator.on_wheel(0.0), WheelOutcome::Ignored);
    }

    #[test]
    fn lock_suppresses_only_downward_input() {
        let mut coordinator = ScrollCoordinator::new(&ScrollConfig::default());
        assert!(coordinator.evaluate_lock(900.0, 600.0, 1550.0));

        let outcome = coordinator.on_wheel(50.0);
        assert_eq!(outcome, WheelOutcome::Suppressed);
        assert!(outcome.prevent_default());
        assert_eq!(coordinator.scalar(), 0.0);

        assert_eq!(coordinator.on_wheel(-10.0), WheelOutcome::Applied(10.0));
    }

    #[test]
    fn evaluate_lock_threshold_is_inclusive() {
        assert!(evaluate_lock(300.0, 600.0, 1000.0, 100.0));
        assert!(!evaluate_lock(299.0, 600.0, 1000.0, 100.0));
    }

    #[test]
    fn touch_drag_applies_incremental_movement() {
        let mut coordinator = ScrollCoordinator::new(&ScrollConfig::default());
        assert_eq!(coordinator.on_touch_drag(400.0, 380.0), WheelOutcome::Applied(-20.0));
        assert_eq!(coordinator.on_touch_drag(400.0, 350.0), WheelOutcome::Applied(-50.0));
        assert_eq!(coordinator.on_touch_drag(400.0, 360.0), WheelOutcome::Applied(-40.0));
        assert!(coordinator.has_active_touch());

        coordinator.on_touch_end();
        assert!(!coordinator.has_active_touch());

        // A new gesture restarts from its own origin.
        assert_eq!(coordinator.on_touch_drag(100.0, 90.0), WheelOutcome::Applied(-50.0));
    }

    #[test]
    fn notify_reaches_every_observer_in_order() {
        let mut coordinator = ScrollCoordinator::new(&ScrollConfig::default());
        coordinator.on_wheel(-75.0);
        let mut first = Recorder::default();
        let mut second = Recorder::default();
        {
            let mut observers: [&mut dyn ScrollObserver; 2] = [&mut first, &mut second];
            coordinator.notify(&mut observers);
        }
        assert_eq!(first.0, vec![75.0]);
        assert_eq!(second.0, vec![75.0]);
    }
}
