//! Frame pacing primitives.
//!
//! Both types work on host timestamps in milliseconds (the value an
//! animation-frame callback or a monotonic timer hands in). They hold no
//! timers themselves, so cancelling is just dropping the pending state.

/// Rate limiter admitting at most one frame per `budget_ms`.
#[derive(Debug, Clone)]
pub struct FrameGate {
    budget_ms: f64,
    last_admitted: Option<f64>,
}

impl FrameGate {
    pub fn new(budget_ms: f64) -> Self {
        Self {
            budget_ms,
            last_admitted: None,
        }
    }

    /// Returns true and records `timestamp_ms` when the frame should run.
    ///
    /// The first frame is always admitted. A timestamp earlier than the last
    /// admitted one (host clock reset) is admitted as well.
    pub fn admit(&mut self, timestamp_ms: f64) -> bool {
        if !timestamp_ms.is_finite() {
            return false;
        }
        match self.last_admitted {
            Some(last) if timestamp_ms >= last && timestamp_ms - last < self.budget_ms => false,
            _ => {
                self.last_admitted = Some(timestamp_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_admitted = None;
    }

    pub fn last_admitted(&self) -> Option<f64> {
        self.last_admitted
    }
}

/// Trailing-edge debouncer for canvas resizes.
///
/// Every request restarts the quiet period; only the latest size survives.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer<T> {
    delay_ms: f64,
    pending: Option<(f64, T)>,
}

impl<T: Copy> ResizeDebouncer<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn request(&mut self, now_ms: f64, value: T) {
        self.pending = Some((now_ms, value));
    }

    /// Takes the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        match self.pending {
            Some((requested_at, value)) if now_ms - requested_at >= self.delay_ms => {
                self.pending = None;
                Some(value)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameGate, ResizeDebouncer};

    #[test]
    fn gate_skips_frames_inside_budget() {
        let mut gate = FrameGate::new(16.0);
        assert!(gate.admit(100.0));
        assert!(!gate.admit(108.0));
        assert!(!gate.admit(115.9));
        assert!(gate.admit(116.0));
        assert_eq!(gate.last_admitted(), Some(116.0));
    }

    #[test]
    fn gate_admits_after_clock_reset_and_rejects_nan() {
        let mut gate = FrameGate::new(16.0);
        assert!(gate.admit(5000.0));
        assert!(gate.admit(3.0));
        assert!(!gate.admit(f64::NAN));
        gate.reset();
        assert!(gate.admit(4.0));
    }

    #[test]
    fn debouncer_keeps_only_latest_request() {
        let mut debouncer = ResizeDebouncer::new(200.0);
        debouncer.request(0.0, (800, 600));
        debouncer.request(150.0, (1024, 768));
        assert_eq!(debouncer.poll(300.0), None);
        assert_eq!(debouncer.poll(350.0), Some((1024, 768)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancelled_debouncer_never_fires() {
        let mut debouncer = ResizeDebouncer::new(200.0);
        debouncer.request(0.0, 1u8);
        debouncer.cancel();
        assert_eq!(debouncer.poll(10_000.0), None);
    }
}
