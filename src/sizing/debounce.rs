//! Quiet-period debounce over a millisecond clock.
//!
//! The host owns the actual timer; this only decides whether a timer firing
//! at `now` should run the work or be rescheduled.

/// Trailing-edge debounce.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    delay_ms: f64,
    last_trigger: Option<f64>,
}

impl Debounce {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            last_trigger: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Record a trigger. Returns true if no run was pending, i.e. the caller
    /// must start a timer.
    pub fn trigger(&mut self, now_ms: f64) -> bool {
        let was_idle = self.last_trigger.is_none();
        self.last_trigger = Some(now_ms);
        was_idle
    }

    pub fn is_pending(&self) -> bool {
        self.last_trigger.is_some()
    }

    /// Milliseconds left before the work may run, `None` if nothing is pending.
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.last_trigger
            .map(|t| (t + self.delay_ms - now_ms).max(0.0))
    }

    /// Whether the quiet period has elapsed. Consumes the pending run when it
    /// has.
    pub fn due(&mut self, now_ms: f64) -> bool {
        match self.remaining_ms(now_ms) {
            Some(left) if left <= 0.0 => {
                self.last_trigger = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.last_trigger = None;
    }
}
