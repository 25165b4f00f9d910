//! Single-slot debounce timer.

use core::time::Duration;
use tokio::time::Instant;

/// A deadline that re-arms on every qualifying event and fires once the
/// window passes without another. Holds at most one pending deadline — the
/// slot is the `Option`, so the ≤1 invariant is structural.
#[derive(Debug)]
pub struct DebounceTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm (or re-arm) the timer: any pending deadline is replaced.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has passed. True means: run the action.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebounceTimer;
    use core::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_the_single_slot() {
        let mut timer = DebounceTimer::new(Duration::from_millis(100));
        assert!(!timer.is_armed());

        let start = Instant::now();
        timer.arm(start);
        let first = timer.deadline();
        timer.arm(start + Duration::from_millis(50));
        let second = timer.deadline();
        assert_ne!(first, second);
        assert!(timer.is_armed());

        // Not due at the first deadline any more: the re-arm pushed it out.
        assert!(!timer.fire_if_due(start + Duration::from_millis(100)));
        assert!(timer.fire_if_due(start + Duration::from_millis(150)));
        assert!(!timer.is_armed());
        // Firing disarms; a second fire is a no-op until re-armed.
        assert!(!timer.fire_if_due(start + Duration::from_millis(500)));
    }
}
