use std::time::{Duration, Instant};

/// Cancel-and-reschedule timer: each `schedule` pushes the deadline out,
/// `fire_due` reports true exactly once when it passes.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::time::{Duration, Instant};

    #[test]
    fn fires_once_after_delay() {
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        debounce.schedule(start);

        assert!(!debounce.fire_due(start + Duration::from_millis(299)));
        assert!(debounce.fire_due(start + Duration::from_millis(300)));
        // Consumed: does not fire again.
        assert!(!debounce.fire_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn reschedule_pushes_deadline_out() {
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        debounce.schedule(start);
        debounce.schedule(start + Duration::from_millis(200));

        assert!(!debounce.fire_due(start + Duration::from_millis(400)));
        assert!(debounce.fire_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn cancel_clears_pending() {
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        debounce.schedule(start);
        assert!(debounce.is_pending());

        debounce.cancel();
        assert!(!debounce.is_pending());
        assert!(!debounce.fire_due(start + Duration::from_secs(1)));
    }

    #[test]
    fn idle_never_fires() {
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        assert!(!debounce.fire_due(Instant::now()));
    }
}
