use std::time::Instant;

/// Wall-clock time since the demo started.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed at `now`. Zero if `now` precedes the start.
    pub fn elapsed_at(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32()
    }

    /// Seconds elapsed so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_elapsed_at() {
        let clock = FrameClock::start();
        let later = clock.start + Duration::from_millis(100);
        assert!((clock.elapsed_at(later) - 0.1).abs() < 1e-6);
        assert_eq!(clock.elapsed_at(clock.start), 0.0);
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let clock = FrameClock::start();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
    }
}
