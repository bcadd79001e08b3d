/// Coarse frame pacing: elapsed wall-clock time accumulates until it
/// reaches the frame interval, then one logical frame runs.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    interval_ms: u32,
    accumulated_ms: u32,
}

impl FrameClock {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            accumulated_ms: 0,
        }
    }

    /// Add `elapsed_ms`. Returns the frame delta when a logical frame is due.
    pub fn advance(&mut self, elapsed_ms: u32) -> Option<u32> {
        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        if self.accumulated_ms < self.interval_ms {
            return None;
        }
        Some(std::mem::take(&mut self.accumulated_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_fire_once_threshold_is_reached() {
        let mut clock = FrameClock::new(16);
        assert_eq!(clock.advance(5), None);
        assert_eq!(clock.advance(10), None);
        assert_eq!(clock.advance(3), Some(18));
        assert_eq!(clock.advance(0), None);
        assert_eq!(clock.advance(40), Some(40));
    }
}
