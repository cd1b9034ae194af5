//! Delta-by-subtraction for containers that really scroll

use super::host::ScrollOffsets;
use super::raw::RawEvent;
use super::types::{EventCategory, GestureEvent, Vec2};

/// Remembers the last observed scroll offset and reports the difference
#[derive(Debug, Clone, Default)]
pub struct ScrollPositionTracker {
    baseline: Vec2,
}

impl ScrollPositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the starting offset
    pub fn bind(&mut self, offsets: ScrollOffsets) {
        self.baseline = offsets.resolve();
    }

    /// Emits the change since the previous sample and advances the baseline
    pub fn on_scroll(&mut self, offsets: ScrollOffsets) -> GestureEvent {
        let current = offsets.resolve();
        let delta = current - self.baseline;
        self.baseline = current;
        GestureEvent::new(EventCategory::Scroll, delta, RawEvent::Scroll)
    }

    pub fn baseline(&self) -> Vec2 {
        self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diffs_from_updated_baseline() {
        let mut tracker = ScrollPositionTracker::new();
        tracker.bind(ScrollOffsets::page(Vec2::ZERO));

        let first = tracker.on_scroll(ScrollOffsets::page(Vec2::new(0.0, 120.0)));
        assert_eq!(first.category, EventCategory::Scroll);
        assert_eq!(first.delta, Vec2::new(0.0, 120.0));

        let second = tracker.on_scroll(ScrollOffsets::page(Vec2::new(0.0, 150.0)));
        assert_eq!(second.delta, Vec2::new(0.0, 30.0));
        assert_eq!(tracker.baseline(), Vec2::new(0.0, 150.0));
    }

    #[test]
    fn test_bind_reads_current_offset() {
        let mut tracker = ScrollPositionTracker::new();
        tracker.bind(ScrollOffsets::local(Vec2::new(10.0, 200.0)));
        let event = tracker.on_scroll(ScrollOffsets::local(Vec2::new(10.0, 180.0)));
        assert_eq!(event.delta, Vec2::new(0.0, -20.0));
    }

    #[test]
    fn test_missing_offsets_count_as_zero() {
        let mut tracker = ScrollPositionTracker::new();
        tracker.bind(ScrollOffsets::default());
        let event = tracker.on_scroll(ScrollOffsets::default());
        assert!(event.delta.is_zero());
    }
}
