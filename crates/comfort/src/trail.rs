//! Fixed-capacity history of agent positions.

use glam::DVec2;

/// Trail length used by agents.
pub const TRAIL_CAPACITY: usize = 80;

/// Ring buffer of recent positions. Appending past capacity evicts the oldest.
#[derive(Debug, Clone)]
pub struct Trail {
    slots: Vec<DVec2>,
    capacity: usize,
    /// Index of the oldest entry once the buffer has wrapped.
    head: usize,
}

impl Trail {
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "trail capacity must be non-zero");
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// O(1) append; overwrites the oldest entry when full.
    pub fn push(&mut self, p: DVec2) {
        if self.slots.len() < self.capacity {
            self.slots.push(p);
        } else {
            self.slots[self.head] = p;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }

    /// Most recently appended position.
    pub fn latest(&self) -> Option<DVec2> {
        if self.slots.is_empty() {
            return None;
        }
        let idx = (self.head + self.slots.len() - 1) % self.slots.len();
        Some(self.slots[idx])
    }

    /// Positions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = DVec2> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::with_capacity(TRAIL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(i: usize) -> DVec2 {
        DVec2::new(i as f64, -(i as f64))
    }

    #[test]
    fn starts_empty() {
        let trail = Trail::default();
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), TRAIL_CAPACITY);
        assert_eq!(trail.latest(), None);
    }

    #[test]
    fn keeps_order_below_capacity() {
        let mut trail = Trail::with_capacity(4);
        (0..3).for_each(|i| trail.push(pt(i)));
        assert_eq!(trail.iter().collect::<Vec<_>>(), vec![pt(0), pt(1), pt(2)]);
        assert_eq!(trail.latest(), Some(pt(2)));
    }

    #[test]
    fn evicts_oldest_after_81_appends() {
        let mut trail = Trail::default();
        (0..81).for_each(|i| trail.push(pt(i)));
        assert_eq!(trail.len(), 80);
        let points: Vec<_> = trail.iter().collect();
        assert!(!points.contains(&pt(0)), "first entry should be gone");
        assert_eq!(points.first(), Some(&pt(1)));
        assert_eq!(points.last(), Some(&pt(80)));
        assert_eq!(trail.latest(), Some(pt(80)));
    }

    #[test]
    fn wraps_many_times_in_order() {
        let mut trail = Trail::with_capacity(3);
        (0..10).for_each(|i| trail.push(pt(i)));
        assert_eq!(trail.iter().collect::<Vec<_>>(), vec![pt(7), pt(8), pt(9)]);
    }

    #[test]
    fn clear_resets_the_ring() {
        let mut trail = Trail::with_capacity(3);
        (0..5).for_each(|i| trail.push(pt(i)));
        trail.clear();
        assert!(trail.is_empty());
        trail.push(pt(42));
        assert_eq!(trail.iter().collect::<Vec<_>>(), vec![pt(42)]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_exceeds_capacity_and_keeps_the_newest(
                cap in 1_usize..100,
                n in 0_usize..400,
            ) {
                let mut trail = Trail::with_capacity(cap);
                (0..n).for_each(|i| trail.push(pt(i)));
                prop_assert_eq!(trail.len(), n.min(cap));
                let expected: Vec<_> = (n.saturating_sub(cap)..n).map(pt).collect();
                prop_assert_eq!(trail.iter().collect::<Vec<_>>(), expected);
            }
        }
    }
}
