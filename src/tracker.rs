//! Slide position state for a single slideshow.

use crate::events::Direction;

/// Current slide (1-based) and slide count for one gallery.
///
/// The only public way to move is [`SlidePosition::step`], which applies the
/// wraparound policy. The raw primitives below it do not check bounds and are
/// kept crate-private; calling `advance` at either end leaves the index
/// outside `1..=count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidePosition {
    index: usize,
    count: usize,
}

impl SlidePosition {
    const FIRST: usize = 1;

    /// Start at the first slide of `count` slides.
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self {
            index: Self::FIRST,
            count,
        }
    }

    /// 1-based position of the visible slide.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of slides discovered at activation.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub const fn is_at_first(&self) -> bool {
        self.index == Self::FIRST
    }

    #[must_use]
    pub const fn is_at_last(&self) -> bool {
        self.index == self.count
    }

    /// Next position after moving one slide in `direction`, wrapping at both
    /// ends. A gallery without slides stays where it is.
    #[must_use]
    pub fn step(mut self, direction: Direction) -> Self {
        if self.is_empty() {
            return self;
        }
        match direction {
            Direction::Prev if self.is_at_first() => self.reset_to_last(),
            Direction::Next if self.is_at_last() => self.reset_to_first(),
            _ => self.advance(direction.delta()),
        }
        self
    }

    /// Unchecked move by `delta`; callers handle the boundaries. Nothing
    /// stops the index passing `count`. The index is unsigned, so a move
    /// below zero floors at 0 rather than going negative; either result is
    /// outside `[1, count]` and only `step` keeps it in range.
    pub(crate) fn advance(&mut self, delta: isize) {
        self.index = self.index.saturating_add_signed(delta);
    }

    pub(crate) fn reset_to_first(&mut self) {
        self.index = Self::FIRST;
    }

    pub(crate) fn reset_to_last(&mut self) {
        self.index = self.count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(count: usize, index: usize) -> SlidePosition {
        let mut pos = SlidePosition::new(count);
        pos.advance(index as isize - 1);
        pos
    }

    #[test]
    fn starts_at_first_slide() {
        let pos = SlidePosition::new(4);
        assert_eq!(pos.index(), 1);
        assert_eq!(pos.count(), 4);
        assert!(pos.is_at_first());
        assert!(!pos.is_at_last());
    }

    #[test]
    fn prev_from_first_wraps_to_last() {
        let pos = SlidePosition::new(5).step(Direction::Prev);
        assert_eq!(pos.index(), 5);
        assert!(pos.is_at_last());
    }

    #[test]
    fn next_from_last_wraps_to_first() {
        let pos = at(5, 5).step(Direction::Next);
        assert_eq!(pos.index(), 1);
    }

    #[test]
    fn interior_steps_move_by_one() {
        assert_eq!(at(5, 3).step(Direction::Next).index(), 4);
        assert_eq!(at(5, 3).step(Direction::Prev).index(), 2);
    }

    #[test]
    fn single_slide_stays_put() {
        let pos = SlidePosition::new(1);
        assert_eq!(pos.step(Direction::Next).index(), 1);
        assert_eq!(pos.step(Direction::Prev).index(), 1);
    }

    #[test]
    fn empty_gallery_does_not_move() {
        let pos = SlidePosition::new(0);
        assert_eq!(pos.step(Direction::Next), pos);
        assert_eq!(pos.step(Direction::Prev), pos);
    }

    #[test]
    fn full_cycle_returns_to_start() {
        for count in 1..=7 {
            for start in 1..=count {
                for direction in Direction::ALL {
                    let origin = at(count, start);
                    let mut pos = origin;
                    for _ in 0..count {
                        pos = pos.step(direction);
                        assert!((1..=count).contains(&pos.index()));
                    }
                    assert_eq!(pos, origin, "count={count} start={start} {direction}");
                }
            }
        }
    }

    #[test]
    fn advance_is_unchecked() {
        let mut pos = SlidePosition::new(2);
        pos.advance(3);
        assert_eq!(pos.index(), 4);
        pos.advance(-9);
        assert_eq!(pos.index(), 0);
        pos.reset_to_last();
        assert_eq!(pos.index(), 2);
        pos.reset_to_first();
        assert_eq!(pos.index(), 1);
    }
}
