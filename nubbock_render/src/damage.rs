// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial re-rendering.

use alloc::vec::Vec;

use kurbo::Rect;

/// A region of the output that needs re-rendering.
///
/// Rectangles are in window space, the space the renderer draws in.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DamageRegion {
    /// The entire output needs redrawing.
    #[default]
    Full,
    /// A list of axis-aligned rectangles that need redrawing.
    Rects(Vec<Rect>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Adds one rectangle. Empty rectangles are ignored.
    pub fn add_rect(&mut self, rect: Rect) {
        if rect.is_zero_area() {
            return;
        }
        match self {
            Self::Full => {}
            Self::Rects(rects) => {
                if !rects.contains(&rect) {
                    rects.push(rect);
                }
            }
            Self::None => *self = Self::Rects(alloc::vec![rect]),
        }
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (_, Self::None) => {}
            (_, Self::Rects(b)) => {
                for r in b {
                    self.add_rect(*r);
                }
            }
        }
    }

    /// Smallest rectangle covering the damage, clipped to `bounds`.
    #[must_use]
    pub fn bounding_box(&self, bounds: Rect) -> Option<Rect> {
        match self {
            Self::Full => Some(bounds),
            Self::None => None,
            Self::Rects(rects) => rects
                .iter()
                .copied()
                .reduce(|a, b| a.union(b))
                .map(|r| r.intersect(bounds))
                .filter(|r| !r.is_zero_area()),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn add_rect_promotes_none() {
        let mut d = DamageRegion::None;
        d.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        d.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        d.add_rect(Rect::new(5.0, 5.0, 5.0, 5.0));
        assert_eq!(d, DamageRegion::Rects(vec![Rect::new(0.0, 0.0, 10.0, 10.0)]));
    }

    #[test]
    fn full_absorbs_everything() {
        let mut d = DamageRegion::Rects(vec![Rect::new(0.0, 0.0, 1.0, 1.0)]);
        d.merge(&DamageRegion::Full);
        assert_eq!(d, DamageRegion::Full);
        d.add_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(d, DamageRegion::Full);
    }

    #[test]
    fn merge_concatenates_rects() {
        let mut d = DamageRegion::None;
        d.merge(&DamageRegion::Rects(vec![Rect::new(0.0, 0.0, 1.0, 1.0)]));
        d.merge(&DamageRegion::None);
        d.merge(&DamageRegion::Rects(vec![Rect::new(2.0, 2.0, 3.0, 3.0)]));
        assert_eq!(
            d.bounding_box(Rect::new(0.0, 0.0, 100.0, 100.0)),
            Some(Rect::new(0.0, 0.0, 3.0, 3.0))
        );
        assert!(!d.is_empty());
    }

    #[test]
    fn bounding_box_clips_to_output() {
        let d = DamageRegion::Rects(vec![Rect::new(-10.0, -10.0, 5.0, 5.0)]);
        assert_eq!(
            d.bounding_box(Rect::new(0.0, 0.0, 100.0, 100.0)),
            Some(Rect::new(0.0, 0.0, 5.0, 5.0))
        );
        assert_eq!(DamageRegion::None.bounding_box(Rect::ZERO), None);
    }
}
