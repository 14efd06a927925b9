// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack traversal utilities.

use core::iter::FusedIterator;
use core::slice;

use super::id::{INVALID, ViewId};
use super::store::ViewStack;

/// An iterator over stacked views, bottom to top.
///
/// Created by [`ViewStack::ordered_views`].
#[derive(Debug)]
pub struct OrderedViews<'a> {
    stack: &'a ViewStack,
    inner: slice::Iter<'a, u32>,
}

impl Iterator for OrderedViews<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        let idx = *self.inner.next()?;
        Some(self.stack.id_at(idx as usize))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for OrderedViews<'_> {
    fn next_back(&mut self) -> Option<ViewId> {
        let idx = *self.inner.next_back()?;
        Some(self.stack.id_at(idx as usize))
    }
}

impl ExactSizeIterator for OrderedViews<'_> {}
impl FusedIterator for OrderedViews<'_> {}

/// An iterator over the ancestors of a view, nearest first.
///
/// Created by [`ViewStack::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    stack: &'a ViewStack,
    current: u32,
}

impl Iterator for Ancestors<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        if self.current == INVALID {
            return None;
        }
        let parent = self.stack.parent_of(self.current as usize);
        self.current = parent.map_or(INVALID, |p| p.idx);
        parent
    }
}

impl ViewStack {
    /// Iterates stacked views in paint order (topmost last).
    #[must_use]
    pub fn ordered_views(&self) -> OrderedViews<'_> {
        OrderedViews {
            stack: self,
            inner: self.order.iter(),
        }
    }

    /// Iterates the ancestors of `id`, nearest first. Empty for stale handles.
    #[must_use]
    pub fn ancestors(&self, id: ViewId) -> Ancestors<'_> {
        Ancestors {
            stack: self,
            current: if self.is_alive(id) { id.idx } else { INVALID },
        }
    }

    /// Raw stacking order as slot indices.
    #[must_use]
    pub fn order(&self) -> &[u32] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::view::{SurfaceId, ViewStack};

    #[test]
    fn ancestors_walk_to_root() {
        let mut stack = ViewStack::new();
        let a = stack.create_view(Some(SurfaceId(1)));
        let b = stack.create_view(Some(SurfaceId(2)));
        let c = stack.create_view(Some(SurfaceId(3)));
        for id in [a, b, c] {
            stack.append(id).unwrap();
        }
        stack.set_parent(b, Some(a)).unwrap();
        stack.set_parent(c, Some(b)).unwrap();

        assert_eq!(stack.ancestors(c).collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(stack.ancestors(a).count(), 0);
    }

    #[test]
    fn ordered_views_reverse_is_hit_order() {
        let mut stack = ViewStack::new();
        let ids: Vec<_> = (0..3)
            .map(|s| {
                let id = stack.create_view(Some(SurfaceId(s)));
                stack.append(id).unwrap();
                id
            })
            .collect();
        let top_down: Vec<_> = stack.ordered_views().rev().collect();
        assert_eq!(top_down, vec![ids[2], ids[1], ids[0]]);
        assert_eq!(stack.ordered_views().len(), 3);
    }
}
