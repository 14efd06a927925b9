// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame change collection.
//!
//! Each dirty channel is drained once per frame:
//!
//! 1. **GEOMETRY**: affected set, including descendants of moved views.
//! 2. **CONTENT**: local set.
//! 3. **STACKING**: drained and reduced to a single flag.
//!
//! [`SceneChanges`] carries raw slot indices, like
//! [`ViewStack::order`](super::ViewStack::order).

use alloc::vec::Vec;

use super::store::ViewStack;
use crate::dirty;

/// What changed in the scene since the previous [`ViewStack::take_changes`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneChanges {
    /// Views whose absolute geometry or scale changed.
    pub moved: Vec<u32>,
    /// Views whose texture, flags or surface link changed.
    pub content: Vec<u32>,
    /// Views created since the last drain.
    pub added: Vec<u32>,
    /// Views removed since the last drain.
    pub removed: Vec<u32>,
    /// Whether the stacking order or topology changed.
    pub restacked: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.moved.clear();
        self.content.clear();
        self.added.clear();
        self.removed.clear();
        self.restacked = false;
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
            && self.content.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.restacked
    }
}

impl ViewStack {
    /// Drains all dirty channels.
    pub fn take_changes(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a caller-provided
    /// buffer.
    pub fn take_changes_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        let moved: Vec<u32> = self
            .dirty
            .drain(dirty::GEOMETRY)
            .affected()
            .deterministic()
            .run()
            .collect();
        changes
            .moved
            .extend(moved.into_iter().filter(|&i| self.live[i as usize]));

        let content: Vec<u32> = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();
        changes
            .content
            .extend(content.into_iter().filter(|&i| self.live[i as usize]));

        let stacking: Vec<u32> = self
            .dirty
            .drain(dirty::STACKING)
            .deterministic()
            .run()
            .collect();
        changes.restacked = !stacking.is_empty();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        // A slot created and freed within one frame shows up in both lists.
        changes.added.retain(|&i| self.live[i as usize]);
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use crate::view::{SurfaceId, ViewStack};

    #[test]
    fn no_change_returns_empty() {
        let mut stack = ViewStack::new();
        let id = stack.create_view(Some(SurfaceId(1)));
        stack.append(id).unwrap();
        let _ = stack.take_changes();
        assert!(stack.take_changes().is_empty());
    }

    #[test]
    fn moving_a_parent_moves_its_children() {
        let mut stack = ViewStack::new();
        let a = stack.create_view(Some(SurfaceId(1)));
        let b = stack.create_view(Some(SurfaceId(2)));
        let c = stack.create_view(Some(SurfaceId(3)));
        for id in [a, b, c] {
            stack.append(id).unwrap();
        }
        stack.set_parent(b, Some(a)).unwrap();
        let _ = stack.take_changes();

        stack.set_position(a, Point::new(3.0, 4.0)).unwrap();
        let changes = stack.take_changes();
        assert!(changes.moved.contains(&a.index()));
        assert!(changes.moved.contains(&b.index()), "child inherits the move");
        assert!(!changes.moved.contains(&c.index()));
        assert!(!changes.restacked);
    }

    #[test]
    fn lifecycle_and_restack_are_reported() {
        let mut stack = ViewStack::new();
        let a = stack.create_view(Some(SurfaceId(1)));
        let b = stack.create_view(Some(SurfaceId(2)));
        stack.append(a).unwrap();
        stack.append(b).unwrap();
        let first = stack.take_changes();
        assert_eq!(first.added.len(), 2);
        assert!(first.restacked);

        stack.raise(a).unwrap();
        assert!(stack.take_changes().restacked);

        stack.remove(b).unwrap();
        let last = stack.take_changes();
        assert_eq!(last.removed, [b.index()]);
        assert!(last.added.is_empty());
    }
}
