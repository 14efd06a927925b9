// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacking order maintenance.
//!
//! The order is one flat list of slot indices. Every view's descendants sit
//! in a contiguous run directly after it, so painting is a forward scan and
//! hit-testing keeps the last match. Each mutation below moves whole runs and
//! never splits one.

use alloc::vec::Vec;

use understory_dirty::EagerPolicy;

use super::id::{INVALID, ViewId};
use super::store::ViewStack;
use crate::dirty;
use crate::error::StackError;

impl ViewStack {
    /// Puts a view on top of the stack.
    ///
    /// A view that already has a parent lands at the end of its parent's run
    /// instead. Appending a view that is already stacked does nothing.
    pub fn append(&mut self, id: ViewId) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        if self.order.contains(&id.idx) {
            return Ok(());
        }
        let p = self.parent[i];
        let at = if p == INVALID {
            self.order.len()
        } else {
            let parent = self.id_at(p as usize);
            let pi = self.index_of(parent).ok_or(StackError::NotFound(parent))?;
            self.subtree_end_at(pi) + 1
        };
        self.order.insert(at, id.idx);
        self.dirty.mark(id.idx, dirty::STACKING);
        Ok(())
    }

    /// Removes a view and frees its slot.
    ///
    /// Children of the removed view are promoted to its parent (or become
    /// roots). Their runs already follow the removed entry, so dropping that
    /// single entry keeps every run contiguous. The relative order of all
    /// other views is unchanged.
    pub fn remove(&mut self, id: ViewId) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        let idx = id.idx;
        let grandparent = self.parent[i];

        for c in 0..self.parent.len() {
            if self.live[c] && self.parent[c] == idx {
                let child = u32::try_from(c).unwrap_or(INVALID);
                self.dirty.remove_dependency(child, idx, dirty::GEOMETRY);
                if grandparent != INVALID {
                    let _ = self
                        .dirty
                        .add_dependency(child, grandparent, dirty::GEOMETRY);
                }
                self.parent[c] = grandparent;
                self.dirty.mark_with(child, dirty::GEOMETRY, &EagerPolicy);
            }
        }

        if grandparent != INVALID {
            self.dirty.remove_dependency(idx, grandparent, dirty::GEOMETRY);
        }
        if let Some(pos) = self.order.iter().position(|&x| x == idx) {
            self.order.remove(pos);
        }
        self.free_slot(idx);
        Ok(())
    }

    /// Moves a view and its descendants above everything they share a parent
    /// with.
    ///
    /// For a root view the run goes to the very top of the stack. For a child
    /// it goes to the end of its parent's run, so the parent's run stays
    /// contiguous. The run's internal order is preserved and raising twice is
    /// the same as raising once.
    ///
    /// This is not a global move-to-top: raising the last child of a parent
    /// leaves the order unchanged even when other roots stack above the
    /// parent's run. Raise the top-level ancestor to bring a whole tree up.
    pub fn raise(&mut self, id: ViewId) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        let start = self.index_of(id).ok_or(StackError::NotFound(id))?;
        let end = self.subtree_end_at(start);

        let scope_end = match self.parent_of(i) {
            Some(parent) => {
                let pi = self.index_of(parent).ok_or(StackError::NotFound(parent))?;
                self.subtree_end_at(pi)
            }
            None => self.order.len() - 1,
        };

        if end < scope_end {
            self.order[start..=scope_end].rotate_left(end - start + 1);
            self.dirty.mark(id.idx, dirty::STACKING);
        }
        Ok(())
    }

    /// Makes `parent` the parent of `child`, or detaches `child` with `None`.
    ///
    /// If `child` is stacked, its run moves to the end of the new parent's
    /// run. A detached child lands right after the tree it left. Re-parenting
    /// to the current parent changes nothing.
    pub fn set_parent(&mut self, child: ViewId, parent: Option<ViewId>) -> Result<(), StackError> {
        let ci = self.resolve(child)?;
        let new_p = match parent {
            Some(p) => {
                let _ = self.resolve(p)?;
                if p == child || self.is_ancestor_of(child.idx, p.idx) {
                    return Err(StackError::Cycle { child, parent: p });
                }
                p.idx
            }
            None => INVALID,
        };
        let old_p = self.parent[ci];
        if old_p == new_p {
            return Ok(());
        }

        if let Some(start) = self.index_of(child) {
            if let Some(p) = parent {
                if self.index_of(p).is_none() {
                    return Err(StackError::NotFound(p));
                }
            }
            let old_root = self.top_level(child).unwrap_or(child);
            let end = self.subtree_end_at(start);
            let run: Vec<u32> = self.order.drain(start..=end).collect();
            self.parent[ci] = new_p;

            let anchor = match parent {
                Some(p) => p,
                None => old_root,
            };
            // The anchor was never inside the drained run, so it is still stacked.
            let at = self
                .index_of(anchor)
                .map_or(self.order.len(), |ai| self.subtree_end_at(ai) + 1);
            self.order.splice(at..at, run);
        } else {
            self.parent[ci] = new_p;
        }

        if old_p != INVALID {
            self.dirty.remove_dependency(child.idx, old_p, dirty::GEOMETRY);
        }
        if new_p != INVALID {
            let _ = self.dirty.add_dependency(child.idx, new_p, dirty::GEOMETRY);
        }
        self.dirty.mark_with(child.idx, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark(child.idx, dirty::STACKING);
        Ok(())
    }

    /// Returns the last order index belonging to the subtree rooted at
    /// `index`.
    ///
    /// Walks forward over each immediate child's run in turn. Returns `None`
    /// if `index` is out of range.
    #[must_use]
    pub fn find_end_of_child_tree(&self, index: usize) -> Option<usize> {
        let root = *self.order.get(index)?;
        let mut end = index;
        while let Some(&next) = self.order.get(end + 1) {
            if self.parent[next as usize] != root {
                break;
            }
            end = self.find_end_of_child_tree(end + 1)?;
        }
        Some(end)
    }

    /// Position of a view in the stacking order, if stacked.
    #[must_use]
    pub fn index_of(&self, id: ViewId) -> Option<usize> {
        if !self.is_alive(id) {
            return None;
        }
        self.order.iter().position(|&x| x == id.idx)
    }

    /// The outermost ancestor of a view, or the view itself if it is a root.
    #[must_use]
    pub fn top_level(&self, id: ViewId) -> Option<ViewId> {
        let mut i = self.resolve(id).ok()?;
        let mut hops = 0;
        while let Some(p) = self.parent_of(i) {
            i = p.idx as usize;
            hops += 1;
            if hops > self.live.len() {
                break;
            }
        }
        Some(self.id_at(i))
    }

    /// Whether `ancestor` is a strict ancestor of `idx`.
    pub(crate) fn is_ancestor_of(&self, ancestor: u32, idx: u32) -> bool {
        let mut p = self.parent[idx as usize];
        let mut hops = 0;
        while p != INVALID && hops <= self.live.len() {
            if p == ancestor {
                return true;
            }
            p = self.parent[p as usize];
            hops += 1;
        }
        false
    }

    fn subtree_end_at(&self, index: usize) -> usize {
        self.find_end_of_child_tree(index).unwrap_or(index)
    }

    /// Checks the stacking invariant: parents precede their children and
    /// every subtree is one contiguous run.
    #[must_use]
    pub fn is_well_stacked(&self) -> bool {
        for (k, &root) in self.order.iter().enumerate() {
            if !self.live[root as usize] {
                return false;
            }
            let p = self.parent[root as usize];
            if p != INVALID && !self.order[..k].contains(&p) {
                return false;
            }
            let mut end = k;
            while end + 1 < self.order.len() && self.is_ancestor_of(root, self.order[end + 1]) {
                end += 1;
            }
            if self.order[end + 1..]
                .iter()
                .any(|&x| self.is_ancestor_of(root, x))
            {
                return false;
            }
            if self.find_end_of_child_tree(k) != Some(end) {
                return false;
            }
        }
        true
    }
}
