// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays view storage: allocation and per-view properties.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, SurfaceId, TextureHandle, TextureOrigin, ViewId};
use crate::dirty;
use crate::error::StackError;

/// Per-view paint flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewFlags {
    /// The view shows a pointer cursor image. Cursor views are never painted
    /// in the stack and never hit-tested.
    pub cursor: bool,
    /// The surface has a buffer attached.
    pub has_content: bool,
    /// Keep painting the last texture even without content.
    pub buffer_locked: bool,
}

/// A snapshot of one view's state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    /// Handle of this view.
    pub id: ViewId,
    /// Backing surface, or `None` once the surface is gone.
    pub surface: Option<SurfaceId>,
    /// Top-left offset, relative to the parent if there is one.
    pub position: Point,
    /// Last known content size.
    pub size: Size,
    /// Parent view, if this is a subsurface.
    pub parent: Option<ViewId>,
    /// Offset applied by the most recent buffer commit.
    pub pending_offset: Vec2,
    /// Paint flags.
    pub flags: ViewFlags,
    /// Scale applied to the painted rectangle.
    pub animation_factor: f64,
    /// Most recently acquired texture.
    pub texture: Option<TextureHandle>,
    /// Row order of `texture`.
    pub texture_origin: TextureOrigin,
}

impl View {
    /// Whether the renderer should paint this view at all.
    #[must_use]
    pub fn is_paintable(&self) -> bool {
        !self.flags.cursor
            && (self.flags.has_content || self.flags.buffer_locked)
            && self.texture.is_some()
            && !self.size.is_zero_area()
    }
}

/// The ordered set of all views.
///
/// Views live in parallel arrays addressed by [`ViewId`]; freed slots are
/// recycled and their generation bumped. Stacking order is a separate flat
/// list of slot indices (back = topmost) in which every view's descendants
/// form a contiguous run directly after it. See
/// [`raise`](Self::raise) and [`set_parent`](Self::set_parent).
#[derive(Debug)]
pub struct ViewStack {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) order: Vec<u32>,

    // -- Properties --
    pub(crate) surface: Vec<Option<SurfaceId>>,
    pub(crate) position: Vec<Point>,
    pub(crate) size: Vec<Size>,
    pub(crate) pending_offset: Vec<Vec2>,
    pub(crate) flags: Vec<ViewFlags>,
    pub(crate) animation_factor: Vec<f64>,
    pub(crate) texture: Vec<Option<TextureHandle>>,
    pub(crate) texture_origin: Vec<TextureOrigin>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) live: Vec<bool>,
    pub(crate) free_list: Vec<u32>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for ViewStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            order: Vec::new(),
            surface: Vec::new(),
            position: Vec::new(),
            size: Vec::new(),
            pending_offset: Vec::new(),
            flags: Vec::new(),
            animation_factor: Vec::new(),
            texture: Vec::new(),
            texture_origin: Vec::new(),
            generation: Vec::new(),
            live: Vec::new(),
            free_list: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Allocates a view for `surface`. The view is not stacked until
    /// [`append`](Self::append) is called.
    pub fn create_view(&mut self, surface: Option<SurfaceId>) -> ViewId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.surface[i] = surface;
            self.position[i] = Point::ZERO;
            self.size[i] = Size::ZERO;
            self.pending_offset[i] = Vec2::ZERO;
            self.flags[i] = ViewFlags::default();
            self.animation_factor[i] = 1.0;
            self.texture[i] = None;
            self.texture_origin[i] = TextureOrigin::default();
            self.live[i] = true;
            idx
        } else {
            let idx = u32::try_from(self.live.len()).unwrap_or(INVALID);
            assert!(idx != INVALID, "view slots exhausted");
            self.parent.push(INVALID);
            self.surface.push(surface);
            self.position.push(Point::ZERO);
            self.size.push(Size::ZERO);
            self.pending_offset.push(Vec2::ZERO);
            self.flags.push(ViewFlags::default());
            self.animation_factor.push(1.0);
            self.texture.push(None);
            self.texture_origin.push(TextureOrigin::default());
            self.generation.push(0);
            self.live.push(true);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::CONTENT);

        ViewId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Returns whether `id` refers to a live view.
    #[must_use]
    pub fn is_alive(&self, id: ViewId) -> bool {
        let i = id.idx as usize;
        i < self.live.len() && self.live[i] && self.generation[i] == id.generation
    }

    /// Number of stacked views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no views are stacked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Finds the live view backed by `surface`.
    #[must_use]
    pub fn find_by_surface(&self, surface: SurfaceId) -> Option<ViewId> {
        self.surface
            .iter()
            .enumerate()
            .find(|&(i, s)| self.live[i] && *s == Some(surface))
            .map(|(i, _)| self.id_at(i))
    }

    /// Returns a snapshot of the view.
    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<View> {
        let i = self.resolve(id).ok()?;
        Some(View {
            id,
            surface: self.surface[i],
            position: self.position[i],
            size: self.size[i],
            parent: self.parent_of(i),
            pending_offset: self.pending_offset[i],
            flags: self.flags[i],
            animation_factor: self.animation_factor[i],
            texture: self.texture[i],
            texture_origin: self.texture_origin[i],
        })
    }

    // -- Property getters --

    /// Returns the backing surface.
    #[must_use]
    pub fn surface(&self, id: ViewId) -> Option<SurfaceId> {
        self.resolve(id).ok().and_then(|i| self.surface[i])
    }

    /// Returns the parent-relative position.
    #[must_use]
    pub fn position(&self, id: ViewId) -> Option<Point> {
        self.resolve(id).ok().map(|i| self.position[i])
    }

    /// Returns the cached content size.
    #[must_use]
    pub fn size(&self, id: ViewId) -> Option<Size> {
        self.resolve(id).ok().map(|i| self.size[i])
    }

    /// Returns the parent view.
    #[must_use]
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.resolve(id).ok().and_then(|i| self.parent_of(i))
    }

    /// Returns the paint flags.
    #[must_use]
    pub fn flags(&self, id: ViewId) -> Option<ViewFlags> {
        self.resolve(id).ok().map(|i| self.flags[i])
    }

    /// Sum of the positions of every ancestor.
    ///
    /// A parent link that does not resolve to a live view ends the walk, so
    /// the view is laid out as a root.
    #[must_use]
    pub fn parent_offset(&self, id: ViewId) -> Option<Vec2> {
        let i = self.resolve(id).ok()?;
        let mut offset = Vec2::ZERO;
        let mut p = self.parent[i];
        let mut hops = 0;
        while p != INVALID && self.live[p as usize] && hops < self.live.len() {
            offset += self.position[p as usize].to_vec2();
            p = self.parent[p as usize];
            hops += 1;
        }
        Some(offset)
    }

    /// Position in logical space: own position plus every ancestor's.
    #[must_use]
    pub fn absolute_position(&self, id: ViewId) -> Option<Point> {
        Some(self.position(id)? + self.parent_offset(id)?)
    }

    /// Absolute rectangle covered by the view.
    #[must_use]
    pub fn geometry(&self, id: ViewId) -> Option<Rect> {
        Some(Rect::from_origin_size(
            self.absolute_position(id)?,
            self.size(id)?,
        ))
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the parent-relative position. Descendants move with it.
    pub fn set_position(&mut self, id: ViewId, position: Point) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        if self.position[i] != position {
            self.position[i] = position;
            self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        }
        Ok(())
    }

    /// Sets the cached content size.
    pub fn set_size(&mut self, id: ViewId, size: Size) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        if self.size[i] != size {
            self.size[i] = size;
            self.dirty.mark(id.idx, dirty::GEOMETRY);
        }
        Ok(())
    }

    /// Records the buffer offset of the next commit and shifts the view by
    /// it, so content resized from the top or left edge stays in place.
    pub fn apply_buffer_offset(&mut self, id: ViewId, offset: Vec2) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        self.pending_offset[i] = offset;
        let shifted = self.position[i] + offset;
        self.set_position(id, shifted)
    }

    /// Drops the link to the backing surface. The view stays stacked until
    /// removed.
    pub fn detach_surface(&mut self, id: ViewId) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        self.surface[i] = None;
        self.dirty.mark(id.idx, dirty::CONTENT);
        Ok(())
    }

    /// Marks the view as showing a cursor image.
    pub fn set_cursor(&mut self, id: ViewId, cursor: bool) -> Result<(), StackError> {
        self.update_flags(id, |f| f.cursor = cursor)
    }

    /// Records whether the surface has a buffer attached.
    pub fn set_has_content(&mut self, id: ViewId, has_content: bool) -> Result<(), StackError> {
        self.update_flags(id, |f| f.has_content = has_content)
    }

    /// Keeps the last texture painted regardless of content.
    pub fn set_buffer_locked(&mut self, id: ViewId, locked: bool) -> Result<(), StackError> {
        self.update_flags(id, |f| f.buffer_locked = locked)
    }

    /// Sets the scale applied to the painted rectangle.
    pub fn set_animation_factor(&mut self, id: ViewId, factor: f64) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        self.animation_factor[i] = factor;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        Ok(())
    }

    /// Stores a freshly acquired texture.
    pub fn set_texture(
        &mut self,
        id: ViewId,
        texture: TextureHandle,
        origin: TextureOrigin,
    ) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        self.texture[i] = Some(texture);
        self.texture_origin[i] = origin;
        self.dirty.mark(id.idx, dirty::CONTENT);
        Ok(())
    }

    // -- Internal helpers --

    /// Maps a handle to its slot, rejecting stale handles.
    pub(crate) fn resolve(&self, id: ViewId) -> Result<usize, StackError> {
        if self.is_alive(id) {
            Ok(id.idx as usize)
        } else {
            Err(StackError::NotFound(id))
        }
    }

    /// Builds the current handle for a raw slot index.
    pub(crate) fn id_at(&self, i: usize) -> ViewId {
        ViewId {
            idx: u32::try_from(i).unwrap_or(INVALID),
            generation: self.generation[i],
        }
    }

    pub(crate) fn parent_of(&self, i: usize) -> Option<ViewId> {
        let p = self.parent[i];
        (p != INVALID && self.live[p as usize]).then(|| self.id_at(p as usize))
    }

    fn update_flags(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut ViewFlags),
    ) -> Result<(), StackError> {
        let i = self.resolve(id)?;
        let before = self.flags[i];
        f(&mut self.flags[i]);
        if self.flags[i] != before {
            self.dirty.mark(id.idx, dirty::CONTENT);
        }
        Ok(())
    }

    /// Releases a slot that has already been unlinked from order and topology.
    pub(crate) fn free_slot(&mut self, idx: u32) {
        let i = idx as usize;
        self.dirty.remove_key(idx);
        self.live[i] = false;
        self.surface[i] = None;
        self.texture[i] = None;
        self.parent[i] = INVALID;
        self.generation[i] += 1;
        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::STACKING);
    }
}
