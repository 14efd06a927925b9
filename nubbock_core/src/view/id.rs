// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View, surface, client and texture identity types.

use core::fmt;

/// Sentinel for "no view" in raw index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a view in a [`ViewStack`](super::ViewStack).
///
/// The generation counter makes handles to destroyed views detectably stale
/// even after their slot is reused. Grab and focus state hold these as weak
/// references.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ViewId {
    /// Returns the raw slot index, as carried by [`SceneChanges`](super::SceneChanges).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({}@gen{})", self.idx, self.generation)
    }
}

/// An externally owned client surface.
///
/// Surfaces are announced and destroyed by the protocol layer; the core only
/// maps them to views.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u32);

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// The client connection owning a surface.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub u32);

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({})", self.0)
    }
}

/// Opaque handle to uploaded pixel content, owned by the renderer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureHandle({:#x})", self.0)
    }
}

/// Row order of a texture's pixel data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureOrigin {
    /// First row is the top of the image.
    #[default]
    TopLeft,
    /// First row is the bottom of the image (GL convention).
    BottomLeft,
}
