// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fire-and-forget signals to the embedder.

use kurbo::{Point, Size, Vec2};

use crate::geometry::OutputTransform;
use crate::grab::ResizeEdge;
use crate::view::SurfaceId;

/// A request the core queues for the embedder to act on.
///
/// Nothing waits on these. The embedder drains them with
/// [`Compositor::take_requests`](crate::compositor::Compositor::take_requests)
/// after each batch of events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShellRequest {
    /// Schedule a new frame.
    Repaint,
    /// Move keyboard focus to a surface, or clear it.
    KeyboardFocus(Option<SurfaceId>),
    /// A press landed on empty space. Dismiss open popups.
    ClosePopups,
    /// Ask the client to resize during an interactive resize.
    Resize {
        /// Surface being resized.
        surface: SurfaceId,
        /// Size when the grab started.
        initial_size: Size,
        /// Pointer travel since the grab started, in whole pixels.
        delta: Vec2,
        /// Edges being dragged.
        edges: ResizeEdge,
    },
    /// Drag motion over a surface, in that surface's local coordinates.
    DragMotion {
        /// Surface under the pointer, if any.
        surface: Option<SurfaceId>,
        /// Surface-local position, or logical position over empty space.
        position: Point,
    },
    /// The drag ended over a surface.
    Drop {
        /// Surface under the pointer, if any.
        surface: Option<SurfaceId>,
        /// Surface-local position, or logical position over empty space.
        position: Point,
    },
    /// The pointer left every surface. Show the default cursor.
    DefaultCursor,
    /// The output switched to a new transform.
    OutputTransform(OutputTransform),
}
