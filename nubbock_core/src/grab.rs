// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive grab state and resize anchor math.
//!
//! One pointer stream is modeled, so there is exactly one [`GrabState`].
//! Grabs hold [`ViewId`]s, which go stale when their view is removed; the
//! [`InputRouter`](crate::input::InputRouter) drops any grab whose target
//! or icon no longer resolves.

use kurbo::{Point, Size, Vec2};

use crate::error::GrabError;
use crate::view::ViewId;

bitflags::bitflags! {
    /// Edges a resize is driven from, in `xdg_toplevel` wire values.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ResizeEdge: u32 {
        /// Top edge.
        const TOP = 1;
        /// Bottom edge.
        const BOTTOM = 2;
        /// Left edge.
        const LEFT = 4;
        /// Right edge.
        const RIGHT = 8;
    }
}

impl ResizeEdge {
    /// Decodes wire bits, accepting one edge or one corner.
    pub fn from_wire(bits: u32) -> Result<Self, GrabError> {
        let edge = Self::from_bits(bits).ok_or(GrabError::InvalidEdge(bits))?;
        if edge.is_empty()
            || edge.contains(Self::TOP | Self::BOTTOM)
            || edge.contains(Self::LEFT | Self::RIGHT)
        {
            return Err(GrabError::InvalidEdge(bits));
        }
        Ok(edge)
    }
}

/// The point that stays fixed while resizing from `edge`.
///
/// Dragging the top edge pins the bottom, so the anchor is offset by the
/// height. Dragging the left edge pins the right, offset by the width.
/// Bottom and right edges move away from the origin and add nothing.
#[must_use]
pub fn get_anchor_position(position: Point, edge: ResizeEdge, size: Size) -> Point {
    let mut anchor = position;
    if edge.contains(ResizeEdge::TOP) {
        anchor.y += size.height;
    }
    if edge.contains(ResizeEdge::LEFT) {
        anchor.x += size.width;
    }
    anchor
}

/// Where a view of `size` must sit to keep `anchor` fixed.
#[must_use]
pub fn get_anchored_position(anchor: Point, edge: ResizeEdge, size: Size) -> Point {
    anchor - get_anchor_position(Point::ZERO, edge, size).to_vec2()
}

/// State of an interactive resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeGrab {
    /// View being resized.
    pub target: ViewId,
    /// Edges being dragged.
    pub edges: ResizeEdge,
    /// Whether the view is repositioned each frame to keep `anchor` fixed.
    pub anchored: bool,
    /// Size of the view when the grab started.
    pub initial_size: Size,
    /// Fixed point computed at grab start.
    pub anchor: Point,
}

/// The pointer grab state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GrabState {
    /// Events are hit-tested normally.
    #[default]
    Idle,
    /// Pointer motion moves `target`.
    Moving {
        /// View being moved.
        target: ViewId,
    },
    /// Pointer motion produces resize requests for the target.
    Resizing(ResizeGrab),
    /// A drag-and-drop is in progress.
    Dragging {
        /// View the drag started from.
        target: ViewId,
        /// View showing the drag icon, excluded from hit-testing.
        icon: Option<ViewId>,
    },
}

impl GrabState {
    /// Whether a grab is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The view the grab acts on.
    #[must_use]
    pub fn target(&self) -> Option<ViewId> {
        match self {
            Self::Idle => None,
            Self::Moving { target } | Self::Dragging { target, .. } => Some(*target),
            Self::Resizing(r) => Some(r.target),
        }
    }

    /// The drag icon view, if dragging with one.
    #[must_use]
    pub fn drag_icon(&self) -> Option<ViewId> {
        match self {
            Self::Dragging { icon, .. } => *icon,
            _ => None,
        }
    }

    /// Which state this is, without its data.
    #[must_use]
    pub fn kind(&self) -> GrabKind {
        match self {
            Self::Idle => GrabKind::Idle,
            Self::Moving { .. } => GrabKind::Move,
            Self::Resizing(_) => GrabKind::Resize,
            Self::Dragging { .. } => GrabKind::Drag,
        }
    }
}

/// Discriminant of [`GrabState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrabKind {
    /// No grab.
    Idle,
    /// Interactive move.
    Move,
    /// Interactive resize.
    Resize,
    /// Drag and drop.
    Drag,
}

/// Resize delta between the grab start and `pointer`, rounded to whole
/// pixels.
#[must_use]
pub fn resize_delta(start: Point, pointer: Point) -> Vec2 {
    (pointer - start).round()
}
