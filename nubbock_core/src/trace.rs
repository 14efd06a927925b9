// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the compositor core.
//!
//! This module provides a [`TraceSink`] trait with one method per event the
//! [`Compositor`](crate::compositor::Compositor) reports. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies.

use kurbo::Point;

use crate::animator::FadePhase;
use crate::error::{GrabError, StackError, TransformError};
use crate::geometry::OutputTransform;
use crate::grab::GrabKind;
use crate::view::{SurfaceId, ViewId};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a view is created or removed.
#[derive(Clone, Copy, Debug)]
pub struct ViewLifecycleEvent {
    /// The view.
    pub view: ViewId,
    /// Its surface at the time of the event.
    pub surface: Option<SurfaceId>,
}

/// Emitted when a view changes place in the stacking order.
#[derive(Clone, Copy, Debug)]
pub struct RestackEvent {
    /// The view whose run moved.
    pub view: ViewId,
    /// Order index before the move.
    pub from: usize,
    /// Order index after the move.
    pub to: usize,
}

/// Emitted on every grab state transition.
#[derive(Clone, Copy, Debug)]
pub struct GrabTransitionEvent {
    /// Previous state.
    pub from: GrabKind,
    /// New state.
    pub to: GrabKind,
    /// View the new state acts on.
    pub target: Option<ViewId>,
}

/// Emitted when keyboard focus moves.
#[derive(Clone, Copy, Debug)]
pub struct FocusEvent {
    /// Previous focus holder.
    pub from: Option<SurfaceId>,
    /// New focus holder.
    pub to: Option<SurfaceId>,
}

/// Which pointer event was dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Button press.
    Press,
    /// Button release.
    Release,
    /// Motion.
    Motion,
}

/// Emitted for each pointer delivery.
#[derive(Clone, Copy, Debug)]
pub struct PointerDispatchEvent {
    /// Event kind.
    pub kind: PointerKind,
    /// Logical position.
    pub logical: Point,
    /// Receiving view.
    pub target: Option<ViewId>,
}

/// Emitted for each touch point delivery.
#[derive(Clone, Copy, Debug)]
pub struct TouchDispatchEvent {
    /// Touch point identifier.
    pub id: i32,
    /// Logical position.
    pub logical: Point,
    /// Receiving view.
    pub target: Option<ViewId>,
}

/// Emitted on each fade tick that changed opacity.
#[derive(Clone, Copy, Debug)]
pub struct FadeEvent {
    /// Phase after the tick.
    pub phase: FadePhase,
    /// Opacity after the tick.
    pub opacity: f32,
}

/// Emitted when the output switches transform.
#[derive(Clone, Copy, Debug)]
pub struct TransformCommitEvent {
    /// Transform before the commit.
    pub from: OutputTransform,
    /// Transform after the commit.
    pub to: OutputTransform,
}

/// A recoverable error that was absorbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorEvent {
    /// A view stack operation failed.
    Stack(StackError),
    /// A grab request was rejected.
    Grab(GrabError),
    /// An orientation command was rejected.
    Transform(TransformError),
    /// An event named a surface the compositor does not know.
    UnknownSurface(SurfaceId),
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives structured trace events from the compositor.
///
/// Every method has a default no-op implementation.
pub trait TraceSink {
    /// A view was created.
    fn on_view_created(&mut self, _e: &ViewLifecycleEvent) {}
    /// A view was removed.
    fn on_view_removed(&mut self, _e: &ViewLifecycleEvent) {}
    /// A view's run moved in the stacking order.
    fn on_restack(&mut self, _e: &RestackEvent) {}
    /// The grab state changed.
    fn on_grab_transition(&mut self, _e: &GrabTransitionEvent) {}
    /// Keyboard focus moved.
    fn on_focus(&mut self, _e: &FocusEvent) {}
    /// A pointer event was delivered.
    fn on_pointer_dispatch(&mut self, _e: &PointerDispatchEvent) {}
    /// A touch point was delivered.
    fn on_touch_dispatch(&mut self, _e: &TouchDispatchEvent) {}
    /// A fade tick ran.
    fn on_fade(&mut self, _e: &FadeEvent) {}
    /// The output transform changed.
    fn on_transform_commit(&mut self, _e: &TransformCommitEvent) {}
    /// A recoverable error was absorbed.
    fn on_error(&mut self, _e: &ErrorEvent) {}
}

/// A sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident, $e:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a view creation.
    #[inline]
    pub fn view_created(&mut self, e: &ViewLifecycleEvent) {
        dispatch!(self, on_view_created, e);
    }

    /// Emits a view removal.
    #[inline]
    pub fn view_removed(&mut self, e: &ViewLifecycleEvent) {
        dispatch!(self, on_view_removed, e);
    }

    /// Emits a [`RestackEvent`].
    #[inline]
    pub fn restack(&mut self, e: &RestackEvent) {
        dispatch!(self, on_restack, e);
    }

    /// Emits a [`GrabTransitionEvent`].
    #[inline]
    pub fn grab_transition(&mut self, e: &GrabTransitionEvent) {
        dispatch!(self, on_grab_transition, e);
    }

    /// Emits a [`FocusEvent`].
    #[inline]
    pub fn focus(&mut self, e: &FocusEvent) {
        dispatch!(self, on_focus, e);
    }

    /// Emits a [`PointerDispatchEvent`].
    #[inline]
    pub fn pointer_dispatch(&mut self, e: &PointerDispatchEvent) {
        dispatch!(self, on_pointer_dispatch, e);
    }

    /// Emits a [`TouchDispatchEvent`].
    #[inline]
    pub fn touch_dispatch(&mut self, e: &TouchDispatchEvent) {
        dispatch!(self, on_touch_dispatch, e);
    }

    /// Emits a [`FadeEvent`].
    #[inline]
    pub fn fade(&mut self, e: &FadeEvent) {
        dispatch!(self, on_fade, e);
    }

    /// Emits a [`TransformCommitEvent`].
    #[inline]
    pub fn transform_commit(&mut self, e: &TransformCommitEvent) {
        dispatch!(self, on_transform_commit, e);
    }

    /// Emits an [`ErrorEvent`].
    #[inline]
    pub fn error(&mut self, e: &ErrorEvent) {
        dispatch!(self, on_error, e);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_focus() -> FocusEvent {
        FocusEvent {
            from: None,
            to: Some(SurfaceId(3)),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_focus(&sample_focus());
        sink.on_error(&ErrorEvent::UnknownSurface(SurfaceId(1)));
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.focus(&sample_focus());
        tracer.transform_commit(&TransformCommitEvent {
            from: OutputTransform::Normal,
            to: OutputTransform::Rotate90,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            focus: Vec<Option<SurfaceId>>,
        }
        impl TraceSink for RecordingSink {
            fn on_focus(&mut self, e: &FocusEvent) {
                self.focus.push(e.to);
            }
        }

        let mut sink = RecordingSink { focus: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.focus(&sample_focus());
        drop(tracer);
        assert_eq!(sink.focus, &[Some(SurfaceId(3))]);
    }
}
