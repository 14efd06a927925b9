// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use nubbock_core::animator::FadePhase;
use nubbock_core::grab::GrabKind;
use nubbock_core::trace::{
    ErrorEvent, FadeEvent, FocusEvent, GrabTransitionEvent, PointerDispatchEvent, PointerKind,
    RestackEvent, TouchDispatchEvent, TraceSink, TransformCommitEvent, ViewLifecycleEvent,
};
use nubbock_core::view::{SurfaceId, ViewId};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub(crate) fn view_name(view: Option<ViewId>) -> String {
    match view {
        Some(v) => format!("{}@{}", v.index(), v.generation()),
        None => "none".into(),
    }
}

pub(crate) fn surface_name(surface: Option<SurfaceId>) -> String {
    match surface {
        Some(s) => format!("s{}", s.0),
        None => "none".into(),
    }
}

pub(crate) fn grab_name(kind: GrabKind) -> &'static str {
    match kind {
        GrabKind::Idle => "idle",
        GrabKind::Move => "move",
        GrabKind::Resize => "resize",
        GrabKind::Drag => "drag",
    }
}

pub(crate) fn pointer_name(kind: PointerKind) -> &'static str {
    match kind {
        PointerKind::Press => "press",
        PointerKind::Release => "release",
        PointerKind::Motion => "motion",
    }
}

pub(crate) fn phase_name(phase: FadePhase) -> &'static str {
    match phase {
        FadePhase::Idle => "idle",
        FadePhase::FadingOut { .. } => "fading-out",
        FadePhase::FadingIn => "fading-in",
    }
}

pub(crate) fn error_message(e: &ErrorEvent) -> String {
    match e {
        ErrorEvent::Stack(err) => err.to_string(),
        ErrorEvent::Grab(err) => err.to_string(),
        ErrorEvent::Transform(err) => err.to_string(),
        ErrorEvent::UnknownSurface(s) => format!("unknown surface {}", s.0),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_view_created(&mut self, e: &ViewLifecycleEvent) {
        let _ = writeln!(
            self.writer,
            "[view:create] view={} surface={}",
            view_name(Some(e.view)),
            surface_name(e.surface),
        );
    }

    fn on_view_removed(&mut self, e: &ViewLifecycleEvent) {
        let _ = writeln!(self.writer, "[view:remove] view={}", view_name(Some(e.view)));
    }

    fn on_restack(&mut self, e: &RestackEvent) {
        let _ = writeln!(
            self.writer,
            "[restack] view={} {} -> {}",
            view_name(Some(e.view)),
            e.from,
            e.to,
        );
    }

    fn on_grab_transition(&mut self, e: &GrabTransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[grab] {} -> {} target={}",
            grab_name(e.from),
            grab_name(e.to),
            view_name(e.target),
        );
    }

    fn on_focus(&mut self, e: &FocusEvent) {
        let _ = writeln!(
            self.writer,
            "[focus] {} -> {}",
            surface_name(e.from),
            surface_name(e.to),
        );
    }

    fn on_pointer_dispatch(&mut self, e: &PointerDispatchEvent) {
        let _ = writeln!(
            self.writer,
            "[pointer] {} at ({:.1}, {:.1}) view={}",
            pointer_name(e.kind),
            e.logical.x,
            e.logical.y,
            view_name(e.target),
        );
    }

    fn on_touch_dispatch(&mut self, e: &TouchDispatchEvent) {
        let _ = writeln!(
            self.writer,
            "[touch] id={} at ({:.1}, {:.1}) view={}",
            e.id,
            e.logical.x,
            e.logical.y,
            view_name(e.target),
        );
    }

    fn on_fade(&mut self, e: &FadeEvent) {
        let _ = writeln!(
            self.writer,
            "[fade] {} opacity={:.2}",
            phase_name(e.phase),
            e.opacity,
        );
    }

    fn on_transform_commit(&mut self, e: &TransformCommitEvent) {
        let _ = writeln!(self.writer, "[transform] {} -> {}", e.from, e.to);
    }

    fn on_error(&mut self, e: &ErrorEvent) {
        let _ = writeln!(self.writer, "[error] {}", error_message(e));
    }
}
