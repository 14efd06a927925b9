// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace output.
//!
//! [`JsonLinesSink`] writes each event as one compact JSON object followed by
//! a newline. Every object has an `"event"` key naming the event kind; view
//! handles are written as `{"index": .., "generation": ..}` and surfaces as
//! their raw id.

use std::io::Write;

use serde_json::{Value, json};

use nubbock_core::trace::{
    ErrorEvent, FadeEvent, FocusEvent, GrabTransitionEvent, PointerDispatchEvent, RestackEvent,
    TouchDispatchEvent, TraceSink, TransformCommitEvent, ViewLifecycleEvent,
};
use nubbock_core::view::{SurfaceId, ViewId};

use crate::pretty::{error_message, grab_name, phase_name, pointer_name};

/// Writes one JSON object per event to a [`Write`](std::io::Write)
/// destination.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    seq: u64,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, seq: 0 }
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, event: &str, mut body: Value) {
        if let Value::Object(map) = &mut body {
            map.insert("event".into(), Value::from(event));
            map.insert("seq".into(), Value::from(self.seq));
        }
        self.seq += 1;
        if serde_json::to_writer(&mut self.writer, &body).is_ok() {
            let _ = self.writer.write_all(b"\n");
        }
    }
}

fn view_json(view: Option<ViewId>) -> Value {
    match view {
        Some(v) => json!({ "index": v.index(), "generation": v.generation() }),
        None => Value::Null,
    }
}

fn surface_json(surface: Option<SurfaceId>) -> Value {
    surface.map_or(Value::Null, |s| Value::from(s.0))
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_view_created(&mut self, e: &ViewLifecycleEvent) {
        self.emit(
            "view_created",
            json!({ "view": view_json(Some(e.view)), "surface": surface_json(e.surface) }),
        );
    }

    fn on_view_removed(&mut self, e: &ViewLifecycleEvent) {
        self.emit(
            "view_removed",
            json!({ "view": view_json(Some(e.view)), "surface": surface_json(e.surface) }),
        );
    }

    fn on_restack(&mut self, e: &RestackEvent) {
        self.emit(
            "restack",
            json!({ "view": view_json(Some(e.view)), "from": e.from, "to": e.to }),
        );
    }

    fn on_grab_transition(&mut self, e: &GrabTransitionEvent) {
        self.emit(
            "grab",
            json!({
                "from": grab_name(e.from),
                "to": grab_name(e.to),
                "target": view_json(e.target),
            }),
        );
    }

    fn on_focus(&mut self, e: &FocusEvent) {
        self.emit(
            "focus",
            json!({ "from": surface_json(e.from), "to": surface_json(e.to) }),
        );
    }

    fn on_pointer_dispatch(&mut self, e: &PointerDispatchEvent) {
        self.emit(
            "pointer",
            json!({
                "kind": pointer_name(e.kind),
                "x": e.logical.x,
                "y": e.logical.y,
                "target": view_json(e.target),
            }),
        );
    }

    fn on_touch_dispatch(&mut self, e: &TouchDispatchEvent) {
        self.emit(
            "touch",
            json!({
                "id": e.id,
                "x": e.logical.x,
                "y": e.logical.y,
                "target": view_json(e.target),
            }),
        );
    }

    fn on_fade(&mut self, e: &FadeEvent) {
        self.emit(
            "fade",
            json!({ "phase": phase_name(e.phase), "opacity": e.opacity }),
        );
    }

    fn on_transform_commit(&mut self, e: &TransformCommitEvent) {
        self.emit(
            "transform",
            json!({ "from": e.from.to_string(), "to": e.to.to_string() }),
        );
    }

    fn on_error(&mut self, e: &ErrorEvent) {
        self.emit("error", json!({ "message": error_message(e) }));
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use nubbock_core::geometry::OutputTransform;
    use nubbock_core::grab::GrabKind;
    use nubbock_core::trace::PointerKind;

    use super::*;

    fn lines(sink: JsonLinesSink<Vec<u8>>) -> Vec<Value> {
        let text = String::from_utf8(sink.into_inner()).unwrap();
        text.lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn one_object_per_line_with_sequence_numbers() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.on_grab_transition(&GrabTransitionEvent {
            from: GrabKind::Idle,
            to: GrabKind::Drag,
            target: None,
        });
        sink.on_pointer_dispatch(&PointerDispatchEvent {
            kind: PointerKind::Motion,
            logical: Point::new(1.5, 2.0),
            target: None,
        });
        sink.on_transform_commit(&TransformCommitEvent {
            from: OutputTransform::Rotate270,
            to: OutputTransform::Normal,
        });

        let out = lines(sink);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["event"], "grab");
        assert_eq!(out[0]["to"], "drag");
        assert_eq!(out[0]["target"], Value::Null);
        assert_eq!(out[1]["seq"], 1);
        assert_eq!(out[1]["x"], 1.5);
        assert_eq!(out[2]["from"], "270");
        assert_eq!(out[2]["to"], "normal");
    }

    #[test]
    fn surfaces_and_errors_are_plain_values() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.on_focus(&FocusEvent {
            from: Some(SurfaceId(2)),
            to: None,
        });
        sink.on_error(&ErrorEvent::UnknownSurface(SurfaceId(9)));

        let out = lines(sink);
        assert_eq!(out[0]["from"], 2);
        assert_eq!(out[0]["to"], Value::Null);
        assert_eq!(out[1]["message"], "unknown surface 9");
    }
}
