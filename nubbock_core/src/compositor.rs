// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The compositor façade.
//!
//! [`Compositor`] ties the pieces together for one seat and one output. The
//! protocol layer reports surface lifecycle events, the window system reports
//! raw input, and an orientation source requests transforms. Every entry point
//! runs to completion before the next, so a raise, a grab transition and the
//! repaint they cause land together.
//!
//! Errors from individual operations are traced and absorbed: a bad event
//! degrades that one interaction and the compositor carries on.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Point, Size, Vec2};

use crate::animator::{AdvanceSummary, FadePhase, TickOutcome, TransformAnimator};
use crate::backend::TextureSource;
use crate::config::CompositorConfig;
use crate::error::{ConfigError, GrabError, StackError, TransformError};
use crate::geometry::OutputTransform;
use crate::grab::{GrabKind, GrabState};
use crate::input::{
    InputRouter, KeyDelivery, KeyEvent, PointerDelivery, PointerEvent, PointerEventKind,
    TouchDelivery, TouchEvent, TouchPoint,
};
use crate::output::{Output, OutputId};
use crate::request::ShellRequest;
use crate::time::HostTime;
use crate::trace::{
    ErrorEvent, FadeEvent, FocusEvent, GrabTransitionEvent, PointerDispatchEvent, PointerKind,
    RestackEvent, TouchDispatchEvent, TraceSink, Tracer, TransformCommitEvent,
    ViewLifecycleEvent,
};
use crate::view::{
    ClientId, OrderedViews, SceneChanges, SurfaceId, TextureHandle, TextureOrigin, View, ViewId,
    ViewStack,
};

/// Protocol role of a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    /// No role assigned yet.
    #[default]
    None,
    /// A shell toplevel. Takes keyboard focus.
    Shell,
    /// A popup menu or tooltip.
    Popup,
    /// A subsurface of another surface.
    Subsurface,
    /// A pointer cursor image.
    Cursor,
    /// A drag-and-drop icon.
    DragIcon,
}

#[derive(Clone, Copy, Debug)]
struct SurfaceRecord {
    client: ClientId,
    role: SurfaceRole,
    has_content: bool,
}

/// The pointer cursor image requested by the focused client.
///
/// The proxy is not stacked. It is replaced or cleared by
/// [`Compositor::set_cursor_surface`], and cleared when its surface is
/// destroyed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorProxy {
    /// Surface holding the cursor image.
    pub surface: SurfaceId,
    /// Offset of the hotspot within the image.
    pub hotspot: Vec2,
    /// Most recently acquired texture.
    pub texture: Option<TextureHandle>,
    /// Row order of `texture`.
    pub origin: TextureOrigin,
    /// Image size.
    pub size: Size,
}

/// Where a touch event goes.
#[derive(Clone, Debug, PartialEq)]
pub enum TouchDispatch {
    /// Per-point deliveries.
    Points(Vec<TouchDelivery>),
    /// Cancel the sequence for the client of the most recently touched view.
    Cancel {
        /// Surface of the most recently touched view.
        surface: Option<SurfaceId>,
        /// Its client.
        client: Option<ClientId>,
    },
}

/// Scene, input and rotation state for a single-output compositor.
pub struct Compositor {
    config: CompositorConfig,
    output: Output,
    stack: ViewStack,
    router: InputRouter,
    animator: TransformAnimator,
    surfaces: BTreeMap<SurfaceId, SurfaceRecord>,
    keyboard_focus: Option<SurfaceId>,
    cursor: Option<CursorProxy>,
    requests: Vec<ShellRequest>,
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Compositor")
            .field("output", &self.output)
            .field("views", &self.stack.len())
            .field("grab", self.router.grab())
            .field("fade", &self.animator.phase())
            .field("keyboard_focus", &self.keyboard_focus)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Creates a compositor with no surfaces.
    pub fn new(config: CompositorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            output: Output {
                id: OutputId(0),
                size: config.output_size,
                transform: config.initial_transform,
            },
            stack: ViewStack::new(),
            router: InputRouter::new(config.move_modifiers),
            animator: TransformAnimator::new(config.initial_transform, config.fade),
            surfaces: BTreeMap::new(),
            keyboard_focus: None,
            cursor: None,
            requests: Vec::new(),
            sink: None,
        })
    }

    /// Installs a sink for trace events.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    fn tracer(&mut self) -> Tracer<'_> {
        match &mut self.sink {
            Some(sink) => Tracer::new(sink.as_mut()),
            None => Tracer::none(),
        }
    }

    // -- Queries --

    /// The configuration this compositor was built with.
    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// The output, with its committed transform.
    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// The view stack.
    #[must_use]
    pub fn stack(&self) -> &ViewStack {
        &self.stack
    }

    /// A snapshot of one view.
    #[must_use]
    pub fn view(&self, id: ViewId) -> Option<View> {
        self.stack.view(id)
    }

    /// The view backing `surface`.
    #[must_use]
    pub fn find_view(&self, surface: SurfaceId) -> Option<ViewId> {
        self.stack.find_by_surface(surface)
    }

    /// Views in back-to-front paint order.
    pub fn ordered_views(&self) -> impl Iterator<Item = View> + '_ {
        let ids: OrderedViews<'_> = self.stack.ordered_views();
        ids.filter_map(|id| self.stack.view(id))
    }

    /// The committed output transform.
    #[must_use]
    pub fn current_transform(&self) -> OutputTransform {
        self.animator.current()
    }

    /// Opacity of the black rotation overlay.
    #[must_use]
    pub fn current_overlay_opacity(&self) -> f32 {
        self.animator.opacity()
    }

    /// Phase of the rotation fade.
    #[must_use]
    pub fn fade_phase(&self) -> FadePhase {
        self.animator.phase()
    }

    /// Whether the fade needs ticks.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    /// When the next fade tick is due, once [`advance`](Self::advance) has
    /// started the clock.
    #[must_use]
    pub fn next_animation_deadline(&self) -> Option<HostTime> {
        self.animator.next_deadline()
    }

    /// The pointer grab state.
    #[must_use]
    pub fn grab_state(&self) -> &GrabState {
        self.router.grab()
    }

    /// Last pointer position in logical space.
    #[must_use]
    pub fn pointer_position(&self) -> Point {
        self.router.pointer_position()
    }

    /// Surface holding keyboard focus.
    #[must_use]
    pub fn keyboard_focus(&self) -> Option<SurfaceId> {
        self.keyboard_focus
    }

    /// The cursor proxy, if a client set one.
    #[must_use]
    pub fn cursor(&self) -> Option<&CursorProxy> {
        self.cursor.as_ref()
    }

    /// Role of a known surface.
    #[must_use]
    pub fn surface_role(&self, surface: SurfaceId) -> Option<SurfaceRole> {
        self.surfaces.get(&surface).map(|r| r.role)
    }

    /// Client owning a known surface.
    #[must_use]
    pub fn client_of(&self, surface: SurfaceId) -> Option<ClientId> {
        self.surfaces.get(&surface).map(|r| r.client)
    }

    /// Drains queued shell requests.
    pub fn take_requests(&mut self) -> Vec<ShellRequest> {
        core::mem::take(&mut self.requests)
    }

    /// Drains scene changes since the previous call.
    pub fn take_changes(&mut self) -> SceneChanges {
        self.stack.take_changes()
    }

    // -- Surface lifecycle --

    /// A client created a surface. Its view goes on top of the stack.
    pub fn on_surface_created(&mut self, surface: SurfaceId, client: ClientId) -> ViewId {
        if let Some(existing) = self.stack.find_by_surface(surface) {
            return existing;
        }
        let id = self.stack.create_view(Some(surface));
        if let Err(e) = self.stack.append(id) {
            self.tracer().error(&ErrorEvent::Stack(e));
        }
        self.surfaces.insert(
            surface,
            SurfaceRecord {
                client,
                role: SurfaceRole::None,
                has_content: false,
            },
        );
        self.tracer().view_created(&ViewLifecycleEvent {
            view: id,
            surface: Some(surface),
        });
        id
    }

    /// A surface was destroyed.
    ///
    /// Its view loses the surface link, then every view without a surface is
    /// removed. Grab, focus and cursor state pointing at anything removed is
    /// dropped.
    pub fn on_surface_destroyed(&mut self, surface: SurfaceId) {
        if let Some(view) = self.stack.find_by_surface(surface) {
            if let Err(e) = self.stack.detach_surface(view) {
                self.tracer().error(&ErrorEvent::Stack(e));
            }
        }
        self.surfaces.remove(&surface);
        self.sweep_detached();

        let before = self.router.grab().kind();
        if self.router.forget_stale(&self.stack) {
            self.tracer().grab_transition(&GrabTransitionEvent {
                from: before,
                to: GrabKind::Idle,
                target: None,
            });
        }
        if self.keyboard_focus == Some(surface) {
            self.set_keyboard_focus(None);
        }
        if self.cursor.is_some_and(|c| c.surface == surface) {
            self.cursor = None;
            self.requests.push(ShellRequest::DefaultCursor);
        }
        self.request_repaint();
    }

    fn sweep_detached(&mut self) {
        let detached: Vec<ViewId> = self
            .stack
            .ordered_views()
            .filter(|&v| self.stack.surface(v).is_none())
            .collect();
        for view in detached {
            match self.stack.remove(view) {
                Ok(()) => self.tracer().view_removed(&ViewLifecycleEvent {
                    view,
                    surface: None,
                }),
                Err(e) => self.tracer().error(&ErrorEvent::Stack(e)),
            }
        }
    }

    /// A surface gained or lost its buffer.
    ///
    /// A shell surface that gains content takes keyboard focus.
    pub fn on_surface_content_changed(&mut self, surface: SurfaceId, has_content: bool) {
        let Some(record) = self.surfaces.get_mut(&surface) else {
            self.tracer().error(&ErrorEvent::UnknownSurface(surface));
            return;
        };
        record.has_content = has_content;
        let role = record.role;
        if let Some(view) = self.stack.find_by_surface(surface) {
            if let Err(e) = self.stack.set_has_content(view, has_content) {
                self.tracer().error(&ErrorEvent::Stack(e));
            }
        }
        if has_content && role == SurfaceRole::Shell {
            self.set_keyboard_focus(Some(surface));
        }
        self.request_repaint();
    }

    /// A surface was given a protocol role.
    ///
    /// A surface that already has content and becomes a shell surface takes
    /// keyboard focus.
    pub fn on_surface_role_changed(&mut self, surface: SurfaceId, role: SurfaceRole) {
        let Some(record) = self.surfaces.get_mut(&surface) else {
            self.tracer().error(&ErrorEvent::UnknownSurface(surface));
            return;
        };
        record.role = role;
        let has_content = record.has_content;
        if let Some(view) = self.stack.find_by_surface(surface) {
            if let Err(e) = self.stack.set_cursor(view, role == SurfaceRole::Cursor) {
                self.tracer().error(&ErrorEvent::Stack(e));
            }
        }
        if has_content && role == SurfaceRole::Shell {
            self.set_keyboard_focus(Some(surface));
        }
    }

    /// A subsurface was attached to `parent`, or detached with `None`.
    pub fn on_subsurface_relation_changed(&mut self, child: SurfaceId, parent: Option<SurfaceId>) {
        let Some(child_view) = self.lookup(child) else {
            return;
        };
        let parent_view = match parent {
            Some(p) => match self.lookup(p) {
                Some(v) => Some(v),
                None => return,
            },
            None => None,
        };
        let from = self.stack.index_of(child_view);
        match self.stack.set_parent(child_view, parent_view) {
            Ok(()) => {
                let to = self.stack.index_of(child_view);
                if let (Some(from), Some(to)) = (from, to) {
                    if from != to {
                        self.tracer().restack(&RestackEvent {
                            view: child_view,
                            from,
                            to,
                        });
                    }
                }
                self.request_repaint();
            }
            Err(e) => self.tracer().error(&ErrorEvent::Stack(e)),
        }
    }

    /// A subsurface moved relative to its parent.
    pub fn on_subsurface_position_changed(&mut self, surface: SurfaceId, position: Point) {
        let Some(view) = self.lookup(surface) else {
            return;
        };
        self.absorb(|stack| stack.set_position(view, position));
        self.request_repaint();
    }

    /// The next commit of `surface` carries a buffer offset.
    pub fn on_buffer_offset_for_next_frame(&mut self, surface: SurfaceId, offset: Vec2) {
        let Some(view) = self.lookup(surface) else {
            return;
        };
        self.absorb(|stack| stack.apply_buffer_offset(view, offset));
    }

    /// The content size of `surface` changed.
    pub fn on_surface_size_changed(&mut self, surface: SurfaceId, size: Size) {
        if let Some(cursor) = self.cursor.as_mut().filter(|c| c.surface == surface) {
            cursor.size = size;
        }
        let Some(view) = self.lookup(surface) else {
            return;
        };
        self.absorb(|stack| stack.set_size(view, size));
        self.request_repaint();
    }

    /// Keeps painting `view`'s last texture whether or not it has content.
    pub fn set_buffer_locked(&mut self, view: ViewId, locked: bool) -> Result<(), StackError> {
        self.stack.set_buffer_locked(view, locked)?;
        self.request_repaint();
        Ok(())
    }

    /// Scales `view`'s painted rectangle.
    pub fn set_animation_factor(&mut self, view: ViewId, factor: f64) -> Result<(), StackError> {
        self.stack.set_animation_factor(view, factor)?;
        self.request_repaint();
        Ok(())
    }

    /// Sets or clears the pointer cursor image.
    pub fn set_cursor_surface(&mut self, surface: Option<SurfaceId>, hotspot: Vec2) {
        let Some(surface) = surface else {
            self.cursor = None;
            self.request_repaint();
            return;
        };
        if let Some(cursor) = self.cursor.as_mut().filter(|c| c.surface == surface) {
            cursor.hotspot = hotspot;
        } else {
            let view = self.stack.find_by_surface(surface);
            self.cursor = Some(CursorProxy {
                surface,
                hotspot,
                texture: None,
                origin: TextureOrigin::default(),
                size: view.and_then(|v| self.stack.size(v)).unwrap_or(Size::ZERO),
            });
            if let Some(view) = view {
                self.absorb(|stack| stack.set_cursor(view, true));
            }
        }
        self.request_repaint();
    }

    // -- Input --

    /// Routes a raw window-space pointer event.
    ///
    /// Returns the events the seat should forward, in order. A press that
    /// starts a button sequence is preceded by a button-less motion to the
    /// same view.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> Vec<PointerDelivery> {
        let logical = self.to_logical(event.position);
        let before = self.router.grab().kind();
        let order_before = matches!(event.kind, PointerEventKind::Press(_))
            .then(|| self.stack.order().to_vec());

        let deliveries = self
            .router
            .pointer(&mut self.stack, event, logical, &mut self.requests);

        if let (Some(order_before), Some(view)) = (order_before, self.router.implicit_grab()) {
            self.trace_raise(&order_before, view);
        }
        self.trace_grab(before);

        for d in &deliveries {
            let kind = match d.kind {
                PointerEventKind::Press(_) => PointerKind::Press,
                PointerEventKind::Release(_) => PointerKind::Release,
                PointerEventKind::Motion => PointerKind::Motion,
            };
            self.tracer().pointer_dispatch(&PointerDispatchEvent {
                kind,
                logical: d.logical,
                target: d.view,
            });
            if kind == PointerKind::Press {
                self.focus_on_press(d.surface);
            }
        }
        deliveries
    }

    fn focus_on_press(&mut self, surface: Option<SurfaceId>) {
        if surface == self.keyboard_focus {
            return;
        }
        let focusable = match surface {
            None => true,
            Some(s) => self.surface_role(s) == Some(SurfaceRole::Shell),
        };
        if focusable {
            self.set_keyboard_focus(surface);
        }
    }

    /// Routes a raw window-space touch event.
    pub fn handle_touch_event(&mut self, event: &TouchEvent) -> TouchDispatch {
        match event {
            TouchEvent::Points(points) => {
                let mapped: Vec<TouchPoint> = points
                    .iter()
                    .map(|tp| TouchPoint {
                        position: self.to_logical(tp.position),
                        ..*tp
                    })
                    .collect();
                let deliveries = self.router.touch(&self.stack, &mapped);
                for (d, tp) in deliveries.iter().zip(&mapped) {
                    self.tracer().touch_dispatch(&TouchDispatchEvent {
                        id: d.id,
                        logical: tp.position,
                        target: d.view,
                    });
                }
                TouchDispatch::Points(deliveries)
            }
            TouchEvent::Cancel => {
                let surface = self
                    .router
                    .last_touched()
                    .and_then(|v| self.stack.surface(v));
                TouchDispatch::Cancel {
                    surface,
                    client: surface.and_then(|s| self.client_of(s)),
                }
            }
        }
    }

    /// Routes a key event to the keyboard focus.
    #[must_use]
    pub fn handle_key_event(&self, event: &KeyEvent) -> Option<KeyDelivery> {
        self.keyboard_focus.map(|surface| KeyDelivery {
            surface,
            scan_code: event.scan_code,
            pressed: event.pressed,
        })
    }

    // -- Surface-initiated grabs --

    /// The client under the implicit grab asked to be moved.
    pub fn start_move(&mut self) -> Result<(), GrabError> {
        let before = self.router.grab().kind();
        let result = self.router.start_move(&self.stack);
        self.finish_grab_request(before, result)
    }

    /// The client under the implicit grab asked to be resized from `edges`.
    pub fn start_resize(&mut self, edges: u32, anchored: bool) -> Result<(), GrabError> {
        let before = self.router.grab().kind();
        let result = self.router.start_resize(&self.stack, edges, anchored);
        self.finish_grab_request(before, result)
    }

    /// The client under the implicit grab started a drag, optionally with an
    /// icon surface.
    pub fn start_drag(&mut self, icon: Option<SurfaceId>) -> Result<(), GrabError> {
        let icon_view = icon.and_then(|s| self.lookup(s));
        let before = self.router.grab().kind();
        let result = self.router.start_drag(&mut self.stack, icon_view);
        if result.is_ok() && icon_view.is_some() {
            self.request_repaint();
        }
        self.finish_grab_request(before, result)
    }

    fn finish_grab_request(
        &mut self,
        before: GrabKind,
        result: Result<(), GrabError>,
    ) -> Result<(), GrabError> {
        match result {
            Ok(()) => self.trace_grab(before),
            Err(e) => self.tracer().error(&ErrorEvent::Grab(e)),
        }
        result
    }

    // -- Orientation --

    /// Starts a rotation fade toward `transform`. Returns whether a fade
    /// started.
    pub fn request_transform(&mut self, transform: OutputTransform) -> bool {
        let started = self.animator.request_transform(transform);
        if started {
            self.request_repaint();
        }
        started
    }

    /// Like [`request_transform`](Self::request_transform), decoding a wire
    /// code first.
    pub fn request_transform_code(&mut self, code: u32) -> Result<bool, TransformError> {
        match OutputTransform::from_code(code) {
            Ok(t) => Ok(self.request_transform(t)),
            Err(e) => {
                self.tracer().error(&ErrorEvent::Transform(e));
                Err(e)
            }
        }
    }

    /// Advances the fade by one step.
    pub fn tick(&mut self) -> TickOutcome {
        let from = self.animator.current();
        let outcome = self.animator.tick();
        if let TickOutcome::Committed(to) = outcome {
            self.commit_transform(from, to);
        }
        if outcome != TickOutcome::Idle {
            self.trace_fade();
            self.request_repaint();
        }
        outcome
    }

    /// Runs the fade ticks due at `now`.
    pub fn advance(&mut self, now: HostTime) -> AdvanceSummary {
        let from = self.animator.current();
        let summary = self.animator.advance(now);
        if let Some(to) = summary.committed {
            self.commit_transform(from, to);
        }
        if summary.ticks > 0 {
            self.trace_fade();
            self.request_repaint();
        }
        summary
    }

    fn commit_transform(&mut self, from: OutputTransform, to: OutputTransform) {
        self.output.transform = to;
        self.requests.push(ShellRequest::OutputTransform(to));
        self.tracer()
            .transform_commit(&TransformCommitEvent { from, to });
    }

    // -- Frame --

    /// Per-frame work before painting: repositions an anchored resize and
    /// refreshes textures.
    pub fn begin_frame(&mut self, textures: &mut dyn TextureSource) {
        let before = self.router.grab().kind();
        self.router.begin_frame(&mut self.stack);
        self.trace_grab(before);

        let ids: Vec<ViewId> = self.stack.ordered_views().collect();
        for id in ids {
            let Some(surface) = self.stack.surface(id) else {
                continue;
            };
            // The cursor proxy acquires cursor images itself.
            if self.stack.flags(id).is_some_and(|f| f.cursor) {
                continue;
            }
            if let Some(tex) = textures.acquire_current_texture(surface) {
                self.absorb(|stack| stack.set_texture(id, tex.handle, tex.origin));
            }
        }

        if let Some(cursor) = self.cursor.as_mut() {
            if let Some(tex) = textures.acquire_current_texture(cursor.surface) {
                cursor.texture = Some(tex.handle);
                cursor.origin = tex.origin;
            }
        }
    }

    // -- Helpers --

    fn to_logical(&self, p: Point) -> Point {
        self.animator.current().to_logical(p, self.output.size)
    }

    fn lookup(&mut self, surface: SurfaceId) -> Option<ViewId> {
        let view = self.stack.find_by_surface(surface);
        if view.is_none() {
            self.tracer().error(&ErrorEvent::UnknownSurface(surface));
        }
        view
    }

    fn absorb(&mut self, f: impl FnOnce(&mut ViewStack) -> Result<(), StackError>) {
        if let Err(e) = f(&mut self.stack) {
            self.tracer().error(&ErrorEvent::Stack(e));
        }
    }

    fn request_repaint(&mut self) {
        if !self.requests.contains(&ShellRequest::Repaint) {
            self.requests.push(ShellRequest::Repaint);
        }
    }

    fn set_keyboard_focus(&mut self, surface: Option<SurfaceId>) {
        if self.keyboard_focus == surface {
            return;
        }
        let from = self.keyboard_focus;
        self.keyboard_focus = surface;
        self.requests.push(ShellRequest::KeyboardFocus(surface));
        self.tracer().focus(&FocusEvent { from, to: surface });
    }

    fn trace_grab(&mut self, before: GrabKind) {
        let after = *self.router.grab();
        if after.kind() != before {
            self.tracer().grab_transition(&GrabTransitionEvent {
                from: before,
                to: after.kind(),
                target: after.target(),
            });
        }
    }

    fn trace_raise(&mut self, order_before: &[u32], pressed: ViewId) {
        let Some(top) = self.stack.top_level(pressed) else {
            return;
        };
        let from = order_before.iter().position(|&i| i == top.index());
        let to = self.stack.index_of(top);
        if let (Some(from), Some(to)) = (from, to) {
            if from != to {
                self.tracer().restack(&RestackEvent {
                    view: top,
                    from,
                    to,
                });
            }
        }
    }

    fn trace_fade(&mut self) {
        let e = FadeEvent {
            phase: self.animator.phase(),
            opacity: self.animator.opacity(),
        };
        self.tracer().fade(&e);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::backend::AcquiredTexture;
    use crate::input::{Buttons, Modifiers, TouchPointState};

    fn compositor() -> Compositor {
        Compositor::new(CompositorConfig::desktop()).unwrap()
    }

    fn window(c: &mut Compositor, s: u32, client: u32, pos: (f64, f64), size: (f64, f64)) -> ViewId {
        let surface = SurfaceId(s);
        let id = c.on_surface_created(surface, ClientId(client));
        c.on_surface_role_changed(surface, SurfaceRole::Shell);
        c.on_subsurface_position_changed(surface, Point::new(pos.0, pos.1));
        c.on_surface_size_changed(surface, Size::new(size.0, size.1));
        id
    }

    fn press_at(x: f64, y: f64) -> PointerEvent {
        PointerEvent {
            kind: PointerEventKind::Press(Buttons::LEFT),
            position: Point::new(x, y),
            buttons: Buttons::LEFT,
            modifiers: Modifiers::empty(),
        }
    }

    fn release_at(x: f64, y: f64) -> PointerEvent {
        PointerEvent {
            kind: PointerEventKind::Release(Buttons::LEFT),
            position: Point::new(x, y),
            buttons: Buttons::empty(),
            modifiers: Modifiers::empty(),
        }
    }

    struct FixedTextures {
        next: Option<AcquiredTexture>,
    }

    impl TextureSource for FixedTextures {
        fn acquire_current_texture(&mut self, _surface: SurfaceId) -> Option<AcquiredTexture> {
            self.next
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut cfg = CompositorConfig::desktop();
        cfg.output_count = 2;
        assert_eq!(
            Compositor::new(cfg).err(),
            Some(ConfigError::UnsupportedOutputCount(2))
        );
    }

    #[test]
    fn child_press_delivers_parent_relative_offset() {
        let mut c = compositor();
        let a = window(&mut c, 1, 1, (5.0, 5.0), (300.0, 300.0));
        let b = c.on_surface_created(SurfaceId(2), ClientId(1));
        c.on_subsurface_relation_changed(SurfaceId(2), Some(SurfaceId(1)));
        c.on_subsurface_position_changed(SurfaceId(2), Point::new(10.0, 10.0));
        c.on_surface_size_changed(SurfaceId(2), Size::new(40.0, 40.0));
        assert_eq!(c.view(b).unwrap().parent, Some(a));

        let raw = Point::new(30.0, 42.0);
        let d = c.handle_pointer_event(&press_at(raw.x, raw.y));
        let press = d.last().unwrap();
        assert_eq!(press.view, Some(b));
        assert_eq!(press.local, raw - Vec2::new(15.0, 15.0));
    }

    #[test]
    fn destroy_sweeps_views_and_promotes_children() {
        let mut c = compositor();
        let a = window(&mut c, 1, 1, (0.0, 0.0), (100.0, 100.0));
        let b = c.on_surface_created(SurfaceId(2), ClientId(1));
        c.on_subsurface_relation_changed(SurfaceId(2), Some(SurfaceId(1)));
        let other = window(&mut c, 3, 2, (200.0, 0.0), (100.0, 100.0));
        c.take_requests();

        c.on_surface_destroyed(SurfaceId(1));
        assert!(!c.stack().is_alive(a));
        assert_eq!(c.view(b).unwrap().parent, None);
        assert_eq!(c.stack().ordered_views().collect::<Vec<_>>(), vec![b, other]);
        assert!(c.take_requests().contains(&ShellRequest::Repaint));
        assert_eq!(c.surface_role(SurfaceId(1)), None);
    }

    #[test]
    fn shell_content_takes_focus_and_destroy_clears_it() {
        let mut c = compositor();
        window(&mut c, 1, 1, (0.0, 0.0), (100.0, 100.0));
        c.on_surface_content_changed(SurfaceId(1), true);
        assert_eq!(c.keyboard_focus(), Some(SurfaceId(1)));
        assert!(
            c.take_requests()
                .contains(&ShellRequest::KeyboardFocus(Some(SurfaceId(1))))
        );

        let key = KeyEvent {
            scan_code: 30,
            pressed: true,
        };
        assert_eq!(
            c.handle_key_event(&key),
            Some(KeyDelivery {
                surface: SurfaceId(1),
                scan_code: 30,
                pressed: true
            })
        );

        c.on_surface_destroyed(SurfaceId(1));
        assert_eq!(c.keyboard_focus(), None);
        assert_eq!(c.handle_key_event(&key), None);
    }

    #[test]
    fn press_focus_follows_shell_role() {
        let mut c = compositor();
        window(&mut c, 1, 1, (0.0, 0.0), (100.0, 100.0));
        let popup = c.on_surface_created(SurfaceId(2), ClientId(1));
        c.on_surface_role_changed(SurfaceId(2), SurfaceRole::Popup);
        c.on_subsurface_position_changed(SurfaceId(2), Point::new(300.0, 0.0));
        c.on_surface_size_changed(SurfaceId(2), Size::new(50.0, 50.0));

        c.handle_pointer_event(&press_at(10.0, 10.0));
        c.handle_pointer_event(&release_at(10.0, 10.0));
        assert_eq!(c.keyboard_focus(), Some(SurfaceId(1)));

        let d = c.handle_pointer_event(&press_at(310.0, 10.0));
        c.handle_pointer_event(&release_at(310.0, 10.0));
        assert_eq!(d.last().unwrap().view, Some(popup));
        assert_eq!(c.keyboard_focus(), Some(SurfaceId(1)), "popups do not take focus");

        c.take_requests();
        c.handle_pointer_event(&press_at(600.0, 600.0));
        assert_eq!(c.keyboard_focus(), None);
        let requests = c.take_requests();
        assert!(requests.contains(&ShellRequest::ClosePopups));
        assert!(requests.contains(&ShellRequest::KeyboardFocus(None)));
    }

    #[test]
    fn rotation_commits_after_twenty_ticks_and_remaps_input() {
        let mut c = compositor();
        let a = window(&mut c, 1, 1, (0.0, 0.0), (100.0, 100.0));
        assert!(c.request_transform(OutputTransform::Rotate90));
        assert!(!c.request_transform(OutputTransform::Normal), "already current");
        c.take_requests();

        for _ in 0..19 {
            c.tick();
        }
        assert_eq!(c.current_transform(), OutputTransform::Normal);
        assert_eq!(c.tick(), TickOutcome::Committed(OutputTransform::Rotate90));
        assert_eq!(c.output().transform, OutputTransform::Rotate90);
        assert!(
            c.take_requests()
                .contains(&ShellRequest::OutputTransform(OutputTransform::Rotate90))
        );
        for _ in 0..20 {
            c.tick();
        }
        assert_eq!(c.fade_phase(), FadePhase::Idle);
        assert_eq!(c.current_overlay_opacity(), 0.0);

        // Window (750, 20) maps to logical (800 - 20, 750) = (780, 750): outside a.
        let d = c.handle_pointer_event(&press_at(750.0, 20.0));
        assert_eq!(d[0].view, None);
        c.handle_pointer_event(&release_at(750.0, 20.0));
        // Window (20, 790) maps to logical (10, 20): inside a.
        let d = c.handle_pointer_event(&press_at(20.0, 790.0));
        assert_eq!(d.last().unwrap().view, Some(a));
        assert_eq!(d.last().unwrap().local, Point::new(10.0, 20.0));
    }

    #[test]
    fn bad_transform_code_is_rejected() {
        let mut c = compositor();
        assert_eq!(c.request_transform_code(9), Err(TransformError::Unknown(9)));
        assert_eq!(c.request_transform_code(3), Ok(true));
        assert!(c.is_animating());
    }

    #[test]
    fn destroying_grab_target_cancels_grab() {
        let mut c = compositor();
        window(&mut c, 1, 1, (0.0, 0.0), (100.0, 100.0));
        c.handle_pointer_event(&press_at(10.0, 10.0));
        c.start_move().unwrap();
        assert_eq!(c.grab_state().kind(), GrabKind::Move);

        c.on_surface_destroyed(SurfaceId(1));
        assert_eq!(c.grab_state(), &GrabState::Idle);
        assert_eq!(c.start_move(), Err(GrabError::NoTarget));
    }

    #[test]
    fn drag_icon_surface_is_raised_and_excluded() {
        let mut c = compositor();
        window(&mut c, 1, 1, (0.0, 0.0), (100.0, 100.0));
        let icon = c.on_surface_created(SurfaceId(9), ClientId(1));
        c.on_surface_role_changed(SurfaceId(9), SurfaceRole::DragIcon);
        c.on_subsurface_position_changed(SurfaceId(9), Point::new(600.0, 600.0));
        c.on_surface_size_changed(SurfaceId(9), Size::new(20.0, 20.0));
        window(&mut c, 2, 1, (200.0, 0.0), (100.0, 100.0));

        c.handle_pointer_event(&press_at(10.0, 10.0));
        c.start_drag(Some(SurfaceId(9))).unwrap();
        assert_eq!(c.stack().ordered_views().last(), Some(icon));

        c.take_requests();
        c.handle_pointer_event(&release_at(210.0, 10.0));
        assert!(c.take_requests().contains(&ShellRequest::Drop {
            surface: Some(SurfaceId(2)),
            position: Point::new(10.0, 10.0),
        }));
    }

    #[test]
    fn touch_cancel_goes_to_last_touched_client() {
        let mut c = compositor();
        window(&mut c, 1, 7, (0.0, 0.0), (100.0, 100.0));
        window(&mut c, 2, 8, (200.0, 0.0), (100.0, 100.0));
        let points = vec![TouchPoint {
            id: 4,
            state: TouchPointState::Pressed,
            position: Point::new(250.0, 50.0),
        }];
        let TouchDispatch::Points(d) = c.handle_touch_event(&TouchEvent::Points(points)) else {
            panic!("expected point deliveries");
        };
        assert_eq!(d[0].surface, Some(SurfaceId(2)));

        assert_eq!(
            c.handle_touch_event(&TouchEvent::Cancel),
            TouchDispatch::Cancel {
                surface: Some(SurfaceId(2)),
                client: Some(ClientId(8)),
            }
        );
    }

    #[test]
    fn cursor_proxy_is_cleared_when_its_surface_dies() {
        let mut c = compositor();
        let cursor_view = c.on_surface_created(SurfaceId(5), ClientId(1));
        c.on_surface_size_changed(SurfaceId(5), Size::new(24.0, 24.0));
        c.set_cursor_surface(Some(SurfaceId(5)), Vec2::new(2.0, 3.0));
        assert!(c.view(cursor_view).unwrap().flags.cursor);
        assert_eq!(c.cursor().unwrap().size, Size::new(24.0, 24.0));

        c.on_surface_destroyed(SurfaceId(5));
        assert_eq!(c.cursor(), None);
    }

    #[test]
    fn begin_frame_keeps_old_texture_without_new_buffer() {
        let mut c = compositor();
        let a = window(&mut c, 1, 1, (0.0, 0.0), (100.0, 100.0));
        let mut textures = FixedTextures {
            next: Some(AcquiredTexture {
                handle: TextureHandle(0xa),
                origin: TextureOrigin::BottomLeft,
            }),
        };
        c.begin_frame(&mut textures);
        assert_eq!(c.view(a).unwrap().texture, Some(TextureHandle(0xa)));

        textures.next = None;
        c.begin_frame(&mut textures);
        let view = c.view(a).unwrap();
        assert_eq!(view.texture, Some(TextureHandle(0xa)));
        assert_eq!(view.texture_origin, TextureOrigin::BottomLeft);
    }

    #[test]
    fn unknown_surfaces_are_ignored() {
        let mut c = compositor();
        c.on_surface_content_changed(SurfaceId(42), true);
        c.on_subsurface_position_changed(SurfaceId(42), Point::ZERO);
        c.on_subsurface_relation_changed(SurfaceId(42), Some(SurfaceId(43)));
        c.on_surface_destroyed(SurfaceId(42));
        assert!(c.stack().is_empty());
        assert_eq!(c.keyboard_focus(), None);
    }
}
