// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events, hit-testing and pointer grab routing.
//!
//! Events reach the [`InputRouter`] already mapped into logical space (see
//! [`OutputTransform::to_logical`](crate::geometry::OutputTransform::to_logical)).
//! The router hit-tests them against the [`ViewStack`], advances the
//! [`GrabState`] machine, and returns the deliveries the seat should forward
//! to client surfaces. Side requests go to a [`ShellRequest`] outbox.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::error::GrabError;
use crate::grab::{
    GrabState, ResizeEdge, ResizeGrab, get_anchor_position, get_anchored_position, resize_delta,
};
use crate::request::ShellRequest;
use crate::view::{SurfaceId, ViewId, ViewStack};

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        /// Shift.
        const SHIFT = 1;
        /// Control.
        const CONTROL = 1 << 1;
        /// Alt.
        const ALT = 1 << 2;
        /// Meta (logo key).
        const META = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Pointer buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u32 {
        /// Primary button.
        const LEFT = 1;
        /// Secondary button.
        const RIGHT = 1 << 1;
        /// Middle button.
        const MIDDLE = 1 << 2;
        /// Back side button.
        const BACK = 1 << 3;
        /// Forward side button.
        const FORWARD = 1 << 4;
    }
}

/// What happened to the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    /// A button went down.
    Press(Buttons),
    /// A button went up.
    Release(Buttons),
    /// The pointer moved.
    Motion,
}

/// A raw pointer event in window space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Press, release or motion.
    pub kind: PointerEventKind,
    /// Window-space position.
    pub position: Point,
    /// Buttons held after this event.
    pub buttons: Buttons,
    /// Modifiers held during this event.
    pub modifiers: Modifiers,
}

/// A pointer event to forward to a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerDelivery {
    /// View the event is for, or `None` over empty space.
    pub view: Option<ViewId>,
    /// Surface backing `view`.
    pub surface: Option<SurfaceId>,
    /// Press, release or motion.
    pub kind: PointerEventKind,
    /// Position relative to the view's absolute top-left.
    pub local: Point,
    /// Position in logical space.
    pub logical: Point,
    /// Buttons held.
    pub buttons: Buttons,
    /// Modifiers held.
    pub modifiers: Modifiers,
}

/// Lifecycle of one touch point within a touch event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPointState {
    /// The point touched down.
    Pressed,
    /// The point moved.
    Moved,
    /// The point did not move.
    Stationary,
    /// The point lifted.
    Released,
}

/// One touch point. The position is in window space when handed to the
/// compositor and in logical space when handed to the router.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Identifier stable across the lifetime of the point.
    pub id: i32,
    /// What happened to the point.
    pub state: TouchPointState,
    /// Position.
    pub position: Point,
}

/// A raw touch event.
#[derive(Clone, Debug, PartialEq)]
pub enum TouchEvent {
    /// Updated touch points.
    Points(Vec<TouchPoint>),
    /// The touch sequence was cancelled.
    Cancel,
}

/// A touch point to forward to a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchDelivery {
    /// View under the point, if any.
    pub view: Option<ViewId>,
    /// Surface backing `view`.
    pub surface: Option<SurfaceId>,
    /// Touch point identifier.
    pub id: i32,
    /// What happened to the point.
    pub state: TouchPointState,
    /// Position relative to the view's absolute top-left.
    pub local: Point,
}

/// A key press or release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Native scan code, forwarded unchanged.
    pub scan_code: u32,
    /// `true` on press, `false` on release.
    pub pressed: bool,
}

/// A key event to forward to the focused surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyDelivery {
    /// Surface holding keyboard focus.
    pub surface: SurfaceId,
    /// Native scan code.
    pub scan_code: u32,
    /// `true` on press, `false` on release.
    pub pressed: bool,
}

/// Returns the topmost view whose absolute rectangle contains `point`.
///
/// Cursor views and `exclude` (the drag icon) are skipped. The scan runs
/// top-down, which picks the same view as keeping the last match of a
/// bottom-up scan.
#[must_use]
pub fn view_at(stack: &ViewStack, point: Point, exclude: Option<ViewId>) -> Option<ViewId> {
    stack.ordered_views().rev().find(|&v| {
        Some(v) != exclude
            && stack.flags(v).is_some_and(|f| !f.cursor)
            && stack.geometry(v).is_some_and(|r| r.contains(point))
    })
}

/// Routes pointer and touch input for a single seat.
#[derive(Clone, Debug)]
pub struct InputRouter {
    grab: GrabState,
    /// View that received the first press of the current button sequence.
    implicit: Option<ViewId>,
    press_point: Point,
    move_offset: Vec2,
    pointer: Point,
    last_touched: Option<ViewId>,
    move_modifiers: Modifiers,
}

impl InputRouter {
    /// Creates an idle router. Pressing with exactly one of `move_modifiers`
    /// held starts a move.
    #[must_use]
    pub fn new(move_modifiers: Modifiers) -> Self {
        Self {
            grab: GrabState::Idle,
            implicit: None,
            press_point: Point::ZERO,
            move_offset: Vec2::ZERO,
            pointer: Point::ZERO,
            last_touched: None,
            move_modifiers,
        }
    }

    /// Current grab state.
    #[must_use]
    pub fn grab(&self) -> &GrabState {
        &self.grab
    }

    /// View holding the implicit pointer grab.
    #[must_use]
    pub fn implicit_grab(&self) -> Option<ViewId> {
        self.implicit
    }

    /// Last logical pointer position.
    #[must_use]
    pub fn pointer_position(&self) -> Point {
        self.pointer
    }

    /// View hit by the most recent touch point that landed on one.
    #[must_use]
    pub fn last_touched(&self) -> Option<ViewId> {
        self.last_touched
    }

    /// Handles a pointer event already mapped to `logical`.
    pub fn pointer(
        &mut self,
        stack: &mut ViewStack,
        event: &PointerEvent,
        logical: Point,
        out: &mut Vec<ShellRequest>,
    ) -> Vec<PointerDelivery> {
        self.pointer = logical;
        self.forget_stale(stack);
        match event.kind {
            PointerEventKind::Press(_) => self.press(stack, event, logical, out),
            PointerEventKind::Release(_) => self.release(stack, event, logical, out),
            PointerEventKind::Motion => self.motion(stack, event, logical, out),
        }
    }

    fn press(
        &mut self,
        stack: &mut ViewStack,
        event: &PointerEvent,
        p: Point,
        out: &mut Vec<ShellRequest>,
    ) -> Vec<PointerDelivery> {
        let mut deliveries = Vec::new();
        if self.grab.is_active() {
            return deliveries;
        }

        let target = if let Some(view) = self.implicit {
            view
        } else {
            let Some(hit) = view_at(stack, p, None) else {
                out.push(ShellRequest::ClosePopups);
                deliveries.push(deliver(stack, None, event.kind, p, event));
                return deliveries;
            };
            let top = stack.top_level(hit).unwrap_or(hit);
            if self.is_move_chord(event.modifiers) {
                self.grab = GrabState::Moving { target: top };
            } else if stack.raise(top).is_ok() {
                out.push(ShellRequest::Repaint);
            }
            self.implicit = Some(hit);
            self.press_point = p;
            self.move_offset = p - stack.position(top).unwrap_or(Point::ZERO);

            let hover = PointerEvent {
                kind: PointerEventKind::Motion,
                buttons: Buttons::empty(),
                ..*event
            };
            deliveries.push(deliver(stack, Some(hit), hover.kind, p, &hover));
            hit
        };

        deliveries.push(deliver(stack, Some(target), event.kind, p, event));
        deliveries
    }

    fn release(
        &mut self,
        stack: &mut ViewStack,
        event: &PointerEvent,
        p: Point,
        out: &mut Vec<ShellRequest>,
    ) -> Vec<PointerDelivery> {
        let mut deliveries = Vec::new();
        if !self.grab.is_active() {
            deliveries.push(deliver(stack, self.implicit, event.kind, p, event));
        }
        if event.buttons.is_empty() {
            if let GrabState::Dragging { icon, .. } = self.grab {
                let hit = view_at(stack, p, icon);
                out.push(ShellRequest::Drop {
                    surface: hit.and_then(|v| stack.surface(v)),
                    position: local_point(stack, hit, p),
                });
            }
            self.implicit = None;
            self.grab = GrabState::Idle;
        }
        deliveries
    }

    fn motion(
        &mut self,
        stack: &mut ViewStack,
        event: &PointerEvent,
        p: Point,
        out: &mut Vec<ShellRequest>,
    ) -> Vec<PointerDelivery> {
        let mut deliveries = Vec::new();
        match self.grab {
            GrabState::Idle => {
                let view = self.implicit.or_else(|| view_at(stack, p, None));
                deliveries.push(deliver(stack, view, event.kind, p, event));
                if view.is_none() {
                    out.push(ShellRequest::DefaultCursor);
                }
            }
            GrabState::Moving { target } => {
                if stack.set_position(target, p - self.move_offset).is_ok() {
                    out.push(ShellRequest::Repaint);
                } else {
                    self.grab = GrabState::Idle;
                }
            }
            GrabState::Resizing(r) => match stack.surface(r.target) {
                Some(surface) => out.push(ShellRequest::Resize {
                    surface,
                    initial_size: r.initial_size,
                    delta: resize_delta(self.press_point, p),
                    edges: r.edges,
                }),
                None => self.grab = GrabState::Idle,
            },
            GrabState::Dragging { icon, .. } => {
                let hit = view_at(stack, p, icon);
                out.push(ShellRequest::DragMotion {
                    surface: hit.and_then(|v| stack.surface(v)),
                    position: local_point(stack, hit, p),
                });
                if let Some(icon) = icon.and_then(|i| stack.view(i)) {
                    if stack.set_position(icon.id, p + icon.pending_offset).is_ok() {
                        out.push(ShellRequest::Repaint);
                    }
                }
            }
        }
        deliveries
    }

    /// Routes touch points already mapped to logical space.
    ///
    /// Each point is hit-tested on its own.
    pub fn touch(&mut self, stack: &ViewStack, points: &[TouchPoint]) -> Vec<TouchDelivery> {
        points
            .iter()
            .map(|tp| {
                let view = view_at(stack, tp.position, None);
                if view.is_some() {
                    self.last_touched = view;
                }
                TouchDelivery {
                    view,
                    surface: view.and_then(|v| stack.surface(v)),
                    id: tp.id,
                    state: tp.state,
                    local: local_point(stack, view, tp.position),
                }
            })
            .collect()
    }

    /// Starts moving the window under the implicit grab.
    pub fn start_move(&mut self, stack: &ViewStack) -> Result<(), GrabError> {
        let top = self.grab_root(stack)?;
        self.grab = GrabState::Moving { target: top };
        Ok(())
    }

    /// Starts resizing the window under the implicit grab from `edges`
    /// (wire bits). With `anchored`, [`begin_frame`](Self::begin_frame)
    /// keeps the opposite edge or corner fixed as the size changes.
    pub fn start_resize(
        &mut self,
        stack: &ViewStack,
        edges: u32,
        anchored: bool,
    ) -> Result<(), GrabError> {
        let edges = ResizeEdge::from_wire(edges)?;
        let top = self.grab_root(stack)?;
        let (Some(position), Some(size)) = (stack.position(top), stack.size(top)) else {
            return Err(GrabError::NoTarget);
        };
        self.grab = GrabState::Resizing(ResizeGrab {
            target: top,
            edges,
            anchored,
            initial_size: size,
            anchor: get_anchor_position(position, edges, size),
        });
        Ok(())
    }

    /// Starts a drag from the view under the implicit grab. The icon view,
    /// if any, is raised and follows the pointer.
    ///
    /// An icon that is alive but cannot be raised fails the request and the
    /// router stays idle.
    pub fn start_drag(
        &mut self,
        stack: &mut ViewStack,
        icon: Option<ViewId>,
    ) -> Result<(), GrabError> {
        if self.grab.is_active() {
            return Err(GrabError::Busy);
        }
        let target = self
            .implicit
            .filter(|&v| stack.is_alive(v))
            .ok_or(GrabError::NoTarget)?;
        let icon = icon.filter(|&i| stack.is_alive(i));
        if let Some(icon) = icon {
            stack.raise(icon).map_err(GrabError::Icon)?;
        }
        self.grab = GrabState::Dragging { target, icon };
        Ok(())
    }

    /// Per-frame grab work: repositions an anchored resize target for its
    /// current size.
    pub fn begin_frame(&mut self, stack: &mut ViewStack) {
        if let GrabState::Resizing(r) = self.grab {
            if !r.anchored {
                return;
            }
            let moved = stack
                .size(r.target)
                .map(|size| get_anchored_position(r.anchor, r.edges, size))
                .map(|pos| stack.set_position(r.target, pos));
            if !matches!(moved, Some(Ok(()))) {
                self.grab = GrabState::Idle;
            }
        }
    }

    /// Drops every reference to views that are no longer alive. A grab whose
    /// target or drag icon is gone returns to idle.
    ///
    /// Returns whether the grab was cancelled.
    pub fn forget_stale(&mut self, stack: &ViewStack) -> bool {
        let alive = |v: Option<ViewId>| v.is_none_or(|v| stack.is_alive(v));
        self.implicit = self.implicit.filter(|&v| stack.is_alive(v));
        self.last_touched = self.last_touched.filter(|&v| stack.is_alive(v));
        if alive(self.grab.target()) && alive(self.grab.drag_icon()) {
            return false;
        }
        self.grab = GrabState::Idle;
        true
    }

    /// Resolves the view a surface-initiated grab acts on.
    fn grab_root(&self, stack: &ViewStack) -> Result<ViewId, GrabError> {
        if self.grab.is_active() {
            return Err(GrabError::Busy);
        }
        let view = self
            .implicit
            .filter(|&v| stack.is_alive(v))
            .ok_or(GrabError::NoTarget)?;
        stack.top_level(view).ok_or(GrabError::NoTarget)
    }

    fn is_move_chord(&self, modifiers: Modifiers) -> bool {
        modifiers.bits().count_ones() == 1 && self.move_modifiers.contains(modifiers)
    }
}

fn local_point(stack: &ViewStack, view: Option<ViewId>, logical: Point) -> Point {
    view.and_then(|v| stack.absolute_position(v))
        .map_or(logical, |origin| logical - origin.to_vec2())
}

fn deliver(
    stack: &ViewStack,
    view: Option<ViewId>,
    kind: PointerEventKind,
    logical: Point,
    event: &PointerEvent,
) -> PointerDelivery {
    PointerDelivery {
        view,
        surface: view.and_then(|v| stack.surface(v)),
        kind,
        local: local_point(stack, view, logical),
        logical,
        buttons: event.buttons,
        modifiers: event.modifiers,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Size;

    use super::*;
    use crate::error::StackError;
    use crate::grab::GrabKind;

    fn add(stack: &mut ViewStack, s: u32, pos: (f64, f64), size: (f64, f64)) -> ViewId {
        let id = stack.create_view(Some(SurfaceId(s)));
        stack.append(id).unwrap();
        stack.set_position(id, Point::new(pos.0, pos.1)).unwrap();
        stack.set_size(id, Size::new(size.0, size.1)).unwrap();
        id
    }

    fn press(x: f64, y: f64, modifiers: Modifiers) -> PointerEvent {
        PointerEvent {
            kind: PointerEventKind::Press(Buttons::LEFT),
            position: Point::new(x, y),
            buttons: Buttons::LEFT,
            modifiers,
        }
    }

    fn motion(x: f64, y: f64, buttons: Buttons) -> PointerEvent {
        PointerEvent {
            kind: PointerEventKind::Motion,
            position: Point::new(x, y),
            buttons,
            modifiers: Modifiers::empty(),
        }
    }

    fn release(x: f64, y: f64) -> PointerEvent {
        PointerEvent {
            kind: PointerEventKind::Release(Buttons::LEFT),
            position: Point::new(x, y),
            buttons: Buttons::empty(),
            modifiers: Modifiers::empty(),
        }
    }

    fn route(
        router: &mut InputRouter,
        stack: &mut ViewStack,
        e: PointerEvent,
        out: &mut Vec<ShellRequest>,
    ) -> Vec<PointerDelivery> {
        router.pointer(stack, &e, e.position, out)
    }

    fn router() -> InputRouter {
        InputRouter::new(Modifiers::ALT | Modifiers::META)
    }

    #[test]
    fn press_delivers_child_local_coordinates() {
        let mut stack = ViewStack::new();
        let a = add(&mut stack, 1, (5.0, 5.0), (200.0, 200.0));
        let b = add(&mut stack, 2, (10.0, 10.0), (50.0, 50.0));
        stack.set_parent(b, Some(a)).unwrap();

        let mut r = router();
        let mut out = Vec::new();
        let d = route(&mut r, &mut stack, press(20.0, 30.0, Modifiers::empty()), &mut out);

        assert_eq!(d.len(), 2, "hover then press");
        assert_eq!(d[0].kind, PointerEventKind::Motion);
        assert_eq!(d[0].buttons, Buttons::empty());
        assert_eq!(d[1].view, Some(b));
        assert_eq!(d[1].surface, Some(SurfaceId(2)));
        assert_eq!(d[1].local, Point::new(5.0, 15.0));
        assert_eq!(r.implicit_grab(), Some(b));
    }

    #[test]
    fn hit_test_skips_cursor_and_drag_icon() {
        let mut stack = ViewStack::new();
        let below = add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let icon = add(&mut stack, 2, (0.0, 0.0), (100.0, 100.0));
        let cursor = add(&mut stack, 3, (0.0, 0.0), (100.0, 100.0));
        stack.set_cursor(cursor, true).unwrap();

        let p = Point::new(50.0, 50.0);
        assert_eq!(view_at(&stack, p, None), Some(icon));
        assert_eq!(view_at(&stack, p, Some(icon)), Some(below));
        assert_eq!(view_at(&stack, Point::new(100.0, 50.0), None), None, "half-open");
    }

    #[test]
    fn press_raises_top_level_window() {
        let mut stack = ViewStack::new();
        let a = add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let child = add(&mut stack, 2, (10.0, 10.0), (20.0, 20.0));
        stack.set_parent(child, Some(a)).unwrap();
        let b = add(&mut stack, 3, (50.0, 50.0), (100.0, 100.0));

        let mut r = router();
        let mut out = Vec::new();
        let d = route(&mut r, &mut stack, press(15.0, 15.0, Modifiers::empty()), &mut out);
        assert_eq!(d[1].view, Some(child));
        assert_eq!(stack.ordered_views().collect::<Vec<_>>(), vec![b, a, child]);
        assert!(out.contains(&ShellRequest::Repaint));
    }

    #[test]
    fn empty_press_closes_popups() {
        let mut stack = ViewStack::new();
        let mut r = router();
        let mut out = Vec::new();
        let d = route(&mut r, &mut stack, press(5.0, 5.0, Modifiers::empty()), &mut out);
        assert_eq!(out, vec![ShellRequest::ClosePopups]);
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].view, None);
        assert_eq!(r.implicit_grab(), None);
    }

    #[test]
    fn alt_press_moves_window() {
        let mut stack = ViewStack::new();
        let a = add(&mut stack, 1, (10.0, 10.0), (100.0, 100.0));
        let mut r = router();
        let mut out = Vec::new();

        route(&mut r, &mut stack, press(30.0, 40.0, Modifiers::ALT), &mut out);
        assert_eq!(r.grab(), &GrabState::Moving { target: a });

        let d = route(&mut r, &mut stack, motion(50.0, 45.0, Buttons::LEFT), &mut out);
        assert!(d.is_empty(), "grabbed motion is not forwarded");
        assert_eq!(stack.position(a), Some(Point::new(30.0, 15.0)));

        route(&mut r, &mut stack, release(50.0, 45.0), &mut out);
        assert_eq!(r.grab().kind(), GrabKind::Idle);
        assert_eq!(r.implicit_grab(), None);
    }

    #[test]
    fn chorded_modifiers_do_not_move() {
        let mut stack = ViewStack::new();
        add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let mut r = router();
        let mut out = Vec::new();
        route(
            &mut r,
            &mut stack,
            press(5.0, 5.0, Modifiers::ALT | Modifiers::SHIFT),
            &mut out,
        );
        assert_eq!(r.grab(), &GrabState::Idle);
    }

    #[test]
    fn press_during_grab_is_swallowed() {
        let mut stack = ViewStack::new();
        add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let mut r = router();
        let mut out = Vec::new();
        route(&mut r, &mut stack, press(5.0, 5.0, Modifiers::META), &mut out);
        let mut second = press(6.0, 6.0, Modifiers::empty());
        second.kind = PointerEventKind::Press(Buttons::RIGHT);
        second.buttons = Buttons::LEFT | Buttons::RIGHT;
        assert!(route(&mut r, &mut stack, second, &mut out).is_empty());
    }

    #[test]
    fn anchored_resize_tracks_size() {
        let mut stack = ViewStack::new();
        let a = add(&mut stack, 7, (100.0, 100.0), (200.0, 100.0));
        let mut r = router();
        let mut out = Vec::new();
        route(&mut r, &mut stack, press(105.0, 105.0, Modifiers::empty()), &mut out);

        let top_left = (ResizeEdge::TOP | ResizeEdge::LEFT).bits();
        r.start_resize(&stack, top_left, true).unwrap();
        assert_eq!(r.start_move(&stack), Err(GrabError::Busy));

        out.clear();
        route(&mut r, &mut stack, motion(95.2, 90.0, Buttons::LEFT), &mut out);
        assert_eq!(
            out,
            vec![ShellRequest::Resize {
                surface: SurfaceId(7),
                initial_size: Size::new(200.0, 100.0),
                delta: Vec2::new(-10.0, -15.0),
                edges: ResizeEdge::TOP | ResizeEdge::LEFT,
            }]
        );

        // The client grew by 10×15; the bottom-right corner stays put.
        stack.set_size(a, Size::new(210.0, 115.0)).unwrap();
        r.begin_frame(&mut stack);
        assert_eq!(stack.position(a), Some(Point::new(90.0, 85.0)));
    }

    #[test]
    fn resize_rejects_bad_edges_and_missing_target() {
        let mut stack = ViewStack::new();
        let mut r = router();
        assert_eq!(r.start_resize(&stack, 1, false), Err(GrabError::NoTarget));
        add(&mut stack, 1, (0.0, 0.0), (10.0, 10.0));
        let mut out = Vec::new();
        route(&mut r, &mut stack, press(1.0, 1.0, Modifiers::empty()), &mut out);
        assert_eq!(r.start_resize(&stack, 3, false), Err(GrabError::InvalidEdge(3)));
        assert_eq!(r.grab(), &GrabState::Idle, "state retained");
    }

    #[test]
    fn drag_moves_icon_and_drops_on_view_below() {
        let mut stack = ViewStack::new();
        let source = add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let sink = add(&mut stack, 2, (200.0, 0.0), (100.0, 100.0));
        let icon = add(&mut stack, 3, (500.0, 500.0), (16.0, 16.0));
        stack.apply_buffer_offset(icon, Vec2::new(-4.0, -4.0)).unwrap();

        let mut r = router();
        let mut out = Vec::new();
        route(&mut r, &mut stack, press(10.0, 10.0, Modifiers::empty()), &mut out);
        assert_eq!(r.implicit_grab(), Some(source));
        r.start_drag(&mut stack, Some(icon)).unwrap();
        assert_eq!(stack.ordered_views().last(), Some(icon), "icon raised");

        out.clear();
        route(&mut r, &mut stack, motion(250.0, 50.0, Buttons::LEFT), &mut out);
        assert_eq!(
            out[0],
            ShellRequest::DragMotion {
                surface: Some(SurfaceId(2)),
                position: Point::new(50.0, 50.0),
            }
        );
        assert_eq!(stack.position(icon), Some(Point::new(246.0, 46.0)));

        out.clear();
        route(&mut r, &mut stack, release(250.0, 50.0), &mut out);
        assert_eq!(
            out,
            vec![ShellRequest::Drop {
                surface: Some(SurfaceId(2)),
                position: Point::new(50.0, 50.0),
            }]
        );
        assert_eq!(r.grab(), &GrabState::Idle);
        assert_eq!(view_at(&stack, Point::new(250.0, 50.0), Some(icon)), Some(sink));
    }

    #[test]
    fn removed_target_cancels_grab() {
        let mut stack = ViewStack::new();
        let a = add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let mut r = router();
        let mut out = Vec::new();
        route(&mut r, &mut stack, press(5.0, 5.0, Modifiers::ALT), &mut out);
        stack.remove(a).unwrap();
        assert!(r.forget_stale(&stack));
        assert_eq!(r.grab(), &GrabState::Idle);
        assert_eq!(r.implicit_grab(), None);
    }

    #[test]
    fn removed_drag_icon_cancels_drag() {
        let mut stack = ViewStack::new();
        add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let icon = add(&mut stack, 2, (500.0, 500.0), (16.0, 16.0));
        let mut r = router();
        let mut out = Vec::new();
        route(&mut r, &mut stack, press(10.0, 10.0, Modifiers::empty()), &mut out);
        r.start_drag(&mut stack, Some(icon)).unwrap();
        assert_eq!(r.grab().drag_icon(), Some(icon));

        stack.remove(icon).unwrap();
        assert!(r.forget_stale(&stack), "losing the icon cancels the drag");
        assert_eq!(r.grab(), &GrabState::Idle);

        out.clear();
        let d = route(&mut r, &mut stack, release(10.0, 10.0), &mut out);
        assert!(out.is_empty(), "no drop after a cancelled drag");
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn unstacked_drag_icon_is_rejected() {
        let mut stack = ViewStack::new();
        add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let icon = stack.create_view(Some(SurfaceId(2)));
        let mut r = router();
        let mut out = Vec::new();
        route(&mut r, &mut stack, press(10.0, 10.0, Modifiers::empty()), &mut out);

        assert_eq!(
            r.start_drag(&mut stack, Some(icon)),
            Err(GrabError::Icon(StackError::NotFound(icon)))
        );
        assert_eq!(r.grab(), &GrabState::Idle);
    }

    #[test]
    fn idle_motion_over_nothing_requests_default_cursor() {
        let mut stack = ViewStack::new();
        let mut r = router();
        let mut out = Vec::new();
        let d = route(&mut r, &mut stack, motion(1.0, 1.0, Buttons::empty()), &mut out);
        assert_eq!(d[0].view, None);
        assert_eq!(out, vec![ShellRequest::DefaultCursor]);
        assert_eq!(r.pointer_position(), Point::new(1.0, 1.0));
    }

    #[test]
    fn touch_points_hit_test_independently() {
        let mut stack = ViewStack::new();
        let a = add(&mut stack, 1, (0.0, 0.0), (100.0, 100.0));
        let b = add(&mut stack, 2, (200.0, 0.0), (100.0, 100.0));
        let mut r = router();
        let d = r.touch(
            &stack,
            &[
                TouchPoint {
                    id: 0,
                    state: TouchPointState::Pressed,
                    position: Point::new(10.0, 10.0),
                },
                TouchPoint {
                    id: 1,
                    state: TouchPointState::Pressed,
                    position: Point::new(210.0, 20.0),
                },
                TouchPoint {
                    id: 2,
                    state: TouchPointState::Pressed,
                    position: Point::new(150.0, 20.0),
                },
            ],
        );
        assert_eq!(d[0].view, Some(a));
        assert_eq!(d[1].view, Some(b));
        assert_eq!(d[1].local, Point::new(10.0, 20.0));
        assert_eq!(d[2].view, None);
        assert_eq!(r.last_touched(), Some(b), "misses do not reset it");
    }
}
