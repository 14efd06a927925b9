// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one frame.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Size};
use nubbock_core::backend::TextureSource;
use nubbock_core::compositor::Compositor;
use nubbock_core::geometry::OutputTransform;
use nubbock_core::output::OutputId;
use nubbock_core::view::{SceneChanges, SurfaceId, TextureHandle, TextureOrigin, View, ViewId};

use crate::damage::DamageRegion;

/// The wallpaper, stretched over the logical output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundItem {
    /// Texture to sample.
    pub texture: TextureHandle,
    /// Pixel size of the image.
    pub image_size: Size,
    /// The whole output, in logical space.
    pub rect: Rect,
    /// Logical → window map for the output transform.
    pub transform: Affine,
}

/// A single textured quad.
///
/// Items are produced in back-to-front order, matching the stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem {
    /// The view this item originates from.
    pub view: ViewId,
    /// The view's surface.
    pub surface: Option<SurfaceId>,
    /// Texture to sample.
    pub texture: TextureHandle,
    /// Row order of `texture`.
    pub origin: TextureOrigin,
    /// Destination in logical space, scaled by the view's animation factor.
    pub rect: Rect,
    /// Logical → window map for the output transform.
    pub transform: Affine,
}

/// The pointer cursor image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorItem {
    /// Cursor surface.
    pub surface: SurfaceId,
    /// Texture to sample.
    pub texture: TextureHandle,
    /// Row order of `texture`.
    pub origin: TextureOrigin,
    /// Destination in logical space: the pointer minus the hotspot.
    pub rect: Rect,
    /// Logical → window map for the output transform.
    pub transform: Affine,
}

/// The black rotation overlay. Drawn last, over everything.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayItem {
    /// Opacity in `(0, 1]`.
    pub opacity: f32,
    /// The whole output, in window space.
    pub rect: Rect,
}

/// Everything drawn on the output for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPlan {
    /// Target output for this plan.
    pub output: OutputId,
    /// Output transform the items were laid out for.
    pub transform: OutputTransform,
    /// RGBA color the output is cleared to first.
    pub clear_color: [f32; 4],
    /// Wallpaper, drawn after the clear and before `items`.
    pub background: Option<BackgroundItem>,
    /// View items in back-to-front order.
    pub items: Vec<RenderItem>,
    /// Cursor, drawn above the views.
    pub cursor: Option<CursorItem>,
    /// Fade overlay, drawn above everything.
    pub overlay: Option<OverlayItem>,
    /// What changed since the previous plan.
    pub damage: DamageRegion,
}

impl RenderPlan {
    /// Creates an empty render plan for the given output.
    #[must_use]
    pub fn new(output: OutputId) -> Self {
        Self {
            output,
            ..Self::default()
        }
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.background = None;
        self.items.clear();
        self.cursor = None;
        self.overlay = None;
        self.damage = DamageRegion::Full;
    }
}

/// Logical rectangle a view is drawn into.
///
/// The view's rectangle at `origin` is scaled about its centre by the
/// animation factor.
#[must_use]
pub fn draw_rect(view: &View, origin: Point) -> Rect {
    let rect = Rect::from_origin_size(origin, view.size);
    if view.animation_factor == 1.0 {
        return rect;
    }
    Rect::from_center_size(rect.center(), view.size * view.animation_factor.max(0.0))
}

/// Builds render plans and remembers what it drew, so that each plan's damage
/// covers both where things were and where they are.
#[derive(Debug, Default)]
pub struct FramePlanner {
    primed: bool,
    painted: BTreeMap<u32, Rect>,
    cursor: Option<Rect>,
    overlay: bool,
}

impl FramePlanner {
    /// Creates a planner whose first plan damages the whole output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame on `compositor` and plans it.
    pub fn plan(
        &mut self,
        compositor: &mut Compositor,
        textures: &mut dyn TextureSource,
    ) -> RenderPlan {
        compositor.begin_frame(textures);

        let output = *compositor.output();
        let to_window = output.transform.window_from_logical(output.size);
        let mut plan = RenderPlan::new(output.id);
        plan.transform = output.transform;
        plan.clear_color = compositor.config().clear_color;
        plan.background = compositor.config().background.map(|bg| BackgroundItem {
            texture: bg.texture,
            image_size: bg.size,
            rect: output.logical_size().to_rect(),
            transform: to_window,
        });

        let mut painted = BTreeMap::new();
        for view in compositor.ordered_views() {
            if !view.is_paintable() {
                continue;
            }
            let (Some(texture), Some(origin)) = (
                view.texture,
                compositor.stack().absolute_position(view.id),
            ) else {
                continue;
            };
            let rect = draw_rect(&view, origin);
            painted.insert(view.id.index(), to_window.transform_rect_bbox(rect));
            plan.items.push(RenderItem {
                view: view.id,
                surface: view.surface,
                texture,
                origin: view.texture_origin,
                rect,
                transform: to_window,
            });
        }

        plan.cursor = compositor.cursor().and_then(|c| {
            let texture = c.texture?;
            if c.size.is_zero_area() {
                return None;
            }
            Some(CursorItem {
                surface: c.surface,
                texture,
                origin: c.origin,
                rect: Rect::from_origin_size(compositor.pointer_position() - c.hotspot, c.size),
                transform: to_window,
            })
        });

        let opacity = compositor.current_overlay_opacity();
        if opacity > 0.0 {
            plan.overlay = Some(OverlayItem {
                opacity,
                rect: output.size.to_rect(),
            });
        }

        let changes = compositor.take_changes();
        let cursor = plan
            .cursor
            .map(|c| to_window.transform_rect_bbox(c.rect));
        plan.damage = self.damage(&changes, &painted, cursor, plan.overlay.is_some());

        self.primed = true;
        self.painted = painted;
        self.cursor = cursor;
        self.overlay = plan.overlay.is_some();
        plan
    }

    fn damage(
        &self,
        changes: &SceneChanges,
        painted: &BTreeMap<u32, Rect>,
        cursor: Option<Rect>,
        overlay: bool,
    ) -> DamageRegion {
        if !self.primed
            || overlay
            || self.overlay
            || changes.restacked
            || !changes.added.is_empty()
            || !changes.removed.is_empty()
        {
            return DamageRegion::Full;
        }
        let mut damage = DamageRegion::None;
        for idx in changes.moved.iter().chain(&changes.content) {
            for rect in [self.painted.get(idx), painted.get(idx)].into_iter().flatten() {
                damage.add_rect(*rect);
            }
        }
        if self.cursor != cursor {
            for rect in [self.cursor, cursor].into_iter().flatten() {
                damage.add_rect(rect);
            }
        }
        damage
    }
}

/// Plans one frame without damage history.
///
/// The returned damage is always [`DamageRegion::Full`]. Keep a
/// [`FramePlanner`] across frames for partial damage.
pub fn plan_frame(compositor: &mut Compositor, textures: &mut dyn TextureSource) -> RenderPlan {
    FramePlanner::new().plan(compositor, textures)
}
