// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plans and damage tracking for nubbock.
//!
//! This crate is the renderer's view of [`nubbock_core`]. Once per frame,
//! [`FramePlanner::plan`] refreshes textures through a
//! [`TextureSource`](nubbock_core::backend::TextureSource) and produces:
//!
//! - [`BackgroundItem`]: the optional wallpaper, drawn first over the
//!   clear color
//! - [`RenderItem`]: one textured quad per paintable view, back to front
//! - [`CursorItem`]: the cursor image at the pointer
//! - [`OverlayItem`]: the black rotation overlay while a fade runs
//! - [`DamageRegion`]: what changed since the previous plan
//!
//! Items are laid out in logical space and carry the logical → window
//! [`Affine`](kurbo::Affine) for the committed output transform.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod damage;
mod plan;

pub use damage::DamageRegion;
pub use plan::{
    BackgroundItem, CursorItem, FramePlanner, OverlayItem, RenderItem, RenderPlan, draw_rect,
    plan_frame,
};
