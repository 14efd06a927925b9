// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views and their stacking order.
//!
//! A *view* is the presentation record for one client surface. Each view
//! has:
//!
//! - An identity ([`ViewId`]), a generational handle that goes stale when
//!   the view is removed. Grab, focus and cursor state hold these as weak
//!   references.
//! - A parent link. A view's absolute position is its own position plus the
//!   position of every ancestor.
//! - Cached size, pending buffer offset, paint flags, animation factor and
//!   the most recently acquired texture.
//!
//! All views live in one [`ViewStack`] in struct-of-arrays layout. The
//! stacking order is a single flat list rather than a tree: each view's
//! descendants follow it as one contiguous run, so draw order is a forward
//! scan and hit-testing is a reverse scan.
//!
//! # Dirty tracking
//!
//! Mutations mark the matching channel (see [`dirty`](crate::dirty)).
//! **GEOMETRY** propagates to descendants, **CONTENT** is local and
//! **STACKING** covers order and topology. Drain them with
//! [`ViewStack::take_changes`].

mod changes;
mod id;
mod stack;
mod store;
mod traverse;

pub use changes::SceneChanges;
pub use id::{ClientId, INVALID, SurfaceId, TextureHandle, TextureOrigin, ViewId};
pub use store::{View, ViewFlags, ViewStack};
pub use traverse::{Ancestors, OrderedViews};
