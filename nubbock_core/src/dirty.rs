// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channels for the view stack.
//!
//! Mutations on [`ViewStack`](crate::view::ViewStack) mark one of these
//! channels through [`understory_dirty`]:
//!
//! - [`GEOMETRY`] propagates eagerly from a parent to every descendant,
//!   since a view's absolute position includes its ancestors' offsets.
//! - [`CONTENT`] is local to the view whose buffer or texture changed.
//! - [`STACKING`] marks order or parent changes.
//!
//! [`ViewStack::take_changes`](crate::view::ViewStack::take_changes) drains
//! all three into a [`SceneChanges`](crate::view::SceneChanges).

use understory_dirty::Channel;

/// Position or size changed; descendants move with it.
pub const GEOMETRY: Channel = Channel::new(0);

/// Buffer content, texture, or paint flags changed.
pub const CONTENT: Channel = Channel::new(1);

/// Stacking order or parent relation changed.
pub const STACKING: Channel = Channel::new(2);
