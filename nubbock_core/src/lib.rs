// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene and input core for a minimal rotating compositor.
//!
//! `nubbock_core` keeps the ordered set of client views, routes pointer, touch
//! and key input to them, runs interactive move, resize and drag grabs, and
//! cross-fades the output through a black overlay when its rotation changes.
//! It is `no_std` compatible (with `alloc`); protocol handling, buffer upload
//! and pixel output belong to the embedder.
//!
//! # Architecture
//!
//! ```text
//!   protocol layer ──surface events──┐
//!   window system ───raw input───────┤
//!   orientation ─────transform───────┤
//!                                    ▼
//!                              Compositor
//!                  ┌────────────┬─────┴──────┬─────────────────┐
//!                  ▼            ▼            ▼                 ▼
//!              ViewStack   InputRouter  TransformAnimator   outbox
//!                  │            │            │            (ShellRequest)
//!                  └──► SceneChanges, ordered_views, overlay opacity
//!                                    │
//!                                    ▼
//!                          renderer (TextureSource)
//! ```
//!
//! **[`view`]**: Struct-of-arrays view store with generational handles and a
//! flat stacking order in which every subtree is a contiguous run.
//!
//! **[`input`]**: Hit testing and the [`InputRouter`](input::InputRouter)
//! state machine: implicit grabs, modifier moves, focus-relevant deliveries.
//!
//! **[`grab`]**: Grab states and resize edge arithmetic.
//!
//! **[`animator`]**: The fade-to-black rotation.
//!
//! **[`geometry`]**: [`OutputTransform`](geometry::OutputTransform) and the
//! window ↔ logical mapping.
//!
//! **[`compositor`]**: The façade tying the above together.
//!
//! **[`dirty`]**: Change channels via `understory_dirty`. GEOMETRY
//! propagates to descendants; CONTENT is local; STACKING flags a reorder.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animator;
pub mod backend;
pub mod compositor;
pub mod config;
pub mod dirty;
pub mod error;
pub mod geometry;
pub mod grab;
pub mod input;
pub mod output;
pub mod request;
pub mod time;
pub mod trace;
pub mod view;
