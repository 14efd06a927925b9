// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! None of these are fatal. The [`Compositor`](crate::compositor::Compositor)
//! traces them and drops the single interaction that produced them.

use core::fmt;

use crate::view::ViewId;

/// Errors from [`ViewStack`](crate::view::ViewStack) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackError {
    /// The handle does not refer to a live view.
    NotFound(ViewId),
    /// Making `parent` the parent of `child` would create a cycle.
    Cycle {
        /// The view being reparented.
        child: ViewId,
        /// The requested parent.
        parent: ViewId,
    },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "view {id:?} is not in the stack"),
            Self::Cycle { child, parent } => {
                write!(f, "parenting {child:?} under {parent:?} would form a cycle")
            }
        }
    }
}

impl core::error::Error for StackError {}

/// Errors from decoding an [`OutputTransform`](crate::geometry::OutputTransform).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformError {
    /// The wire code is outside `0..=7`.
    Unknown(u32),
    /// The name does not match any transform.
    UnknownName,
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown output transform code {code}"),
            Self::UnknownName => f.write_str("unknown output transform name"),
        }
    }
}

impl core::error::Error for TransformError {}

/// Errors from starting an interactive grab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrabError {
    /// No view holds the implicit pointer grab.
    NoTarget,
    /// The resize edge bits do not name a supported edge or corner.
    InvalidEdge(u32),
    /// Another grab is already running.
    Busy,
    /// The drag icon view could not be raised.
    Icon(StackError),
}

impl fmt::Display for GrabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTarget => f.write_str("no view under the pointer grab"),
            Self::InvalidEdge(bits) => write!(f, "unsupported resize edge combination {bits:#x}"),
            Self::Busy => f.write_str("a grab is already active"),
            Self::Icon(e) => write!(f, "drag icon: {e}"),
        }
    }
}

impl core::error::Error for GrabError {}

/// Errors from [`CompositorConfig::validate`](crate::config::CompositorConfig::validate).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The fade must take at least one tick in each direction.
    ZeroFadeSteps,
    /// The fade tick period must be non-zero.
    ZeroTickPeriod,
    /// Only a single pointer stream is modeled.
    UnsupportedPointerCount(u8),
    /// Only a single output is modeled.
    UnsupportedOutputCount(u8),
    /// The output has no area.
    EmptyOutput,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFadeSteps => f.write_str("fade steps must be at least 1"),
            Self::ZeroTickPeriod => f.write_str("fade tick period must be non-zero"),
            Self::UnsupportedPointerCount(n) => {
                write!(f, "{n} concurrent pointers requested, only 1 is supported")
            }
            Self::UnsupportedOutputCount(n) => {
                write!(f, "{n} outputs requested, only 1 is supported")
            }
            Self::EmptyOutput => f.write_str("output size must be non-empty"),
        }
    }
}

impl core::error::Error for ConfigError {}
