// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single modeled display output.

use core::fmt;

use kurbo::Size;

use crate::geometry::OutputTransform;

/// Identifies a display output.
///
/// Only one output is modeled; the id is carried so render plans and traces
/// stay meaningful if that changes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OutputId(pub u32);

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({})", self.0)
    }
}

/// Window size and active rotation of the output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Output {
    /// Output identity.
    pub id: OutputId,
    /// Window size in window-space pixels.
    pub size: Size,
    /// The committed transform. Changes only when a fade reaches black.
    pub transform: OutputTransform,
}

impl Output {
    /// Size of logical (unrotated) space under the current transform.
    #[must_use]
    pub fn logical_size(&self) -> Size {
        self.transform.logical_size(self.size)
    }
}
