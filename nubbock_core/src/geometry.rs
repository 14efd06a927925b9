// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Output rotation and the window ↔ logical coordinate mapping.
//!
//! *Window space* is the space raw input arrives in: the physical window,
//! origin top-left, `window` wide and tall. *Logical space* is the unrotated
//! space views are laid out in. [`OutputTransform::to_logical`] maps the
//! former to the latter and [`OutputTransform::to_window`] inverts it.
//!
//! | transform | `to_logical(x, y)`  |
//! |-----------|---------------------|
//! | normal    | `(x, y)`            |
//! | 90        | `(H - y, x)`        |
//! | 180       | `(x, H - y)`        |
//! | 270       | `(y, W - x)`        |
//!
//! The 180° row is a vertical flip, not a point reflection. Flipped variants
//! map as identity.

use core::fmt;
use core::str::FromStr;

use kurbo::{Affine, Point, Size};

use crate::error::TransformError;

/// One of the eight output transforms, numbered in Wayland wire order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputTransform {
    /// No rotation.
    #[default]
    Normal,
    /// Rotated 90°.
    Rotate90,
    /// Rotated 180°.
    Rotate180,
    /// Rotated 270°.
    Rotate270,
    /// Mirrored, no rotation.
    Flipped,
    /// Mirrored, then rotated 90°.
    Flipped90,
    /// Mirrored, then rotated 180°.
    Flipped180,
    /// Mirrored, then rotated 270°.
    Flipped270,
}

impl OutputTransform {
    /// All transforms in wire order.
    pub const ALL: [Self; 8] = [
        Self::Normal,
        Self::Rotate90,
        Self::Rotate180,
        Self::Rotate270,
        Self::Flipped,
        Self::Flipped90,
        Self::Flipped180,
        Self::Flipped270,
    ];

    /// Decodes a wire code.
    pub fn from_code(code: u32) -> Result<Self, TransformError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(TransformError::Unknown(code))
    }

    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::Rotate90 => 1,
            Self::Rotate180 => 2,
            Self::Rotate270 => 3,
            Self::Flipped => 4,
            Self::Flipped90 => 5,
            Self::Flipped180 => 6,
            Self::Flipped270 => 7,
        }
    }

    /// Rotation angle in degrees. Flipped variants report their rotation.
    #[must_use]
    pub const fn angle(self) -> u16 {
        match self {
            Self::Normal | Self::Flipped => 0,
            Self::Rotate90 | Self::Flipped90 => 90,
            Self::Rotate180 | Self::Flipped180 => 180,
            Self::Rotate270 | Self::Flipped270 => 270,
        }
    }

    /// Whether this is one of the mirrored variants.
    #[must_use]
    pub const fn is_flipped(self) -> bool {
        matches!(
            self,
            Self::Flipped | Self::Flipped90 | Self::Flipped180 | Self::Flipped270
        )
    }

    /// Size of logical space for a window of size `window`.
    ///
    /// Quarter turns swap width and height.
    #[must_use]
    pub fn logical_size(self, window: Size) -> Size {
        match self {
            Self::Rotate90 | Self::Rotate270 => Size::new(window.height, window.width),
            _ => window,
        }
    }

    /// Maps a window-space point into logical space.
    #[must_use]
    pub fn to_logical(self, p: Point, window: Size) -> Point {
        match self {
            Self::Rotate90 => Point::new(window.height - p.y, p.x),
            Self::Rotate180 => Point::new(p.x, window.height - p.y),
            Self::Rotate270 => Point::new(p.y, window.width - p.x),
            Self::Normal | Self::Flipped | Self::Flipped90 | Self::Flipped180 | Self::Flipped270 => {
                p
            }
        }
    }

    /// Maps a logical-space point back into window space.
    ///
    /// Inverse of [`to_logical`](Self::to_logical) for the same `window`.
    #[must_use]
    pub fn to_window(self, p: Point, window: Size) -> Point {
        self.window_from_logical(window) * p
    }

    /// The affine map from logical space to window space.
    ///
    /// Renderers place view content with this so that what is drawn under a
    /// window point is what [`to_logical`](Self::to_logical) hit-tests.
    #[must_use]
    pub fn window_from_logical(self, window: Size) -> Affine {
        match self {
            Self::Rotate90 => Affine::new([0.0, -1.0, 1.0, 0.0, 0.0, window.height]),
            Self::Rotate180 => Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, window.height]),
            Self::Rotate270 => Affine::new([0.0, 1.0, -1.0, 0.0, window.width, 0.0]),
            Self::Normal | Self::Flipped | Self::Flipped90 | Self::Flipped180 | Self::Flipped270 => {
                Affine::IDENTITY
            }
        }
    }
}

impl fmt::Display for OutputTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Rotate90 => "90",
            Self::Rotate180 => "180",
            Self::Rotate270 => "270",
            Self::Flipped => "flipped",
            Self::Flipped90 => "flipped-90",
            Self::Flipped180 => "flipped-180",
            Self::Flipped270 => "flipped-270",
        })
    }
}

impl FromStr for OutputTransform {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "normal" | "0" => Self::Normal,
            "90" => Self::Rotate90,
            "180" => Self::Rotate180,
            "270" => Self::Rotate270,
            "flipped" => Self::Flipped,
            "flipped-90" => Self::Flipped90,
            "flipped-180" => Self::Flipped180,
            "flipped-270" => Self::Flipped270,
            _ => return Err(TransformError::UnknownName),
        })
    }
}
