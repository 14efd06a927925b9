// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor configuration.

use kurbo::Size;

use crate::error::ConfigError;
use crate::geometry::OutputTransform;
use crate::input::Modifiers;
use crate::time::Duration;
use crate::view::TextureHandle;

/// Color the output is cleared to before anything is drawn (dark blue,
/// half alpha).
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.0, 0.165, 0.31, 0.5];

/// Timing of the rotation cross-fade.
///
/// Each tick moves the overlay opacity by `1 / steps`, so a full fade out
/// takes exactly `steps` ticks and the fade back in takes as many again.
/// Counting whole steps instead of accumulating a float increment keeps the
/// commit on the tick where opacity first reaches 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FadeConfig {
    /// Interval between animation ticks.
    pub tick_period: Duration,
    /// Ticks per fade direction.
    pub steps: u32,
}

impl FadeConfig {
    /// 20 ms ticks, 0.05 opacity per tick.
    pub const DEFAULT: Self = Self {
        tick_period: Duration::from_millis(20),
        steps: 20,
    };

    /// Opacity change per tick.
    #[must_use]
    pub fn step(&self) -> f32 {
        1.0 / self.steps.max(1) as f32
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A wallpaper drawn under every view, stretched over the logical output.
///
/// Decoding the image is up to the embedder; the core only carries the
/// handle it was uploaded to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundImage {
    /// Uploaded image.
    pub texture: TextureHandle,
    /// Pixel size of the image.
    pub size: Size,
}

/// Configuration for a [`Compositor`](crate::compositor::Compositor).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorConfig {
    /// Window size of the single output.
    pub output_size: Size,
    /// Transform the output starts with (no fade).
    pub initial_transform: OutputTransform,
    /// Concurrent pointer streams. Must be 1.
    pub max_concurrent_pointers: u8,
    /// Outputs. Must be 1.
    pub output_count: u8,
    /// Rotation fade timing.
    pub fade: FadeConfig,
    /// Holding exactly one of these modifiers while pressing starts a move.
    pub move_modifiers: Modifiers,
    /// Optional wallpaper.
    pub background: Option<BackgroundImage>,
    /// RGBA clear color, shown wherever neither the wallpaper nor a view
    /// covers the output.
    pub clear_color: [f32; 4],
}

impl CompositorConfig {
    /// A 1280×800 panel mounted in portrait, starting at 270°.
    #[must_use]
    pub const fn handheld() -> Self {
        Self {
            output_size: Size::new(1280.0, 800.0),
            initial_transform: OutputTransform::Rotate270,
            max_concurrent_pointers: 1,
            output_count: 1,
            fade: FadeConfig::DEFAULT,
            move_modifiers: Modifiers::ALT.union(Modifiers::META),
            background: None,
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }

    /// A 1280×800 window with no rotation.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            initial_transform: OutputTransform::Normal,
            ..Self::handheld()
        }
    }

    /// Checks the configuration against what the core supports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fade.steps == 0 {
            return Err(ConfigError::ZeroFadeSteps);
        }
        if self.fade.tick_period == Duration::ZERO {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.max_concurrent_pointers != 1 {
            return Err(ConfigError::UnsupportedPointerCount(
                self.max_concurrent_pointers,
            ));
        }
        if self.output_count != 1 {
            return Err(ConfigError::UnsupportedOutputCount(self.output_count));
        }
        if self.output_size.is_zero_area() {
            return Err(ConfigError::EmptyOutput);
        }
        Ok(())
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::desktop()
    }
}
