// Copyright 2026 the Nubbock Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract with the rendering collaborator.
//!
//! The core never touches pixels. Once per frame,
//! [`Compositor::begin_frame`](crate::compositor::Compositor::begin_frame)
//! asks a [`TextureSource`] for the current texture of every surface that has
//! a view, and stores whatever comes back on that view. A renderer then walks
//! [`Compositor::ordered_views`](crate::compositor::Compositor::ordered_views)
//! back to front and blits each texture.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(now: HostTime) {
//!     compositor.advance(now);
//!     compositor.begin_frame(&mut textures);
//!     for view in compositor.ordered_views() {
//!         blit(view.texture, view.rect, compositor.current_transform());
//!     }
//!     draw_black(compositor.current_overlay_opacity());
//! }
//! ```

use crate::view::{SurfaceId, TextureHandle, TextureOrigin};

/// A texture handed back by [`TextureSource::acquire_current_texture`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AcquiredTexture {
    /// Renderer-owned handle.
    pub handle: TextureHandle,
    /// Row order of the pixel data.
    pub origin: TextureOrigin,
}

/// Uploads surface buffers and hands out texture handles.
pub trait TextureSource {
    /// Returns the texture for the buffer currently attached to `surface`.
    ///
    /// `None` means no new buffer was committed; the view keeps its previous
    /// texture.
    fn acquire_current_texture(&mut self, surface: SurfaceId) -> Option<AcquiredTexture>;
}
