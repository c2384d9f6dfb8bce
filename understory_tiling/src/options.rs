// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

/// How the image is laid out when zoom bounds are recomputed.
///
/// This mode is consulted by [`crate::ViewportController::recompute_zoom_bounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LayoutMode {
    /// Letterbox: show the whole image at the minimum zoom scale.
    #[default]
    Fit,
    /// Crop: scale the image so it covers the viewport on both axes.
    ///
    /// [`crate::ViewportController::width_is_cropped`] reports which axis was
    /// cropped.
    Fill,
}

/// Configuration of a tiled image viewer.
///
/// Options are applied as a whole through
/// [`crate::ViewportController::reconfigure`], which performs a single
/// recomputation pass for the combined change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilingOptions {
    /// Full-resolution size of the source image.
    pub image_size: Size,
    /// Pixel size of one tile at every level of detail.
    pub tile_size: Size,
    /// Number of power-of-two levels of detail; zero disables tiling.
    pub levels_of_detail: u32,
    /// Fit or fill layout.
    pub layout: LayoutMode,
    /// When `false`, only the whole-image base layer is drawn.
    pub tiling_enabled: bool,
}

impl Default for TilingOptions {
    fn default() -> Self {
        Self {
            image_size: Size::ZERO,
            tile_size: Size::new(256.0, 256.0),
            levels_of_detail: 0,
            layout: LayoutMode::default(),
            tiling_enabled: true,
        }
    }
}

impl TilingOptions {
    /// Options for an image of `image_size` with default tiling settings.
    #[must_use]
    pub fn new(image_size: Size) -> Self {
        Self {
            image_size,
            ..Self::default()
        }
    }

    /// Sets the source image size.
    #[must_use]
    pub fn with_image_size(mut self, image_size: Size) -> Self {
        self.image_size = image_size;
        self
    }

    /// Sets the tile size.
    #[must_use]
    pub fn with_tile_size(mut self, tile_size: Size) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Sets the number of levels of detail.
    #[must_use]
    pub fn with_levels_of_detail(mut self, levels: u32) -> Self {
        self.levels_of_detail = levels;
        self
    }

    /// Sets the layout mode.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    /// Enables or disables the tiled layer.
    #[must_use]
    pub fn with_tiling_enabled(mut self, enabled: bool) -> Self {
        self.tiling_enabled = enabled;
        self
    }

    /// Returns `true` if `other` describes a different document: image,
    /// tile size or level count differ.
    pub(crate) fn document_differs(&self, other: &Self) -> bool {
        self.image_size != other.image_size
            || self.tile_size != other.tile_size
            || self.levels_of_detail != other.levels_of_detail
    }
}
