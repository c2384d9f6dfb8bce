// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use log::trace;

use crate::controller::ViewportController;
use crate::geometry::is_drawable_size;
use crate::grid::TileCoordinate;
use crate::lod::LodSelection;
use crate::options::TilingOptions;
use crate::provider::TileProvider;

/// Whole-image layer, drawn first on every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseLayer {
    /// Where the full image lands in view space.
    pub dest_rect: Rect,
}

/// One tile of the tiled layer, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedTile<T> {
    /// Grid coordinate of the tile.
    pub coordinate: TileCoordinate,
    /// Rectangle covered by the tile in level space; edge tiles are clipped.
    pub source_rect: Rect,
    /// Where the tile lands in view space.
    pub dest_rect: Rect,
    /// Image returned by the provider.
    pub tile: T,
}

/// Draw list for one frame.
///
/// Renderers draw [`Frame::base`] first and then every entry of
/// [`Frame::tiles`] on top, in order. Tiles listed in [`Frame::pending`]
/// were not ready; the base layer shows through where they belong.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
    /// Low-resolution whole-image layer, absent when there is no image.
    pub base: Option<BaseLayer>,
    /// Level of detail of the tiled layer, absent when it is not drawn.
    pub level: Option<LodSelection>,
    /// Tiles the provider returned, row by row.
    pub tiles: Vec<PlacedTile<T>>,
    /// Visible tiles the provider could not supply yet.
    pub pending: Vec<TileCoordinate>,
}

impl<T> Frame<T> {
    /// Returns `true` if every visible tile was available.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }
}

/// A [`ViewportController`] paired with the [`TileProvider`] it draws from.
///
/// The view composes two layers: a base layer with the whole image, always
/// drawn, and a tiled layer drawn only when tiling is enabled and a tile grid
/// exists for the document.
#[derive(Clone, Debug)]
pub struct TiledView<P> {
    controller: ViewportController,
    provider: P,
}

impl<P: TileProvider> TiledView<P> {
    /// Creates a view over `options` that fetches tiles from `provider`.
    #[must_use]
    pub fn new(options: TilingOptions, provider: P) -> Self {
        Self {
            controller: ViewportController::new(options),
            provider,
        }
    }

    /// The viewport state.
    #[must_use]
    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// Mutable access to the viewport state, for forwarding resize, zoom and
    /// scroll notifications.
    pub fn controller_mut(&mut self) -> &mut ViewportController {
        &mut self.controller
    }

    /// The tile provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the tile provider.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Builds the draw list for the current viewport state.
    ///
    /// Every visible tile is requested from the provider, including tiles
    /// requested on earlier frames. Requests are read-only with respect to
    /// the viewport, so calling this repeatedly is safe.
    pub fn frame(&mut self) -> Frame<P::Tile> {
        let controller = &self.controller;
        let image_size = controller.options().image_size;
        let image_rect = Rect::from_origin_size(Point::ZERO, image_size);
        let base = is_drawable_size(image_size).then(|| BaseLayer {
            dest_rect: controller.image_to_view_rect(image_rect),
        });

        let mut frame = Frame {
            base,
            level: None,
            tiles: Vec::new(),
            pending: Vec::new(),
        };
        if !controller.options().tiling_enabled || !is_drawable_size(controller.bounds_size()) {
            return frame;
        }
        let (Some(grid), Some(level)) = (controller.grid(), controller.level_of_detail()) else {
            return frame;
        };

        let visible = controller.visible_image_rect().scale_from_origin(level.scale);
        for coordinate in grid.tiles_intersecting(visible, level.level) {
            let source_rect = grid.tile_rect(coordinate);
            match self.provider.fetch_tile(coordinate, level.scale) {
                Some(tile) => frame.tiles.push(PlacedTile {
                    coordinate,
                    source_rect,
                    dest_rect: controller
                        .image_to_view_rect(source_rect.scale_from_origin(1.0 / level.scale)),
                    tile,
                }),
                None => frame.pending.push(coordinate),
            }
        }
        frame.level = Some(level);
        trace!(
            "frame at level {}: {} tiles drawn, {} pending",
            level.level,
            frame.tiles.len(),
            frame.pending.len()
        );
        frame
    }
}
