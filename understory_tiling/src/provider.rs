// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::grid::TileCoordinate;

/// Source of tile images.
///
/// The viewer calls [`TileProvider::fetch_tile`] for every visible tile on
/// every frame, so implementations must tolerate redundant requests for the
/// same coordinate. Returning `None` means "not ready yet" and is not an
/// error; the tile is simply reported as pending and the base layer shows
/// through until a later frame gets an image.
///
/// Any `FnMut(TileCoordinate, f64) -> Option<T>` closure is a provider.
pub trait TileProvider {
    /// Decoded tile image handed back to the renderer.
    type Tile;

    /// Returns the image for `tile`, rendered at `scale` relative to the
    /// full-resolution source, or `None` if it is not available yet.
    fn fetch_tile(&mut self, tile: TileCoordinate, scale: f64) -> Option<Self::Tile>;
}

impl<T, F> TileProvider for F
where
    F: FnMut(TileCoordinate, f64) -> Option<T>,
{
    type Tile = T;

    fn fetch_tile(&mut self, tile: TileCoordinate, scale: f64) -> Option<T> {
        self(tile, scale)
    }
}
