// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Point, Rect, Size};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`/`ceil`

use crate::geometry::{intersects, is_drawable_size};
use crate::lod::LodSelector;

/// Identifies one renderable tile.
///
/// Coordinates are only meaningful for the [`TileGrid`] that produced them
/// and are used as lookup keys by a [`crate::TileProvider`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoordinate {
    /// Column index, counted from the left edge of the image.
    pub column: u32,
    /// Row index, counted from the top edge of the image.
    pub row: u32,
    /// Level of detail the tile belongs to.
    pub level_of_detail: u32,
}

impl TileCoordinate {
    /// Creates a tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32, level_of_detail: u32) -> Self {
        Self {
            column,
            row,
            level_of_detail,
        }
    }
}

/// Column and row counts of the grid at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDimensions {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
}

impl GridDimensions {
    /// Total number of tiles in the grid.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Returns `true` if the grid has no tiles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }
}

/// Tile layout of one image across all of its levels of detail.
///
/// Level-space coordinates are image pixels multiplied by the level's scale
/// (see [`LodSelector::scale_for_level`]). Tiles are laid out from the
/// origin; the last column and row are clipped to the remaining image extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGrid {
    image_size: Size,
    tile_size: Size,
    lods: LodSelector,
}

impl TileGrid {
    /// Creates a grid, or `None` if tiling is not possible.
    ///
    /// A zero or non-finite image size, a zero or non-finite tile size, or
    /// zero levels of detail all yield `None`; callers fall back to drawing
    /// the whole image.
    #[must_use]
    pub fn new(image_size: Size, tile_size: Size, levels_of_detail: u32) -> Option<Self> {
        if !is_drawable_size(image_size) || !is_drawable_size(tile_size) || levels_of_detail == 0
        {
            return None;
        }
        Some(Self {
            image_size,
            tile_size,
            lods: LodSelector::new(levels_of_detail),
        })
    }

    /// Full-resolution image size.
    #[must_use]
    pub fn image_size(&self) -> Size {
        self.image_size
    }

    /// Pixel size of one tile at every level.
    #[must_use]
    pub fn tile_size(&self) -> Size {
        self.tile_size
    }

    /// The level-of-detail ladder of this grid.
    #[must_use]
    pub fn lods(&self) -> LodSelector {
        self.lods
    }

    /// Image size in the coordinate space of `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level` is out of range.
    #[must_use]
    pub fn level_size(&self, level: u32) -> Size {
        self.image_size * self.lods.scale_for_level(level)
    }

    /// Column and row counts at `level`.
    ///
    /// # Panics
    ///
    /// Panics if `level` is out of range.
    #[must_use]
    pub fn dimensions(&self, level: u32) -> GridDimensions {
        let size = self.level_size(level);
        GridDimensions {
            columns: to_index((size.width / self.tile_size.width).ceil()),
            rows: to_index((size.height / self.tile_size.height).ceil()),
        }
    }

    /// Level-space rectangle covered by `tile`.
    ///
    /// Edge tiles are clipped to the image extent, so their rectangle may be
    /// smaller than the tile size.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the grid. [`TileGrid::tiles_intersecting`]
    /// never produces such coordinates, so this indicates a caller bug.
    #[must_use]
    pub fn tile_rect(&self, tile: TileCoordinate) -> Rect {
        let level = tile.level_of_detail;
        assert!(
            level < self.lods.levels(),
            "tile {tile:?} has no level of detail in a {}-level grid",
            self.lods.levels()
        );
        let dims = self.dimensions(level);
        assert!(
            tile.column < dims.columns && tile.row < dims.rows,
            "tile {tile:?} lies outside the {}x{} grid",
            dims.columns,
            dims.rows
        );
        let size = self.level_size(level);
        let x0 = f64::from(tile.column) * self.tile_size.width;
        let y0 = f64::from(tile.row) * self.tile_size.height;
        Rect::new(
            x0,
            y0,
            (x0 + self.tile_size.width).min(size.width),
            (y0 + self.tile_size.height).min(size.height),
        )
    }

    /// Column and row ranges of the tiles at `level` that overlap `visible`.
    ///
    /// `visible` is expressed in level space. A tile is included only if it
    /// overlaps `visible` with non-zero area, so a rectangle ending exactly on
    /// a tile boundary does not pull in the neighbouring tile.
    ///
    /// Returns `None` when nothing at `level` is visible.
    #[must_use]
    pub fn tile_ranges(&self, visible: Rect, level: u32) -> Option<(Range<u32>, Range<u32>)> {
        let level_rect = Rect::from_origin_size(Point::ZERO, self.level_size(level));
        let visible = visible.abs();
        if !intersects(visible, level_rect) {
            return None;
        }
        let clip = visible.intersect(level_rect);
        let dims = self.dimensions(level);

        let first_column = to_index((clip.x0 / self.tile_size.width).floor());
        let end_column = to_index((clip.x1 / self.tile_size.width).ceil()).min(dims.columns);
        let first_row = to_index((clip.y0 / self.tile_size.height).floor());
        let end_row = to_index((clip.y1 / self.tile_size.height).ceil()).min(dims.rows);

        if first_column >= end_column || first_row >= end_row {
            return None;
        }
        Some((first_column..end_column, first_row..end_row))
    }

    /// Enumerates the tiles at `level` that overlap `visible`, row by row.
    ///
    /// See [`TileGrid::tile_ranges`] for the inclusion rule. Every returned
    /// coordinate is unique and lies inside the grid.
    #[must_use]
    pub fn tiles_intersecting(&self, visible: Rect, level: u32) -> Vec<TileCoordinate> {
        let Some((columns, rows)) = self.tile_ranges(visible, level) else {
            return Vec::new();
        };
        let mut tiles = Vec::with_capacity(columns.len() * rows.len());
        for row in rows {
            for column in columns.clone() {
                tiles.push(TileCoordinate::new(column, row, level));
            }
        }
        tiles
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "grid indices are non-negative and far below u32::MAX for any real image"
)]
fn to_index(value: f64) -> u32 {
    value.max(0.0) as u32
}
