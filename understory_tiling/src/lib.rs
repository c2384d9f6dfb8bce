// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tiling --heading-base-level=0

//! Understory Tiling: headless tiled viewing of very large images.
//!
//! This crate decides which tiles of a large image to draw, and at which
//! level of detail, while the image is zoomed, panned and resized. It
//! focuses on:
//! - Mapping a continuous zoom scale onto a power-of-two level-of-detail
//!   ladder ([`LodSelector`]).
//! - Enumerating the tiles that overlap a visible rectangle, with exact
//!   clipping of edge tiles ([`TileGrid`]).
//! - Zoom bounds, fit/fill layout, centering insets and offset clamping
//!   ([`ViewportController`]).
//! - Keeping the focal point and the fitted state stable across resizes
//!   and rotations.
//!
//! It does **not** decode, fetch or cache tile images, and it does not handle
//! gestures or animation. Callers are expected to:
//! - Forward viewport size changes, zoom changes and scrolls into the
//!   [`ViewportController`].
//! - Implement [`TileProvider`] (any closure works) to hand back tile images,
//!   returning `None` while a tile is still loading.
//! - Draw the [`Frame`] returned by [`TiledView::frame`]: the base layer
//!   first, then the tiles.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_tiling::{TileCoordinate, TiledView, TilingOptions};
//!
//! let options = TilingOptions::new(Size::new(8_000.0, 6_000.0))
//!     .with_tile_size(Size::new(256.0, 256.0))
//!     .with_levels_of_detail(4);
//!
//! // A provider that has every tile ready.
//! let provider = |tile: TileCoordinate, _scale: f64| Some(tile);
//! let mut view = TiledView::new(options, provider);
//! view.controller_mut().set_bounds_size(Size::new(800.0, 600.0));
//!
//! let frame = view.frame();
//! assert!(frame.base.is_some());
//! assert!(!frame.tiles.is_empty());
//! ```
//!
//! ## Resizing
//!
//! ```rust
//! use kurbo::Size;
//! use understory_tiling::{TilingOptions, ViewportController};
//!
//! let mut controller = ViewportController::new(TilingOptions::new(Size::new(1000.0, 500.0)));
//! controller.set_bounds_size(Size::new(400.0, 800.0));
//!
//! // A host that drives the transaction itself:
//! controller.prepare_to_resize().unwrap();
//! controller.set_bounds_size(Size::new(800.0, 400.0));
//! controller.recover_from_resizing().unwrap();
//!
//! // The image was fitted before, so it is fitted again.
//! assert_eq!(controller.zoom_scale(), controller.zoom().min_scale);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod error;
pub mod geometry;
mod grid;
mod lod;
mod options;
mod provider;
mod view;

pub use controller::{
    ResizePhase, ResizeSnapshot, RestoreScale, ViewportController, ViewportDebugInfo, ZoomAction,
    ZoomState,
};
pub use error::TilingError;
pub use grid::{GridDimensions, TileCoordinate, TileGrid};
pub use lod::{LodSelection, LodSelector};
pub use options::{LayoutMode, TilingOptions};
pub use provider::TileProvider;
pub use view::{BaseLayer, Frame, PlacedTile, TiledView};
