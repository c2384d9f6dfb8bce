// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Maps a continuous zoom scale onto a discrete level of detail.
///
/// Levels form a power-of-two ladder. Level `levels - 1` is the finest level
/// and renders at native resolution (scale `1.0`); every level below it
/// halves the scale, so level `0` is the coarsest at `2^-(levels - 1)`.
///
/// A selector with zero levels never selects anything. Callers treat that as
/// "no tiling" and fall back to drawing the whole-image base layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct LodSelector {
    levels: u32,
}

/// A level picked by [`LodSelector::select`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodSelection {
    /// Level index in `0..levels`.
    pub level: u32,
    /// Scale of the selected level relative to native resolution.
    pub scale: f64,
}

impl LodSelector {
    /// Creates a selector over `levels` discrete levels.
    #[must_use]
    pub const fn new(levels: u32) -> Self {
        Self { levels }
    }

    /// Returns the number of levels.
    #[must_use]
    pub const fn levels(&self) -> u32 {
        self.levels
    }

    /// Returns `false` for the degenerate zero-level selector.
    #[must_use]
    pub const fn is_tiling(&self) -> bool {
        self.levels > 0
    }

    /// Returns the scale at which `level` is rendered.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not below [`LodSelector::levels`].
    #[must_use]
    pub fn scale_for_level(&self, level: u32) -> f64 {
        assert!(
            level < self.levels,
            "level {level} out of range for {} levels of detail",
            self.levels
        );
        let mut scale = 1.0;
        for _ in level + 1..self.levels {
            scale *= 0.5;
        }
        scale
    }

    /// Picks the level to render at `scale`.
    ///
    /// The result is the coarsest level whose own scale is still at least
    /// `scale`, so tiles are never magnified unless `scale` is below the
    /// coarsest level. Scales above `1.0` select the finest level. Selection
    /// is monotonically non-decreasing in `scale`.
    ///
    /// Returns `None` when there are no levels or `scale` is not a finite,
    /// positive number.
    #[must_use]
    pub fn select(&self, scale: f64) -> Option<LodSelection> {
        if !self.is_tiling() || !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let mut level = self.levels - 1;
        let mut level_scale = 1.0;
        while level > 0 && level_scale * 0.5 >= scale {
            level_scale *= 0.5;
            level -= 1;
        }
        Some(LodSelection {
            level,
            scale: level_scale,
        })
    }
}
