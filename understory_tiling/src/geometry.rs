// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small geometry helpers shared by the grid mapper and the controller.

use kurbo::{Point, Rect, Size};

/// Clamps `value` into `[lo, hi]`.
///
/// Unlike [`f64::clamp`] this never panics. An inverted range (`lo > hi`)
/// only arises from an empty viewport and resolves to `lo`; a NaN `value`
/// also resolves to `lo`.
#[must_use]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi || value.is_nan() {
        return lo;
    }
    value.max(lo).min(hi)
}

/// Returns `true` if `a` and `b` overlap with non-zero area.
///
/// Both rectangles are treated as half-open on their upper edges, so two
/// rectangles that merely share an edge do not intersect.
#[must_use]
pub fn intersects(a: Rect, b: Rect) -> bool {
    let a = a.abs();
    let b = b.abs();
    if a.x1 <= a.x0 || a.y1 <= a.y0 || b.x1 <= b.x0 || b.y1 <= b.y0 {
        return false;
    }
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Largest valid content offset for `content` scrolled inside `bounds`.
///
/// Each axis is floored at zero, so content smaller than the bounds cannot
/// scroll on that axis.
#[must_use]
pub fn maximum_offset(content: Size, bounds: Size) -> Point {
    Point::new(
        (content.width - bounds.width).max(0.0),
        (content.height - bounds.height).max(0.0),
    )
}

/// Clamps each axis of `offset` into `[0, max(0, content - bounds)]`.
///
/// Non-finite components collapse to zero so that a bad offset can never
/// leak into layout.
#[must_use]
pub fn clamp_offset(offset: Point, content: Size, bounds: Size) -> Point {
    let max = maximum_offset(content, bounds);
    let axis = |v: f64, hi: f64| {
        if v.is_finite() {
            clamp(v, 0.0, hi)
        } else {
            0.0
        }
    };
    Point::new(axis(offset.x, max.x), axis(offset.y, max.y))
}

/// Returns `true` if both dimensions are finite and strictly positive.
#[must_use]
pub fn is_drawable_size(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}
