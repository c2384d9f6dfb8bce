// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::mem;

use kurbo::{Insets, Point, Rect, Size, Vec2};
use log::{debug, warn};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`

use crate::error::TilingError;
use crate::geometry::{clamp, clamp_offset, intersects, is_drawable_size, maximum_offset};
use crate::grid::TileGrid;
use crate::lod::LodSelection;
use crate::options::{LayoutMode, TilingOptions};

/// Scales within this distance of the minimum count as "fitted" when a
/// resize snapshot is taken.
const MIN_SCALE_EPSILON: f64 = f32::EPSILON as f64;

/// Zoom scale and its bounds.
///
/// Once zoom bounds have been computed, `min_scale <= scale <= max_scale`
/// holds after every mutation, and `max_scale` is `1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomState {
    /// Current zoom scale relative to the full-resolution image.
    pub scale: f64,
    /// Smallest scale; fits the whole image into the bounds.
    pub min_scale: f64,
    /// Largest scale; never upscales beyond native resolution.
    pub max_scale: f64,
    /// Unclamped cover scale when laid out in [`LayoutMode::Fill`].
    pub fill_scale: Option<f64>,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_scale: 1.0,
            max_scale: 1.0,
            fill_scale: None,
        }
    }
}

/// Scale recorded at the start of a resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RestoreScale {
    /// The view was fitted; restore to the minimum scale computed for the
    /// new bounds instead of a stale literal, in either layout mode.
    Resting,
    /// Restore this scale, clamped into the new zoom bounds.
    Scale(f64),
}

/// State captured by [`ViewportController::prepare_to_resize`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeSnapshot {
    /// Image-space point that sat at the center of the bounds.
    pub focal_point: Point,
    /// Scale to restore once the new bounds are known.
    pub scale_to_restore: RestoreScale,
}

/// Resize transaction phase.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ResizePhase {
    /// No resize in progress.
    #[default]
    Idle,
    /// Between `prepare_to_resize` and `recover_from_resizing`.
    Resizing(ResizeSnapshot),
}

/// Outcome of [`ViewportController::request_zoom`].
///
/// The host animates towards the action and reports intermediate states via
/// [`ViewportController::set_zoom_scale`] and
/// [`ViewportController::set_content_offset`], or jumps straight there with
/// [`ViewportController::apply_zoom_action`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomAction {
    /// Zoom in so `rect` (image space) fills the bounds at `scale`.
    ZoomToRect {
        /// Target rectangle in image space.
        rect: Rect,
        /// Scale that fits `rect` into the bounds.
        scale: f64,
    },
    /// Zoom back out to the minimum scale.
    ZoomOut {
        /// The minimum scale.
        scale: f64,
    },
}

/// Zoom, scroll and resize state for one tiled image.
///
/// The controller is the headless model behind a scrolling image view. It
/// owns the zoom scale, its bounds, the content offset and the centering
/// inset, and keeps them consistent as the image, the layout mode or the
/// view size change.
///
/// Coordinates come in three spaces:
/// - *image space*: full-resolution image pixels,
/// - *content space*: image space multiplied by the zoom scale,
/// - *view space*: the viewport, origin at its top-left corner.
///
/// A point `p` in image space appears in view space at
/// `p * scale + inset - offset`.
///
/// Resizing is a two-step transaction: [`ViewportController::prepare_to_resize`]
/// captures the focal point, the host updates the bounds, and
/// [`ViewportController::recover_from_resizing`] restores scale and focal
/// point. Other geometry-affecting calls are rejected in between.
#[derive(Clone, Debug)]
pub struct ViewportController {
    options: TilingOptions,
    grid: Option<TileGrid>,
    bounds_size: Size,
    content_offset: Point,
    content_inset: Insets,
    zoom: ZoomState,
    width_is_cropped: bool,
    phase: ResizePhase,
}

impl ViewportController {
    /// Creates a controller for `options` with empty bounds.
    ///
    /// Zoom bounds stay undefined until [`ViewportController::set_bounds_size`]
    /// reports a non-empty viewport.
    #[must_use]
    pub fn new(options: TilingOptions) -> Self {
        let mut controller = Self {
            options,
            grid: None,
            bounds_size: Size::ZERO,
            content_offset: Point::ZERO,
            content_inset: Insets::ZERO,
            zoom: ZoomState::default(),
            width_is_cropped: false,
            phase: ResizePhase::Idle,
        };
        controller.reset_document();
        controller
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &TilingOptions {
        &self.options
    }

    /// Tile grid for the current document, or `None` when tiling is
    /// impossible (empty image, empty tiles or zero levels).
    #[must_use]
    pub fn grid(&self) -> Option<&TileGrid> {
        self.grid.as_ref()
    }

    /// Current viewport size.
    #[must_use]
    pub fn bounds_size(&self) -> Size {
        self.bounds_size
    }

    /// Current content offset; always within the valid offset range.
    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    /// Inset that centers content smaller than the bounds.
    #[must_use]
    pub fn content_inset(&self) -> Insets {
        self.content_inset
    }

    /// Size of the image at the current zoom scale.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.options.image_size * self.zoom.scale
    }

    /// Zoom scale and bounds.
    #[must_use]
    pub fn zoom(&self) -> ZoomState {
        self.zoom
    }

    /// Current zoom scale.
    #[must_use]
    pub fn zoom_scale(&self) -> f64 {
        self.zoom.scale
    }

    /// Whether the last fill layout cropped the image horizontally.
    ///
    /// Consumers use this to decide on horizontal-only centering. A tie
    /// between the width and height ratios reports `false`.
    #[must_use]
    pub fn width_is_cropped(&self) -> bool {
        self.width_is_cropped
    }

    /// Current resize phase.
    #[must_use]
    pub fn phase(&self) -> ResizePhase {
        self.phase
    }

    /// Returns `true` between `prepare_to_resize` and `recover_from_resizing`.
    #[must_use]
    pub fn is_resizing(&self) -> bool {
        matches!(self.phase, ResizePhase::Resizing(_))
    }

    /// Level of detail to render at the current scale, if tiling applies.
    #[must_use]
    pub fn level_of_detail(&self) -> Option<LodSelection> {
        self.grid?.lods().select(self.zoom.scale)
    }

    /// Applies a complete set of options in one step.
    ///
    /// A new image, tile size or level count resets zoom and offset. A new
    /// layout mode recomputes zoom bounds. Toggling tiling alone changes no
    /// geometry.
    pub fn reconfigure(&mut self, options: TilingOptions) -> Result<(), TilingError> {
        self.ensure_idle("reconfigure")?;
        let previous = mem::replace(&mut self.options, options);
        if previous.document_differs(&options) {
            self.reset_document();
        } else if previous.layout != options.layout {
            debug!("layout changed to {:?}", options.layout);
            self.apply_zoom_bounds();
        }
        Ok(())
    }

    /// Replaces the source image size, resetting zoom and offset.
    pub fn set_image_size(&mut self, image_size: Size) -> Result<(), TilingError> {
        self.reconfigure(self.options.with_image_size(image_size))
    }

    /// Reports a new viewport size.
    ///
    /// While idle, a size change runs a full resize transaction so the focal
    /// point and fitted state survive. The first non-empty size simply lays
    /// the image out. During an explicit transaction the size is only
    /// recorded and takes effect in `recover_from_resizing`.
    pub fn set_bounds_size(&mut self, size: Size) {
        if self.is_resizing() {
            self.bounds_size = size;
            return;
        }
        if self.bounds_size == size {
            return;
        }
        if !is_drawable_size(self.bounds_size) {
            self.bounds_size = size;
            self.layout_fresh();
            return;
        }
        self.phase = ResizePhase::Resizing(self.snapshot());
        self.bounds_size = size;
        self.finish_resize();
    }

    /// Starts a resize transaction by capturing the focal point and scale.
    ///
    /// The focal point is the bounds center in image space. If the view is
    /// within a small epsilon of the minimum scale, the snapshot records
    /// [`RestoreScale::Resting`] so that a fitted image stays fitted.
    pub fn prepare_to_resize(&mut self) -> Result<(), TilingError> {
        if self.is_resizing() {
            warn!("nested prepare_to_resize rejected");
            return Err(TilingError::AlreadyResizing);
        }
        let snapshot = self.snapshot();
        debug!(
            "resize started: focal {:?}, restore {:?}",
            snapshot.focal_point, snapshot.scale_to_restore
        );
        self.phase = ResizePhase::Resizing(snapshot);
        Ok(())
    }

    /// Completes a resize transaction for the current bounds size.
    ///
    /// Recomputes zoom bounds, restores the snapshot scale clamped into them,
    /// and scrolls so the snapshot focal point sits at the bounds center as
    /// far as the valid offset range allows.
    pub fn recover_from_resizing(&mut self) -> Result<(), TilingError> {
        if !self.is_resizing() {
            warn!("recover_from_resizing without a resize in progress");
            return Err(TilingError::NotResizing);
        }
        self.finish_resize();
        Ok(())
    }

    /// Recomputes minimum and maximum zoom for the current bounds and applies
    /// the layout mode's resting scale.
    ///
    /// With an empty viewport or image the computation is deferred and the
    /// zoom state is left untouched.
    pub fn recompute_zoom_bounds(&mut self) -> Result<(), TilingError> {
        self.ensure_idle("recompute_zoom_bounds")?;
        self.apply_zoom_bounds();
        Ok(())
    }

    /// Centers the content horizontally, and vertically unless
    /// `horizontal_only` is set, leaving the vertical position untouched.
    pub fn center_content(&mut self, horizontal_only: bool) -> Result<(), TilingError> {
        self.ensure_idle("center_content")?;
        self.center(horizontal_only);
        Ok(())
    }

    /// Sets the zoom scale, clamped into the current zoom bounds.
    ///
    /// This is the "did zoom" notification of the hosting view.
    pub fn set_zoom_scale(&mut self, scale: f64) -> Result<(), TilingError> {
        self.ensure_idle("set_zoom_scale")?;
        self.zoom.scale = clamp(scale, self.zoom.min_scale, self.zoom.max_scale);
        self.after_zoom_change();
        Ok(())
    }

    /// Sets the content offset, clamped into the valid range.
    pub fn set_content_offset(&mut self, offset: Point) -> Result<(), TilingError> {
        self.ensure_idle("set_content_offset")?;
        self.content_offset = clamp_offset(offset, self.content_size(), self.bounds_size);
        Ok(())
    }

    /// Decides how to respond to a zoom request on `target` (image space).
    ///
    /// Returns `None` if `target` does not overlap the image or the viewport
    /// is empty. Otherwise the target scale fits `target` into the bounds
    /// minus the content inset, capped at the maximum scale. When zooming
    /// out is allowed and the current scale is at least as close to the
    /// minimum as to the target, the request toggles back out to the minimum
    /// scale instead.
    pub fn request_zoom(
        &self,
        target: Rect,
        allow_zoom_out: bool,
    ) -> Result<Option<ZoomAction>, TilingError> {
        self.ensure_idle("request_zoom")?;
        let image_rect = Rect::from_origin_size(Point::ZERO, self.options.image_size);
        if !intersects(image_rect, target) {
            debug!("zoom request {target:?} misses the image; ignored");
            return Ok(None);
        }
        let available = Size::new(
            self.bounds_size.width - self.content_inset.x_value(),
            self.bounds_size.height - self.content_inset.y_value(),
        );
        if !is_drawable_size(available) {
            return Ok(None);
        }
        let target = target.abs();
        let fit = (available.width / target.width()).min(available.height / target.height());
        let scale = clamp(fit, self.zoom.min_scale, self.zoom.max_scale);

        let current = self.zoom.scale;
        let zoom_in =
            !allow_zoom_out || (scale - current).abs() > (current - self.zoom.min_scale).abs();
        let action = if zoom_in {
            ZoomAction::ZoomToRect {
                rect: target,
                scale,
            }
        } else {
            ZoomAction::ZoomOut {
                scale: self.zoom.min_scale,
            }
        };
        debug!("zoom request {target:?} at scale {current} -> {action:?}");
        Ok(Some(action))
    }

    /// Jumps directly to the end state of `action`.
    ///
    /// Zooming to a rectangle centers it in the bounds; zooming out keeps the
    /// image point at the bounds center as steady as the offset range allows.
    pub fn apply_zoom_action(&mut self, action: ZoomAction) -> Result<(), TilingError> {
        self.ensure_idle("apply_zoom_action")?;
        let focal_point = match action {
            ZoomAction::ZoomToRect { rect, .. } => rect.center(),
            ZoomAction::ZoomOut { .. } => self.view_to_image_point(self.bounds_center()),
        };
        let scale = match action {
            ZoomAction::ZoomToRect { scale, .. } | ZoomAction::ZoomOut { scale } => scale,
        };
        self.zoom.scale = clamp(scale, self.zoom.min_scale, self.zoom.max_scale);
        self.update_content_inset();
        self.center_on_image_point(focal_point);
        Ok(())
    }

    /// Smallest valid content offset.
    #[must_use]
    pub fn minimum_content_offset(&self) -> Point {
        Point::ZERO
    }

    /// Largest valid content offset: content minus bounds, floored at zero.
    #[must_use]
    pub fn maximum_content_offset(&self) -> Point {
        maximum_offset(self.content_size(), self.bounds_size)
    }

    /// Converts a view-space point into image space.
    #[must_use]
    pub fn view_to_image_point(&self, point: Point) -> Point {
        let scale = self.zoom.scale;
        if scale <= 0.0 || !scale.is_finite() {
            return Point::ZERO;
        }
        let inset = Vec2::new(self.content_inset.x0, self.content_inset.y0);
        ((point.to_vec2() + self.content_offset.to_vec2() - inset) / scale).to_point()
    }

    /// Converts an image-space point into view space.
    #[must_use]
    pub fn image_to_view_point(&self, point: Point) -> Point {
        let inset = Vec2::new(self.content_inset.x0, self.content_inset.y0);
        (point.to_vec2() * self.zoom.scale + inset - self.content_offset.to_vec2()).to_point()
    }

    /// Converts an image-space rectangle into view space.
    #[must_use]
    pub fn image_to_view_rect(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.image_to_view_point(rect.origin()),
            self.image_to_view_point(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Image-space rectangle currently visible through the bounds.
    ///
    /// This may extend beyond the image when the content is letterboxed.
    #[must_use]
    pub fn visible_image_rect(&self) -> Rect {
        Rect::from_points(
            self.view_to_image_point(Point::ZERO),
            self.view_to_image_point(self.bounds_size.to_vec2().to_point()),
        )
    }

    /// Snapshot of the controller state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            bounds_size: self.bounds_size,
            content_size: self.content_size(),
            content_offset: self.content_offset,
            content_inset: self.content_inset,
            visible_image_rect: self.visible_image_rect(),
            zoom: self.zoom,
            level_of_detail: self.level_of_detail(),
            width_is_cropped: self.width_is_cropped,
            layout: self.options.layout,
            resizing: self.is_resizing(),
        }
    }

    fn ensure_idle(&self, operation: &str) -> Result<(), TilingError> {
        if self.is_resizing() {
            warn!("{operation} rejected while a resize is in progress");
            return Err(TilingError::ResizeInProgress);
        }
        Ok(())
    }

    fn reset_document(&mut self) {
        self.grid = TileGrid::new(
            self.options.image_size,
            self.options.tile_size,
            self.options.levels_of_detail,
        );
        debug!(
            "document reset: image {:?}, tiles {:?}, {} levels, tiled: {}",
            self.options.image_size,
            self.options.tile_size,
            self.options.levels_of_detail,
            self.grid.is_some()
        );
        self.zoom = ZoomState::default();
        self.content_offset = Point::ZERO;
        self.width_is_cropped = false;
        self.layout_fresh();
    }

    fn layout_fresh(&mut self) {
        self.apply_zoom_bounds();
        if self.options.layout == LayoutMode::Fill {
            self.center(false);
        }
    }

    fn apply_zoom_bounds(&mut self) {
        let image = self.options.image_size;
        if !is_drawable_size(self.bounds_size) || !is_drawable_size(image) {
            debug!(
                "zoom bounds deferred: bounds {:?}, image {image:?}",
                self.bounds_size
            );
            self.after_zoom_change();
            return;
        }
        let x_scale = self.bounds_size.width / image.width;
        let y_scale = self.bounds_size.height / image.height;
        let max_scale = 1.0;
        let min_scale = x_scale.min(y_scale).min(max_scale);

        let (scale, fill_scale) = match self.options.layout {
            LayoutMode::Fit => {
                self.width_is_cropped = false;
                (min_scale, None)
            }
            LayoutMode::Fill => {
                let fill = x_scale.max(y_scale);
                self.width_is_cropped = y_scale > x_scale;
                (clamp(fill, min_scale, max_scale), Some(fill))
            }
        };
        self.zoom = ZoomState {
            scale,
            min_scale,
            max_scale,
            fill_scale,
        };
        debug!("zoom bounds recomputed: {:?}", self.zoom);
        self.after_zoom_change();
    }

    fn after_zoom_change(&mut self) {
        self.update_content_inset();
        self.content_offset =
            clamp_offset(self.content_offset, self.content_size(), self.bounds_size);
    }

    fn update_content_inset(&mut self) {
        let content = self.content_size();
        let bounds = self.bounds_size;
        let left = if content.width < bounds.width {
            (bounds.width - content.width) * 0.5
        } else {
            0.0
        };
        let top = if content.height < bounds.height {
            (bounds.height - content.height) * 0.5
        } else {
            0.0
        };
        self.content_inset = Insets::new(left, top, left, top);
    }

    fn center(&mut self, horizontal_only: bool) {
        let content = self.content_size();
        let bounds = self.bounds_size;
        let offset = Point::new(
            content.width * 0.5 - bounds.width * 0.5,
            if horizontal_only {
                self.content_offset.y
            } else {
                content.height * 0.5 - bounds.height * 0.5
            },
        );
        self.content_offset = clamp_offset(offset, content, bounds);
    }

    fn bounds_center(&self) -> Point {
        (self.bounds_size.to_vec2() * 0.5).to_point()
    }

    fn center_on_image_point(&mut self, focal_point: Point) {
        let inset = Vec2::new(self.content_inset.x0, self.content_inset.y0);
        let offset = focal_point.to_vec2() * self.zoom.scale + inset
            - self.bounds_center().to_vec2();
        self.content_offset = clamp_offset(offset.to_point(), self.content_size(), self.bounds_size);
    }

    fn snapshot(&self) -> ResizeSnapshot {
        let scale_to_restore = if self.zoom.scale <= self.zoom.min_scale + MIN_SCALE_EPSILON {
            RestoreScale::Resting
        } else {
            RestoreScale::Scale(self.zoom.scale)
        };
        ResizeSnapshot {
            focal_point: self.view_to_image_point(self.bounds_center()),
            scale_to_restore,
        }
    }

    fn finish_resize(&mut self) {
        let ResizePhase::Resizing(snapshot) = mem::take(&mut self.phase) else {
            return;
        };
        self.apply_zoom_bounds();
        self.zoom.scale = match snapshot.scale_to_restore {
            RestoreScale::Resting => self.zoom.min_scale,
            RestoreScale::Scale(scale) => clamp(scale, self.zoom.min_scale, self.zoom.max_scale),
        };
        self.update_content_inset();
        self.center_on_image_point(snapshot.focal_point);
        debug!(
            "resize finished: bounds {:?}, scale {}, offset {:?}",
            self.bounds_size, self.zoom.scale, self.content_offset
        );
    }
}

/// Debug snapshot of a [`ViewportController`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Viewport size.
    pub bounds_size: Size,
    /// Image size at the current scale.
    pub content_size: Size,
    /// Current content offset.
    pub content_offset: Point,
    /// Centering inset.
    pub content_inset: Insets,
    /// Image-space rectangle visible through the bounds.
    pub visible_image_rect: Rect,
    /// Zoom scale and bounds.
    pub zoom: ZoomState,
    /// Level of detail selected for the current scale.
    pub level_of_detail: Option<LodSelection>,
    /// Whether fill layout cropped the width.
    pub width_is_cropped: bool,
    /// Layout mode.
    pub layout: LayoutMode,
    /// Whether a resize transaction is open.
    pub resizing: bool,
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size};

    use super::{ResizePhase, RestoreScale, ViewportController, ZoomAction};
    use crate::error::TilingError;
    use crate::options::{LayoutMode, TilingOptions};

    const EPS: f64 = 1e-9;

    fn controller(image: Size, bounds: Size) -> ViewportController {
        let options = TilingOptions::new(image).with_levels_of_detail(4);
        let mut c = ViewportController::new(options);
        c.set_bounds_size(bounds);
        c
    }

    #[test]
    fn empty_bounds_defer_zoom_bounds() {
        let c = ViewportController::new(TilingOptions::new(Size::new(1000.0, 1000.0)));
        let zoom = c.zoom();
        assert_eq!(zoom.scale, 1.0);
        assert!(zoom.min_scale <= zoom.scale && zoom.scale <= zoom.max_scale);
        assert_eq!(c.content_offset(), Point::ZERO);
        assert!(c.content_offset().x.is_finite());
    }

    #[test]
    fn fit_layout_uses_min_scale() {
        let c = controller(Size::new(1000.0, 500.0), Size::new(400.0, 400.0));
        let zoom = c.zoom();
        assert!((zoom.min_scale - 0.4).abs() < EPS);
        assert_eq!(zoom.max_scale, 1.0);
        assert!((zoom.scale - 0.4).abs() < EPS);
        assert!(!c.width_is_cropped());
    }

    #[test]
    fn min_scale_is_capped_at_native() {
        let c = controller(Size::new(100.0, 100.0), Size::new(400.0, 400.0));
        assert_eq!(c.zoom().min_scale, 1.0);
        assert_eq!(c.zoom().scale, 1.0);
    }

    #[test]
    fn fill_layout_crops_width_when_height_drives() {
        let options = TilingOptions::new(Size::new(300.0, 300.0)).with_layout(LayoutMode::Fill);
        let mut c = ViewportController::new(options);
        c.set_bounds_size(Size::new(200.0, 400.0));

        let zoom = c.zoom();
        let fill = zoom.fill_scale.unwrap();
        assert!((fill - 400.0 / 300.0).abs() < EPS);
        assert!((zoom.min_scale - 200.0 / 300.0).abs() < EPS);
        // The applied scale never exceeds native resolution.
        assert_eq!(zoom.scale, 1.0);
        assert!(c.width_is_cropped());
    }

    #[test]
    fn fill_layout_crops_height_when_width_drives() {
        let options =
            TilingOptions::new(Size::new(1000.0, 1000.0)).with_layout(LayoutMode::Fill);
        let mut c = ViewportController::new(options);
        c.set_bounds_size(Size::new(400.0, 200.0));
        assert!((c.zoom_scale() - 0.4).abs() < EPS);
        assert!(!c.width_is_cropped());
        // Fresh fill layouts are centered.
        assert!((c.content_offset().y - 100.0).abs() < EPS);
    }

    #[test]
    fn fill_layout_tie_does_not_crop_width() {
        let options = TilingOptions::new(Size::new(400.0, 400.0)).with_layout(LayoutMode::Fill);
        let mut c = ViewportController::new(options);
        c.set_bounds_size(Size::new(200.0, 200.0));
        assert_eq!(c.zoom().fill_scale, Some(0.5));
        assert!(!c.width_is_cropped());
    }

    #[test]
    fn small_content_gets_centering_inset_and_zero_offset() {
        let mut c = controller(Size::new(1000.0, 500.0), Size::new(400.0, 400.0));
        // Content is 400x200 at the fitted scale.
        let inset = c.content_inset();
        assert_eq!(inset.x0, 0.0);
        assert!((inset.y0 - 100.0).abs() < EPS);
        assert!((inset.y1 - 100.0).abs() < EPS);

        c.set_content_offset(Point::new(50.0, 50.0)).unwrap();
        assert_eq!(c.content_offset(), Point::ZERO);
    }

    #[test]
    fn center_content_horizontal_only_keeps_vertical_offset() {
        let mut c = controller(Size::new(2000.0, 2000.0), Size::new(400.0, 400.0));
        c.set_zoom_scale(0.5).unwrap();
        c.set_content_offset(Point::new(0.0, 123.0)).unwrap();

        c.center_content(true).unwrap();
        assert!((c.content_offset().x - 300.0).abs() < EPS);
        assert!((c.content_offset().y - 123.0).abs() < EPS);

        c.center_content(false).unwrap();
        assert!((c.content_offset().y - 300.0).abs() < EPS);
    }

    #[test]
    fn zoom_scale_is_clamped() {
        let mut c = controller(Size::new(1000.0, 1000.0), Size::new(300.0, 300.0));
        c.set_zoom_scale(5.0).unwrap();
        assert_eq!(c.zoom_scale(), 1.0);
        c.set_zoom_scale(0.01).unwrap();
        assert!((c.zoom_scale() - 0.3).abs() < EPS);
        c.set_zoom_scale(f64::NAN).unwrap();
        assert!((c.zoom_scale() - 0.3).abs() < EPS);
    }

    #[test]
    fn snapshot_records_resting_scale_when_fitted() {
        let mut c = controller(Size::new(1000.0, 1000.0), Size::new(300.0, 300.0));
        c.prepare_to_resize().unwrap();
        let ResizePhase::Resizing(snapshot) = c.phase() else {
            panic!("expected a resize in progress");
        };
        assert_eq!(snapshot.scale_to_restore, RestoreScale::Resting);
        assert!((snapshot.focal_point.x - 500.0).abs() < 1e-6);
        c.recover_from_resizing().unwrap();

        c.set_zoom_scale(0.6).unwrap();
        c.prepare_to_resize().unwrap();
        let ResizePhase::Resizing(snapshot) = c.phase() else {
            panic!("expected a resize in progress");
        };
        assert_eq!(snapshot.scale_to_restore, RestoreScale::Scale(0.6));
    }

    #[test]
    fn fill_layout_at_minimum_survives_unchanged_resize() {
        let options = TilingOptions::new(Size::new(1000.0, 500.0)).with_layout(LayoutMode::Fill);
        let mut c = ViewportController::new(options);
        c.set_bounds_size(Size::new(400.0, 400.0));
        assert!((c.zoom_scale() - 0.8).abs() < EPS);

        // Zoomed out to fit: the resize must not jump back to the cover scale.
        c.set_zoom_scale(0.4).unwrap();
        c.prepare_to_resize().unwrap();
        c.recover_from_resizing().unwrap();

        assert!((c.zoom_scale() - 0.4).abs() < EPS);
        assert_eq!(c.zoom().fill_scale, Some(0.8));
        assert_eq!(c.content_offset(), Point::ZERO);
        assert!((c.content_inset().y0 - 100.0).abs() < EPS);
    }

    #[test]
    fn resize_protocol_rejects_misuse() {
        let mut c = controller(Size::new(1000.0, 1000.0), Size::new(300.0, 300.0));
        assert_eq!(c.recover_from_resizing(), Err(TilingError::NotResizing));

        c.prepare_to_resize().unwrap();
        assert_eq!(c.prepare_to_resize(), Err(TilingError::AlreadyResizing));
        assert_eq!(c.set_zoom_scale(0.5), Err(TilingError::ResizeInProgress));
        assert_eq!(
            c.request_zoom(Rect::new(0.0, 0.0, 10.0, 10.0), true),
            Err(TilingError::ResizeInProgress)
        );
        c.recover_from_resizing().unwrap();
        assert!(!c.is_resizing());
        c.set_zoom_scale(0.5).unwrap();
    }

    #[test]
    fn fitted_view_stays_fitted_across_rotation() {
        let mut c = controller(Size::new(1000.0, 500.0), Size::new(400.0, 800.0));
        assert!((c.zoom_scale() - 0.4).abs() < EPS);

        c.set_bounds_size(Size::new(800.0, 400.0));
        // New minimum is min(0.8, 0.8) = 0.8, not the stale 0.4.
        assert!((c.zoom_scale() - 0.8).abs() < EPS);
        assert_eq!(c.content_offset(), Point::ZERO);
    }

    #[test]
    fn zoomed_view_keeps_focal_point_across_rotation() {
        let mut c = controller(Size::new(2000.0, 2000.0), Size::new(400.0, 600.0));
        c.set_zoom_scale(0.5).unwrap();
        c.set_content_offset(Point::new(200.0, 100.0)).unwrap();
        let focal = c.view_to_image_point(Point::new(200.0, 300.0));

        c.set_bounds_size(Size::new(600.0, 400.0));
        assert!((c.zoom_scale() - 0.5).abs() < EPS);
        let center = c.view_to_image_point(Point::new(300.0, 200.0));
        assert!((center.x - focal.x).abs() < 1e-6);
        assert!((center.y - focal.y).abs() < 1e-6);
    }

    #[test]
    fn zoom_request_outside_image_is_ignored() {
        let mut c = controller(Size::new(1000.0, 1000.0), Size::new(300.0, 300.0));
        c.set_zoom_scale(0.5).unwrap();
        c.set_content_offset(Point::new(40.0, 60.0)).unwrap();
        let before = (c.zoom_scale(), c.content_offset());

        let action = c
            .request_zoom(Rect::new(2000.0, 2000.0, 2100.0, 2100.0), true)
            .unwrap();
        assert_eq!(action, None);
        assert_eq!((c.zoom_scale(), c.content_offset()), before);
    }

    #[test]
    fn zoom_request_toggles_between_target_and_minimum() {
        let mut c = controller(Size::new(1000.0, 1000.0), Size::new(300.0, 300.0));
        let target = Rect::new(100.0, 100.0, 500.0, 700.0);

        // Fitted: zoom in to the rect; the taller axis limits the scale.
        let action = c.request_zoom(target, true).unwrap().unwrap();
        let ZoomAction::ZoomToRect { scale, rect } = action else {
            panic!("expected zoom in, got {action:?}");
        };
        assert_eq!(rect, target);
        assert!((scale - 0.5).abs() < EPS);

        c.apply_zoom_action(action).unwrap();
        assert!((c.zoom_scale() - 0.5).abs() < EPS);
        let center = c.view_to_image_point(Point::new(150.0, 150.0));
        assert!((center.x - 300.0).abs() < 1e-6);
        assert!((center.y - 400.0).abs() < 1e-6);

        // Zoomed in at the target: the same request zooms back out.
        let action = c.request_zoom(target, true).unwrap().unwrap();
        assert_eq!(action, ZoomAction::ZoomOut { scale: 0.3 });

        // Unless zooming out is disallowed.
        let action = c.request_zoom(target, false).unwrap().unwrap();
        assert!(matches!(action, ZoomAction::ZoomToRect { .. }));
    }

    #[test]
    fn zoom_request_fits_into_bounds_minus_inset() {
        // Content is 400x200 at the fitted scale, letterboxed by 100 above
        // and below, so only 400x200 is available.
        let c = controller(Size::new(1000.0, 500.0), Size::new(400.0, 400.0));
        assert!((c.content_inset().y0 - 100.0).abs() < EPS);

        let target = Rect::new(0.0, 0.0, 250.0, 250.0);
        let action = c.request_zoom(target, true).unwrap().unwrap();
        let ZoomAction::ZoomToRect { scale, .. } = action else {
            panic!("expected zoom in, got {action:?}");
        };
        // min(400 / 250, 200 / 250), not the 1.0 the raw bounds would allow.
        assert!((scale - 0.8).abs() < EPS);
    }

    #[test]
    fn zoom_request_caps_at_native_scale() {
        let c = controller(Size::new(1000.0, 1000.0), Size::new(300.0, 300.0));
        let action = c
            .request_zoom(Rect::new(0.0, 0.0, 10.0, 10.0), true)
            .unwrap()
            .unwrap();
        assert_eq!(
            action,
            ZoomAction::ZoomToRect {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                scale: 1.0
            }
        );
    }

    #[test]
    fn reconfigure_resets_only_on_document_change() {
        let options = TilingOptions::new(Size::new(1000.0, 1000.0)).with_levels_of_detail(3);
        let mut c = ViewportController::new(options);
        c.set_bounds_size(Size::new(300.0, 300.0));
        c.set_zoom_scale(0.8).unwrap();
        c.set_content_offset(Point::new(100.0, 100.0)).unwrap();

        c.reconfigure(options.with_tiling_enabled(false)).unwrap();
        assert!((c.zoom_scale() - 0.8).abs() < EPS);
        assert_eq!(c.content_offset(), Point::new(100.0, 100.0));

        c.set_image_size(Size::new(600.0, 300.0)).unwrap();
        assert!((c.zoom_scale() - 0.5).abs() < EPS);
        assert_eq!(c.content_offset(), Point::ZERO);
        assert_eq!(c.grid().unwrap().image_size(), Size::new(600.0, 300.0));
    }

    #[test]
    fn degenerate_documents_have_no_grid() {
        let c = controller(Size::new(1000.0, 1000.0), Size::new(300.0, 300.0));
        assert!(c.grid().is_some());

        let c = ViewportController::new(TilingOptions::new(Size::new(1000.0, 1000.0)));
        assert!(c.grid().is_none());
        assert_eq!(c.level_of_detail(), None);

        let c = controller(Size::ZERO, Size::new(300.0, 300.0));
        assert!(c.grid().is_none());
        assert_eq!(c.zoom_scale(), 1.0);
        assert_eq!(c.content_offset(), Point::ZERO);
    }
}
