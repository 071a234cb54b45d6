//! Pan/zoom state of the canvas.
//!
//! The whole content layer moves as one: every content-space point `p` is
//! drawn at `offset + p * scale`, i.e. translate then scale.

use crate::config::ScaleBounds;
use crate::geometry::{bounding_box, Rect, Size};
use serde::{Deserialize, Serialize};

/// Persisted camera of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewState {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewState {
    pub fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.offset_x.is_finite() && self.offset_y.is_finite()
    }

    /// Finite with a positive scale; anything else cannot be drawn.
    pub fn is_usable(&self) -> bool {
        self.is_finite() && self.scale > 0.0
    }

    /// Step the scale by `delta`, clamped to `bounds`. The pan origin is kept,
    /// so zoom is not anchored at the pointer.
    ///
    /// A non-finite `delta` is ignored and `false` returned.
    pub fn zoom(&mut self, delta: f32, bounds: ScaleBounds) -> bool {
        if !delta.is_finite() {
            return false;
        }
        self.scale = bounds.clamp(self.scale + delta);
        true
    }

    /// Set the offsets absolutely. Non-finite offsets are ignored.
    pub fn pan(&mut self, offset_x: f32, offset_y: f32) -> bool {
        if !(offset_x.is_finite() && offset_y.is_finite()) {
            return false;
        }
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Scale and center so every content box fits in the viewport.
    ///
    /// `boxes` are in content space. The scale leaves `padding` free along
    /// each axis and is clamped to `bounds`. An axis with no extent does not
    /// constrain the scale. Returns `false` when there is nothing to fit.
    pub fn fit_to_content<I>(&mut self, boxes: I, viewport: Size, padding: f32, bounds: ScaleBounds) -> bool
    where
        I: IntoIterator<Item = Rect>,
    {
        let Some(bbox) = bounding_box(boxes) else {
            return false;
        };
        let axis_scale = |available: f32, extent: f32| {
            if extent > 0.0 {
                (available - padding) / extent
            } else {
                f32::INFINITY
            }
        };
        let scale_x = axis_scale(viewport.width, bbox.width);
        let scale_y = axis_scale(viewport.height, bbox.height);
        let scale = bounds.clamp(scale_x.min(scale_y));

        let (center_x, center_y) = bbox.center();
        let (view_cx, view_cy) = viewport.center();
        self.scale = scale;
        self.offset_x = view_cx - center_x * scale;
        self.offset_y = view_cy - center_y * scale;
        true
    }

    /// Nudge the offsets so `screen_box` (viewport-local, already
    /// transformed) ends up centered in the viewport.
    pub fn center_on(&mut self, screen_box: Rect, viewport: Size) {
        let (view_cx, view_cy) = viewport.center();
        let (box_cx, box_cy) = screen_box.center();
        self.offset_x += view_cx - box_cx;
        self.offset_y += view_cy - box_cy;
    }

    pub fn transform(&self) -> Transform {
        Transform {
            translate_x: self.offset_x,
            translate_y: self.offset_y,
            scale: self.scale,
        }
    }
}

/// Affine `translate(translate_x, translate_y) ∘ scale(scale)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        ViewState::default().transform()
    }
}

impl Transform {
    /// Content space to viewport space.
    pub fn apply_point(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.translate_x, y * self.scale + self.translate_y)
    }

    pub fn apply_rect(&self, rect: Rect) -> Rect {
        let (x, y) = self.apply_point(rect.x, rect.y);
        Rect::new(x, y, rect.width * self.scale, rect.height * self.scale)
    }

    /// Viewport space back to content space.
    pub fn invert_rect(&self, rect: Rect) -> Rect {
        let s = if self.scale > 0.0 { self.scale } else { 1.0 };
        Rect::new(
            (rect.x - self.translate_x) / s,
            (rect.y - self.translate_y) / s,
            rect.width / s,
            rect.height / s,
        )
    }
}

/// An in-progress drag of the canvas.
///
/// The anchor is the pointer position minus the offsets at pointer-down, so
/// the content under the pointer stays under it for the whole drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanSession {
    anchor_x: f32,
    anchor_y: f32,
}

impl PanSession {
    pub fn begin(view: &ViewState, pointer_x: f32, pointer_y: f32) -> Self {
        Self {
            anchor_x: pointer_x - view.offset_x,
            anchor_y: pointer_y - view.offset_y,
        }
    }

    /// Offsets that keep the anchor under the pointer.
    pub fn offsets_for(&self, pointer_x: f32, pointer_y: f32) -> (f32, f32) {
        (pointer_x - self.anchor_x, pointer_y - self.anchor_y)
    }
}
