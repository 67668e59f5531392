//! Zoom and pan for the lightbox.
//!
//! The lightbox renders a crop of the source image; this module decides
//! which crop.  Pan offsets are fractions of the image (0.0 = left/top
//! edge of the crop at the image edge) so they survive terminal resizes.

pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 8.0;
const STEP: f64 = 1.25;
/// Fraction of the visible window moved per pan step.
const PAN_STEP: f64 = 0.2;

/// Crop rectangle in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    scale: f64,
    /// Centre of the crop as a fraction of the image, 0.0..=1.0.
    center_x: f64,
    center_y: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: MIN_SCALE,
            center_x: 0.5,
            center_y: 0.5,
        }
    }
}

impl ZoomState {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_zoomed(&self) -> bool {
        self.scale > MIN_SCALE
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale * STEP).min(MAX_SCALE);
        self.clamp_center();
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale / STEP).max(MIN_SCALE);
        self.clamp_center();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Pan by whole steps (`dx`/`dy` of -1, 0, 1 from the arrow keys).
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let span = 1.0 / self.scale;
        self.center_x += f64::from(dx) * span * PAN_STEP;
        self.center_y += f64::from(dy) * span * PAN_STEP;
        self.clamp_center();
    }

    /// The crop of a `width × height` image currently in view.
    pub fn visible_window(&self, width: u32, height: u32) -> Window {
        let crop_w = ((f64::from(width) / self.scale).round() as u32).clamp(1, width.max(1));
        let crop_h = ((f64::from(height) / self.scale).round() as u32).clamp(1, height.max(1));
        let x = (self.center_x * f64::from(width) - f64::from(crop_w) / 2.0).round().max(0.0) as u32;
        let y = (self.center_y * f64::from(height) - f64::from(crop_h) / 2.0).round().max(0.0) as u32;
        Window {
            x: x.min(width.saturating_sub(crop_w)),
            y: y.min(height.saturating_sub(crop_h)),
            width: crop_w,
            height: crop_h,
        }
    }

    fn clamp_center(&mut self) {
        // Keep the crop inside the image: the centre can move at most half
        // a crop-width away from either edge.
        let half = 0.5 / self.scale;
        self.center_x = self.center_x.clamp(half, 1.0 - half);
        self.center_y = self.center_y.clamp(half, 1.0 - half);
    }
}
