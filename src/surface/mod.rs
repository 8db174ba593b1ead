//! Drawing surface: a HiDPI raster buffer painted by pointer strokes

pub mod canvas;
pub mod script;
pub mod stroke;
pub mod style;

pub use canvas::Canvas;
pub use script::{ScriptedStroke, StrokeScript};
pub use stroke::{ActiveStroke, Point, StrokeOp, StrokeSession};
pub use style::{DrawStyle, PenColor};

use crate::{Error, Result};

/// Largest backing-store side, in device pixels
pub const MAX_BACKING_DIMENSION: u32 = 16_384;

/// Layout box of the surface plus the display's device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceMetrics {
    /// Logical (CSS) width
    pub width: f32,
    /// Logical (CSS) height
    pub height: f32,
    #[serde(default = "default_dpr", alias = "dpr")]
    pub device_pixel_ratio: f32,
}

fn default_dpr() -> f32 {
    1.0
}

impl SurfaceMetrics {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Ratio actually used for scaling; unusable values fall back to 1.0
    pub fn effective_ratio(&self) -> f32 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    /// Backing-store size in device pixels (never smaller than 1x1)
    pub fn backing_size(&self) -> (u32, u32) {
        let ratio = self.effective_ratio();
        let scale = |v: f32| {
            let v = if v.is_finite() { v.max(0.0) } else { 0.0 };
            ((v * ratio).round() as u32).max(1)
        };
        (scale(self.width), scale(self.height))
    }

    /// [`backing_size`](Self::backing_size), rejecting sides above
    /// [`MAX_BACKING_DIMENSION`]
    pub fn checked_backing_size(&self) -> Result<(u32, u32)> {
        let (w, h) = self.backing_size();
        if w > MAX_BACKING_DIMENSION || h > MAX_BACKING_DIMENSION {
            return Err(Error::RenderError(format!(
                "{}x{} device pixels exceeds the {} px limit per side",
                w, h, MAX_BACKING_DIMENSION
            )));
        }
        Ok((w, h))
    }
}

impl Default for SurfaceMetrics {
    fn default() -> Self {
        Self {
            width: 384.0,
            height: 384.0,
            device_pixel_ratio: 1.0,
        }
    }
}

/// An encoded image of the surface at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
    pub png_data: Vec<u8>,
    /// Hex SHA-256 of the raw RGBA pixels
    pub fingerprint: String,
    /// True when no pixel carries any coverage
    pub blank: bool,
}

impl Snapshot {
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// Self-contained `data:image/png;base64,...` payload
    pub fn to_data_uri(&self) -> String {
        crate::orchestrator::request::encode_data_uri("image/png", &self.png_data)
    }
}

/// Imperative handle a parent controller holds on a drawing surface
pub trait DrawSurface {
    /// Encode the committed buffer contents
    fn export_snapshot(&self) -> Result<Snapshot>;

    /// Erase everything, keeping dimensions
    fn clear(&mut self);

    /// Whether nothing has been drawn since the last clear or reallocation
    fn is_blank(&self) -> bool;
}
