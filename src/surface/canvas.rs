//! tiny-skia backed drawing surface
//!
//! The canvas keeps a backing pixmap of `logical size × device pixel ratio`
//! device pixels and a scale transform, so callers always speak logical
//! coordinates while strokes rasterize at full device resolution.

use log::debug;
use sha2::{Digest, Sha256};
use tiny_skia::{Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::stroke::{Point, StrokeOp, StrokeSession};
use super::style::{DrawStyle, PenColor};
use super::{DrawSurface, Snapshot, SurfaceMetrics};
use crate::{Error, Result};

/// Segments shorter than this (logical px) are drawn as dots
const MIN_SEGMENT_LENGTH: f32 = 1e-3;

/// A raster drawing surface with its own stroke session
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    metrics: SurfaceMetrics,
    transform: Transform,
    session: StrokeSession,
    style: DrawStyle,
}

impl Canvas {
    /// Create a surface sized for `metrics` with the default pen
    pub fn new(metrics: SurfaceMetrics) -> Result<Self> {
        Self::with_style(metrics, DrawStyle::default())
    }

    pub fn with_style(metrics: SurfaceMetrics, style: DrawStyle) -> Result<Self> {
        let (pixmap, transform) = allocate(&metrics)?;
        Ok(Self {
            pixmap,
            metrics,
            transform,
            session: StrokeSession::new(),
            style: style.normalized(),
        })
    }

    /// Re-derive the backing store from a new layout box and pixel ratio.
    ///
    /// When the backing geometry changes the pixmap is reallocated and prior
    /// strokes are lost. Identical geometry keeps the pixels. An active
    /// stroke survives and continues on the new buffer.
    pub fn resize(&mut self, metrics: SurfaceMetrics) -> Result<()> {
        let same_geometry = metrics.backing_size() == self.backing_size()
            && metrics.effective_ratio() == self.metrics.effective_ratio();
        if same_geometry {
            self.metrics = metrics;
            return Ok(());
        }

        let (pixmap, transform) = allocate(&metrics)?;
        debug!(
            "canvas resized: {}x{} logical @{} -> {}x{} device",
            metrics.width,
            metrics.height,
            metrics.effective_ratio(),
            pixmap.width(),
            pixmap.height()
        );
        self.pixmap = pixmap;
        self.transform = transform;
        self.metrics = metrics;
        Ok(())
    }

    pub fn metrics(&self) -> SurfaceMetrics {
        self.metrics
    }

    /// Backing-store size in device pixels
    pub fn backing_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Pen used by the next stroke
    pub fn style(&self) -> DrawStyle {
        self.style
    }

    /// Change the pen for subsequent strokes; rendered pixels are untouched
    pub fn set_style(&mut self, style: DrawStyle) {
        self.style = style.normalized();
    }

    pub fn session(&self) -> &StrokeSession {
        &self.session
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_active()
    }

    /// Start a stroke at `at` with an explicit style
    pub fn begin_stroke(&mut self, at: Point, style: DrawStyle) {
        let op = self.session.begin(at, style);
        self.apply(op);
    }

    /// Start a stroke at `at` with the current pen
    pub fn pointer_down(&mut self, at: Point) {
        self.begin_stroke(at, self.style);
    }

    /// Draw from the last point to `to`; ignored when no stroke is active
    pub fn extend_stroke(&mut self, to: Point) {
        let op = self.session.extend(to);
        self.apply(op);
    }

    /// Finish the active stroke (pointer-up and pointer-leave both land here)
    pub fn end_stroke(&mut self) {
        let op = self.session.end();
        self.apply(op);
    }

    /// Color of a device pixel, un-premultiplied
    pub fn pixel(&self, x: u32, y: u32) -> Option<PenColor> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            PenColor::rgba(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Raw premultiplied RGBA bytes of the backing store
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    fn apply(&mut self, op: Option<StrokeOp>) {
        match op {
            Some(StrokeOp::Segment { from, to, style }) => {
                let (dx, dy) = (to.x - from.x, to.y - from.y);
                if (dx * dx + dy * dy).sqrt() < MIN_SEGMENT_LENGTH {
                    self.render_dot(to, style);
                } else {
                    self.render_segment(from, to, style);
                }
            }
            Some(StrokeOp::Dot { at, style }) => self.render_dot(at, style),
            None => {}
        }
    }

    fn render_segment(&mut self, from: Point, to: Point, style: DrawStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);

        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: style.width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint_for(style), &stroke, self.transform, None);
        }
    }

    fn render_dot(&mut self, at: Point, style: DrawStyle) {
        if let Some(path) = PathBuilder::from_circle(at.x, at.y, style.width / 2.0) {
            self.pixmap.fill_path(
                &path,
                &paint_for(style),
                FillRule::Winding,
                self.transform,
                None,
            );
        }
    }
}

impl DrawSurface for Canvas {
    fn export_snapshot(&self) -> Result<Snapshot> {
        let png_data = self
            .pixmap
            .encode_png()
            .map_err(|e| Error::RenderError(format!("PNG encoding failed: {}", e)))?;
        let fingerprint = hex::encode(Sha256::digest(self.pixmap.data()));
        debug!(
            "exported snapshot {}x{} ({} bytes, {})",
            self.pixmap.width(),
            self.pixmap.height(),
            png_data.len(),
            &fingerprint[..12]
        );
        Ok(Snapshot {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            png_data,
            fingerprint,
            blank: DrawSurface::is_blank(self),
        })
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }
}

fn allocate(metrics: &SurfaceMetrics) -> Result<(Pixmap, Transform)> {
    let (w, h) = metrics.checked_backing_size()?;
    let pixmap = Pixmap::new(w, h)
        .ok_or_else(|| Error::RenderError(format!("Cannot allocate a {}x{} surface", w, h)))?;
    let ratio = metrics.effective_ratio();
    Ok((pixmap, Transform::from_scale(ratio, ratio)))
}

fn paint_for(style: DrawStyle) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(style.color.to_skia());
    paint.anti_alias = true;
    paint
}
