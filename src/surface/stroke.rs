//! Pointer stroke state machine
//!
//! A stroke session runs from pointer-down to pointer-up (or pointer-leave).
//! Transitions never touch pixels; they return the [`StrokeOp`] the canvas
//! should rasterize, so the `Idle -> Drawing -> Idle` contract can be tested
//! without a surface.

use serde::{Deserialize, Serialize};

use super::style::DrawStyle;

/// A point in logical (layout) pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f32; 2]> for Point {
    fn from(p: [f32; 2]) -> Self {
        Point::new(p[0], p[1])
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f32, f32)> for Point {
    fn from(p: (f32, f32)) -> Self {
        Point::new(p.0, p.1)
    }
}

/// Data carried while a stroke is in progress
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStroke {
    /// Style captured at pointer-down; later style changes do not apply
    pub style: DrawStyle,
    pub last: Point,
    pub segments: usize,
}

/// Rasterization work produced by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeOp {
    /// Round-capped line from `from` to `to`
    Segment {
        from: Point,
        to: Point,
        style: DrawStyle,
    },
    /// A tap without movement leaves a dot of the brush diameter
    Dot { at: Point, style: DrawStyle },
}

/// Per-surface stroke session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StrokeSession {
    #[default]
    Idle,
    Drawing(ActiveStroke),
}

impl StrokeSession {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_active(&self) -> bool {
        matches!(self, StrokeSession::Drawing(_))
    }

    pub fn last_point(&self) -> Option<Point> {
        match self {
            StrokeSession::Drawing(s) => Some(s.last),
            StrokeSession::Idle => None,
        }
    }

    /// Pointer-down. A pointer-down while already drawing ends the current
    /// stroke first and starts a fresh one at `at`; the op returned is the
    /// implicit end of the previous stroke, if it produced any.
    ///
    /// Non-finite points leave the session untouched.
    pub fn begin(&mut self, at: Point, style: DrawStyle) -> Option<StrokeOp> {
        if !at.is_finite() {
            return None;
        }
        let finished = self.end();
        *self = StrokeSession::Drawing(ActiveStroke {
            style: style.normalized(),
            last: at,
            segments: 0,
        });
        finished
    }

    /// Pointer-move. No-op when idle.
    pub fn extend(&mut self, to: Point) -> Option<StrokeOp> {
        if !to.is_finite() {
            return None;
        }
        match self {
            StrokeSession::Idle => None,
            StrokeSession::Drawing(active) => {
                let from = active.last;
                active.last = to;
                active.segments += 1;
                Some(StrokeOp::Segment {
                    from,
                    to,
                    style: active.style,
                })
            }
        }
    }

    /// Pointer-up or pointer-leave. Safe to call while idle.
    pub fn end(&mut self) -> Option<StrokeOp> {
        match std::mem::take(self) {
            StrokeSession::Idle => None,
            StrokeSession::Drawing(active) if active.segments == 0 => Some(StrokeOp::Dot {
                at: active.last,
                style: active.style,
            }),
            StrokeSession::Drawing(_) => None,
        }
    }
}
