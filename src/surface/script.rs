/// Stroke scripts: recorded pointer strokes that can be replayed onto a canvas

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::canvas::Canvas;
use super::stroke::Point;
use super::style::DrawStyle;
use super::SurfaceMetrics;
use crate::{Error, Result};

/// One pointer-down..pointer-up gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedStroke {
    #[serde(flatten)]
    pub style: DrawStyle,
    pub points: Vec<Point>,
}

/// A surface description plus the strokes drawn on it
///
/// ```
/// let script = scribblegen::StrokeScript::from_json(r##"{
///     "surface": { "width": 64, "height": 64, "dpr": 2 },
///     "strokes": [ { "color": "#000", "width": 4, "points": [[8, 8], [56, 56]] } ]
/// }"##).unwrap();
/// let canvas = script.replay().unwrap();
/// assert_eq!(canvas.backing_size(), (128, 128));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeScript {
    #[serde(default)]
    pub surface: SurfaceMetrics,
    #[serde(default)]
    pub strokes: Vec<ScriptedStroke>,
}

impl StrokeScript {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Invalid stroke script: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Cannot read stroke script {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Draw every stroke onto a fresh canvas sized by `surface`
    pub fn replay(&self) -> Result<Canvas> {
        let mut canvas = Canvas::new(self.surface)?;
        self.replay_onto(&mut canvas);
        Ok(canvas)
    }

    /// Draw every stroke onto an existing canvas, as pointer events would
    pub fn replay_onto(&self, canvas: &mut Canvas) {
        for stroke in &self.strokes {
            let mut points = stroke.points.iter().copied();
            let Some(first) = points.next() else { continue };
            canvas.begin_stroke(first, stroke.style);
            for p in points {
                canvas.extend_stroke(p);
            }
            canvas.end_stroke();
        }
    }
}
