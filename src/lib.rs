//! Scribblegen
//!
//! A sketch-to-image toolkit: a HiDPI drawing surface the user paints into
//! with pointer strokes, and a request orchestrator that submits the sketch
//! (or an uploaded image) with a text prompt to an image-to-image synthesis
//! service and tracks the result.
//!
//! # Features
//!
//! - **Crisp surface**: the backing store follows the device pixel ratio
//!   while callers speak logical coordinates
//! - **Explicit lifecycle**: `Idle -> Pending -> Succeeded | Failed`, one
//!   request in flight at a time
//! - **HTTP backend** (default `http` feature): posts `{image, prompt}` JSON
//!   to a forwarding route
//!
//! # Example
//!
//! ```no_run
//! use scribblegen::{Canvas, Point, ServiceConfig, SurfaceConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SurfaceConfig::default();
//! let mut canvas = Canvas::with_style(config.metrics, config.style)?;
//! canvas.pointer_down(Point::new(40.0, 40.0));
//! canvas.extend_stroke(Point::new(200.0, 180.0));
//! canvas.end_stroke();
//!
//! let mut orchestrator = scribblegen::new_http_orchestrator(ServiceConfig::default())?;
//! let image = orchestrator.submit("a glowing sword", &canvas).await?;
//! println!("Generated: {}", image.url);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod orchestrator;
pub mod surface;

// Event loop owning a canvas and an orchestrator
pub mod async_api;

pub use async_api::Studio;
pub use orchestrator::{
    Failure, FailureKind, GeneratedImage, GenerationRequest, GenerationState, ImageSource,
    ImageUpload, Orchestrator, SynthesisService, parse_reply,
};
#[cfg(feature = "http")]
pub use orchestrator::HttpSynthesisService;
pub use surface::{
    Canvas, DrawStyle, DrawSurface, PenColor, Point, Snapshot, StrokeScript, SurfaceMetrics,
};

/// Endpoint the original web front end posted to
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/genWeapon";

/// Configuration for the outbound synthesis call
///
/// # Examples
///
/// ```
/// let cfg = scribblegen::ServiceConfig::default();
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.timeout_ms, 120_000);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// URL of the route forwarding to the synthesis provider
    pub endpoint: String,
    /// Whole-request timeout in milliseconds; generations are slow
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Extra HTTP headers
    pub headers: HashMap<String, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 120_000,
            user_agent: format!("scribblegen/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
        }
    }
}

impl ServiceConfig {
    /// Check the endpoint is an absolute http(s) URL and the timeout non-zero
    pub fn validate(&self) -> Result<url::Url> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| Error::ConfigError(format!("Invalid endpoint '{}': {}", self.endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigError(format!(
                "Endpoint must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_ms == 0 {
            return Err(Error::ConfigError("timeout_ms must be greater than zero".into()));
        }
        Ok(url)
    }
}

/// Initial geometry and pen of a drawing surface
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceConfig {
    pub metrics: SurfaceMetrics,
    pub style: DrawStyle,
}

/// Create an orchestrator backed by the HTTP synthesis service
#[cfg(feature = "http")]
pub fn new_http_orchestrator(config: ServiceConfig) -> Result<Orchestrator<HttpSynthesisService>> {
    Ok(Orchestrator::new(HttpSynthesisService::new(config)?))
}
