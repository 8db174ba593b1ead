//! Request payloads: uploaded images, data URIs and the generation request body

use std::path::Path;

use base64::Engine as Base64Engine;
use serde::Serialize;

use crate::{Error, Result};

/// Encode bytes as a self-contained `data:<mime>;base64,...` URI
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, b64)
}

/// A raster image the user picked instead of drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Wrap uploaded bytes, sniffing the raster format from their contents
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if bytes.is_empty() {
            return Err(Error::InvalidUpload(format!("'{}' is empty", name)));
        }
        let format = image::guess_format(&bytes).map_err(|_| {
            Error::InvalidUpload(format!("'{}' is not a recognised image format", name))
        })?;
        Ok(Self {
            name,
            mime: format.to_mime_type().to_string(),
            bytes,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::InvalidUpload(format!("Cannot read {}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, bytes)
    }

    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.mime, &self.bytes)
    }
}

/// Where the submitted image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Upload,
    Sketch,
}

/// Body posted to the synthesis service. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    image: String,
    prompt: String,
    #[serde(skip)]
    source: ImageSource,
}

impl GenerationRequest {
    /// Build a request; the prompt is trimmed and must not be empty
    pub fn new(image: String, prompt: &str, source: ImageSource) -> Result<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::EmptyPrompt);
        }
        if image.is_empty() {
            return Err(Error::NoImageSource);
        }
        Ok(Self {
            image,
            prompt: prompt.to_string(),
            source,
        })
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn source(&self) -> ImageSource {
        self.source
    }
}
