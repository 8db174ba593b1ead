//! The external synthesis service seam
//!
//! The orchestrator only knows the [`SynthesisService`] trait. The HTTP
//! implementation posts `{image, prompt}` as JSON to a forwarding route and
//! hands the reply to [`parse_reply`](super::response::parse_reply).

use std::sync::Arc;

use futures::future::BoxFuture;

use super::request::GenerationRequest;
use super::response::GeneratedImage;
use crate::Result;

/// Remote procedure turning an image + prompt into a generated image
pub trait SynthesisService: Send + Sync {
    /// Perform exactly one outbound call. Implementations must not retry.
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'static, Result<GeneratedImage>>;
}

impl<S: SynthesisService + ?Sized> SynthesisService for Arc<S> {
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'static, Result<GeneratedImage>> {
        (**self).generate(request)
    }
}

impl<S: SynthesisService + ?Sized> SynthesisService for Box<S> {
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'static, Result<GeneratedImage>> {
        (**self).generate(request)
    }
}

#[cfg(feature = "http")]
pub use http::HttpSynthesisService;

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use futures::future::{BoxFuture, FutureExt};
    use log::{debug, warn};
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use reqwest::Client;

    use super::SynthesisService;
    use crate::orchestrator::request::GenerationRequest;
    use crate::orchestrator::response::{parse_reply, GeneratedImage};
    use crate::{Error, Result, ServiceConfig};

    /// Posts generation requests to an HTTP endpoint
    #[derive(Debug, Clone)]
    pub struct HttpSynthesisService {
        client: Client,
        endpoint: String,
    }

    impl HttpSynthesisService {
        pub fn new(config: ServiceConfig) -> Result<Self> {
            let endpoint = config.validate()?;

            let mut headers = HeaderMap::new();
            for (k, v) in &config.headers {
                let name = HeaderName::from_bytes(k.as_bytes())
                    .map_err(|e| Error::ConfigError(format!("Invalid header name '{}': {}", k, e)))?;
                let value = HeaderValue::from_str(v)
                    .map_err(|e| Error::ConfigError(format!("Invalid header value for '{}': {}", k, e)))?;
                headers.insert(name, value);
            }

            let client = Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .user_agent(config.user_agent.clone())
                .default_headers(headers)
                .build()
                .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

            Ok(Self {
                client,
                endpoint: endpoint.to_string(),
            })
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    impl SynthesisService for HttpSynthesisService {
        fn generate(&self, request: GenerationRequest) -> BoxFuture<'static, Result<GeneratedImage>> {
            let client = self.client.clone();
            let endpoint = self.endpoint.clone();
            async move {
                debug!("POST {} ({} byte image)", endpoint, request.image().len());
                let res = client
                    .post(&endpoint)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| {
                        warn!("request to {} failed: {}", endpoint, e);
                        Error::TransportError(format!("POST {} failed: {}", endpoint, e))
                    })?;

                let status = res.status().as_u16();
                let body = res
                    .text()
                    .await
                    .map_err(|e| Error::TransportError(format!("Failed to read response body: {}", e)))?;
                debug!("{} answered {} ({} bytes)", endpoint, status, body.len());
                parse_reply(status, &body)
            }
            .boxed()
        }
    }
}
