//! Request orchestration: pick an image source, call the synthesis service,
//! and track the request lifecycle.
//!
//! Submission is split in three steps so an event loop can keep handling
//! pointer events while the call is outstanding:
//!
//! 1. [`Orchestrator::prepare`] resolves the image, validates the prompt and
//!    moves the state to `Pending`
//! 2. [`Orchestrator::dispatch`] starts the single outbound call
//! 3. [`Orchestrator::settle`] records the outcome
//!
//! [`Orchestrator::submit`] runs all three in sequence.

pub mod request;
pub mod response;
pub mod service;
pub mod state;

pub use request::{encode_data_uri, GenerationRequest, ImageSource, ImageUpload};
pub use response::{parse_reply, GeneratedImage};
#[cfg(feature = "http")]
pub use service::HttpSynthesisService;
pub use service::SynthesisService;
pub use state::{Failure, FailureKind, GenerationState};

use futures::future::BoxFuture;
use log::{info, warn};

use crate::surface::DrawSurface;
use crate::{Error, Result};

/// Owns the generation state and the service handle
pub struct Orchestrator<S> {
    service: S,
    upload: Option<ImageUpload>,
    state: GenerationState,
    dispatched: u64,
}

impl<S: SynthesisService> Orchestrator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            upload: None,
            state: GenerationState::Idle,
            dispatched: 0,
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Number of outbound calls started so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Use an uploaded file instead of the sketch for the next submissions
    pub fn select_upload(&mut self, upload: ImageUpload) {
        info!("selected upload '{}' ({}, {} bytes)", upload.name, upload.mime, upload.bytes.len());
        self.upload = Some(upload);
    }

    /// Go back to submitting the sketch
    pub fn clear_upload(&mut self) -> Option<ImageUpload> {
        self.upload.take()
    }

    pub fn upload(&self) -> Option<&ImageUpload> {
        self.upload.as_ref()
    }

    /// The image payload for the next request: the upload when one is
    /// selected, otherwise a snapshot of `surface`. A blank sketch does not
    /// count as an image.
    pub fn resolve_image_source<D>(&self, surface: &D) -> Result<(String, ImageSource)>
    where
        D: DrawSurface + ?Sized,
    {
        if let Some(upload) = &self.upload {
            return Ok((upload.to_data_uri(), ImageSource::Upload));
        }
        if surface.is_blank() {
            return Err(Error::NoImageSource);
        }
        let snapshot = surface.export_snapshot()?;
        Ok((snapshot.to_data_uri(), ImageSource::Sketch))
    }

    /// Validate and build the request, moving to `Pending`.
    ///
    /// Rejected while a request is pending, leaving that request untouched.
    /// Any other rejection records `Failed` and nothing is sent.
    pub fn prepare<D>(&mut self, prompt: &str, surface: &D) -> Result<GenerationRequest>
    where
        D: DrawSurface + ?Sized,
    {
        if self.state.is_pending() {
            return Err(Error::AlreadyPending);
        }

        let built = self
            .resolve_image_source(surface)
            .and_then(|(image, source)| GenerationRequest::new(image, prompt, source));

        match built {
            Ok(request) => {
                self.state = GenerationState::Pending;
                Ok(request)
            }
            Err(e) => {
                warn!("submission rejected: {}", e);
                self.state = GenerationState::Failed(Failure::from(&e));
                Err(e)
            }
        }
    }

    /// Start the outbound call for a prepared request
    pub fn dispatch(&mut self, request: GenerationRequest) -> BoxFuture<'static, Result<GeneratedImage>> {
        self.dispatched += 1;
        info!(
            "dispatching generation #{} from {:?} (prompt: {:?})",
            self.dispatched,
            request.source(),
            request.prompt()
        );
        self.service.generate(request)
    }

    /// Record the outcome of the outstanding call.
    ///
    /// Outcomes arriving while nothing is pending are ignored so a stale
    /// reply cannot overwrite the display slot.
    pub fn settle(&mut self, outcome: Result<GeneratedImage>) -> &GenerationState {
        if !self.state.is_pending() {
            warn!("ignoring settlement with no pending request");
            return &self.state;
        }
        self.state = match outcome {
            Ok(image) => {
                info!("generation succeeded: {}", image.url);
                GenerationState::Succeeded(image)
            }
            Err(e) => {
                warn!("generation failed: {}", e);
                GenerationState::Failed(Failure::from(&e))
            }
        };
        &self.state
    }

    /// Give up on the outstanding call without waiting for its reply.
    ///
    /// Records `Failed(TransportError)` so submission is available again.
    /// A no-op when nothing is pending.
    pub fn abandon(&mut self) -> &GenerationState {
        if self.state.is_pending() {
            self.settle(Err(Error::TransportError("request abandoned".into())));
        }
        &self.state
    }

    /// Prepare, dispatch and settle one request.
    ///
    /// Dropping the returned future before it completes abandons the call.
    pub async fn submit<D>(&mut self, prompt: &str, surface: &D) -> Result<GeneratedImage>
    where
        D: DrawSurface + ?Sized,
    {
        let request = self.prepare(prompt, surface)?;
        let call = self.dispatch(request);
        let guard = SettleGuard { orchestrator: Some(self) };
        let outcome = call.await;
        guard.finish(outcome.clone());
        outcome
    }
}

/// Abandons the pending request unless the call ran to completion
struct SettleGuard<'a, S: SynthesisService> {
    orchestrator: Option<&'a mut Orchestrator<S>>,
}

impl<S: SynthesisService> SettleGuard<'_, S> {
    fn finish(mut self, outcome: Result<GeneratedImage>) {
        if let Some(orchestrator) = self.orchestrator.take() {
            orchestrator.settle(outcome);
        }
    }
}

impl<S: SynthesisService> Drop for SettleGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(orchestrator) = self.orchestrator.take() {
            warn!("generation dropped before completion");
            orchestrator.abandon();
        }
    }
}
