//! Shared fakes for integration tests

#![allow(dead_code)]

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt};
use scribblegen::{Error, GeneratedImage, GenerationRequest, Result, SynthesisService};
use tiny_http::{Header, Response, Server};
use tokio::sync::Semaphore;

/// In-memory service that replays a scripted outcome and counts calls
#[derive(Clone)]
pub struct ScriptedService {
    pub calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<GenerationRequest>>>,
    outcome: Arc<Mutex<Result<GeneratedImage>>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedService {
    pub fn succeeding(url: &str) -> Self {
        Self::with_outcome(Ok(GeneratedImage {
            url: url.to_string(),
            raw: serde_json::Value::Null,
        }))
    }

    pub fn failing(err: Error) -> Self {
        Self::with_outcome(Err(err))
    }

    fn with_outcome(outcome: Result<GeneratedImage>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
            outcome: Arc::new(Mutex::new(outcome)),
            gate: None,
        }
    }

    /// Calls block until `release` is invoked once per call
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn set_outcome(&self, outcome: Result<GeneratedImage>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SynthesisService for ScriptedService {
    fn generate(&self, request: GenerationRequest) -> BoxFuture<'static, Result<GeneratedImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        let outcome = self.outcome.lock().unwrap().clone();
        let gate = self.gate.clone();
        async move {
            if let Some(gate) = gate {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|e| Error::TransportError(e.to_string()))?;
                permit.forget();
            }
            outcome
        }
        .boxed()
    }
}

/// A captured request received by [`serve`]
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

/// Serve `replies` (status, body) in order on an ephemeral port.
/// Returns the endpoint URL and the requests seen so far.
pub fn serve(replies: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<Received>>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let received = Arc::new(Mutex::new(Vec::new()));
    let log = received.clone();

    std::thread::spawn(move || {
        for (status, body) in replies {
            let Ok(mut request) = server.recv() else { return };
            let mut raw = String::new();
            let _ = request.as_reader().read_to_string(&mut raw);
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.to_string());
            log.lock().unwrap().push(Received {
                method: request.method().to_string(),
                content_type,
                body: serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null),
            });
            let resp = Response::from_string(body)
                .with_status_code(status)
                .with_header("Content-Type: application/json".parse::<Header>().unwrap());
            let _ = request.respond(resp);
        }
    });

    (format!("http://{}/api/genWeapon", addr), received)
}

/// An endpoint nothing listens on
pub fn dead_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/genWeapon", addr)
}
