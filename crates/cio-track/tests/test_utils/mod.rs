// Shared fakes for client integration tests
//
// ScriptedTransport plays back one step per call and records what it saw,
// including how many calls were executing at the same time.

#![allow(dead_code)]

use async_trait::async_trait;
use cio_track::{
    Attributes, Credentials, HttpRequest, HttpResponse, HttpTransport, IdentityProvider,
    TrackingClient, TransportError, TransportErrorKind,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SITE_ID: &str = "site";
pub const API_KEY: &str = "key";
/// base64("site:key")
pub const EXPECTED_AUTH: &str = "Basic c2l0ZTprZXk=";

/// What the transport does for one call
#[derive(Debug, Clone)]
pub enum Step {
    Respond(u16),
    Fail(TransportErrorKind),
    /// Never completes; only useful with cancellation
    Hang,
}

pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    delay: Duration,
    requests: Mutex<Vec<HttpRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    started: AtomicUsize,
}

impl ScriptedTransport {
    /// Every call answers 200 after `delay`
    pub fn ok(delay: Duration) -> Arc<Self> {
        Self::scripted(Vec::new(), delay)
    }

    /// Calls play `steps` in order, then answer 200
    pub fn scripted(steps: Vec<Step>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            delay,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            started: AtomicUsize::new(0),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        self.requests.lock().unwrap().push(request);
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Respond(200));

        tokio::time::sleep(self.delay).await;

        match step {
            Step::Respond(status) => Ok(HttpResponse {
                status,
                body: format!("status {}", status),
            }),
            Step::Fail(kind) => Err(TransportError::new(kind, "scripted failure")),
            Step::Hang => std::future::pending().await,
        }
    }
}

/// Identity whose customer can change between calls
#[derive(Default)]
pub struct SwitchableIdentity {
    id: Mutex<Option<String>>,
    attributes: Mutex<Attributes>,
}

impl SwitchableIdentity {
    pub fn new(id: Option<&str>) -> Arc<Self> {
        let identity = Self::default();
        identity.set_id(id);
        Arc::new(identity)
    }

    pub fn set_id(&self, id: Option<&str>) {
        *self.id.lock().unwrap() = id.map(str::to_string);
    }

    pub fn set_attribute(&self, key: &str, value: serde_json::Value) {
        self.attributes.lock().unwrap().insert(key.to_string(), value);
    }
}

impl IdentityProvider for SwitchableIdentity {
    fn customer_id(&self) -> Option<String> {
        self.id.lock().unwrap().clone()
    }

    fn customer_details(&self) -> Attributes {
        self.attributes.lock().unwrap().clone()
    }
}

pub fn client(
    identity: Arc<dyn IdentityProvider>,
    transport: Arc<ScriptedTransport>,
) -> TrackingClient {
    TrackingClient::with_transport(
        Credentials::new(SITE_ID, API_KEY).unwrap(),
        identity,
        transport,
    )
    .unwrap()
}

pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(request.body.as_deref().expect("request has no body")).unwrap()
}
