//! Main tracking client

use chrono::{DateTime, Utc};
use reqwest::header::HeaderValue;
use reqwest::Method;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::auth::{inject_authorization, Credentials};
use crate::config::ClientConfig;
use crate::error::{Error, TransportError};
use crate::events::TrackedEvent;
use crate::identity::{Attributes, IdentityProvider};
use crate::mutex::AsyncMutex;
use crate::request::RequestDescriptor;
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport, DEFAULT_TIMEOUT};
use crate::{Result, DEFAULT_BASE_URL};

const CUSTOMER_PATH: &str = "customers/{customer_id}";
const EVENTS_PATH: &str = "customers/{customer_id}/events";

/// Customer.io tracking client
///
/// All network calls made through one client are serialized: a call starts
/// its HTTP round trip only after the previous one has completed. Separate
/// clients share nothing and run independently.
pub struct TrackingClient {
    auth_header: HeaderValue,
    identity: Arc<dyn IdentityProvider>,
    transport: Arc<dyn HttpTransport>,
    lock: AsyncMutex,
}

impl TrackingClient {
    /// Create a client talking to the public tracking API
    pub fn new(
        site_id: impl Into<String>,
        api_key: impl Into<String>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let credentials = Credentials::new(site_id, api_key)?;
        let transport = ReqwestTransport::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)?;
        Self::with_transport(credentials, identity, Arc::new(transport))
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ClientConfig, identity: Arc<dyn IdentityProvider>) -> Result<Self> {
        config.validate()?;
        let credentials = config.credentials()?;
        let transport = ReqwestTransport::new(config.base_url.clone(), config.timeout())?;
        Self::with_transport(credentials, identity, Arc::new(transport))
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(
        credentials: Credentials,
        identity: Arc<dyn IdentityProvider>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        let auth_header = credentials.authorization_header()?;
        debug!(site_id = credentials.site_id(), "tracking client created");

        Ok(Self {
            auth_header,
            identity,
            transport,
            lock: AsyncMutex::new(),
        })
    }

    /// Create or update the current customer with its attributes
    pub async fn identify(&self) -> Result<()> {
        let identity = Arc::clone(&self.identity);
        self.send(CUSTOMER_PATH, Method::PUT, move || {
            Some(identity.customer_details())
        })
        .await
    }

    /// Delete the current customer
    pub async fn delete_customer(&self) -> Result<()> {
        self.send(CUSTOMER_PATH, Method::DELETE, || None::<()>)
            .await
    }

    /// Record an event for the current customer
    pub async fn track_event(
        &self,
        name: impl Into<String>,
        data: Option<Attributes>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.send_event(TrackedEvent {
            name: name.into(),
            data,
            timestamp,
        })
        .await
    }

    /// Record a prebuilt event for the current customer
    pub async fn send_event(&self, event: TrackedEvent) -> Result<()> {
        self.send(EVENTS_PATH, Method::POST, move || Some(event))
            .await
    }

    /// Shared request pipeline
    ///
    /// The payload is only built once a customer id is known. The lock covers
    /// exactly the transport round trip and is dropped before classification.
    async fn send<P, F>(&self, template: &'static str, method: Method, payload: F) -> Result<()>
    where
        P: Serialize,
        F: FnOnce() -> Option<P>,
    {
        let customer_id = match self.identity.customer_id() {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                debug!(%method, template, "no customer id, skipping request");
                return Ok(());
            }
        };

        let mut request = RequestDescriptor::new(template, method).param("customer_id", customer_id);
        if let Some(body) = payload() {
            request = request.json_body(&body)?;
        }
        inject_authorization(request.headers_mut(), &self.auth_header);

        let request = request.into_http_request();
        let method = request.method.clone();
        let path = request.path.clone();

        let result = {
            let _lock = self.lock.acquire().await;
            trace!(%method, %path, "request lock acquired");
            self.transport.execute(request).await
        };

        classify(&method, &path, result)
    }
}

/// Map a transport outcome onto the client's result
fn classify(
    method: &Method,
    path: &str,
    result: std::result::Result<HttpResponse, TransportError>,
) -> Result<()> {
    match result {
        Ok(response) if response.status == 200 => {
            debug!(%method, path, "request accepted");
            Ok(())
        }
        Ok(response) => {
            warn!(%method, path, status = response.status, "tracking API rejected request");
            Err(Error::Api {
                status: response.status,
                body: response.body,
            })
        }
        Err(err) => {
            warn!(%method, path, error = %err, "tracking request failed");
            Err(Error::Transport(err))
        }
    }
}

impl fmt::Debug for TrackingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingClient")
            .field("lock", &self.lock)
            .finish_non_exhaustive()
    }
}
