//! # cio-track
//!
//! Async client for the Customer.io tracking API.
//!
//! ## Guarantees
//!
//! - **Serialized**: one client never has more than one request in flight
//! - **Anonymous-safe**: no customer id means no network traffic at all
//! - **Typed failures**: API rejections and transport failures stay distinct
//! - **Cancellation-safe**: dropping an operation releases the request lock
//!
//! ## Operations
//!
//! | Operation | Verb | Path |
//! |---|---|---|
//! | [`TrackingClient::identify`] | PUT | `customers/{customer_id}` |
//! | [`TrackingClient::delete_customer`] | DELETE | `customers/{customer_id}` |
//! | [`TrackingClient::track_event`] | POST | `customers/{customer_id}/events` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use cio_track::{StaticIdentity, TrackingClient};
//! use std::sync::Arc;
//!
//! # async fn run() -> cio_track::Result<()> {
//! let identity = Arc::new(StaticIdentity::new("42").with_attribute("plan", "pro"));
//! let client = TrackingClient::new("site-id", "api-key", identity)?;
//!
//! client.identify().await?;
//! client.track_event("signup", None, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod mutex;
pub mod request;
pub mod transport;

pub use auth::{inject_authorization, Credentials};
pub use client::TrackingClient;
pub use config::{load_client_config, ClientConfig};
pub use error::{Error, TransportError, TransportErrorKind};
pub use events::TrackedEvent;
pub use identity::{Attributes, IdentityProvider, StaticIdentity};
pub use mutex::{AsyncMutex, ScopedLock};
pub use request::RequestDescriptor;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Default Customer.io tracking API base
pub const DEFAULT_BASE_URL: &str = "https://track.customer.io/api/v1/";

/// Re-export common types
pub type Result<T> = std::result::Result<T, Error>;
