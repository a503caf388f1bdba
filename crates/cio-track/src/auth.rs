//! Site credentials and Basic authentication

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::fmt;

use crate::error::Error;

/// Customer.io site id and tracking API key
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    site_id: String,
    api_key: String,
}

impl Credentials {
    /// Validate and wrap a site id / API key pair
    ///
    /// Empty or whitespace-only values are rejected; anything else is
    /// encoded exactly as given.
    pub fn new(site_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self, Error> {
        let site_id = site_id.into();
        let api_key = api_key.into();

        if site_id.trim().is_empty() {
            return Err(Error::InvalidCredentials("site id is empty"));
        }
        if api_key.trim().is_empty() {
            return Err(Error::InvalidCredentials("API key is empty"));
        }

        Ok(Self { site_id, api_key })
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// `Basic base64(site_id:api_key)`, flagged sensitive
    pub fn authorization_header(&self) -> Result<HeaderValue, Error> {
        let encoded = STANDARD.encode(format!("{}:{}", self.site_id, self.api_key));
        let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("site_id", &self.site_id)
            .field("api_key", &"***")
            .finish()
    }
}

/// Add `Authorization` unless the request already carries one
///
/// Header names are matched case-insensitively. An existing value is left
/// untouched and never duplicated. Returns whether the header was added.
pub fn inject_authorization(headers: &mut HeaderMap, value: &HeaderValue) -> bool {
    if headers.contains_key(AUTHORIZATION) {
        return false;
    }
    headers.insert(AUTHORIZATION, value.clone());
    true
}
