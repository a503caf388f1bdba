//! Per-call request descriptors

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::error::Error;
use crate::transport::HttpRequest;

/// Path template plus everything needed to issue one call
///
/// Built fresh for every operation and consumed by
/// [`RequestDescriptor::into_http_request`].
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    template: &'static str,
    params: Vec<(&'static str, String)>,
    method: Method,
    body: Option<Vec<u8>>,
    headers: HeaderMap,
}

impl RequestDescriptor {
    pub fn new(template: &'static str, method: Method) -> Self {
        Self {
            template,
            params: Vec::new(),
            method,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// Bind `{name}` in the template to `value`
    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    /// Encode `payload` as the JSON request body
    pub fn json_body<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, Error> {
        self.body = Some(serde_json::to_vec(payload)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Template with every bound parameter substituted as an escaped path segment
    pub fn path(&self) -> String {
        self.params
            .iter()
            .fold(self.template.to_string(), |path, (name, value)| {
                path.replace(
                    &format!("{{{}}}", name),
                    &urlencoding::encode(value),
                )
            })
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn into_http_request(self) -> HttpRequest {
        let path = self.path();
        HttpRequest {
            method: self.method,
            path,
            headers: self.headers,
            body: self.body,
        }
    }
}
