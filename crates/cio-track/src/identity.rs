//! Source of the customer being tracked

use serde_json::Value;
use std::collections::HashMap;

/// Arbitrary customer or event attributes
pub type Attributes = HashMap<String, Value>;

/// Supplies the current customer to the client
///
/// Queried on every operation, so an implementation may switch customers
/// between calls (e.g. on login/logout).
pub trait IdentityProvider: Send + Sync {
    /// Current customer id; `None` means anonymous and suppresses all traffic
    fn customer_id(&self) -> Option<String>;

    /// Attributes sent on identify
    fn customer_details(&self) -> Attributes;
}

/// Identity fixed at construction
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    id: Option<String>,
    attributes: Attributes,
}

impl StaticIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            attributes: Attributes::new(),
        }
    }

    /// Identity without a customer id
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.extend(attributes);
        self
    }
}

impl IdentityProvider for StaticIdentity {
    fn customer_id(&self) -> Option<String> {
        self.id.clone()
    }

    fn customer_details(&self) -> Attributes {
        self.attributes.clone()
    }
}
