//! Event payload sent to `customers/{customer_id}/events`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Attributes;

/// Named occurrence attributed to a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedEvent {
    pub name: String,

    /// Event attributes, `null` on the wire when absent
    pub data: Option<Attributes>,

    /// Point-in-time override as Unix seconds; the service stamps
    /// receipt time when this is `null`
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrackedEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
            timestamp: None,
        }
    }

    pub fn with_data(mut self, data: Attributes) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_event_without_optional_fields() {
        let event = TrackedEvent::new("signup");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"name": "signup", "data": null, "timestamp": null})
        );
    }

    #[test]
    fn test_event_with_data_and_timestamp() {
        let mut data = Attributes::new();
        data.insert("plan".to_string(), json!("pro"));
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let event = TrackedEvent::new("upgrade").with_data(data).with_timestamp(at);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["name"], "upgrade");
        assert_eq!(value["data"], json!({"plan": "pro"}));
        assert_eq!(value["timestamp"], json!(at.timestamp()));
    }
}
