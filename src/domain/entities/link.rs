//! Link record representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A durable mapping from a short identifier to its target URL.
///
/// The identifier is the primary key. `target_url` never changes after
/// creation; `click_count` only grows and may lag behind recent redirects
/// because increments are applied asynchronously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub identifier: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: u64,
}

impl LinkRecord {
    /// Creates a fresh record stamped with the current time and zero clicks.
    pub fn new(identifier: String, target_url: String) -> Self {
        Self {
            identifier,
            target_url,
            created_at: Utc::now(),
            click_count: 0,
        }
    }

    /// Rebuilds a record from stored fields.
    pub fn from_parts(
        identifier: String,
        target_url: String,
        created_at: DateTime<Utc>,
        click_count: u64,
    ) -> Self {
        Self {
            identifier,
            target_url,
            created_at,
            click_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_starts_with_zero_clicks() {
        let before = Utc::now();
        let record = LinkRecord::new("abc123".to_string(), "https://example.com".to_string());

        assert_eq!(record.identifier, "abc123");
        assert_eq!(record.target_url, "https://example.com");
        assert_eq!(record.click_count, 0);
        assert!(record.created_at >= before);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = LinkRecord::from_parts(
            "Xy_9-a".to_string(),
            "https://rust-lang.org".to_string(),
            Utc::now(),
            7,
        );

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["identifier"], "Xy_9-a");
        assert_eq!(value["targetUrl"], "https://rust-lang.org");
        assert_eq!(value["clickCount"], 7);
        assert!(value.get("createdAt").is_some());
    }
}
