//! Helpers for serializing records into index service request bodies.

use crate::index::types::IndexableRecord;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Build the JSON object stored for a single record.
pub(crate) fn build_payload(record: &IndexableRecord, timestamp_rfc3339: &str) -> Value {
    let mut payload = Map::new();
    payload.insert("id".into(), Value::String(record.id.clone()));
    payload.insert("domain".into(), Value::String(record.domain.clone()));
    payload.insert("title".into(), Value::String(record.title.clone()));
    payload.insert(
        "indexed_at".into(),
        Value::String(timestamp_rfc3339.to_string()),
    );

    if let Some(description) = record.description.as_ref() {
        payload.insert("description".into(), Value::String(description.clone()));
    }

    if let Some(keywords) = record.keywords.as_ref().filter(|words| !words.is_empty()) {
        payload.insert(
            "keywords".into(),
            Value::Array(
                keywords
                    .iter()
                    .map(|word| Value::String(word.clone()))
                    .collect(),
            ),
        );
    }

    if let Some(thumbnail) = record.thumbnail.as_ref() {
        payload.insert(
            "thumbnail_png".into(),
            Value::String(STANDARD.encode(thumbnail)),
        );
    }

    Value::Object(payload)
}

/// Current UTC time formatted as RFC3339.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::UNIX_EPOCH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IndexableRecord {
        IndexableRecord {
            id: "item-1".into(),
            domain: "com.example.docs".into(),
            title: "Getting started".into(),
            description: None,
            keywords: Some(vec!["intro".into(), "setup".into()]),
            thumbnail: None,
        }
    }

    #[test]
    fn payload_omits_absent_fields() {
        let payload = build_payload(&record(), "2024-01-01T00:00:00Z");
        let map = payload.as_object().expect("object");
        assert_eq!(map["id"], "item-1");
        assert_eq!(map["domain"], "com.example.docs");
        assert_eq!(map["indexed_at"], "2024-01-01T00:00:00Z");
        assert_eq!(map["keywords"], serde_json::json!(["intro", "setup"]));
        assert!(!map.contains_key("description"));
        assert!(!map.contains_key("thumbnail_png"));
    }

    #[test]
    fn empty_description_is_kept() {
        let mut record = record();
        record.description = Some(String::new());
        let payload = build_payload(&record, "2024-01-01T00:00:00Z");
        assert_eq!(payload["description"], "");
    }

    #[test]
    fn payload_encodes_thumbnail_as_base64() {
        let mut record = record();
        record.thumbnail = Some(vec![0x89, b'P', b'N', b'G']);
        let payload = build_payload(&record, "2024-01-01T00:00:00Z");
        assert_eq!(payload["thumbnail_png"], "iVBORw==");
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let stamp = current_timestamp_rfc3339();
        assert!(stamp.contains('T'));
        assert!(stamp.ends_with('Z'));
    }
}
