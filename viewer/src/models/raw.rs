//! Wire format of the archive API.
//!
//! Every field is optional: upstream captures are imperfect and a missing
//! field must degrade, never fail the whole payload. Ids may arrive as JSON
//! strings or numbers and are normalized to strings here; empty strings count
//! as absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Raw `source` / `parent` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    #[serde(default, deserialize_with = "lenient_id")]
    pub sender_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub channel_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub message_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub url: Option<String>,
    /// Source type id, or its name when the producer wrote enums as strings.
    #[serde(default, rename = "type")]
    pub source_type: Option<Value>,
}

/// Raw attachment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFile {
    #[serde(default, deserialize_with = "lenient_id")]
    pub file_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub local_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_int")]
    pub time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub fetch_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text_content: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub source: Option<RawSource>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub parent: Option<RawSource>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub files: Vec<RawFile>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub links: Vec<String>,
}

/// Raw side-table entry mapping an identity to a display name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub quotes: Vec<Value>,
}

/// Full payload of one thread.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecordSet {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub records: Vec<RawRecord>,
    #[serde(default, alias = "userMetadata", deserialize_with = "lenient_list")]
    pub user_metadata: Vec<RawMetadata>,
}

/// One thread summary of a listing page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecordSetInfo {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub record_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub root_record: Option<RawRecord>,
}

/// One page of thread summaries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecordList {
    #[serde(default, alias = "recordSets", deserialize_with = "lenient_list")]
    pub record_sets: Vec<RawRecordSetInfo>,
    #[serde(default, alias = "userMetadata", deserialize_with = "lenient_list")]
    pub user_metadata: Vec<RawMetadata>,
}

/// Strings and numbers become ids; anything else (null, objects, "") is absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Integers, floats (truncated) and numeric strings; anything else is absent.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Strings as is, numbers and booleans as their text; anything else is absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }))
}

/// A nested object that does not fit its schema is dropped, not fatal.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed object");
            Ok(None)
        }
    }
}

/// `null` and non-array collections are empty; elements that do not fit the
/// schema are skipped one by one.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(found = %other, "Expected a list, treating it as empty");
            return Ok(Vec::new());
        }
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed list entry");
                None
            }
        })
        .collect();
    if parsed.len() < total {
        tracing::debug!(kept = parsed.len(), total, "Some list entries were dropped");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_accept_strings_and_numbers() {
        let raw: RawSource = serde_json::from_value(json!({
            "sender_id": 42,
            "channel_id": "c1",
            "message_id": "",
            "type": 1
        }))
        .unwrap();
        assert_eq!(raw.sender_id.as_deref(), Some("42"));
        assert_eq!(raw.channel_id.as_deref(), Some("c1"));
        assert_eq!(raw.message_id, None);
        assert_eq!(raw.source_type, Some(json!(1)));
    }

    #[test]
    fn test_unexpected_id_shapes_are_absent() {
        let raw: RawSource = serde_json::from_value(json!({
            "sender_id": {"nested": true},
            "channel_id": null,
            "url": false
        }))
        .unwrap();
        assert_eq!(raw.sender_id, None);
        assert_eq!(raw.channel_id, None);
        assert_eq!(raw.url, None);
    }

    #[test]
    fn test_time_accepts_numeric_strings() {
        let raw: RawRecord =
            serde_json::from_value(json!({"time": "1700000000", "fetch_time": 12.9})).unwrap();
        assert_eq!(raw.time, Some(1_700_000_000));
        assert_eq!(raw.fetch_time, Some(12));
    }

    #[test]
    fn test_null_lists_are_empty() {
        let raw: RawRecordSet =
            serde_json::from_value(json!({"records": null, "userMetadata": null})).unwrap();
        assert!(raw.records.is_empty());
        assert!(raw.user_metadata.is_empty());
    }

    #[test]
    fn test_metadata_aliases() {
        let camel: RawRecordSet =
            serde_json::from_value(json!({"userMetadata": [{"id": "u1"}]})).unwrap();
        let snake: RawRecordSet =
            serde_json::from_value(json!({"user_metadata": [{"id": "u1"}]})).unwrap();
        assert_eq!(camel.user_metadata.len(), 1);
        assert_eq!(snake.user_metadata.len(), 1);
    }

    #[test]
    fn test_empty_object_is_valid_record() {
        let raw: RawRecord = serde_json::from_value(json!({})).unwrap();
        assert!(raw.source.is_none());
        assert!(raw.files.is_empty());
        assert_eq!(raw.time, None);
    }

    #[test]
    fn test_wrong_scalar_types_degrade() {
        let raw: RawRecord = serde_json::from_value(json!({
            "text_content": 5,
            "source": "2",
            "parent": true
        }))
        .unwrap();
        assert_eq!(raw.text_content.as_deref(), Some("5"));
        assert!(raw.source.is_none());
        assert!(raw.parent.is_none());

        let info: RawRecordSetInfo =
            serde_json::from_value(json!({"id": "t", "description": 7, "root_record": 3})).unwrap();
        assert_eq!(info.description.as_deref(), Some("7"));
        assert!(info.root_record.is_none());
    }

    #[test]
    fn test_bad_list_entries_are_skipped() {
        let raw: RawRecord = serde_json::from_value(json!({
            "files": [null, {"file_url": "https://h/a.png"}, 4],
            "links": [1, "https://example.org"]
        }))
        .unwrap();
        assert_eq!(raw.files.len(), 1);
        assert_eq!(raw.links, vec!["https://example.org".to_string()]);
    }

    #[test]
    fn test_opaque_quotes_never_fail() {
        let md: RawMetadata =
            serde_json::from_value(json!({"id": "u1", "username": 12, "quotes": "opaque"}))
                .unwrap();
        assert_eq!(md.username.as_deref(), Some("12"));
        assert!(md.quotes.is_empty());

        let md: RawMetadata =
            serde_json::from_value(json!({"id": "u1", "quotes": [{"any": "shape"}, 1]})).unwrap();
        assert_eq!(md.quotes.len(), 2);
    }
}
