use super::raw::{RawRecordList, RawRecordSetInfo};
use super::record::Record;
use super::source::{SourceMetadata, SourceMetadataMap};
use crate::error::Result;

/// Summary of one thread inside a listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSetInfo {
    pub id: String,
    pub description: String,
    pub record_count: i64,
    /// `None` when the root was deleted or never captured.
    pub root_record: Option<Record>,
}

impl From<RawRecordSetInfo> for RecordSetInfo {
    fn from(raw: RawRecordSetInfo) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            record_count: raw.record_count.unwrap_or_default(),
            // Flat view: the root's parent reference stays unresolved.
            root_record: raw.root_record.map(Record::from),
        }
    }
}

/// One page of thread summaries sharing a single name side-table.
#[derive(Debug, Clone, Default)]
pub struct RecordListResponse {
    pub record_sets: Vec<RecordSetInfo>,
    pub source_metadata: SourceMetadataMap,
}

impl RecordListResponse {
    pub fn from_raw(raw: RawRecordList) -> Self {
        let source_metadata = SourceMetadata::index(raw.user_metadata);
        let record_sets: Vec<RecordSetInfo> =
            raw.record_sets.into_iter().map(RecordSetInfo::from).collect();
        tracing::debug!(
            record_sets = record_sets.len(),
            without_root = record_sets.iter().filter(|rs| rs.root_record.is_none()).count(),
            metadata = source_metadata.len(),
            "Built record listing"
        );
        Self {
            record_sets,
            source_metadata,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_raw(serde_json::from_str(json)?))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(Self::from_raw(serde_json::from_value(value)?))
    }

    pub fn len(&self) -> usize {
        self.record_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_root_record_is_absent() {
        let listing = RecordListResponse::from_value(json!({
            "record_sets": [
                {"id": "a", "description": "gone", "record_count": 0}
            ]
        }))
        .unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.record_sets[0].id, "a");
        assert!(listing.record_sets[0].root_record.is_none());
    }

    #[test]
    fn test_wrongly_typed_entry_fields_degrade() {
        let listing = RecordListResponse::from_value(json!({
            "record_sets": [
                {"id": "a", "description": 7, "record_count": "3"},
                {"id": "b", "root_record": "not a record"},
                "garbage"
            ]
        }))
        .unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.record_sets[0].description, "7");
        assert_eq!(listing.record_sets[0].record_count, 3);
        assert!(listing.record_sets[1].root_record.is_none());
    }

    #[test]
    fn test_root_record_is_built() {
        let listing = RecordListResponse::from_value(json!({
            "record_sets": [{
                "id": "t1",
                "description": "hello",
                "record_count": 12,
                "root_record": {
                    "time": 1_700_000_000,
                    "text_content": "hello",
                    "source": {"sender_id": "u1", "type": 1},
                    "parent": {"message_id": "elsewhere"}
                }
            }],
            "user_metadata": [{"id": "u1", "username": "Alice"}]
        }))
        .unwrap();
        let info = &listing.record_sets[0];
        assert_eq!(info.record_count, 12);
        let root = info.root_record.as_ref().unwrap();
        assert_eq!(root.text_content, "hello");
        assert!(root.parent_source.is_some());
        assert_eq!(listing.source_metadata["u1"].name, "Alice");
    }

    #[test]
    fn test_empty_listing() {
        let listing = RecordListResponse::from_json(r#"{"record_sets": null}"#).unwrap();
        assert!(listing.is_empty());
        assert!(listing.source_metadata.is_empty());
    }
}
