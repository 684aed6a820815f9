//! Thread reconstruction.
//!
//! A thread arrives as a flat list of records whose reply links are raw
//! [`Source`](super::Source) references. Building a [`RecordSet`] runs in
//! three independent phases:
//!
//! 1. every raw record becomes an immutable [`Record`] (ordered arena),
//! 2. an identity index maps each [`IdentityKey`] to its arena slot,
//! 3. each parent reference is looked up once in that index.
//!
//! Phase 3 is a single map lookup per record, so input order does not matter
//! and malformed (even cyclic) references can never make construction loop.

use std::collections::HashMap;

use super::raw::RawRecordSet;
use super::record::Record;
use super::source::{IdentityKey, SourceMetadata, SourceMetadataMap};
use crate::error::Result;

/// Position of a record inside its [`RecordSet`].
pub type RecordIndex = usize;

pub type IdentityIndex = HashMap<IdentityKey, RecordIndex>;

/// Maps identity keys to records. Records without one are left out; on
/// duplicate keys the later record wins.
pub fn build_identity_index(records: &[Record]) -> IdentityIndex {
    let mut index = IdentityIndex::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        if let Some(key) = record.identity_key() {
            if let Some(previous) = index.insert(key, position) {
                tracing::debug!(previous, position, "Duplicate identity key, keeping the later record");
            }
        }
    }
    index
}

/// One entry per record: the arena slot of its parent, when that parent was
/// captured in the same batch.
pub fn resolve_parents(records: &[Record], index: &IdentityIndex) -> Vec<Option<RecordIndex>> {
    records
        .iter()
        .map(|record| {
            // Records with no source of their own cannot be linked either way.
            record.source.as_ref()?;
            record.parent_key().and_then(|key| index.get(&key).copied())
        })
        .collect()
}

/// One full thread: ordered records, their resolved reply links and the
/// name side-table.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    id: Option<String>,
    records: Vec<Record>,
    parents: Vec<Option<RecordIndex>>,
    by_identity: IdentityIndex,
    source_metadata: SourceMetadataMap,
}

impl RecordSet {
    pub fn from_raw(raw: RawRecordSet) -> Self {
        let source_metadata = SourceMetadata::index(raw.user_metadata);
        let records: Vec<Record> = raw.records.into_iter().map(Record::from).collect();
        let by_identity = build_identity_index(&records);
        let parents = resolve_parents(&records, &by_identity);

        let unlinkable = records.iter().filter(|r| r.identity_key().is_none()).count();
        if unlinkable > 0 {
            tracing::warn!(
                thread = raw.id.as_deref().unwrap_or_default(),
                unlinkable,
                "Records without a usable source identity"
            );
        }
        tracing::debug!(
            thread = raw.id.as_deref().unwrap_or_default(),
            records = records.len(),
            linked = parents.iter().flatten().count(),
            metadata = source_metadata.len(),
            "Built record set"
        );

        Self {
            id: raw.id,
            records,
            parents,
            by_identity,
            source_metadata,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_raw(serde_json::from_str(json)?))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(Self::from_raw(serde_json::from_value(value)?))
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: RecordIndex) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn source_metadata(&self) -> &SourceMetadataMap {
        &self.source_metadata
    }

    /// Slot of the record currently owning `key`.
    pub fn find(&self, key: &IdentityKey) -> Option<RecordIndex> {
        self.by_identity.get(key).copied()
    }

    pub fn identity_count(&self) -> usize {
        self.by_identity.len()
    }

    pub fn parent_index(&self, index: RecordIndex) -> Option<RecordIndex> {
        self.parents.get(index).copied().flatten()
    }

    /// Resolved parent, or `None` for roots and dangling references.
    pub fn parent(&self, index: RecordIndex) -> Option<&Record> {
        self.parent_index(index).and_then(|p| self.records.get(p))
    }

    /// Records whose parent resolved to `index`, in list order.
    pub fn children(&self, index: RecordIndex) -> impl Iterator<Item = RecordIndex> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter(move |(child, parent)| *parent == &Some(index) && *child != index)
            .map(|(child, _)| child)
    }

    /// `(slot, record, resolved parent)` in list order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordIndex, &Record, Option<&Record>)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(move |(i, record)| (i, record, self.parent(i)))
    }
}
