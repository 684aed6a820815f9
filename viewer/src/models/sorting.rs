use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreateTime,
    FetchTime,
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "create_time" | "time" | "created" => Ok(Self::CreateTime),
            "fetch_time" | "fetched" => Ok(Self::FetchTime),
            _ => Err(format!("Unknown sort field: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Record ordering. Undated records always come after dated ones, whatever
/// the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sorting {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sorting {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    fn key(&self, record: &Record) -> Option<DateTime<Utc>> {
        match self.field {
            SortField::CreateTime => record.time,
            SortField::FetchTime => record.fetch_time,
        }
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (self.key(a), self.key(b)) {
            (Some(x), Some(y)) => match self.order {
                SortOrder::Asc => x.cmp(&y),
                SortOrder::Desc => y.cmp(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Stable sort of record slots; ties keep their relative order.
    pub fn sort_indices(&self, records: &[Record], indices: &mut [usize]) {
        indices.sort_by(|&a, &b| self.compare(&records[a], &records[b]));
    }
}
