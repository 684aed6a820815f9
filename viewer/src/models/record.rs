use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::file::{File, FileBucket};
use super::raw::RawRecord;
use super::source::{IdentityKey, Source};

/// One archived message, post or page capture.
///
/// `parent_source` is the reference exactly as captured; resolving it to
/// another record is the job of [`super::RecordSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub time: Option<DateTime<Utc>>,
    pub fetch_time: Option<DateTime<Utc>>,
    pub text_content: String,
    pub source: Option<Source>,
    pub parent_source: Option<Source>,
    pub files: Vec<File>,
    pub links: Vec<String>,
}

/// Zero and out-of-range epoch values are treated as missing.
fn timestamp(epoch_secs: Option<i64>) -> Option<DateTime<Utc>> {
    epoch_secs
        .filter(|secs| *secs != 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

impl Record {
    /// Identity of this record inside its batch, if it has one.
    pub fn identity_key(&self) -> Option<IdentityKey> {
        self.source.as_ref().and_then(Source::identity_key)
    }

    pub fn parent_key(&self) -> Option<IdentityKey> {
        self.parent_source.as_ref().and_then(Source::identity_key)
    }

    pub fn files_in(&self, bucket: FileBucket) -> impl Iterator<Item = &File> {
        self.files.iter().filter(move |file| bucket.contains(file))
    }

    pub fn images(&self) -> Vec<&File> {
        self.files_in(FileBucket::Image).collect()
    }

    pub fn audio(&self) -> Vec<&File> {
        self.files_in(FileBucket::Audio).collect()
    }

    pub fn videos(&self) -> Vec<&File> {
        self.files_in(FileBucket::Video).collect()
    }

    pub fn documents(&self) -> Vec<&File> {
        self.files_in(FileBucket::Document).collect()
    }

    /// Every attachment, including unclassified ones.
    pub fn files(&self) -> Vec<&File> {
        self.files_in(FileBucket::All).collect()
    }
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Self {
            time: timestamp(raw.time),
            fetch_time: timestamp(raw.fetch_time),
            text_content: raw.text_content.unwrap_or_default(),
            source: raw.source.map(Source::from),
            parent_source: raw.parent.map(Source::from),
            files: raw.files.into_iter().map(File::from).collect(),
            links: raw.links,
        }
    }
}
