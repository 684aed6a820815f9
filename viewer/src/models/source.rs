use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use super::raw::{RawMetadata, RawSource};

/// Where an archived record was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    #[default]
    Unknown,
    Telegram,
    Twitter,
    Web,
    Youtube,
}

impl SourceType {
    pub const ALL: [SourceType; 5] = [
        SourceType::Unknown,
        SourceType::Telegram,
        SourceType::Twitter,
        SourceType::Web,
        SourceType::Youtube,
    ];

    /// Ids outside the known range map to `Unknown`.
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => Self::Telegram,
            2 => Self::Twitter,
            3 => Self::Web,
            4 => Self::Youtube,
            _ => Self::Unknown,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Telegram => 1,
            Self::Twitter => 2,
            Self::Web => 3,
            Self::Youtube => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Telegram => "telegram",
            Self::Twitter => "twitter",
            Self::Web => "web",
            Self::Youtube => "youtube",
        }
    }

    /// Accepts the numeric id or the (case-insensitive) name.
    fn from_raw(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_i64().map(Self::from_id).unwrap_or_default(),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(Self::from_id)
                    .unwrap_or_else(|_| s.parse().unwrap_or_default())
            }
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| format!("Unknown source type: {s}"))
    }
}

/// The single value that references a [`Source`] within one batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of where a record came from: a sender, a channel, a message or a
/// web page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    pub sender_id: Option<String>,
    pub channel_id: Option<String>,
    pub message_id: Option<String>,
    pub url: Option<String>,
    pub source_type: SourceType,
}

impl Source {
    /// First present of `message_id`, `channel_id`, `sender_id`, then a hash
    /// of `url`. `None` means the source cannot link records.
    pub fn identity_key(&self) -> Option<IdentityKey> {
        if let Some(id) = self
            .message_id
            .as_ref()
            .or(self.channel_id.as_ref())
            .or(self.sender_id.as_ref())
        {
            return Some(IdentityKey(id.clone()));
        }
        self.url
            .as_deref()
            .map(|url| IdentityKey(format!("{:x}", Sha256::digest(url.as_bytes()))))
    }

    pub fn is_web(&self) -> bool {
        self.source_type == SourceType::Web
    }
}

impl From<RawSource> for Source {
    fn from(raw: RawSource) -> Self {
        Self {
            source_type: SourceType::from_raw(raw.source_type.as_ref()),
            sender_id: raw.sender_id,
            channel_id: raw.channel_id,
            message_id: raw.message_id,
            url: raw.url,
        }
    }
}

/// Side-table entry that gives an identity a human-readable name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub id: String,
    pub name: String,
    /// Carried through untouched.
    pub quotes: Vec<Value>,
}

pub type SourceMetadataMap = HashMap<String, SourceMetadata>;

impl SourceMetadata {
    /// `None` when the entry has no id to be keyed by.
    pub fn from_raw(raw: RawMetadata) -> Option<Self> {
        let id = raw.id?;
        let name = raw
            .username
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.clone());
        Some(Self {
            id,
            name,
            quotes: raw.quotes,
        })
    }

    /// Builds the id lookup; later entries overwrite earlier ones.
    pub fn index<I>(entries: I) -> SourceMetadataMap
    where
        I: IntoIterator<Item = RawMetadata>,
    {
        let mut by_id = SourceMetadataMap::new();
        for raw in entries {
            match Self::from_raw(raw) {
                Some(md) => {
                    by_id.insert(md.id.clone(), md);
                }
                None => tracing::warn!("Skipping source metadata entry without an id"),
            }
        }
        by_id
    }
}
