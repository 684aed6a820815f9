//! Display names for record sources.
//!
//! Precedence: an explicit metadata name, then the raw identity string, with
//! web sources first reduced to the host of their URL.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::{Source, SourceMetadataMap};

/// Raw identity string shown for a source: the URL host for web sources
/// (the raw URL when it does not parse), else the sender, else the channel.
pub fn format_source(source: &Source) -> Option<String> {
    if source.is_web() {
        return source.url.as_deref().map(url_host_or_raw);
    }
    source.sender_id.clone().or_else(|| source.channel_id.clone())
}

fn url_host_or_raw(raw: &str) -> String {
    let host = Url::parse(raw).ok().and_then(|url| {
        let host = url.host_str()?.to_string();
        Some(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host,
        })
    });
    host.unwrap_or_else(|| {
        tracing::debug!(url = raw, "Source URL has no host, showing it as is");
        raw.to_string()
    })
}

/// Name for `parent_source`, or `fallback_source` when there is no parent.
/// Empty when neither is given.
pub fn resolve_name(
    metadata: Option<&SourceMetadataMap>,
    parent_source: Option<&Source>,
    fallback_source: Option<&Source>,
) -> String {
    let Some(effective) = parent_source.or(fallback_source) else {
        return String::new();
    };
    let Some(key) = format_source(effective) else {
        return String::new();
    };
    metadata
        .and_then(|md| md.get(&key))
        .map(|entry| entry.name.clone())
        .unwrap_or(key)
}

/// Which of a record's two sources names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePrecedence {
    /// The parent reference first, the record's own source as fallback.
    #[default]
    ParentFirst,
    /// The record's own source first, the parent reference as fallback.
    OwnFirst,
}

impl NamePrecedence {
    /// Name from the preferred source; when that source is present but
    /// yields nothing (a bare message reference), the other one is tried.
    pub fn resolve(
        self,
        metadata: Option<&SourceMetadataMap>,
        own: Option<&Source>,
        parent: Option<&Source>,
    ) -> String {
        let (first, second) = match self {
            Self::ParentFirst => (parent, own),
            Self::OwnFirst => (own, parent),
        };
        let name = resolve_name(metadata, first, second);
        if name.is_empty() && first.is_some() {
            return resolve_name(metadata, second, None);
        }
        name
    }
}

impl std::fmt::Display for NamePrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentFirst => write!(f, "parent"),
            Self::OwnFirst => write!(f, "own"),
        }
    }
}

impl std::str::FromStr for NamePrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parent" | "parent_first" => Ok(Self::ParentFirst),
            "own" | "own_first" | "self" => Ok(Self::OwnFirst),
            _ => Err(format!("Unknown name precedence: {s}")),
        }
    }
}
