use serde::Deserialize;
use std::env;
use url::Url;

use crate::error::{Result, ViewerError};
use crate::resolver::NamePrecedence;

pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub display: DisplayConfig,
}

/// Where the archive API lives and how to page through it.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub name_precedence: NamePrecedence,
    /// Indentation bound when walking reply chains.
    pub max_thread_depth: usize,
    /// `chrono` strftime pattern for record times.
    pub date_format: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            page_size: 50,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            name_precedence: NamePrecedence::ParentFirst,
            max_thread_depth: 64,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let archive = ArchiveConfig::default();
        let display = DisplayConfig::default();
        Self {
            archive: ArchiveConfig {
                base_url: env::var("CHRONICLER_BASE_URL").unwrap_or(archive.base_url),
                timeout_secs: parse_env_or("CHRONICLER_TIMEOUT_SECS", archive.timeout_secs),
                page_size: parse_env_or("CHRONICLER_PAGE_SIZE", archive.page_size),
            },
            display: DisplayConfig {
                name_precedence: parse_env_or(
                    "CHRONICLER_NAME_PRECEDENCE",
                    display.name_precedence,
                ),
                max_thread_depth: parse_env_or(
                    "CHRONICLER_MAX_THREAD_DEPTH",
                    display.max_thread_depth,
                ),
                date_format: env::var("CHRONICLER_DATE_FORMAT").unwrap_or(display.date_format),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.archive.base_url)?;
        if url.cannot_be_a_base() {
            return Err(ViewerError::Validation(format!(
                "Archive base URL '{}' cannot carry a path",
                self.archive.base_url
            )));
        }
        if self.archive.page_size == 0 {
            return Err(ViewerError::Validation(
                "Page size must be greater than zero".to_string(),
            ));
        }
        if self.display.max_thread_depth == 0 {
            return Err(ViewerError::Validation(
                "Max thread depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
