//! # Chronicler Viewer
//!
//! Reads archived social and messaging captures ("records") from a chronicler
//! archive and turns each raw batch into a linked, displayable structure:
//!
//! - [`models`]: raw wire schema, sources and identity keys, attachments,
//!   records, thread reconstruction ([`models::RecordSet`]) and listing pages
//!   ([`models::RecordListResponse`]).
//! - [`resolver`]: display names for sources.
//! - [`render`]: plain-text output of threads and listings.
//! - [`archive`]: the HTTP client for the archive API.
//! - [`config`] and [`error`]: environment configuration and the error type.
//!
//! Everything under `models`, `resolver` and `render` is synchronous and
//! infallible on partial data; only the archive boundary returns errors.

pub mod archive;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod resolver;
