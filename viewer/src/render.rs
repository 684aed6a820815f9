//! Plain-text rendering of threads and listings for the terminal.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::config::{DisplayConfig, DEFAULT_DATE_FORMAT};
use crate::models::{
    thread_rows, FileBucket, Record, RecordListResponse, RecordSet, Sorting, Source,
    SourceMetadataMap,
};
use crate::resolver::NamePrecedence;

pub const NO_DATE: &str = "no date";
pub const NO_PARENT: &str = "NONE";
pub const NO_RECORD: &str = "no record";

const INDENT: &str = "    ";
const DESCRIPTION_WIDTH: usize = 80;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub date_format: String,
    pub name_precedence: NamePrecedence,
    pub max_depth: usize,
    pub sorting: Sorting,
    /// Attachments to list under each record; `None` hides them.
    pub files: Option<FileBucket>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

impl RenderOptions {
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            name_precedence: config.name_precedence,
            max_depth: config.max_thread_depth,
            sorting: Sorting::default(),
            files: None,
        }
    }
}

/// Formatted time, or [`NO_DATE`]. A pattern chrono cannot render falls back
/// to the default one.
pub fn format_time(time: Option<DateTime<Utc>>, format: &str) -> String {
    let Some(time) = time else {
        return NO_DATE.to_string();
    };
    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_err() {
        out.clear();
        // Infallible for the built-in pattern.
        let _ = write!(out, "{}", time.format(DEFAULT_DATE_FORMAT));
    }
    out
}

/// Source type name used to pick an icon.
pub fn source_label(source: Option<&Source>) -> &'static str {
    source.map(|s| s.source_type.name()).unwrap_or("unknown")
}

pub fn record_name(
    record: &Record,
    metadata: Option<&SourceMetadataMap>,
    precedence: NamePrecedence,
) -> String {
    precedence.resolve(
        metadata,
        record.source.as_ref(),
        record.parent_source.as_ref(),
    )
}

/// Name of the resolved parent record, or [`NO_PARENT`].
pub fn parent_label(set: &RecordSet, index: usize, precedence: NamePrecedence) -> String {
    match set.parent(index) {
        Some(parent) => {
            let name = record_name(parent, Some(set.source_metadata()), precedence);
            if name.is_empty() {
                format_time(parent.time, DEFAULT_DATE_FORMAT)
            } else {
                name
            }
        }
        None => NO_PARENT.to_string(),
    }
}

fn first_line(text: &str, width: usize) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() > width {
        let cut: String = line.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}

pub fn render_thread(set: &RecordSet, options: &RenderOptions) -> String {
    let mut out = String::new();
    if let Some(id) = set.id() {
        let _ = writeln!(out, "# {id} ({} records)", set.len());
    }

    for row in thread_rows(set, &options.sorting, options.max_depth) {
        let Some(record) = set.get(row.index) else {
            continue;
        };
        let indent = INDENT.repeat(row.depth);
        let name = record_name(record, Some(set.source_metadata()), options.name_precedence);
        let _ = writeln!(
            out,
            "{indent}‣ [{}] [{}] {}  ↳ {}",
            format_time(record.time, &options.date_format),
            source_label(record.source.as_ref()),
            name,
            parent_label(set, row.index, options.name_precedence),
        );
        for line in record.text_content.lines() {
            let _ = writeln!(out, "{indent}   {}", line.trim_end());
        }
        if let Some(bucket) = options.files {
            for file in record.files_in(bucket) {
                let _ = writeln!(
                    out,
                    "{indent}   [{}] {} {}",
                    file.kind,
                    file.name,
                    file.file_url.as_deref().unwrap_or_default()
                );
            }
        }
    }
    out
}

pub fn render_listing(listing: &RecordListResponse, options: &RenderOptions) -> String {
    let mut out = String::new();
    for info in &listing.record_sets {
        let Some(root) = info.root_record.as_ref() else {
            let _ = writeln!(out, "{}  {}", info.id, NO_RECORD);
            continue;
        };
        let description = if info.description.is_empty() {
            &root.text_content
        } else {
            &info.description
        };
        let _ = writeln!(
            out,
            "{}  {:>5} records  [{}] [{}] {}: {}",
            info.id,
            info.record_count,
            format_time(root.time, &options.date_format),
            source_label(root.source.as_ref()),
            record_name(root, Some(&listing.source_metadata), options.name_precedence),
            first_line(description, DESCRIPTION_WIDTH),
        );
    }
    out
}
