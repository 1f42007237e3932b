//! Article metadata embedded in content files.
//!
//! Each article carries a hidden author block with a JSON object inside:
//!
//! ```text
//! # Writing a tokenizer
//!
//! <div style="display:none;" class="author">
//! {"title": "Writing a tokenizer", "description": "Part one", "date": "2024-03-02", "tag": ["rust", "parsing"]}
//! </div>
//! ```
//!
//! ## Extraction rules
//!
//! - The block is found by the [`AUTHOR_MARKER`] substring. No marker means
//!   no metadata; the rest of the document is never searched for braces.
//! - The JSON runs from the first `{` after the marker to the first `}`
//!   after that. Blocks never nest braces.
//! - A trailing comma before the closing brace is tolerated.
//! - Missing fields default to empty; `tag` may be a single string.
//! - An empty object `{}` counts as no metadata.
//!
//! A file with a broken block is logged and treated as having no metadata,
//! so one bad article can't stop a feed build.

use crate::log;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Substring identifying the author block.
pub const AUTHOR_MARKER: &str = "class=\"author\"";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("no author block")]
    NoMarker,
    #[error("author block has no opening brace")]
    NoOpeningBrace,
    #[error("author block is not closed")]
    Unterminated,
    #[error("author block is an empty object")]
    Empty,
    #[error("invalid metadata JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Metadata parsed from an author block. Read-only; never written back.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArticleMetadata {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`, kept as written. Parsed only when ordering the feed.
    pub date: String,
    #[serde(deserialize_with = "one_or_many")]
    pub tag: Vec<String>,
}

/// Extract metadata, logging and swallowing any parse failure.
pub fn extract(content: &str) -> Option<ArticleMetadata> {
    match parse_block(content) {
        Ok(meta) => Some(meta),
        Err(MetadataError::NoMarker | MetadataError::Empty) => None,
        Err(e) => {
            log!("warn"; "metadata: {e}");
            None
        }
    }
}

/// Locate and parse the author block.
pub fn parse_block(content: &str) -> Result<ArticleMetadata, MetadataError> {
    let marker = content
        .find(AUTHOR_MARKER)
        .ok_or(MetadataError::NoMarker)?;
    let after_marker = &content[marker + AUTHOR_MARKER.len()..];
    let open = after_marker
        .find('{')
        .ok_or(MetadataError::NoOpeningBrace)?;
    let block = &after_marker[open..];
    let close = block.find('}').ok_or(MetadataError::Unterminated)?;

    let json = strip_trailing_comma(&block[..=close]);
    let fields: Map<String, Value> = serde_json::from_str(&json)?;
    if fields.is_empty() {
        return Err(MetadataError::Empty);
    }
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// `{"a": 1,  }` → `{"a": 1}`. Input must start with `{` and end with `}`.
fn strip_trailing_comma(block: &str) -> String {
    let inner = block[1..block.len() - 1].trim_end();
    let inner = inner.strip_suffix(',').unwrap_or(inner);
    format!("{{{inner}}}")
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(tag) => vec![tag],
        OneOrMany::Many(tags) => tags,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}
