//! The persisted content manifest (`config/blogs.json`).
//!
//! The manifest is the only durable state. The site front end reads it to
//! find articles; this tool rewrites parts of it:
//!
//! ```json
//! {
//!     "blogs": ["2023/1.md", "2023/2.md", "index.md"],
//!     "daily": ["2024/1.md"],
//!     "tech_stack": { "tag": ["rust"], "article": ["2024/1.md"] },
//!     "books": "hand-authored, never touched"
//! }
//! ```
//!
//! The document is held as an ordered JSON object rather than a typed struct.
//! Keys this crate doesn't know about survive a load/modify/save cycle
//! byte-for-byte, in their original position, and a refresh of `blogs` can't
//! clobber a hand-edited `daily` list.
//!
//! ## `daily` schemas
//!
//! Two incompatible shapes share the `daily` key; see [`DailySchema`].
//! Operations check the schema before touching the key and refuse to
//! convert between the two.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BLOGS: &str = "blogs";
pub const DAILY: &str = "daily";
pub const TECH_STACK: &str = "tech_stack";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("cannot write manifest {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a manifest load fell back to the empty default.
///
/// Not an error: the caller logs it and carries on with
/// [`Manifest::default`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not load {}: {} (starting from an empty manifest)",
            self.path.display(),
            self.reason
        )
    }
}

/// A structured daily update, created interactively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyItem {
    /// ISO-8601 timestamp of creation.
    pub date: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The `tech_stack` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechStack {
    #[serde(default)]
    pub tag: BTreeSet<String>,
    #[serde(default)]
    pub article: Vec<String>,
}

/// Which of the two `daily` layouts a manifest holds.
#[derive(Debug, Clone, PartialEq)]
pub enum DailySchema {
    /// Key absent, `null`, or an empty array. Compatible with both layouts.
    Empty,
    /// Schema 1: content paths under the daily directory.
    Files(Vec<String>),
    /// Schema 2: structured [`DailyItem`] entries.
    Entries(Vec<DailyItem>),
    /// Anything else. Left alone by every operation.
    Invalid,
}

impl DailySchema {
    pub fn name(&self) -> &'static str {
        match self {
            DailySchema::Empty => "empty",
            DailySchema::Files(_) => "file list",
            DailySchema::Entries(_) => "entries",
            DailySchema::Invalid => "invalid",
        }
    }

    fn detect(value: Option<&Value>) -> Self {
        let items = match value {
            None | Some(Value::Null) => return DailySchema::Empty,
            Some(Value::Array(items)) if items.is_empty() => return DailySchema::Empty,
            Some(Value::Array(items)) => items,
            Some(_) => return DailySchema::Invalid,
        };
        if items.iter().all(Value::is_string) {
            let files = items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect();
            return DailySchema::Files(files);
        }
        match items
            .iter()
            .map(DailyItem::deserialize)
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(entries) => DailySchema::Entries(entries),
            Err(_) => DailySchema::Invalid,
        }
    }
}

/// Ordered JSON object backing `blogs.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    entries: Map<String, Value>,
}

impl Default for Manifest {
    /// `{"blogs": [], "daily": []}`
    fn default() -> Self {
        let mut entries = Map::new();
        entries.insert(BLOGS.to_string(), Value::Array(Vec::new()));
        entries.insert(DAILY.to_string(), Value::Array(Vec::new()));
        Self { entries }
    }
}

impl Manifest {
    /// Parse a manifest from JSON text. The top level must be an object.
    pub fn from_json(json: &str) -> Result<Self, String> {
        match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(entries)) => Ok(Self { entries }),
            Ok(other) => Err(format!("expected a JSON object, found {}", json_kind(&other))),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Load from disk. Any failure yields the empty default plus a warning.
    pub fn load(path: &Path) -> (Self, Option<LoadWarning>) {
        let warn = |reason: String| {
            Some(LoadWarning {
                path: path.to_path_buf(),
                reason,
            })
        };
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => return (Self::default(), warn(e.to_string())),
        };
        match Self::from_json(&content) {
            Ok(manifest) => (manifest, None),
            Err(reason) => (Self::default(), warn(reason)),
        }
    }

    /// Serialize with 4-space indentation and non-ASCII text kept literal.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write to `path`, creating its parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let json = self.to_json()?;
        let save_err = |source| ManifestError::Save {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(save_err)?;
        }
        fs::write(path, json).map_err(save_err)
    }

    /// Return a copy with `key` set to `value`; every other key is untouched
    /// and an existing key keeps its position.
    pub fn update_key(&self, key: &str, value: Value) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value);
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// String entries of `blogs`; non-string entries are ignored.
    pub fn blogs(&self) -> Vec<String> {
        string_list(self.get(BLOGS))
    }

    pub fn daily_schema(&self) -> DailySchema {
        DailySchema::detect(self.get(DAILY))
    }

    /// The `tech_stack` section, or an empty one if absent or malformed.
    pub fn tech_stack(&self) -> TechStack {
        self.get(TECH_STACK)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Replace `tech_stack.article`, keeping `tag` and any other field of
    /// the section. A missing or non-object section is replaced with a fresh
    /// `{"tag": [], "article": [...]}` object.
    pub fn with_tech_stack_articles(&self, articles: Vec<String>) -> Self {
        let mut section = match self.get(TECH_STACK) {
            Some(Value::Object(map)) => map.clone(),
            _ => {
                let mut map = Map::new();
                map.insert("tag".to_string(), Value::Array(Vec::new()));
                map
            }
        };
        section.insert("article".to_string(), string_array(articles));
        self.update_key(TECH_STACK, Value::Object(section))
    }
}

/// JSON array of strings.
pub fn string_array(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
