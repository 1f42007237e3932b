//! Hand-written daily updates stored in the manifest's `daily` key.
//!
//! Items are appended with a creation timestamp and removed by their
//! 1-based position in the list; they are never edited in place.
//!
//! Adding and deleting need the structured-entries schema (or an empty
//! `daily`). A manifest whose `daily` is a file list generated by
//! [`update`](crate::update) is refused with [`DailyError::SchemaMismatch`]
//! rather than silently converted.

use crate::config::SiteConfig;
use crate::log;
use crate::manifest::{self, DailyItem, DailySchema, Manifest, ManifestError};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

const PREVIEW_CHARS: usize = 30;

#[derive(Error, Debug)]
pub enum DailyError {
    #[error("daily holds a {found}; daily items need structured entries")]
    SchemaMismatch { found: &'static str },
    #[error("no daily item #{index} (there are {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Current local time as an RFC 3339 timestamp.
pub fn now_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and the offset-less `YYYY-MM-DDTHH:MM:SS[.ffffff]`
/// written by earlier versions of the site tooling.
pub fn parse_timestamp(date: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// `YYYY-MM-DD HH:MM`, or the raw string if it can't be parsed.
pub fn display_timestamp(date: &str) -> String {
    parse_timestamp(date)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| date.to_string())
}

/// First 30 characters, with `...` when cut.
pub fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let cut: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}

/// The stored `daily` values, or the reason the manifest can't hold
/// entries.
///
/// Items are handled as raw JSON so fields this crate doesn't model survive
/// an add or delete untouched; [`DailyItem`] is only used to check the
/// schema and to read the values back.
fn raw_entries(manifest: &Manifest) -> Result<Vec<Value>, DailyError> {
    match manifest.daily_schema() {
        DailySchema::Empty => Ok(Vec::new()),
        DailySchema::Entries(_) => Ok(manifest
            .get(manifest::DAILY)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()),
        schema => Err(DailyError::SchemaMismatch {
            found: schema.name(),
        }),
    }
}

/// Return a copy of `manifest` with `item` appended to `daily`.
pub fn add_daily_item(manifest: &Manifest, item: DailyItem) -> Result<Manifest, DailyError> {
    let mut items = raw_entries(manifest)?;
    items.push(serde_json::to_value(item)?);
    Ok(manifest.update_key(manifest::DAILY, Value::Array(items)))
}

/// Remove the item at 1-based `index`, returning the new manifest and the
/// removed item.
pub fn delete_daily_item(
    manifest: &Manifest,
    index: usize,
) -> Result<(Manifest, DailyItem), DailyError> {
    let mut items = raw_entries(manifest)?;
    if index == 0 || index > items.len() {
        return Err(DailyError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    let removed: DailyItem = serde_json::from_value(items.remove(index - 1))?;
    let updated = manifest.update_key(manifest::DAILY, Value::Array(items));
    Ok((updated, removed))
}

/// Load the manifest, append `item`, and save.
pub fn add(root: &Path, config: &SiteConfig, item: DailyItem) -> Result<(), DailyError> {
    let path = config.manifest_path(root);
    let updated = add_daily_item(&load_logged(&path), item)?;
    updated.save(&path)?;
    log!("daily"; "added item, saved {}", path.display());
    Ok(())
}

/// Load the manifest, delete item `index` (1-based), and save.
pub fn delete(root: &Path, config: &SiteConfig, index: usize) -> Result<DailyItem, DailyError> {
    let path = config.manifest_path(root);
    let (updated, removed) = delete_daily_item(&load_logged(&path), index)?;
    updated.save(&path)?;
    log!(
        "daily";
        "deleted [{}] {}",
        display_timestamp(&removed.date),
        preview(&removed.content)
    );
    Ok(removed)
}

/// Manifest for reading; a failed load is logged and yields the default.
pub fn load_logged(path: &Path) -> Manifest {
    let (manifest, warning) = Manifest::load(path);
    if let Some(warning) = warning {
        log!("warn"; "{warning}");
    }
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::daily_item;
    use tempfile::TempDir;

    #[test]
    fn add_to_empty_manifest() {
        let manifest = add_daily_item(&Manifest::default(), daily_item("first")).unwrap();
        match manifest.daily_schema() {
            DailySchema::Entries(items) => assert_eq!(items[0].content, "first"),
            other => panic!("expected entries, got {other:?}"),
        }
        assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["blogs", "daily"]);
    }

    #[test]
    fn add_appends_in_order() {
        let manifest = add_daily_item(&Manifest::default(), daily_item("a")).unwrap();
        let manifest = add_daily_item(&manifest, daily_item("b")).unwrap();
        let DailySchema::Entries(items) = manifest.daily_schema() else {
            panic!("expected entries");
        };
        let contents: Vec<&str> = items.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b"]);
    }

    #[test]
    fn add_refuses_file_list_schema() {
        let manifest = Manifest::from_json(r#"{"daily": ["2024/1.md"]}"#).unwrap();
        let result = add_daily_item(&manifest, daily_item("x"));
        assert!(matches!(
            result,
            Err(DailyError::SchemaMismatch { found: "file list" })
        ));
    }

    #[test]
    fn delete_by_one_based_index() {
        let mut manifest = Manifest::default();
        for content in ["a", "b", "c"] {
            manifest = add_daily_item(&manifest, daily_item(content)).unwrap();
        }
        let (manifest, removed) = delete_daily_item(&manifest, 2).unwrap();

        assert_eq!(removed.content, "b");
        let DailySchema::Entries(items) = manifest.daily_schema() else {
            panic!("expected entries");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].content, "c");
    }

    #[test]
    fn existing_items_are_kept_verbatim() {
        let original = r#"{"daily": [{"date": "2024-01-01T00:00:00", "content": "hi", "location": "Beijing"}]}"#;
        let manifest = Manifest::from_json(original).unwrap();

        let added = add_daily_item(&manifest, daily_item("new")).unwrap();
        let daily = added.get("daily").unwrap().as_array().unwrap();
        assert_eq!(
            daily[0],
            serde_json::json!({"date": "2024-01-01T00:00:00", "content": "hi", "location": "Beijing"})
        );
        assert_eq!(daily[1]["content"], "new");

        let (deleted, removed) = delete_daily_item(&added, 2).unwrap();
        assert_eq!(removed.content, "new");
        assert_eq!(deleted.get("daily"), manifest.get("daily"));
    }

    #[test]
    fn delete_out_of_range() {
        let manifest = add_daily_item(&Manifest::default(), daily_item("a")).unwrap();
        assert!(matches!(
            delete_daily_item(&manifest, 0),
            Err(DailyError::IndexOutOfRange { index: 0, len: 1 })
        ));
        assert!(matches!(
            delete_daily_item(&manifest, 2),
            Err(DailyError::IndexOutOfRange { index: 2, len: 1 })
        ));
    }

    #[test]
    fn delete_last_item_leaves_empty_list() {
        let manifest = add_daily_item(&Manifest::default(), daily_item("a")).unwrap();
        let (manifest, _) = delete_daily_item(&manifest, 1).unwrap();
        assert_eq!(manifest.daily_schema(), DailySchema::Empty);
    }

    #[test]
    fn add_and_delete_persist() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig::default();
        add(tmp.path(), &config, daily_item("saved")).unwrap();
        add(tmp.path(), &config, daily_item("second")).unwrap();

        let removed = delete(tmp.path(), &config, 1).unwrap();
        assert_eq!(removed.content, "saved");

        let (manifest, warning) = Manifest::load(&config.manifest_path(tmp.path()));
        assert!(warning.is_none());
        let DailySchema::Entries(items) = manifest.daily_schema() else {
            panic!("expected entries");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "second");
    }

    // =========================================================================
    // timestamps and previews
    // =========================================================================

    #[test]
    fn now_timestamp_parses_back() {
        assert!(parse_timestamp(&now_timestamp()).is_some());
    }

    #[test]
    fn legacy_timestamps_are_accepted() {
        assert_eq!(
            display_timestamp("2024-05-01T08:30:15.123456"),
            "2024-05-01 08:30"
        );
        assert_eq!(display_timestamp("2024-05-01T08:30:15"), "2024-05-01 08:30");
        assert_eq!(
            display_timestamp("2024-05-01T08:30:15+08:00"),
            "2024-05-01 08:30"
        );
    }

    #[test]
    fn unparsable_timestamp_shown_raw() {
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn preview_cuts_by_characters() {
        assert_eq!(preview("short"), "short");
        let long = "今".repeat(31);
        assert_eq!(preview(&long), format!("{}...", "今".repeat(30)));
        assert_eq!(preview(&"x".repeat(30)), "x".repeat(30));
    }
}
