//! # Blog Indexer
//!
//! Keeps the JSON manifest and RSS feed of a static personal blog in sync
//! with its content directories. The site itself is plain files; this tool
//! only derives indexes from them.
//!
//! # Pipelines
//!
//! ```text
//! Manifest:  blog/ daily/ article/tech_stack/
//!              → scan → sort by (year, number) → merge into config/blogs.json
//!
//! Feed:      blog/**/*.md
//!              → read → author-block metadata → newest first → rss.xml
//! ```
//!
//! Both are single passes over the filesystem with no cached state; the
//! manifest is the only file read back on the next run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Recursive file listing relative to a root, `/`-separated |
//! | [`order`] | `year/NNN` sort keys and the manifest ordering |
//! | [`manifest`] | `blogs.json` load/save with unknown keys preserved |
//! | [`update`] | Rescan content directories into manifest sections |
//! | [`daily`] | Add, list and delete structured daily items |
//! | [`metadata`] | Author-block JSON extraction from articles |
//! | [`feed`] | RSS 2.0 feed for the local or hosted base URL |
//! | [`urls`] | Full-site URL listing |
//! | [`config`] | `indexer.toml` loading over stock defaults |
//! | [`menu`] | Interactive numbered menus |
//! | [`output`] | CLI output formatting |
//! | [`log`] | `[module] message` terminal logging |
//!
//! # Design Decisions
//!
//! ## Key Function, Not Comparator
//!
//! Manifest order is defined by a total-order key per path (bucket, year,
//! number, path) and a stable sort. Numbered paths come first, then files in
//! the content root, then anything that doesn't parse. A path that breaks the
//! layout just lands in the last group instead of aborting the sort.
//!
//! ## Manifest as an Ordered JSON Object
//!
//! The manifest is also edited by hand and read by the site front end. It is
//! kept as an ordered `serde_json` map and only the refreshed keys are
//! replaced, so unknown sections, key order and non-ASCII text survive a
//! rewrite.
//!
//! ## Lenient Reads, Strict Writes
//!
//! A missing or corrupt manifest, an unreadable file, or a broken metadata
//! block is logged and worked around. Failing to write the manifest or feed
//! is returned to the caller.

pub mod config;
pub mod daily;
pub mod feed;
pub mod log;
pub mod manifest;
pub mod menu;
pub mod metadata;
pub mod order;
pub mod output;
pub mod scan;
pub mod update;
pub mod urls;

#[cfg(test)]
pub(crate) mod test_helpers;
