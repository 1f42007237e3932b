//! Indexer configuration (`indexer.toml`).
//!
//! The config file is optional and lives in the site root. User values are
//! merged on top of the stock defaults, so a file only needs the keys it
//! changes:
//!
//! ```toml
//! [deploy]
//! hosted = "https://example.github.io"
//! ```
//!
//! ## Full Options
//!
//! ```toml
//! manifest = "config/blogs.json"   # Manifest read and rewritten by `update`
//! rss_path = "rss.xml"             # Feed output
//! url_list_path = "all.txt"        # Output of `urls`
//!
//! [content]
//! blog_dir = "blog"                # → manifest "blogs"
//! daily_dir = "daily"              # → manifest "daily" (file-list schema)
//! tech_stack_dir = "article/tech_stack"  # → manifest "tech_stack.article"
//! # extension = ".md"              # Only list files with this suffix
//! exclude_dirs = [".git"]          # Directory names never descended into
//!
//! [feed]
//! title = "泛舟游客的博客"
//! description = "欢迎来到泛舟游客的博客"
//! article_dir = "blog"             # Scanned for articles; also the link segment
//! extension = ".md"
//!
//! [deploy]
//! local = "http://localhost:8000"
//! hosted = "https://gravitysword.github.io"
//! ```
//!
//! Every path is relative to the site root. Unknown keys are rejected to
//! catch typos early.

use crate::feed::DeployTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the site root.
pub const CONFIG_FILE: &str = "indexer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Manifest path.
    pub manifest: String,
    /// Where the RSS feed is written.
    pub rss_path: String,
    /// Where the full-site URL listing is written.
    pub url_list_path: String,
    pub content: ContentConfig,
    pub feed: FeedConfig,
    pub deploy: DeployConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            manifest: "config/blogs.json".to_string(),
            rss_path: "rss.xml".to_string(),
            url_list_path: "all.txt".to_string(),
            content: ContentConfig::default(),
            feed: FeedConfig::default(),
            deploy: DeployConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, url) in [("deploy.local", &self.deploy.local), ("deploy.hosted", &self.deploy.hosted)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be an http(s) URL, got {url:?}"
                )));
            }
        }
        if self.feed.article_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feed.article_dir must not be empty".into(),
            ));
        }
        if self.manifest.trim().is_empty() {
            return Err(ConfigError::Validation("manifest must not be empty".into()));
        }
        Ok(())
    }

    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        root.join(&self.manifest)
    }

    pub fn rss_path(&self, root: &Path) -> PathBuf {
        root.join(&self.rss_path)
    }

    pub fn url_list_path(&self, root: &Path) -> PathBuf {
        root.join(&self.url_list_path)
    }
}

/// Content directories feeding the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub blog_dir: String,
    pub daily_dir: String,
    pub tech_stack_dir: String,
    /// Optional file-name suffix filter applied to all three directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Directory names skipped while scanning.
    pub exclude_dirs: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            blog_dir: "blog".to_string(),
            daily_dir: "daily".to_string(),
            tech_stack_dir: "article/tech_stack".to_string(),
            extension: None,
            exclude_dirs: vec![".git".to_string()],
        }
    }
}

/// RSS channel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub title: String,
    pub description: String,
    /// Directory scanned for articles, and the path segment in item links.
    pub article_dir: String,
    pub extension: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "泛舟游客的博客".to_string(),
            description: "欢迎来到泛舟游客的博客".to_string(),
            article_dir: "blog".to_string(),
            extension: ".md".to_string(),
        }
    }
}

/// Base URLs for the two deployment targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    pub local: String,
    pub hosted: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            local: "http://localhost:8000".to_string(),
            hosted: "https://gravitysword.github.io".to_string(),
        }
    }
}

impl DeployConfig {
    /// Base URL for `target`, without a trailing slash.
    pub fn base_url(&self, target: DeployTarget) -> &str {
        let url = match target {
            DeployTarget::Local => &self.local,
            DeployTarget::Hosted => &self.hosted,
        };
        url.trim_end_matches('/')
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as raw TOML. `Ok(None)` if it doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `file_name` from the site root over the stock defaults.
pub fn load_config(root: &Path, file_name: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(&root.join(file_name))?)
}

/// Fully-commented stock `indexer.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Blog Indexer Configuration
# ==========================
# All settings are optional; values shown are the defaults.
# Paths are relative to the site root. Unknown keys are an error.

# Manifest read by the site front end and rewritten by `update`.
manifest = "config/blogs.json"

# Output of `feed`.
rss_path = "rss.xml"

# Output of `urls`: one hosted URL per site file.
url_list_path = "all.txt"

# ---------------------------------------------------------------------------
# Content directories
# ---------------------------------------------------------------------------
[content]
# Listed into "blogs", ordered by year/number.
blog_dir = "blog"

# Listed into "daily" while the manifest uses the file-list schema.
daily_dir = "daily"

# Listed into "tech_stack.article"; "tech_stack.tag" is left as written.
tech_stack_dir = "article/tech_stack"

# Only list files ending with this suffix (case-sensitive).
# extension = ".md"

# Directory names never descended into.
exclude_dirs = [".git"]

# ---------------------------------------------------------------------------
# RSS feed
# ---------------------------------------------------------------------------
[feed]
title = "泛舟游客的博客"
description = "欢迎来到泛舟游客的博客"

# Scanned for articles with an author block; also used in item links:
# {base url}/{article_dir}/{path}
article_dir = "blog"
extension = ".md"

# ---------------------------------------------------------------------------
# Deployment targets
# ---------------------------------------------------------------------------
[deploy]
local = "http://localhost:8000"
hosted = "https://gravitysword.github.io"
"##
}
