//! RSS feed generation.
//!
//! Scans the article directory, reads each file's author block, and writes
//! an RSS 2.0 channel with one item per article, newest first.
//!
//! ## Item fields
//!
//! | RSS field | Source |
//! |-----------|--------|
//! | `title` | `metadata.title` |
//! | `link` | `{base url}/{article_dir}/{path}` |
//! | `description` | `metadata.description` |
//! | `pubDate` | `metadata.date` at 12:00:00 `+0800`, or empty when unparsable |
//! | `category` | one per `metadata.tag` entry, duplicates kept |
//!
//! Articles with an unparsable date are kept and sort last. The base URL
//! comes from the chosen [`DeployTarget`]; nothing here inspects the
//! environment.

use crate::config::{FeedConfig, SiteConfig};
use crate::log;
use crate::metadata::{self, ArticleMetadata};
use crate::scan::{self, ScanError, ScanOptions};
use chrono::NaiveDate;
use rss::{Channel, ChannelBuilder, CategoryBuilder, Item, ItemBuilder};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0800";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("XML error: {0}")]
    Xml(#[from] rss::Error),
    #[error("cannot write feed {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which base URL item links point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DeployTarget {
    /// Local development server.
    Local,
    /// Published site.
    Hosted,
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployTarget::Local => write!(f, "local"),
            DeployTarget::Hosted => write!(f, "hosted"),
        }
    }
}

/// An article with metadata, and its path relative to the article directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub metadata: ArticleMetadata,
    pub path: String,
}

/// Articles found by [`collect_articles`], plus how many files were skipped.
#[derive(Debug, Default)]
pub struct Collected {
    pub articles: Vec<Article>,
    pub scanned: usize,
}

impl Collected {
    pub fn skipped(&self) -> usize {
        self.scanned - self.articles.len()
    }
}

/// Result of a [`generate_feed`] run.
#[derive(Debug)]
pub struct FeedSummary {
    pub path: PathBuf,
    pub target: DeployTarget,
    pub items: usize,
    pub scanned: usize,
}

/// Read every article under `{root}/{article_dir}` that carries metadata.
///
/// Unreadable files and files without a usable author block are logged and
/// skipped. Only a missing article directory is an error.
pub fn collect_articles(
    root: &Path,
    feed: &FeedConfig,
    exclude_dirs: &[String],
) -> Result<Collected, ScanError> {
    let article_root = root.join(&feed.article_dir);
    let options = ScanOptions::default()
        .excluding(exclude_dirs.iter().cloned())
        .with_extension(feed.extension.clone());
    let paths = scan::scan(&article_root, &options)?;

    let mut collected = Collected {
        articles: Vec::with_capacity(paths.len()),
        scanned: paths.len(),
    };
    for path in paths {
        let content = match fs::read_to_string(article_root.join(&path)) {
            Ok(content) => content,
            Err(e) => {
                log!("warn"; "skipping {path}: {e}");
                continue;
            }
        };
        match metadata::extract(&content) {
            Some(metadata) => collected.articles.push(Article { metadata, path }),
            None => log!("feed"; "no metadata in {path}, skipped"),
        }
    }
    Ok(collected)
}

/// Build the channel: items newest first, links under `base_url`.
pub fn build(articles: Vec<Article>, feed: &FeedConfig, base_url: &str) -> Channel {
    let base_url = base_url.trim_end_matches('/');

    let mut dated: Vec<(Option<NaiveDate>, Article)> = articles
        .into_iter()
        .map(|a| (parse_date(&a.metadata.date), a))
        .collect();
    // Stable, so equal dates keep discovery order; `None` sorts below any date.
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));

    let items: Vec<Item> = dated
        .iter()
        .map(|(date, article)| to_item(article, *date, &feed.article_dir, base_url))
        .collect();

    ChannelBuilder::default()
        .title(feed.title.as_str())
        .link(base_url)
        .description(feed.description.as_str())
        .items(items)
        .build()
}

/// Pretty-print with 2-space indentation.
pub fn to_xml(channel: &Channel) -> Result<String, FeedError> {
    let buf = channel.pretty_write_to(Vec::new(), b' ', 2)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `channel` to `path`, creating the parent directory if needed.
pub fn write_feed(channel: &Channel, path: &Path) -> Result<(), FeedError> {
    let xml = to_xml(channel)?;
    let write_err = |source| FeedError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, xml).map_err(write_err)
}

/// Collect, build and write the feed for `target`.
pub fn generate_feed(
    root: &Path,
    config: &SiteConfig,
    target: DeployTarget,
    output: Option<&Path>,
) -> Result<FeedSummary, FeedError> {
    let collected = collect_articles(root, &config.feed, &config.content.exclude_dirs)?;
    let scanned = collected.scanned;
    let items = collected.articles.len();

    let channel = build(
        collected.articles,
        &config.feed,
        config.deploy.base_url(target),
    );
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.rss_path(root));
    write_feed(&channel, &path)?;

    log!("feed"; "{} ({} of {} articles, {target})", path.display(), items, scanned);
    Ok(FeedSummary {
        path,
        target,
        items,
        scanned,
    })
}

fn to_item(article: &Article, date: Option<NaiveDate>, article_dir: &str, base_url: &str) -> Item {
    let meta = &article.metadata;
    let categories = meta
        .tag
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.as_str()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(meta.title.clone())
        .link(format!("{base_url}/{article_dir}/{}", article.path))
        .description(meta.description.clone())
        .pub_date(date.map(format_pub_date).unwrap_or_default())
        .categories(categories)
        .build()
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Noon on `date`, e.g. `Fri, 01 Mar 2024 12:00:00 +0800`.
pub fn format_pub_date(date: NaiveDate) -> String {
    date.and_hms_opt(12, 0, 0)
        .map(|dt| dt.format(PUB_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
