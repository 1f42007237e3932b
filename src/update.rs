//! Manifest refresh: rescan content directories into their manifest keys.
//!
//! ```text
//! blog/                 → "blogs"
//! daily/                → "daily"                (file-list schema only)
//! article/tech_stack/   → "tech_stack.article"   ("tag" kept)
//! ```
//!
//! Each section is handled on its own. A missing directory, or a `daily` key
//! holding structured entries, skips that section and keeps its current
//! value; the other sections are still refreshed. Keys outside these three
//! are never touched. Only failing to write the manifest aborts the run.

use crate::config::SiteConfig;
use crate::log;
use crate::manifest::{self, DailySchema, LoadWarning, Manifest, ManifestError};
use crate::order;
use crate::scan::{self, ScanError, ScanOptions};
use std::path::Path;

/// Outcome for one manifest section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionOutcome {
    Refreshed { count: usize },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    /// Manifest key, e.g. `tech_stack.article`.
    pub key: &'static str,
    pub outcome: SectionOutcome,
}

/// What a refresh did, section by section.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub load_warning: Option<LoadWarning>,
    pub sections: Vec<SectionReport>,
}

impl UpdateReport {
    pub fn refreshed(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s.outcome, SectionOutcome::Refreshed { .. }))
            .count()
    }

    pub fn outcome(&self, key: &str) -> Option<&SectionOutcome> {
        self.sections
            .iter()
            .find(|s| s.key == key)
            .map(|s| &s.outcome)
    }
}

/// Load the manifest, refresh every section, and save it back.
pub fn update_file_list(root: &Path, config: &SiteConfig) -> Result<UpdateReport, ManifestError> {
    let manifest_path = config.manifest_path(root);
    let (manifest, load_warning) = Manifest::load(&manifest_path);
    if let Some(warning) = &load_warning {
        log!("warn"; "{warning}");
    }

    let (manifest, sections) = refresh_manifest(&manifest, root, config);
    manifest.save(&manifest_path)?;

    let report = UpdateReport {
        load_warning,
        sections,
    };
    log!(
        "update";
        "refreshed {} of {} sections in {}",
        report.refreshed(),
        report.sections.len(),
        manifest_path.display()
    );
    Ok(report)
}

/// Refresh every section of `manifest` from disk without saving.
pub fn refresh_manifest(
    manifest: &Manifest,
    root: &Path,
    config: &SiteConfig,
) -> (Manifest, Vec<SectionReport>) {
    let content = &config.content;
    let options = ScanOptions {
        exclude_dirs: content.exclude_dirs.clone(),
        extension: content.extension.clone(),
    };
    let mut sections = Vec::with_capacity(3);

    let mut manifest = match scan_sorted(root, &content.blog_dir, &options) {
        Ok(blogs) => {
            sections.push(refreshed(manifest::BLOGS, blogs.len()));
            manifest.update_key(manifest::BLOGS, manifest::string_array(blogs))
        }
        Err(e) => {
            sections.push(skipped(manifest::BLOGS, e.to_string()));
            manifest.clone()
        }
    };

    match manifest.daily_schema() {
        DailySchema::Empty | DailySchema::Files(_) => {
            match scan_sorted(root, &content.daily_dir, &options) {
                Ok(daily) => {
                    sections.push(refreshed(manifest::DAILY, daily.len()));
                    manifest = manifest.update_key(manifest::DAILY, manifest::string_array(daily));
                }
                Err(e) => sections.push(skipped(manifest::DAILY, e.to_string())),
            }
        }
        schema => sections.push(skipped(
            manifest::DAILY,
            format!("daily holds {}, not a file list", schema.name()),
        )),
    }

    const TECH_STACK_ARTICLE: &str = "tech_stack.article";
    match scan_sorted(root, &content.tech_stack_dir, &options) {
        Ok(articles) => {
            sections.push(refreshed(TECH_STACK_ARTICLE, articles.len()));
            manifest = manifest.with_tech_stack_articles(articles);
        }
        Err(e) => sections.push(skipped(TECH_STACK_ARTICLE, e.to_string())),
    }

    (manifest, sections)
}

fn scan_sorted(root: &Path, dir: &str, options: &ScanOptions) -> Result<Vec<String>, ScanError> {
    let files = scan::scan(&root.join(dir), options)?;
    log!("scan"; "{dir}: {} files", files.len());
    Ok(order::sort_paths(&files))
}

fn refreshed(key: &'static str, count: usize) -> SectionReport {
    SectionReport {
        key,
        outcome: SectionOutcome::Refreshed { count },
    }
}

fn skipped(key: &'static str, reason: String) -> SectionReport {
    log!("warn"; "{key} not refreshed: {reason}");
    SectionReport {
        key,
        outcome: SectionOutcome::Skipped { reason },
    }
}
