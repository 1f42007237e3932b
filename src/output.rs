//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper writing them to stdout.
//!
//! ## Update
//!
//! ```text
//! Manifest config/blogs.json
//!     blogs: 42 files
//!     daily: skipped (daily holds entries, not a file list)
//!     tech_stack.article: 3 files
//! Refreshed 2 of 3 sections
//! ```
//!
//! ## Daily list
//!
//! ```text
//! 1. [2024-05-01 08:30] 早上好
//! 2. [2024-05-02 21:10] A long entry that gets cut off...
//! ```

use crate::daily;
use crate::feed::FeedSummary;
use crate::manifest::{DailySchema, Manifest};
use crate::update::{SectionOutcome, UpdateReport};
use std::path::Path;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

// ============================================================================
// update
// ============================================================================

pub fn format_update_report(report: &UpdateReport, manifest_path: &Path) -> Vec<String> {
    let mut lines = vec![format!("Manifest {}", manifest_path.display())];
    if report.load_warning.is_some() {
        lines.push(format!("{}(started from an empty manifest)", indent(1)));
    }
    for section in &report.sections {
        let detail = match &section.outcome {
            SectionOutcome::Refreshed { count } => plural(*count, "file"),
            SectionOutcome::Skipped { reason } => format!("skipped ({reason})"),
        };
        lines.push(format!("{}{}: {}", indent(1), section.key, detail));
    }
    lines.push(format!(
        "Refreshed {} of {} sections",
        report.refreshed(),
        report.sections.len()
    ));
    lines
}

pub fn print_update_report(report: &UpdateReport, manifest_path: &Path) {
    for line in format_update_report(report, manifest_path) {
        println!("{line}");
    }
}

// ============================================================================
// daily
// ============================================================================

/// Numbered listing of `daily`, whichever schema it uses.
pub fn format_daily_list(manifest: &Manifest) -> Vec<String> {
    match manifest.daily_schema() {
        DailySchema::Empty => vec!["No daily items".to_string()],
        DailySchema::Files(files) => files
            .iter()
            .enumerate()
            .map(|(i, file)| format!("{}. {file}", i + 1))
            .collect(),
        DailySchema::Entries(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                format!(
                    "{}. [{}] {}",
                    i + 1,
                    daily::display_timestamp(&item.date),
                    daily::preview(&item.content)
                )
            })
            .collect(),
        DailySchema::Invalid => vec!["daily has an unrecognised format".to_string()],
    }
}

pub fn print_daily_list(manifest: &Manifest) {
    for line in format_daily_list(manifest) {
        println!("{line}");
    }
}

// ============================================================================
// feed / urls
// ============================================================================

pub fn format_feed_summary(summary: &FeedSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Feed ({}) → {}",
        summary.target,
        summary.path.display()
    )];
    lines.push(format!(
        "{}{} of {}",
        indent(1),
        plural(summary.items, "item"),
        plural(summary.scanned, "article")
    ));
    let skipped = summary.scanned - summary.items;
    if skipped > 0 {
        lines.push(format!("{}{skipped} without metadata", indent(1)));
    }
    lines
}

pub fn print_feed_summary(summary: &FeedSummary) {
    for line in format_feed_summary(summary) {
        println!("{line}");
    }
}

pub fn format_url_list(path: &Path, count: usize) -> Vec<String> {
    vec![format!("{} → {}", plural(count, "url"), path.display())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::DeployTarget;
    use crate::test_helpers::daily_item;
    use crate::update::SectionReport;
    use std::path::PathBuf;

    #[test]
    fn update_report_lines() {
        let report = UpdateReport {
            load_warning: None,
            sections: vec![
                SectionReport {
                    key: "blogs",
                    outcome: SectionOutcome::Refreshed { count: 1 },
                },
                SectionReport {
                    key: "daily",
                    outcome: SectionOutcome::Skipped {
                        reason: "gone".to_string(),
                    },
                },
            ],
        };
        let lines = format_update_report(&report, Path::new("config/blogs.json"));
        assert_eq!(
            lines,
            vec![
                "Manifest config/blogs.json",
                "    blogs: 1 file",
                "    daily: skipped (gone)",
                "Refreshed 1 of 2 sections",
            ]
        );
    }

    #[test]
    fn daily_entries_listing() {
        let mut item = daily_item(&"长".repeat(40));
        item.date = "2024-05-01T08:30:00".to_string();
        let manifest = crate::daily::add_daily_item(&Manifest::default(), item).unwrap();

        let lines = format_daily_list(&manifest);
        assert_eq!(
            lines,
            vec![format!("1. [2024-05-01 08:30] {}...", "长".repeat(30))]
        );
    }

    #[test]
    fn daily_file_listing() {
        let manifest = Manifest::from_json(r#"{"daily": ["2024/1.md", "2024/2.md"]}"#).unwrap();
        assert_eq!(
            format_daily_list(&manifest),
            vec!["1. 2024/1.md", "2. 2024/2.md"]
        );
    }

    #[test]
    fn daily_empty_listing() {
        assert_eq!(format_daily_list(&Manifest::default()), vec!["No daily items"]);
    }

    #[test]
    fn feed_summary_mentions_skipped() {
        let summary = FeedSummary {
            path: PathBuf::from("rss.xml"),
            target: DeployTarget::Hosted,
            items: 2,
            scanned: 3,
        };
        assert_eq!(
            format_feed_summary(&summary),
            vec![
                "Feed (hosted) → rss.xml",
                "    2 items of 3 articles",
                "    1 without metadata",
            ]
        );
    }
}
