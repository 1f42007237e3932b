//! Shared test utilities: site-tree builders and sample records.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! article_file(tmp.path(), "blog/2024/1.md", "Hello", "2024-01-01", &["rust"]);
//! write_file(tmp.path(), "blog/index.md", "no metadata");
//! ```

use crate::manifest::DailyItem;
use std::fs;
use std::path::Path;

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
}

/// Write a markdown article carrying an author block.
pub fn article_file(root: &Path, rel: &str, title: &str, date: &str, tags: &[&str]) {
    let meta = serde_json::json!({
        "title": title,
        "description": format!("About {title}"),
        "date": date,
        "tag": tags,
    });
    write_file(
        root,
        rel,
        &format!("# {title}\n\n<div style=\"display:none;\" class=\"author\">\n{meta}\n</div>\n\nBody text.\n"),
    );
}

/// A daily item with a fixed timestamp.
pub fn daily_item(content: &str) -> DailyItem {
    DailyItem {
        date: "2024-05-01T08:30:00+08:00".to_string(),
        content: content.to_string(),
        images: Vec::new(),
        tags: Vec::new(),
    }
}
