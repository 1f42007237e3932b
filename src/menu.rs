//! Interactive numbered menus.
//!
//! ```text
//! === Blog Site Manager ===        === Blogs ===                 === Daily ===
//! 1. Blogs                         1. Refresh content lists      1. Add item
//! 2. Daily                         2. Generate feed (local)      2. List items
//! 0. Exit                          3. Generate feed (hosted)     3. Delete item
//!                                  0. Back                       0. Back
//! ```
//!
//! The menu reads from any [`BufRead`] and writes to any [`Write`], so tests
//! can script a whole session. End of input acts like choosing `0` at every
//! level. Operation failures are printed and the menu keeps running.

use crate::config::SiteConfig;
use crate::daily::{self, DailyError};
use crate::feed::{self, DeployTarget};
use crate::manifest::DailyItem;
use crate::output;
use crate::update;
use std::io::{self, BufRead, Write};
use std::path::Path;

pub struct Menu<'a, R, W> {
    root: &'a Path,
    config: &'a SiteConfig,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(root: &'a Path, config: &'a SiteConfig, input: R, output: W) -> Self {
        Self {
            root,
            config,
            input,
            output,
        }
    }

    /// Run the main menu until `0` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.show(
                "Blog Site Manager",
                &["1. Blogs", "2. Daily", "0. Exit"],
            )?;
            match self.prompt("Choose an option: ")?.as_deref() {
                Some("1") => self.blog_menu()?,
                Some("2") => self.daily_menu()?,
                Some("0") | None => {
                    writeln!(self.output, "Bye!")?;
                    return Ok(());
                }
                Some(_) => self.invalid()?,
            }
        }
    }

    fn blog_menu(&mut self) -> io::Result<()> {
        loop {
            self.show(
                "Blogs",
                &[
                    "1. Refresh content lists",
                    "2. Generate feed (local)",
                    "3. Generate feed (hosted)",
                    "0. Back",
                ],
            )?;
            match self.prompt("Choose an option: ")?.as_deref() {
                Some("1") => self.refresh()?,
                Some("2") => self.generate_feed(DeployTarget::Local)?,
                Some("3") => self.generate_feed(DeployTarget::Hosted)?,
                Some("0") | None => return Ok(()),
                Some(_) => self.invalid()?,
            }
        }
    }

    fn daily_menu(&mut self) -> io::Result<()> {
        loop {
            self.show(
                "Daily",
                &["1. Add item", "2. List items", "3. Delete item", "0. Back"],
            )?;
            match self.prompt("Choose an option: ")?.as_deref() {
                Some("1") => self.add_daily()?,
                Some("2") => self.list_daily()?,
                Some("3") => self.delete_daily()?,
                Some("0") | None => return Ok(()),
                Some(_) => self.invalid()?,
            }
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    fn refresh(&mut self) -> io::Result<()> {
        match update::update_file_list(self.root, self.config) {
            Ok(report) => {
                let path = self.config.manifest_path(self.root);
                self.write_lines(output::format_update_report(&report, &path))
            }
            Err(e) => writeln!(self.output, "Update failed: {e}"),
        }
    }

    fn generate_feed(&mut self, target: DeployTarget) -> io::Result<()> {
        match feed::generate_feed(self.root, self.config, target, None) {
            Ok(summary) => self.write_lines(output::format_feed_summary(&summary)),
            Err(e) => writeln!(self.output, "Feed generation failed: {e}"),
        }
    }

    fn add_daily(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== New daily item ===")?;
        let Some(content) = self.prompt("Content: ")? else {
            return Ok(());
        };
        let images = self.prompt_list("Image URL (empty to finish): ")?;
        let tags = self.prompt_list("Tag (empty to finish): ")?;
        let item = DailyItem {
            date: daily::now_timestamp(),
            content,
            images,
            tags,
        };
        match daily::add(self.root, self.config, item) {
            Ok(()) => writeln!(self.output, "Daily item added."),
            Err(e) => writeln!(self.output, "Could not add item: {e}"),
        }
    }

    fn list_daily(&mut self) -> io::Result<()> {
        let manifest = daily::load_logged(&self.config.manifest_path(self.root));
        self.write_lines(output::format_daily_list(&manifest))
    }

    fn delete_daily(&mut self) -> io::Result<()> {
        self.list_daily()?;
        let Some(answer) = self.prompt("\nNumber of the item to delete: ")? else {
            return Ok(());
        };
        let Ok(index) = answer.trim().parse::<usize>() else {
            return writeln!(self.output, "Please enter a valid number.");
        };
        match daily::delete(self.root, self.config, index) {
            Ok(removed) => writeln!(
                self.output,
                "Deleted: [{}] {}",
                daily::display_timestamp(&removed.date),
                daily::preview(&removed.content)
            ),
            Err(DailyError::IndexOutOfRange { .. }) => writeln!(self.output, "No such item."),
            Err(e) => writeln!(self.output, "Could not delete item: {e}"),
        }
    }

    // ========================================================================
    // I/O helpers
    // ========================================================================

    fn show(&mut self, title: &str, options: &[&str]) -> io::Result<()> {
        writeln!(self.output, "\n=== {title} ===")?;
        for option in options {
            writeln!(self.output, "{option}")?;
        }
        Ok(())
    }

    fn invalid(&mut self) -> io::Result<()> {
        writeln!(self.output, "Invalid choice, please try again.")
    }

    fn write_lines(&mut self, lines: Vec<String>) -> io::Result<()> {
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    /// One line of input without its line ending; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Repeated prompts until an empty line or end of input.
    fn prompt_list(&mut self, label: &str) -> io::Result<Vec<String>> {
        let mut values = Vec::new();
        while let Some(value) = self.prompt(label)? {
            if value.is_empty() {
                break;
            }
            values.push(value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{DailySchema, Manifest};
    use crate::test_helpers::{article_file, write_file};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_session(root: &Path, script: &str) -> String {
        let config = SiteConfig::default();
        let mut out = Vec::new();
        Menu::new(root, &config, Cursor::new(script.to_string()), &mut out)
            .run()
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn exit_immediately() {
        let tmp = TempDir::new().unwrap();
        let out = run_session(tmp.path(), "0\n");
        assert!(out.contains("=== Blog Site Manager ==="));
        assert!(out.ends_with("Bye!\n"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let tmp = TempDir::new().unwrap();
        let out = run_session(tmp.path(), "2\n");
        assert!(out.contains("=== Daily ==="));
        assert!(out.ends_with("Bye!\n"));
    }

    #[test]
    fn invalid_choice_reprompts() {
        let tmp = TempDir::new().unwrap();
        let out = run_session(tmp.path(), "9\n0\n");
        assert!(out.contains("Invalid choice, please try again."));
    }

    #[test]
    fn add_list_and_delete_daily_items() {
        let tmp = TempDir::new().unwrap();
        let script = "2\n1\nfirst post\nhttps://img/1.png\n\nlife\ncode\n\n1\nsecond\n\n\n2\n3\n1\n0\n0\n";
        let out = run_session(tmp.path(), script);

        assert!(out.contains("Daily item added."));
        assert!(out.contains("] first post"));
        assert!(out.contains("Deleted: ["));

        let (manifest, _) = Manifest::load(&tmp.path().join("config/blogs.json"));
        let DailySchema::Entries(items) = manifest.daily_schema() else {
            panic!("expected entries");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "second");
        assert!(items[0].images.is_empty());
    }

    #[test]
    fn delete_with_bad_input() {
        let tmp = TempDir::new().unwrap();
        let out = run_session(tmp.path(), "2\n3\nabc\n3\n5\n0\n0\n");
        assert!(out.contains("Please enter a valid number."));
        assert!(out.contains("No such item."));
    }

    #[test]
    fn refresh_and_feed_from_blog_menu() {
        let tmp = TempDir::new().unwrap();
        article_file(tmp.path(), "blog/2024/1.md", "One", "2024-01-01", &["x"]);
        write_file(tmp.path(), "daily/2024/1.md", "");
        let out = run_session(tmp.path(), "1\n1\n2\n0\n0\n");

        assert!(out.contains("    blogs: 1 file"));
        assert!(out.contains("Feed (local)"));
        let xml = std::fs::read_to_string(tmp.path().join("rss.xml")).unwrap();
        assert!(xml.contains("http://localhost:8000/blog/2024/1.md"));
    }
}
