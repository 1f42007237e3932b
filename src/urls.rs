//! Full-site URL listing.
//!
//! Writes one hosted URL per file in the site tree, for submitting to search
//! engines or checking a deploy. Excluded directories (`.git` by default)
//! are left out.

use crate::config::SiteConfig;
use crate::feed::DeployTarget;
use crate::log;
use crate::scan::{self, ScanError, ScanOptions};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UrlListError {
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `{base_url}/{path}` for every file under `root`.
pub fn site_urls(root: &Path, base_url: &str, exclude_dirs: &[String]) -> Result<Vec<String>, ScanError> {
    let options = ScanOptions::default().excluding(exclude_dirs.iter().cloned());
    let base_url = base_url.trim_end_matches('/');
    Ok(scan::scan(root, &options)?
        .into_iter()
        .map(|path| format!("{base_url}/{path}"))
        .collect())
}

/// Write the hosted URL of every site file to `url_list_path`.
///
/// The output file itself is not listed.
pub fn write_url_list(root: &Path, config: &SiteConfig) -> Result<(PathBuf, usize), UrlListError> {
    let path = config.url_list_path(root);
    let own_url = format!(
        "{}/{}",
        config.deploy.base_url(DeployTarget::Hosted),
        config.url_list_path.trim_start_matches("./")
    );
    let urls: Vec<String> = site_urls(
        root,
        config.deploy.base_url(DeployTarget::Hosted),
        &config.content.exclude_dirs,
    )?
    .into_iter()
    .filter(|url| *url != own_url)
    .collect();

    let mut body = urls.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(&path, body).map_err(|source| UrlListError::Write {
        path: path.clone(),
        source,
    })?;

    log!("urls"; "{} ({} urls)", path.display(), urls.len());
    Ok((path, urls.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    #[test]
    fn urls_prefix_relative_paths() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "index.html", "");
        write_file(tmp.path(), "blog/2024/1.md", "");
        write_file(tmp.path(), ".git/HEAD", "");

        let urls = site_urls(tmp.path(), "https://example.org/", &[".git".to_string()]).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://example.org/blog/2024/1.md",
                "https://example.org/index.html"
            ]
        );
    }

    #[test]
    fn write_url_list_skips_its_own_output() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "index.html", "");
        write_file(tmp.path(), "all.txt", "old listing");

        let (path, count) = write_url_list(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "https://gravitysword.github.io/index.html\n"
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = site_urls(&tmp.path().join("gone"), "https://example.org", &[]);
        assert!(matches!(result, Err(ScanError::Missing(_))));
    }
}
