//! Ordering of content paths by their `year/NNN` layout.
//!
//! Articles live under one directory per year, each file named by a sequence
//! number: `2024/1.md`, `2024/2-follow-up.md`, `2024/10.md`. The manifest
//! lists them oldest first, compared numerically so that `2024/9.md` comes
//! before `2024/10.md`.
//!
//! Paths that don't follow the layout are still listed, in two trailing
//! groups:
//!
//! ```text
//! 2023/1.md          Numbered   (year 2023, seq 1)
//! 2023/2.md          Numbered   (year 2023, seq 2)
//! index.md           Root       (no directory)
//! abc/readme.md      Fallback   (year or sequence not numeric)
//! ```
//!
//! Within a group, ties fall back to the path string, so the order is total
//! and sorting is idempotent.

use std::cmp::Ordering;
use std::fmt;

/// Coarse sort group. Declaration order is sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    /// `year/sequence...` paths with both parts numeric.
    Numbered = 0,
    /// Files directly in the content root.
    Root = 1,
    /// Nested paths whose year or sequence isn't numeric.
    Fallback = 2,
}

/// A non-negative integer of any length, held as its decimal digits.
///
/// Timestamp-style names such as `20240315093000.md` overflow the machine
/// integer types, so numbers compare by digit count, then digit by digit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    /// Parse a run of ASCII digits. Leading zeros are dropped, so `007`
    /// equals `7`.
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(digits.trim_start_matches('0').to_string()))
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        if n == 0 {
            Self::default()
        } else {
            Self(n.to_string())
        }
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Total-order key for a content path.
///
/// Field order matters: the derived `Ord` compares bucket, then year, then
/// sequence, then the path itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub bucket: Bucket,
    pub year: Number,
    pub sequence: Number,
    pub tiebreak: String,
}

impl SortKey {
    fn new(bucket: Bucket, year: Number, sequence: Number, path: &str) -> Self {
        Self {
            bucket,
            year,
            sequence,
            tiebreak: path.to_string(),
        }
    }

    fn unnumbered(bucket: Bucket, path: &str) -> Self {
        Self::new(bucket, Number::default(), Number::default(), path)
    }
}

/// Derive the sort key for a `/`-separated content path.
///
/// Never fails: anything that doesn't parse as `year/NNN...` lands in
/// [`Bucket::Fallback`].
pub fn sort_key(path: &str) -> SortKey {
    let Some((parent, file_name)) = path.rsplit_once('/') else {
        return SortKey::unnumbered(Bucket::Root, path);
    };
    let year_segment = parent.rsplit('/').next().unwrap_or(parent);

    match (Number::parse(year_segment), parse_sequence(file_name)) {
        (Some(year), Some(sequence)) => SortKey::new(Bucket::Numbered, year, sequence, path),
        _ => SortKey::unnumbered(Bucket::Fallback, path),
    }
}

/// Leading digits of a file name, ignoring the extension.
///
/// - `12.md` → 12
/// - `3-notes.md` → 3
/// - `readme.md` → None
fn parse_sequence(file_name: &str) -> Option<Number> {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let end = stem
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(stem.len());
    Number::parse(&stem[..end])
}

/// Return a new list ordered by [`sort_key`]. The input is left untouched.
pub fn sort_paths<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut sorted: Vec<String> = paths.iter().map(|p| p.as_ref().to_string()).collect();
    sorted.sort_by_cached_key(|p| sort_key(p));
    sorted
}
