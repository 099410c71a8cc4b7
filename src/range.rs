//! Page-range parsing: free text → sorted, deduplicated zero-based indices.
//!
//! The grammar is deliberately forgiving. Input is split on commas and every
//! token is trimmed; a token containing `-` is a closed one-based range
//! `start-end`, anything else is a single page. Ranges are clamped into
//! `[1, total]`, single pages outside it are dropped, and tokens that fail
//! to parse are skipped. Only the combined result can be "wrong": an empty
//! set, which [`crate::output::ConversionRequest::resolve`] rejects.
//!
//! | Input (10 pages) | Result (0-based) |
//! |------------------|------------------|
//! | `""` | `0..10` |
//! | `"1, 3-5"` | `[0, 2, 3, 4]` |
//! | `"0-5"` | `[0, 1, 2, 3, 4]` |
//! | `"3-1"` | `[]` |
//! | `"999"` | `[]` |

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Strictly ascending, duplicate-free zero-based page indices, every one
/// below the document's page count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageIndexSet {
    indices: Vec<usize>,
}

impl PageIndexSet {
    /// Every page of a `total_pages` document.
    pub fn all(total_pages: usize) -> Self {
        Self {
            indices: (0..total_pages).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.indices
    }
}

impl<'a> IntoIterator for &'a PageIndexSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter().copied()
    }
}

/// Parse a page-range expression against a document of `total_pages` pages.
///
/// Blank input selects every page. See the module docs for token rules.
pub fn parse_page_range(text: &str, total_pages: usize) -> PageIndexSet {
    if text.trim().is_empty() {
        return PageIndexSet::all(total_pages);
    }

    let mut pages = BTreeSet::new();
    let max = total_pages as i64;

    for token in text.split(',').map(str::trim) {
        if token.contains('-') {
            let mut parts = token.split('-');
            let bounds = match (parts.next(), parts.next(), parts.next()) {
                (Some(a), Some(b), None) => parse_page_number(a).zip(parse_page_number(b)),
                _ => None,
            };
            let Some((start, end)) = bounds else {
                debug!("Ignoring malformed range token {:?}", token);
                continue;
            };
            let start = start.max(1);
            let end = end.min(max);
            // start > end contributes nothing
            for page in start..=end {
                pages.insert((page - 1) as usize);
            }
        } else {
            match parse_page_number(token) {
                Some(page) if (1..=max).contains(&page) => {
                    pages.insert((page - 1) as usize);
                }
                Some(page) => debug!("Dropping page {} (document has {})", page, total_pages),
                None => debug!("Ignoring malformed page token {:?}", token),
            }
        }
    }

    PageIndexSet {
        indices: pages.into_iter().collect(),
    }
}

/// Parse one side of a token. Surrounding whitespace and a leading `+` are
/// accepted; digit runs too long for `i64` saturate so `1-99999999999999999999`
/// still means "to the end".
fn parse_page_number(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let digits = s.strip_prefix('+').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse::<i64>().unwrap_or(i64::MAX))
}
