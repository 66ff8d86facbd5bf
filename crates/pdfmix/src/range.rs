//! Page range expressions.
//!
//! A range expression selects pages by 1-based number:
//! - "3" - single page
//! - "1-5" - pages 1 through 5
//! - "5-1" - pages 5 down to 1
//! - "1-3,7,10-8" - any combination, in the order written
//!
//! Parsing is permissive. Tokens that are not numbers are skipped and page
//! numbers outside the document are dropped, so a typo never aborts the
//! whole expression. The result is a list of zero-based indices with
//! duplicates removed, kept in first-seen order.

use std::ops::RangeInclusive;

/// A resolved, deduplicated selection of zero-based page indices.
///
/// Only meaningful against the page count it was parsed with.
///
/// # Examples
///
/// ```
/// use pdfmix::range::PageRange;
///
/// let range = PageRange::parse("1-3,5,10", 10);
/// assert_eq!(range.indices(), &[0, 1, 2, 4, 9]);
///
/// let reversed = PageRange::parse("5-3", 10);
/// assert_eq!(reversed.indices(), &[4, 3, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    indices: Vec<usize>,
    total_pages: usize,
}

impl PageRange {
    /// Parse a range expression against a document of `total_pages` pages.
    ///
    /// An empty or whitespace-only expression yields an empty range. It is
    /// up to the caller whether that means "nothing" or "everything".
    pub fn parse(expression: &str, total_pages: usize) -> Self {
        let mut indices = Vec::new();
        let mut seen = vec![false; total_pages];

        for token in expression.split(',') {
            let Some(numbers) = parse_token(token) else {
                continue;
            };

            for page in numbers.clamp_to(total_pages) {
                let index = page - 1;
                if !seen[index] {
                    seen[index] = true;
                    indices.push(index);
                }
            }
        }

        Self {
            indices,
            total_pages,
        }
    }

    /// Every page of a document, in order.
    pub fn all(total_pages: usize) -> Self {
        Self {
            indices: (0..total_pages).collect(),
            total_pages,
        }
    }

    /// Selected zero-based indices in selection order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Consume the range, returning its indices.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    /// Page count the range was resolved against.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Number of selected pages.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check whether a zero-based index is selected.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Pages not selected, in ascending document order.
    pub fn complement(&self) -> Self {
        let mut selected = vec![false; self.total_pages];
        for &index in &self.indices {
            selected[index] = true;
        }

        Self {
            indices: (0..self.total_pages).filter(|&i| !selected[i]).collect(),
            total_pages: self.total_pages,
        }
    }
}

/// Parse a range expression into zero-based indices.
///
/// Shorthand for [`PageRange::parse`] when only the indices are needed.
pub fn parse_page_ranges(expression: &str, total_pages: usize) -> Vec<usize> {
    PageRange::parse(expression, total_pages).into_indices()
}

/// 1-based page numbers named by one token, in the order they are written.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenPages {
    Ascending(RangeInclusive<i64>),
    Descending(RangeInclusive<i64>),
}

impl TokenPages {
    /// Restrict to `1..=total_pages`, yielding in token order.
    ///
    /// Clamping before iterating keeps "1-999999999" cheap while giving the
    /// same result as dropping each out-of-bounds value.
    fn clamp_to(self, total_pages: usize) -> Box<dyn Iterator<Item = usize>> {
        let max = i64::try_from(total_pages).unwrap_or(i64::MAX);
        let clamp = |range: RangeInclusive<i64>| {
            let (lo, hi) = range.into_inner();
            let lo = lo.max(1);
            let hi = hi.min(max);
            // `lo..=hi` is empty whenever the token misses the document.
            (lo..=hi).map(|page| page as usize)
        };

        match self {
            Self::Ascending(range) => Box::new(clamp(range)),
            Self::Descending(range) => Box::new(clamp(range).rev()),
        }
    }
}

fn parse_token(token: &str) -> Option<TokenPages> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    match token.split_once('-') {
        Some((start, end)) => {
            let start: i64 = start.trim().parse().ok()?;
            let end: i64 = end.trim().parse().ok()?;
            if start <= end {
                Some(TokenPages::Ascending(start..=end))
            } else {
                Some(TokenPages::Descending(end..=start))
            }
        }
        None => {
            let page: i64 = token.parse().ok()?;
            Some(TokenPages::Ascending(page..=page))
        }
    }
}
