//! Strategies for weaving two page sequences into one.
//!
//! Page numbers here are 1-based, and parity ("odd", "even") is always the
//! parity of the page number within its own document.

use std::fmt;
use std::str::FromStr;

use crate::assemble::assembler::{AssembledDocument, DocumentAssembler, PageTransform, SourceSpec};
use crate::error::{PdfMixError, Result};
use crate::io::reader::SourceDocument;

/// Which of the two inputs a page comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// First document.
    A,
    /// Second document.
    B,
}

/// How pages of A and B are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterleaveMode {
    /// A1, B1, A2, B2, ... while either side has pages left.
    #[default]
    Alternate,
    /// Page `i` from A when `i` is odd, from B when `i` is even.
    AOddBEven,
    /// Page `i` from A when `i` is even, from B when `i` is odd.
    AEvenBOdd,
    /// Only the odd pages of A.
    AOdd,
    /// Only the even pages of B.
    BEven,
}

impl InterleaveMode {
    /// All modes, in the order they are listed to users.
    pub const ALL: [Self; 5] = [
        Self::Alternate,
        Self::AOddBEven,
        Self::AEvenBOdd,
        Self::AOdd,
        Self::BEven,
    ];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alternate => "alternate",
            Self::AOddBEven => "a_odd_b_even",
            Self::AEvenBOdd => "a_even_b_odd",
            Self::AOdd => "a_odd",
            Self::BEven => "b_even",
        }
    }
}

impl fmt::Display for InterleaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterleaveMode {
    type Err = PdfMixError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| {
                PdfMixError::invalid_argument(format!(
                    "Unknown interleave mode: {s}. Must be one of: alternate, a_odd_b_even, \
                     a_even_b_odd, a_odd, b_even"
                ))
            })
    }
}

/// Compute the output order for two documents of `a_len` and `b_len` pages.
///
/// Returns `(side, index)` pairs with zero-based indices. Pages numbered
/// below `start_from` are never included.
///
/// # Errors
///
/// Returns [`PdfMixError::InvalidArgument`] when `start_from` is 0.
///
/// # Examples
///
/// ```
/// use pdfmix::assemble::interleave::{interleave, InterleaveMode, Side};
///
/// let order = interleave(3, 2, InterleaveMode::Alternate, 1).unwrap();
/// assert_eq!(
///     order,
///     vec![(Side::A, 0), (Side::B, 0), (Side::A, 1), (Side::B, 1), (Side::A, 2)]
/// );
/// ```
pub fn interleave(
    a_len: usize,
    b_len: usize,
    mode: InterleaveMode,
    start_from: usize,
) -> Result<Vec<(Side, usize)>> {
    if start_from == 0 {
        return Err(PdfMixError::invalid_argument(
            "Interleave start page is 1-based and must be at least 1",
        ));
    }

    let is_odd = |page: usize| page % 2 == 1;
    let mut order = Vec::new();

    match mode {
        InterleaveMode::Alternate => {
            let mut a = start_from;
            let mut b = start_from;
            while a <= a_len || b <= b_len {
                if a <= a_len {
                    order.push((Side::A, a - 1));
                    a += 1;
                }
                if b <= b_len {
                    order.push((Side::B, b - 1));
                    b += 1;
                }
            }
        }
        InterleaveMode::AOddBEven | InterleaveMode::AEvenBOdd => {
            let a_takes_odd = mode == InterleaveMode::AOddBEven;
            for page in start_from..=a_len.max(b_len) {
                if page <= a_len && is_odd(page) == a_takes_odd {
                    order.push((Side::A, page - 1));
                }
                if page <= b_len && is_odd(page) != a_takes_odd {
                    order.push((Side::B, page - 1));
                }
            }
        }
        InterleaveMode::AOdd => {
            order.extend(
                (start_from..=a_len)
                    .filter(|&page| is_odd(page))
                    .map(|page| (Side::A, page - 1)),
            );
        }
        InterleaveMode::BEven => {
            order.extend(
                (start_from..=b_len)
                    .filter(|&page| !is_odd(page))
                    .map(|page| (Side::B, page - 1)),
            );
        }
    }

    Ok(order)
}

/// Page selections weaving `a` and `b` together.
///
/// Runs of consecutive pages from the same side are grouped into a single
/// [`SourceSpec`].
pub fn interleave_specs<'a>(
    a: &'a SourceDocument,
    b: &'a SourceDocument,
    mode: InterleaveMode,
    start_from: usize,
) -> Result<Vec<SourceSpec<'a>>> {
    let order = interleave(a.page_count(), b.page_count(), mode, start_from)?;

    let mut runs: Vec<(Side, SourceSpec<'a>)> = Vec::new();
    for (side, index) in order {
        match runs.last_mut() {
            Some((last, spec)) if *last == side => spec.push(index, PageTransform::None),
            _ => {
                let document = match side {
                    Side::A => a,
                    Side::B => b,
                };
                runs.push((side, SourceSpec::new(document, [index])));
            }
        }
    }

    Ok(runs.into_iter().map(|(_, spec)| spec).collect())
}

/// Weave the pages of two documents into a new one.
///
/// # Errors
///
/// Returns [`PdfMixError::InvalidArgument`] when `start_from` is 0 and
/// [`PdfMixError::EmptySelection`] when the mode selects no page.
pub fn interleave_documents(
    a: &SourceDocument,
    b: &SourceDocument,
    mode: InterleaveMode,
    start_from: usize,
) -> Result<AssembledDocument> {
    let specs = interleave_specs(a, b, mode, start_from)?;
    DocumentAssembler::new().assemble(&specs)
}
