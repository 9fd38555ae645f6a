//! # Pagination
//!
//! Slice-based pagination over a sequence, ported from Django's paginator
//! with its semantics kept intact: orphans are absorbed into the final
//! page, an empty first page is allowed by default, and the error messages
//! are the ported texts.
//!
//! ```
//! use sponge_core::pagination::Paginator;
//!
//! let objects: Vec<u32> = (1..=9).collect();
//! let paginator = Paginator::new(&objects, 4);
//! let page = paginator.page(3).expect("page 3 exists");
//! assert_eq!(page.objects(), &[9]);
//! assert_eq!(page.to_string(), "<Page 3 of 3>");
//! ```

use std::fmt;
use std::ops::{Index, RangeInclusive};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// A page number that cannot be served.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPage {
    /// The page number did not parse as an integer.
    #[error("That page number is not an integer")]
    NotAnInteger,

    /// The page number is below the first page.
    #[error("That page number is less than 1")]
    BelowOne,

    /// The page number is past the last page.
    #[error("That page contains no results")]
    Empty,
}

impl InvalidPage {
    /// Whether this is an out-of-bounds page rather than a parse failure.
    #[must_use]
    pub fn is_empty_page(self) -> bool {
        matches!(self, Self::BelowOne | Self::Empty)
    }
}

// =============================================================================
// PAGINATOR
// =============================================================================

/// Splits a slice into pages of `per_page` objects.
#[derive(Debug, Clone)]
pub struct Paginator<'a, T> {
    objects: &'a [T],
    per_page: usize,
    orphans: usize,
    allow_empty_first_page: bool,
}

impl<'a, T> Paginator<'a, T> {
    /// A paginator with no orphans and an empty first page allowed.
    #[must_use]
    pub fn new(objects: &'a [T], per_page: usize) -> Self {
        Self::with_options(objects, per_page, 0, true)
    }

    /// A paginator with every knob exposed.
    ///
    /// `orphans` is the number of trailing objects the last full page may
    /// absorb instead of spilling onto a short final page. A `per_page` of
    /// zero is treated as 1.
    #[must_use]
    pub fn with_options(
        objects: &'a [T],
        per_page: usize,
        orphans: usize,
        allow_empty_first_page: bool,
    ) -> Self {
        Self {
            objects,
            per_page: per_page.max(1),
            orphans,
            allow_empty_first_page,
        }
    }

    /// Total number of objects across all pages.
    #[must_use]
    pub fn count(&self) -> usize {
        self.objects.len()
    }

    /// Total number of pages.
    #[must_use]
    pub fn num_pages(&self) -> usize {
        if self.count() == 0 && !self.allow_empty_first_page {
            return 0;
        }
        let hits = self.count().saturating_sub(self.orphans).max(1);
        hits.div_ceil(self.per_page)
    }

    /// The 1-based range of valid page numbers.
    #[must_use]
    pub fn page_range(&self) -> RangeInclusive<usize> {
        1..=self.num_pages()
    }

    /// Parse and bounds-check a page number as it arrives off the wire.
    pub fn validate_number(&self, raw: &str) -> Result<usize, InvalidPage> {
        let number: i64 = raw
            .trim()
            .parse()
            .map_err(|_| InvalidPage::NotAnInteger)?;
        self.check_bounds(number)
    }

    /// The requested page, or why there is no such page.
    pub fn page(&self, number: usize) -> Result<Page<'a, T>, InvalidPage> {
        let number = self.check_bounds(i64::try_from(number).unwrap_or(i64::MAX))?;
        let bottom = (number - 1).saturating_mul(self.per_page);
        let mut top = bottom.saturating_add(self.per_page);
        if top.saturating_add(self.orphans) >= self.count() {
            top = self.count();
        }
        Ok(Page {
            objects: &self.objects[bottom..top],
            number,
            num_pages: self.num_pages(),
            per_page: self.per_page,
            count: self.count(),
        })
    }

    fn check_bounds(&self, number: i64) -> Result<usize, InvalidPage> {
        if number < 1 {
            return Err(InvalidPage::BelowOne);
        }
        let number = number as usize;
        if number > self.num_pages() && !(number == 1 && self.allow_empty_first_page) {
            return Err(InvalidPage::Empty);
        }
        Ok(number)
    }
}

// =============================================================================
// PAGE
// =============================================================================

/// One page of objects, with its position in the page sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    objects: &'a [T],
    number: usize,
    num_pages: usize,
    per_page: usize,
    count: usize,
}

impl<'a, T> Page<'a, T> {
    /// The objects on this page.
    #[must_use]
    pub fn objects(&self) -> &'a [T] {
        self.objects
    }

    /// The 1-based page number.
    #[must_use]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Number of objects on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the page holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether a page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether any other page exists.
    #[must_use]
    pub fn has_other_pages(&self) -> bool {
        self.has_previous() || self.has_next()
    }

    /// The following page number. Unchecked, exactly as ported.
    #[must_use]
    pub fn next_page_number(&self) -> usize {
        self.number + 1
    }

    /// The preceding page number. Unchecked, exactly as ported.
    #[must_use]
    pub fn previous_page_number(&self) -> usize {
        self.number - 1
    }

    /// 1-based index of the first object on this page, 0 when empty.
    #[must_use]
    pub fn start_index(&self) -> usize {
        if self.count == 0 {
            return 0;
        }
        self.per_page * (self.number - 1) + 1
    }

    /// 1-based index of the last object on this page.
    #[must_use]
    pub fn end_index(&self) -> usize {
        if self.number == self.num_pages {
            self.count
        } else {
            self.number * self.per_page
        }
    }
}

impl<T> Index<usize> for Page<'_, T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.objects[index]
    }
}

impl<T> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Page {} of {}>", self.number, self.num_pages)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_nine_objects_into_three_pages_of_four() {
        let objects: Vec<u32> = (1..=9).collect();
        let paginator = Paginator::new(&objects, 4);
        assert_eq!(paginator.num_pages(), 3);
        assert_eq!(paginator.page(1).expect("page 1").objects(), &[1, 2, 3, 4]);
        assert_eq!(paginator.page(2).expect("page 2").objects(), &[5, 6, 7, 8]);
        assert_eq!(paginator.page(3).expect("page 3").objects(), &[9]);
    }

    #[test]
    fn orphans_fold_into_the_final_page() {
        let objects: Vec<u32> = (1..=10).collect();
        let paginator = Paginator::with_options(&objects, 4, 2, true);
        assert_eq!(paginator.num_pages(), 2);
        let last = paginator.page(2).expect("page 2");
        assert_eq!(last.objects(), &[5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn empty_first_page_is_allowed_by_default() {
        let objects: [u32; 0] = [];
        let paginator = Paginator::new(&objects, 5);
        let page = paginator.page(1).expect("empty first page");
        assert!(page.is_empty());
        assert_eq!(page.start_index(), 0);
        assert_eq!(page.end_index(), 0);
    }

    #[test]
    fn display_matches_the_ported_repr() {
        let objects: Vec<u32> = (1..=20).collect();
        let paginator = Paginator::new(&objects, 2);
        let page = paginator.page(2).expect("page 2");
        assert_eq!(page.to_string(), "<Page 2 of 10>");
    }

    #[test]
    fn pages_index_like_sequences() {
        let objects = ["a", "b", "c", "d"];
        let paginator = Paginator::new(&objects, 2);
        let page = paginator.page(2).expect("page 2");
        assert_eq!(page[0], "c");
        assert_eq!(page[1], "d");
    }
}
