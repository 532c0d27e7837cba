//! Offset pagination.

use serde::Serialize;

/// A validated request for one page of an ordered result set.
///
/// Page numbers are 1-based. Zero or negative page numbers are treated as
/// page 1, and a zero page size is treated as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: u64) -> Self {
        Self {
            page: u64::try_from(page).unwrap_or(0).max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u64) -> Self {
        Self::new(1, per_page)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of an ordered result set, plus the total it was sliced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Slice an already ordered collection.
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let per_page = usize::try_from(request.per_page()).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(offset).take(per_page).collect();
        Self::new(items, request, total)
    }

    pub fn has_next(&self) -> bool {
        self.total > self.page.saturating_mul(self.per_page)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_num(&self) -> Option<u64> {
        self.has_next().then(|| self.page + 1)
    }

    pub fn prev_num(&self) -> Option<u64> {
        self.has_prev().then(|| self.page - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}
