//! Pagination utilities for service layer
//!
//! Page numbers are 1-based and forgiving: anything unusable means the first
//! page, anything past the end means the last one.

use std::num::IntErrorKind;

use sea_orm::{ConnectionTrait, DbErr, Paginator, SelectorTrait};
use serde::Serialize;

pub const MAX_PER_PAGE: u64 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub per_page: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self { Self { page, per_page } }

    /// Parse a raw `?page=` value. Missing, non-numeric or non-positive values mean page 1;
    /// a number too large for `u64` saturates and later resolves to the last page.
    pub fn from_query(raw: Option<&str>, per_page: u64) -> Self {
        let page = match raw.map(|s| s.trim().parse::<u64>()) {
            Some(Ok(p)) if p >= 1 => p,
            Some(Err(e)) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
            _ => 1,
        };
        Self { page, per_page }
    }

    /// Clamp to sane bounds; returns `(page, per_page)` with `page >= 1`.
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 10 } }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pages_number: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), pages_number: self.pages_number, total: self.total }
    }
}

/// Resolve `requested` against `pages`: at least 1, at most the last page.
pub fn resolve_page(requested: u64, pages: u64) -> u64 {
    requested.clamp(1, pages.max(1))
}

/// Run a sea-orm paginator for the requested page.
pub async fn fetch_page<'db, C, S>(paginator: Paginator<'db, C, S>, requested: u64) -> Result<Page<S::Item>, DbErr>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    let counts = paginator.num_items_and_pages().await?;
    let pages_number = counts.number_of_pages.max(1);
    let page = resolve_page(requested, pages_number);
    let items = paginator.fetch_page(page - 1).await?;
    Ok(Page { items, pages_number, total: counts.number_of_items })
}
