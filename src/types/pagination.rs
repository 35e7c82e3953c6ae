//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};
use crate::domain::PostResponse;

/// Page selection for list queries
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    pub page: u64,
    pub per_page: u64,
}

impl PaginationParams {
    /// One-based page number clamped to `1..=MAX_PAGE_NUMBER`
    pub fn page(&self) -> u64 {
        self.page.clamp(1, MAX_PAGE_NUMBER)
    }

    /// Zero-based page index, as expected by the paginator
    pub fn page_index(&self) -> u64 {
        self.page() - 1
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset of the first item on the page
    pub fn offset(&self) -> u64 {
        self.page_index() * self.limit()
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(PostPage = Paginated<PostResponse>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        Self {
            data,
            meta: PaginationMeta {
                page: params.page(),
                per_page,
                total,
                total_pages: total.div_ceil(per_page),
            },
        }
    }

    /// Convert every item, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
