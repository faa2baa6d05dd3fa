use serde::{Deserialize, Serialize};

use super::{leading_int, Params};

/// Offset pagination requested by a client, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// `page` below 1 becomes 1. `per_page` is capped at `max`, and a
    /// non-positive or absent value falls back to `default`.
    pub fn from_params(params: &Params, default: i64, max: i64) -> Self {
        let page = params.get("page").map(|p| leading_int(p)).unwrap_or(1).max(1);

        let per_page = params
            .get("per_page")
            .map(|p| leading_int(p).min(max))
            .filter(|n| *n > 0)
            .unwrap_or(default);

        PageRequest { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationMeta {
    pub fn new(request: PageRequest, total_count: i64) -> Self {
        let total_pages = (total_count + request.per_page - 1) / request.per_page;

        PaginationMeta {
            current_page: request.page,
            per_page: request.per_page,
            total_count,
            total_pages,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Slices an already filtered and ordered collection.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_count = items.len() as i64;
    let items = items
        .into_iter()
        .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(request.limit()).unwrap_or(0))
        .collect();

    Page { items, meta: PaginationMeta::new(request, total_count) }
}
