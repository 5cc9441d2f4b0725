use crate::models::{PageQuery, Pagination};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 50;

/// A 1-based page window. Always has `page >= 1` and `limit >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Reads the leading digits of a query value, so `"10.5"` is 10 and `"2abc"` is 2.
/// Signed, empty, zero or overflowing values yield `None`.
fn positive(raw: Option<&str>) -> Option<u64> {
    let v = raw?.trim_start();
    let v = v.strip_prefix('+').unwrap_or(v);
    let end = v.find(|c: char| !c.is_ascii_digit()).unwrap_or(v.len());
    v[..end].parse::<u64>().ok().filter(|n| *n > 0)
}

impl PageRequest {
    /// Zero falls back to the default for that field.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn from_query(query: &PageQuery) -> Self {
        Self {
            page: positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: positive(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `total` is the size of the returned page, not of the matching set.
    pub fn pagination(&self, returned: usize) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total: returned as u64,
        }
    }
}
