//! One page of results plus the counts needed to paginate.

use serde::{Deserialize, Serialize};

/// A page of items returned by a list or search endpoint.
///
/// `total_count` is the number of matches across all pages. The page count is
/// always recomputed here from `total_count` and `page_size`, never taken from
/// the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_size: u32,
    pub page_number: u32,
}

impl<T> ResultPage<T> {
    /// `ceil(total_count / page_size)`; zero when nothing matched.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    /// Whether pagination controls should be shown at all.
    #[must_use]
    pub fn has_pagination(&self) -> bool {
        self.total_pages() > 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Number of pages needed for `total_count` items, `page_size` per page.
#[must_use]
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
