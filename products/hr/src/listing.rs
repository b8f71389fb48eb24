use entity::employee;
use tracing::debug;

use crate::{pagination, search};

/// Result of running the filter/paginate pipeline once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    pub filtered: Vec<employee::Model>,
    pub displayed: Vec<employee::Model>,
    pub effective_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl Listing {
    pub fn page_info(&self) -> pagination::PageInfo {
        pagination::PageInfo::new(self.effective_page, self.page_size, self.filtered.len())
    }
}

/// Filters `collection` by `search_term`, then slices out one page.
///
/// A `page` past the end is clamped to the last page, so the result never
/// points at an empty page while matching records exist. The displayed slice
/// is empty only when nothing matches.
pub fn apply(
    collection: &[employee::Model],
    search_term: &str,
    page: usize,
    page_size: usize,
) -> Listing {
    let page_size = page_size.max(1);
    let filtered = search::filter(collection, search_term);
    let total_pages = pagination::total_pages(filtered.len(), page_size);
    let effective_page = page.clamp(1, total_pages);
    if effective_page != page {
        debug!(requested = page, effective_page, "page clamped");
    }

    let start = (effective_page - 1) * page_size;
    let end = (start + page_size).min(filtered.len());
    let displayed = filtered.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

    Listing {
        filtered,
        displayed,
        effective_page,
        page_size,
        total_pages,
    }
}
