//! Page arithmetic for the list view's page bar and caption.

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];
pub const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PageEntry {
    Page(usize),
    Ellipsis,
}

/// Number of pages needed for `total_items`; never less than one.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Page labels to show around `current_page`.
///
/// The first and last pages are always present. Up to `visible_count` pages
/// are centered on the current page; near either edge the window is clamped
/// instead of shrinking. An ellipsis stands in for every gap of more than one
/// page.
pub fn window(current_page: usize, total_pages: usize, visible_count: usize) -> Vec<PageEntry> {
    let total = total_pages.max(1);
    let visible = visible_count.max(1);
    let current = current_page.clamp(1, total);

    let half = visible / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = (start + visible - 1).min(total);
    if end == total {
        start = (end + 1).saturating_sub(visible).max(1);
    }

    let mut entries = Vec::with_capacity(visible + 4);
    if start > 1 {
        entries.push(PageEntry::Page(1));
        if start > 2 {
            entries.push(PageEntry::Ellipsis);
        }
    }
    entries.extend((start..=end).map(PageEntry::Page));
    if end < total {
        if end < total - 1 {
            entries.push(PageEntry::Ellipsis);
        }
        entries.push(PageEntry::Page(total));
    }
    entries
}

/// Target of a page-bar click, or `None` when the click should do nothing
/// (same page, or outside `1..=total_pages`).
pub fn change_page(target: usize, current: usize, total_pages: usize) -> Option<usize> {
    if target == current || target < 1 || target > total_pages {
        return None;
    }
    Some(target)
}

/// One-based, inclusive range of items shown on a page.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PageInfo {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl PageInfo {
    pub fn new(current_page: usize, page_size: usize, total_items: usize) -> Self {
        if total_items == 0 {
            return Self {
                start: 0,
                end: 0,
                total: 0,
            };
        }
        let size = page_size.max(1);
        let page = current_page.max(1);
        Self {
            start: ((page - 1) * size + 1).min(total_items),
            end: (page * size).min(total_items),
            total: total_items,
        }
    }
}
