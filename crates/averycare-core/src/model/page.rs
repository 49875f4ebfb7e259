//! Generic paginated collection.

use serde::{Deserialize, Serialize};

/// A page position: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub page: u32,
    pub limit: u32,
}

impl PageCursor {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }
}

/// Number of pages needed for `total` items, never less than one.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if total == 0 || limit == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of a server-side collection.
///
/// `total_pages` is derived from `total` and `limit` and `page` is kept
/// within `[1, total_pages]` by every constructor and mutator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    page: u32,
    limit: u32,
    total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let mut this = Self {
            items,
            total,
            page,
            limit,
            total_pages: 1,
        };
        this.recompute();
        this
    }

    /// An empty first page with the given page size.
    pub fn empty(limit: u32) -> Self {
        Self::new(Vec::new(), 0, 1, limit)
    }

    fn recompute(&mut self) {
        self.total_pages = total_pages(self.total, self.limit);
        self.page = self.page.clamp(1, self.total_pages);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.page, self.limit)
    }

    /// Drops items matching `pred` and lowers `total` by the number removed.
    pub fn remove_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        let removed = before - self.items.len();
        self.total = self.total.saturating_sub(removed as u64);
        self.recompute();
        removed
    }
}

/// Wire shape of a paginated list response: `{data, total, page, limit}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

impl<T> Paged<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            data,
            total,
            page,
            limit,
        }
    }

    /// Fills a missing page or limit from the cursor the request was made with.
    pub fn or_cursor(mut self, cursor: PageCursor) -> Self {
        if self.page == 0 {
            self.page = cursor.page;
        }
        if self.limit == 0 {
            self.limit = cursor.limit;
        }
        self
    }
}

impl<T> From<Paged<T>> for Page<T> {
    fn from(paged: Paged<T>) -> Self {
        Page::new(paged.data, paged.total, paged.page, paged.limit)
    }
}
