use std::ops::Range;

pub const PAGE_SIZE: usize = 20;

/// Raw page count; zero for an empty set.
pub fn calculate_total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Position of the view inside a filtered set. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current_page: usize,
    total_items: usize,
}

impl Pager {
    /// `current_page` is clamped into the valid range.
    pub fn new(current_page: usize, total_items: usize) -> Self {
        let last = calculate_total_pages(total_items).max(1);
        Self {
            current_page: current_page.clamp(1, last),
            total_items,
        }
    }

    pub fn first(total_items: usize) -> Self {
        Self::new(1, total_items)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        calculate_total_pages(self.total_items)
    }

    /// An empty set still shows as one page.
    pub fn display_pages(&self) -> usize {
        self.total_pages().max(1)
    }

    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * PAGE_SIZE).min(self.total_items);
        let end = (start + PAGE_SIZE).min(self.total_items);
        start..end
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        let total = self.total_pages();
        total != 0 && self.current_page < total
    }

    pub fn next(self) -> Self {
        if self.has_next() {
            Self {
                current_page: self.current_page + 1,
                ..self
            }
        } else {
            self
        }
    }

    pub fn previous(self) -> Self {
        if self.has_previous() {
            Self {
                current_page: self.current_page - 1,
                ..self
            }
        } else {
            self
        }
    }
}
