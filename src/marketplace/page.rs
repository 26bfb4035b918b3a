use crate::config::ListingConfig;

/// One page cut out of an already sorted result set.
///
/// `page` starts at 1 and `limit` is clamped to `1..=max_page_size`; a page past the
/// end is empty but still reports the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: u32,
    pub total_pages: u32,
    pub total: usize,
    limit: usize,
}

impl PageWindow {
    pub fn new(total: usize, page: Option<u32>, limit: Option<u32>, config: &ListingConfig) -> Self {
        let limit = limit
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size);

        Self {
            current_page: page.unwrap_or(1).max(1),
            total_pages: total.div_ceil(limit as usize) as u32,
            total,
            limit: limit as usize,
        }
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = &'a T> {
        let skip = (self.current_page as usize - 1).saturating_mul(self.limit);
        items.iter().skip(skip).take(self.limit)
    }
}
