//! Page-number pagination over an already filtered result set.

/// Dishes listed per page.
pub const DISHES_PER_PAGE: u64 = 20;
/// Menu sections (one per category) per page.
pub const SECTIONS_PER_PAGE: u64 = 3;
/// Categories listed per page.
pub const CATEGORIES_PER_PAGE: u64 = 12;
/// Food tags listed per page.
pub const FOOD_TAGS_PER_PAGE: u64 = 50;

/// One page of results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub number: u64,
    pub per_page: u64,
    /// Number of items across all pages.
    pub total: u64,
    /// Always at least 1, even for an empty result.
    pub num_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total: self.total,
            num_pages: self.num_pages,
        }
    }
}

/// Cut `items` into the page requested by `page`.
///
/// A missing, unparseable or zero page number serves the first page; a number
/// past the end serves the last page.
pub fn paginate<T>(items: Vec<T>, page: Option<&str>, per_page: u64) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len() as u64;
    let num_pages = total.div_ceil(per_page).max(1);

    let requested = page
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|number| *number >= 1)
        .unwrap_or(1);
    let number = requested.min(num_pages);

    let start = ((number - 1) * per_page) as usize;
    let items = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    Page {
        items,
        number,
        per_page,
        total,
        num_pages,
    }
}
