//! Paged search results.

use serde::Serialize;

/// One page of a ranked result list. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Cut page `page` out of an already-ranked list.
    pub fn paginate(ranked: Vec<T>, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total = ranked.len();
        let items = ranked
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect();
        Self {
            items,
            page,
            total,
            page_size,
        }
    }

    /// Index of the last page, zero-based.
    pub fn last_page(&self) -> usize {
        self.total.div_ceil(self.page_size).saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total: self.total,
            page_size: self.page_size,
        }
    }
}

impl<T: Serialize> Page<T> {
    /// The text handed back to the model as a function result.
    pub fn summary(&self) -> String {
        if self.items.is_empty() {
            return "No results found.".to_string();
        }
        let listed = serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".to_string());
        format!(
            "Showing {} of {} results (page {}/{}): {}",
            self.items.len(),
            self.total,
            self.page,
            self.last_page(),
            listed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page() {
        let page = Page::paginate((1..=12).collect::<Vec<_>>(), 0, 5);
        assert_eq!(page.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(page.total, 12);
        assert_eq!(page.last_page(), 2);
    }

    #[test]
    fn last_partial_page() {
        let page = Page::paginate((1..=12).collect::<Vec<_>>(), 2, 5);
        assert_eq!(page.items, vec![11, 12]);
    }

    #[test]
    fn page_past_end_is_empty() {
        let page = Page::paginate(vec![1, 2], 4, 5);
        assert!(page.is_empty());
        assert_eq!(page.summary(), "No results found.");
    }

    #[test]
    fn summary_lists_items() {
        let page = Page::paginate(vec!["a".to_string(), "b".to_string()], 0, 5);
        assert_eq!(
            page.summary(),
            r#"Showing 2 of 2 results (page 0/0): ["a","b"]"#
        );
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let page = Page::paginate(vec![1, 2, 3], 1, 0);
        assert_eq!(page.items, vec![2]);
        assert_eq!(page.last_page(), 2);
    }
}
