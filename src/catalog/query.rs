//! Catalog filter and paging state

use crate::api::models::{BookQuery, Pagination, StatusFilter};

/// Search, genre and status filters plus the page being viewed.
///
/// Every filter setter moves back to page 1, even when the value is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    search: String,
    genre: String,
    status: StatusFilter,
    page: u32,
    per_page: u32,
}

impl CatalogQuery {
    pub fn new(per_page: u32) -> Self {
        Self {
            search: String::new(),
            genre: String::new(),
            status: StatusFilter::default(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Empty means every genre
    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn status(&self) -> StatusFilter {
        self.status
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_genre(&mut self, genre: impl Into<String>) {
        self.genre = genre.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
        self.page = 1;
    }

    /// Jump straight to a page, as when restoring from a command line
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Step back if the last result said a previous page exists
    pub fn prev(&mut self, pagination: Option<&Pagination>) -> bool {
        match pagination {
            Some(p) if p.has_prev && self.page > 1 => {
                self.page -= 1;
                true
            }
            _ => false,
        }
    }

    /// Step forward if the last result said a next page exists
    pub fn next(&mut self, pagination: Option<&Pagination>) -> bool {
        match pagination {
            Some(p) if p.has_next => {
                self.page += 1;
                true
            }
            _ => false,
        }
    }

    pub fn to_query(&self) -> BookQuery {
        BookQuery {
            search: self.search.clone(),
            genre: self.genre.clone(),
            status: self.status.as_str(),
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pagination(page: u32, has_prev: bool, has_next: bool) -> Pagination {
        Pagination {
            page,
            per_page: 12,
            total: 100,
            pages: 9,
            has_next,
            has_prev,
        }
    }

    #[test]
    fn test_defaults() {
        let query = CatalogQuery::new(12);
        assert_eq!(query.page(), 1);
        assert_eq!(query.status(), StatusFilter::Available);

        let wire = query.to_query();
        assert_eq!(wire.status, "available");
        assert_eq!(wire.per_page, 12);
    }

    #[test]
    fn test_paging_follows_server_flags() {
        let mut query = CatalogQuery::new(12);
        assert!(!query.next(None));
        assert!(!query.next(Some(&pagination(1, false, false))));

        assert!(query.next(Some(&pagination(1, false, true))));
        assert_eq!(query.page(), 2);

        assert!(!query.prev(Some(&pagination(2, false, true))));
        assert!(query.prev(Some(&pagination(2, true, true))));
        assert_eq!(query.page(), 1);
    }

    #[derive(Debug, Clone)]
    enum Change {
        Search(String),
        Genre(String),
        Status(StatusFilter),
    }

    fn change() -> impl Strategy<Value = Change> {
        prop_oneof![
            "[a-z ]{0,8}".prop_map(Change::Search),
            "[A-Za-z]{0,8}".prop_map(Change::Genre),
            prop_oneof![
                Just(StatusFilter::Available),
                Just(StatusFilter::Borrowed),
                Just(StatusFilter::All),
            ]
            .prop_map(Change::Status),
        ]
    }

    proptest! {
        #[test]
        fn test_any_filter_change_resets_page(steps in 0u32..20, change in change()) {
            let mut query = CatalogQuery::new(12);
            let flags = pagination(1, true, true);
            for _ in 0..steps {
                query.next(Some(&flags));
            }
            prop_assert_eq!(query.page(), steps + 1);

            match change {
                Change::Search(s) => query.set_search(s),
                Change::Genre(g) => query.set_genre(g),
                Change::Status(s) => query.set_status(s),
            }
            prop_assert_eq!(query.page(), 1);
            prop_assert_eq!(query.to_query().page, 1);
        }
    }
}
