use serde::Deserialize;
use std::cmp::Ordering;

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}
impl PaginationParams {
    pub fn limit(&self) -> usize {
        self.limit
            .as_ref()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(100)
    }
    pub fn offset(&self) -> usize {
        self.offset
            .as_ref()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(0)
    }

    /// Window of `items` selected by `offset` and `limit`.
    pub fn page<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.limit())
            .collect()
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct SortParams<T> {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    pub sort: Option<T>,
    pub sort_by: Option<SortDirection>,
}

impl<T> SortParams<T> {
    pub fn sort(&self) -> Option<&T> {
        self.sort.as_ref()
    }
    pub fn sort_by(&self) -> SortDirection {
        self.sort_by.unwrap_or(SortDirection::Asc)
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams<T> {
    #[serde(flatten)]
    pub sortable: SortParams<T>,
    pub search: Option<String>,
}

impl<T> SearchParams<T> {
    pub fn sort(&self) -> Option<&T> {
        self.sortable.sort()
    }
    pub fn sort_by(&self) -> SortDirection {
        self.sortable.sort_by()
    }
    pub fn search(&self) -> Option<&String> {
        self.search.as_ref()
    }

    /// Case-insensitive substring match against the search term. No term
    /// matches everything.
    pub fn matches(&self, haystack: &str) -> bool {
        match self.search() {
            Some(term) => haystack.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }

    pub fn page<U>(&self, items: Vec<U>) -> Vec<U> {
        self.sortable.pagination.page(items)
    }

    /// Sort by the requested key, then paginate. Without a key the
    /// insertion order is kept, reversed for `sort_by=desc`.
    pub fn arrange<U>(&self, mut items: Vec<U>, compare: impl Fn(&T, &U, &U) -> Ordering) -> Vec<U> {
        let direction = self.sort_by();
        match self.sort() {
            Some(key) => items.sort_by(|a, b| direction.apply(compare(key, a, b))),
            None => {
                if let SortDirection::Desc = direction {
                    items.reverse();
                }
            }
        }
        self.page(items)
    }
}
