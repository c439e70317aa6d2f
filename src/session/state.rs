use crate::catalog::{MovieCatalog, MovieSummary, SortKey};
use crate::error::FetchError;

/// Mutable filter/query/pagination state of one browsing session.
///
/// `query_text` and the discover filters are alternative selection modes;
/// the controller keeps them consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFilterState {
    pub query_text: String,
    pub genre_id: Option<String>,
    pub year_text: Option<String>,
    pub sort_key: SortKey,
    /// Last page whose results were applied. Starts at 1.
    pub page_number: u32,
    pub fetch_in_flight: bool,
}

impl SessionFilterState {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            query_text: String::new(),
            genre_id: None,
            year_text: None,
            sort_key,
            page_number: 1,
            fetch_in_flight: false,
        }
    }

    /// Decide which listing call serves `page` given the current state.
    /// Evaluated fresh on every fetch.
    pub fn request_for(&self, page: u32) -> FetchRequest {
        if !self.query_text.is_empty() {
            FetchRequest::Search {
                query: self.query_text.clone(),
                page,
            }
        } else {
            FetchRequest::Discover {
                sort: self.sort_key,
                genre_id: self.genre_id.clone(),
                year: self.year_text.clone(),
                page,
            }
        }
    }
}

impl Default for SessionFilterState {
    fn default() -> Self {
        Self::new(SortKey::default())
    }
}

/// A listing call derived from [`SessionFilterState`].
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Search {
        query: String,
        page: u32,
    },
    Discover {
        sort: SortKey,
        genre_id: Option<String>,
        year: Option<String>,
        page: u32,
    },
}

impl FetchRequest {
    pub fn page(&self) -> u32 {
        match self {
            FetchRequest::Search { page, .. } | FetchRequest::Discover { page, .. } => *page,
        }
    }

    pub async fn execute<C: MovieCatalog + ?Sized>(
        &self,
        catalog: &C,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        match self {
            FetchRequest::Search { query, page } => catalog.search(query, *page).await,
            FetchRequest::Discover {
                sort,
                genre_id,
                year,
                page,
            } => {
                catalog
                    .discover(*sort, genre_id.as_deref(), year.as_deref(), *page)
                    .await
            }
        }
    }
}
