//! Detail view flow: `Idle -> Loading -> Shown | Error`.
//!
//! Entering `Shown` issues a secondary similar-movies fetch. Its outcome
//! only fills the similar section; a failure there is logged and rendered
//! as an empty section, never as an error state.

use tracing::{info, warn};

use crate::catalog::{MovieCatalog, MovieDetail, MovieSummary};
use crate::error::FetchError;

#[derive(Debug, Clone, PartialEq)]
pub enum SimilarSection {
    Loading,
    /// An empty list hides the section.
    Loaded(Vec<MovieSummary>),
}

impl SimilarSection {
    pub fn movies(&self) -> &[MovieSummary] {
        match self {
            SimilarSection::Loading => &[],
            SimilarSection::Loaded(movies) => movies,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading {
        id: i64,
    },
    Shown {
        detail: MovieDetail,
        similar: SimilarSection,
    },
    Error {
        id: i64,
        message: String,
    },
}

#[derive(Debug)]
pub struct DetailFlow {
    state: DetailState,
}

impl DetailFlow {
    pub fn new() -> Self {
        Self {
            state: DetailState::Idle,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = DetailState::Idle;
    }

    pub fn begin(&mut self, id: i64) {
        self.state = DetailState::Loading { id };
    }

    /// Apply the primary fetch. Results for a movie that is no longer being
    /// loaded are ignored. Returns true when the flow entered `Shown`.
    pub fn finish_detail(
        &mut self,
        id: i64,
        result: Result<MovieDetail, FetchError>,
    ) -> Result<bool, FetchError> {
        if self.state != (DetailState::Loading { id }) {
            return Ok(false);
        }
        match result {
            Ok(detail) => {
                info!("Showing details for '{}' ({})", detail.title, id);
                self.state = DetailState::Shown {
                    detail,
                    similar: SimilarSection::Loading,
                };
                Ok(true)
            }
            Err(e) => {
                self.state = DetailState::Error {
                    id,
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Fill the similar section of the shown movie. Failures are swallowed.
    pub fn finish_similar(&mut self, id: i64, result: Result<Vec<MovieSummary>, FetchError>) {
        if let DetailState::Shown { detail, similar } = &mut self.state {
            if detail.id != id {
                return;
            }
            *similar = match result {
                Ok(movies) => SimilarSection::Loaded(movies),
                Err(e) => {
                    warn!("Failed to fetch similar movies for {}: {}", id, e);
                    SimilarSection::Loaded(Vec::new())
                }
            };
        }
    }

    /// Run the whole flow for `id`. Only the primary fetch can fail.
    pub async fn open<C: MovieCatalog + ?Sized>(
        &mut self,
        catalog: &C,
        id: i64,
    ) -> Result<(), FetchError> {
        self.begin(id);
        let result = catalog.movie_detail(id).await;
        if self.finish_detail(id, result)? {
            let similar = catalog.similar_movies(id).await;
            self.finish_similar(id, similar);
        }
        Ok(())
    }
}

impl Default for DetailFlow {
    fn default() -> Self {
        Self::new()
    }
}
