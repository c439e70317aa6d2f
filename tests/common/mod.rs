#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use cinescout::catalog::{Genre, MovieCatalog, MovieDetail, MovieSummary, SortKey};
use cinescout::FetchError;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn movie(id: i64) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {}", id),
        poster_path: Some(format!("/poster{}.jpg", id)),
        release_date: Some("2021-06-01".to_string()),
        vote_average: Some(6.5),
    }
}

pub fn detail(id: i64) -> MovieDetail {
    MovieDetail {
        id,
        title: format!("Movie {}", id),
        poster_path: Some(format!("/poster{}.jpg", id)),
        release_date: Some("2021-06-01".to_string()),
        vote_average: Some(6.5),
        runtime_minutes: Some(121),
        overview: "Something happens.".to_string(),
        genres: vec![Genre {
            id: 18,
            name: "Drama".to_string(),
        }],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Discover {
        sort: SortKey,
        genre: Option<String>,
        year: Option<String>,
        page: u32,
    },
    Search {
        query: String,
        page: u32,
    },
    Genres,
    Detail(i64),
    Similar(i64),
}

/// Scripted catalog that records every request.
#[derive(Default)]
pub struct FakeCatalog {
    calls: Mutex<Vec<Call>>,
    /// Listing results per page, shared by discover and search.
    pub pages: HashMap<u32, Vec<MovieSummary>>,
    pub details: HashMap<i64, MovieDetail>,
    pub similar: HashMap<i64, Vec<MovieSummary>>,
    pub genres: Vec<Genre>,
    pub fail_listing: AtomicBool,
    pub fail_genres: AtomicBool,
    pub fail_similar: AtomicBool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(pages: Vec<Vec<MovieSummary>>) -> Self {
        let mut fake = Self::new();
        for (i, movies) in pages.into_iter().enumerate() {
            fake.pages.insert(i as u32 + 1, movies);
        }
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn set_fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn listing(&self, page: u32) -> Result<Vec<MovieSummary>, FetchError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(FetchError::Status {
                url: "https://fake/discover/movie".to_string(),
                status: 500,
                reason: "Internal Server Error".to_string(),
            });
        }
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    async fn discover(
        &self,
        sort: SortKey,
        genre_id: Option<&str>,
        year: Option<&str>,
        page: u32,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        self.record(Call::Discover {
            sort,
            genre: genre_id.map(str::to_string),
            year: year.map(str::to_string),
            page,
        });
        self.listing(page)
    }

    async fn search(&self, query: &str, page: u32) -> Result<Vec<MovieSummary>, FetchError> {
        self.record(Call::Search {
            query: query.to_string(),
            page,
        });
        self.listing(page)
    }

    async fn genre_catalog(&self) -> Result<Vec<Genre>, FetchError> {
        self.record(Call::Genres);
        if self.fail_genres.load(Ordering::SeqCst) {
            return Err(FetchError::Transport {
                url: "https://fake/genre/movie/list".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(self.genres.clone())
    }

    async fn movie_detail(&self, id: i64) -> Result<MovieDetail, FetchError> {
        self.record(Call::Detail(id));
        self.details.get(&id).cloned().ok_or(FetchError::Status {
            url: format!("https://fake/movie/{}", id),
            status: 404,
            reason: "Not Found".to_string(),
        })
    }

    async fn similar_movies(&self, id: i64) -> Result<Vec<MovieSummary>, FetchError> {
        self.record(Call::Similar(id));
        if self.fail_similar.load(Ordering::SeqCst) {
            return Err(FetchError::Transport {
                url: format!("https://fake/movie/{}/similar", id),
                message: "timed out".to_string(),
            });
        }
        Ok(self.similar.get(&id).cloned().unwrap_or_default())
    }
}
