use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::types::{Genre, GenreListResponse, MovieDetail, MovieSummary, PagedResponse, SortKey};
use crate::error::FetchError;

/// Read-only operations against the remote movie catalog.
///
/// Every operation is idempotent and returns either parsed data or a
/// [`FetchError`]; nothing else escapes this boundary.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Region-scoped listing. Genre and year are only sent when non-empty.
    async fn discover(
        &self,
        sort: SortKey,
        genre_id: Option<&str>,
        year: Option<&str>,
        page: u32,
    ) -> Result<Vec<MovieSummary>, FetchError>;

    async fn search(&self, query: &str, page: u32) -> Result<Vec<MovieSummary>, FetchError>;

    async fn genre_catalog(&self) -> Result<Vec<Genre>, FetchError>;

    async fn movie_detail(&self, id: i64) -> Result<MovieDetail, FetchError>;

    /// Related titles. An empty list is a valid result.
    async fn similar_movies(&self, id: i64) -> Result<Vec<MovieSummary>, FetchError>;
}

#[async_trait]
impl<T: MovieCatalog + ?Sized> MovieCatalog for Arc<T> {
    async fn discover(
        &self,
        sort: SortKey,
        genre_id: Option<&str>,
        year: Option<&str>,
        page: u32,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        (**self).discover(sort, genre_id, year, page).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<Vec<MovieSummary>, FetchError> {
        (**self).search(query, page).await
    }

    async fn genre_catalog(&self) -> Result<Vec<Genre>, FetchError> {
        (**self).genre_catalog().await
    }

    async fn movie_detail(&self, id: i64) -> Result<MovieDetail, FetchError> {
        (**self).movie_detail(id).await
    }

    async fn similar_movies(&self, id: i64) -> Result<Vec<MovieSummary>, FetchError> {
        (**self).similar_movies(id).await
    }
}

/// HTTP client for the TMDB v3 API.
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    region: String,
}

impl TmdbClient {
    /// Build a client against `base_url` (e.g. `https://api.themoviedb.org/3`).
    pub fn new(
        base_url: &str,
        api_key: &str,
        region: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("CineScout/1.0")
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                url: base_url.to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            region: region.to_string(),
        })
    }

    /// Compose an endpoint URL. `api_key` is always the first query parameter.
    pub fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    pub fn discover_url(
        &self,
        sort: SortKey,
        genre_id: Option<&str>,
        year: Option<&str>,
        page: u32,
    ) -> Result<Url, FetchError> {
        let mut params = vec![
            ("sort_by", sort.as_str().to_string()),
            ("region", self.region.clone()),
            ("page", page.to_string()),
        ];
        if let Some(genre) = genre_id.filter(|g| !g.is_empty()) {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = year.filter(|y| !y.is_empty()) {
            params.push(("primary_release_year", year.to_string()));
        }
        self.endpoint("/discover/movie", &params)
    }

    pub fn search_url(&self, query: &str, page: u32) -> Result<Url, FetchError> {
        self.endpoint(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let shown = redact(&url);
        info!("Fetching {}", shown);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: shown.clone(),
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: shown,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: shown.clone(),
            message: format!("Failed to read response body: {}", e.without_url()),
        })?;
        debug!("Received {} bytes from {}", body.len(), shown);

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: shown,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn discover(
        &self,
        sort: SortKey,
        genre_id: Option<&str>,
        year: Option<&str>,
        page: u32,
    ) -> Result<Vec<MovieSummary>, FetchError> {
        let url = self.discover_url(sort, genre_id, year, page)?;
        let resp: PagedResponse<MovieSummary> = self.get_json(url).await?;
        Ok(resp.into_results())
    }

    async fn search(&self, query: &str, page: u32) -> Result<Vec<MovieSummary>, FetchError> {
        let url = self.search_url(query, page)?;
        let resp: PagedResponse<MovieSummary> = self.get_json(url).await?;
        Ok(resp.into_results())
    }

    async fn genre_catalog(&self) -> Result<Vec<Genre>, FetchError> {
        let url = self.endpoint("/genre/movie/list", &[])?;
        let resp: GenreListResponse = self.get_json(url).await?;
        Ok(resp.genres)
    }

    async fn movie_detail(&self, id: i64) -> Result<MovieDetail, FetchError> {
        let url = self.endpoint(&format!("/movie/{}", id), &[])?;
        self.get_json(url).await
    }

    async fn similar_movies(&self, id: i64) -> Result<Vec<MovieSummary>, FetchError> {
        let url = self.endpoint(&format!("/movie/{}/similar", id), &[])?;
        let resp: PagedResponse<MovieSummary> = self.get_json(url).await?;
        Ok(resp.into_results())
    }
}

/// Render a URL for logs and error messages with the API key stripped.
fn redact(url: &Url) -> String {
    let kept: Vec<String> = url
        .query_pairs()
        .filter(|(name, _)| name != "api_key")
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    if kept.is_empty() {
        format!("{}{}", url.origin().ascii_serialization(), url.path())
    } else {
        format!(
            "{}{}?{}",
            url.origin().ascii_serialization(),
            url.path(),
            kept.join("&")
        )
    }
}
