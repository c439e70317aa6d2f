use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A movie as it appears in listing endpoints (discover, search, similar).
/// Never mutated locally once received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// ISO date (`YYYY-MM-DD`) or empty.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average vote in [0, 10].
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// Full record for a single movie from `/movie/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, rename = "runtime")]
    pub runtime_minutes: Option<i64>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl MovieDetail {
    pub fn summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Envelope of the list endpoints. `results` may be absent or null.
#[derive(Debug, Deserialize)]
pub struct PagedResponse<T> {
    pub page: Option<u32>,
    pub results: Option<Vec<T>>,
    pub total_pages: Option<u32>,
}

impl<T> PagedResponse<T> {
    pub fn into_results(self) -> Vec<T> {
        self.results.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct GenreListResponse {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Sort orders accepted by the discover endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "popularity.asc")]
    PopularityAsc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
    #[serde(rename = "vote_average.asc")]
    VoteAverageAsc,
    #[serde(rename = "primary_release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "primary_release_date.asc")]
    ReleaseDateAsc,
    #[serde(rename = "revenue.desc")]
    RevenueDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::PopularityDesc,
        SortKey::PopularityAsc,
        SortKey::VoteAverageDesc,
        SortKey::VoteAverageAsc,
        SortKey::ReleaseDateDesc,
        SortKey::ReleaseDateAsc,
        SortKey::RevenueDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "popularity.desc",
            SortKey::PopularityAsc => "popularity.asc",
            SortKey::VoteAverageDesc => "vote_average.desc",
            SortKey::VoteAverageAsc => "vote_average.asc",
            SortKey::ReleaseDateDesc => "primary_release_date.desc",
            SortKey::ReleaseDateAsc => "primary_release_date.asc",
            SortKey::RevenueDesc => "revenue.desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| format!("Unknown sort order: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_tolerates_missing_fields() {
        let json = r#"{"id": 7, "title": "Minimal", "poster_path": null}"#;
        let movie: MovieSummary = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 7);
        assert_eq!(movie.poster_path, None);
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.vote_average, None);
    }

    #[test]
    fn test_detail_maps_runtime_and_genres() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "runtime": 136,
            "overview": "A hacker learns the truth.",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "budget": 63000000
        }"#;
        let detail: MovieDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.runtime_minutes, Some(136));
        assert_eq!(detail.genres.len(), 2);
        assert_eq!(detail.genres[1].name, "Science Fiction");
        assert_eq!(detail.summary().title, "The Matrix");
    }

    #[test]
    fn test_null_results_decode_as_empty() {
        let json = r#"{"page": 1, "results": null}"#;
        let resp: PagedResponse<MovieSummary> = serde_json::from_str(json).unwrap();
        assert!(resp.into_results().is_empty());

        let resp: PagedResponse<MovieSummary> =
            serde_json::from_str(r#"{"page": 2, "total_pages": 2}"#).unwrap();
        assert_eq!(resp.page, Some(2));
        assert!(resp.into_results().is_empty());
    }

    #[test]
    fn test_sort_key_parse_and_display() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!(SortKey::default().to_string(), "popularity.desc");
        assert!("rating".parse::<SortKey>().is_err());
    }
}
