//! Pure projections from catalog models to display-ready view models.
//! Nothing here performs I/O or inspects rendering state.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::catalog::{
    Genre, MovieDetail, MovieSummary, PosterUrls, CARD_PLACEHOLDER, DETAIL_PLACEHOLDER,
};
use crate::session::SessionFilterState;

pub const APP_TITLE: &str = "MovieDB - Discover Movies";
pub const FAVORITES_TITLE: &str = "My Favorites | MovieDB";
pub const ERROR_TITLE: &str = "Error | MovieDB";
pub const DEFAULT_ERROR_MESSAGE: &str =
    "Could not fetch data. Please check your connection and try again.";
pub const NO_FAVORITES_MESSAGE: &str = "You haven't added any favorite movies yet.";
pub const ADD_FAVORITE_LABEL: &str = "Add to Favorites";
pub const REMOVE_FAVORITE_LABEL: &str = "Remove from Favorites";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub rating: String,
    pub poster_url: String,
    pub fallback_url: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub page_title: String,
    pub heading: String,
    pub cards: Vec<MovieCard>,
    /// Show the "no results" state.
    pub empty: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: i64,
    pub page_title: String,
    pub title: String,
    pub poster_url: String,
    pub fallback_url: &'static str,
    pub rating: String,
    pub runtime: String,
    pub year: String,
    pub genres: Vec<String>,
    pub overview: String,
    pub is_favorite: bool,
    pub favorite_label: &'static str,
    /// Empty hides the similar-movies section.
    pub similar: Vec<MovieCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoritesView {
    pub page_title: &'static str,
    pub cards: Vec<MovieCard>,
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScreenView {
    Listing(ListingView),
    DetailLoading,
    Detail(DetailView),
    FavoritesLoading,
    Favorites(FavoritesView),
    Error { page_title: &'static str, message: String },
}

/// Cards for a grid. Movies without a poster are left out.
pub fn movie_cards(movies: &[MovieSummary], posters: &PosterUrls) -> Vec<MovieCard> {
    movies
        .iter()
        .filter_map(|movie| {
            let path = movie.poster_path.as_deref().filter(|p| !p.is_empty())?;
            Some(MovieCard {
                id: movie.id,
                title: movie.title.clone(),
                year: release_year(movie.release_date.as_deref()),
                rating: rating_label(movie.vote_average),
                poster_url: posters.poster(path),
                fallback_url: CARD_PLACEHOLDER,
            })
        })
        .collect()
}

pub fn detail_view(
    detail: &MovieDetail,
    similar: &[MovieSummary],
    is_favorite: bool,
    posters: &PosterUrls,
) -> DetailView {
    let poster_url = detail
        .poster_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| posters.poster(p))
        .unwrap_or_else(|| DETAIL_PLACEHOLDER.to_string());

    DetailView {
        id: detail.id,
        page_title: format!("{} | MovieDB", detail.title),
        title: detail.title.clone(),
        poster_url,
        fallback_url: DETAIL_PLACEHOLDER,
        rating: format!(
            "{} / 10",
            detail
                .vote_average
                .map(|v| format!("{:.1}", v))
                .unwrap_or_else(|| "N/A".to_string())
        ),
        runtime: format_runtime(detail.runtime_minutes),
        year: release_year(detail.release_date.as_deref()),
        genres: detail.genres.iter().map(|g| g.name.clone()).collect(),
        overview: detail.overview.clone(),
        is_favorite,
        favorite_label: favorite_label(is_favorite),
        similar: movie_cards(similar, posters),
    }
}

pub fn favorite_label(is_favorite: bool) -> &'static str {
    if is_favorite {
        REMOVE_FAVORITE_LABEL
    } else {
        ADD_FAVORITE_LABEL
    }
}

/// The global error screen. An empty message falls back to the generic one.
pub fn error_view(message: &str) -> ScreenView {
    let message = if message.trim().is_empty() {
        DEFAULT_ERROR_MESSAGE
    } else {
        message
    };
    ScreenView::Error {
        page_title: ERROR_TITLE,
        message: message.to_string(),
    }
}

/// Document title for the listing.
pub fn listing_title(state: &SessionFilterState) -> String {
    if state.query_text.is_empty() {
        APP_TITLE.to_string()
    } else {
        format!("Search: {} | MovieDB", state.query_text)
    }
}

/// Heading above the listing grid.
pub fn listing_heading(state: &SessionFilterState, genres: &[Genre]) -> String {
    if !state.query_text.is_empty() {
        return format!("Results for \"{}\"", state.query_text);
    }
    let genre_name = state.genre_id.as_deref().and_then(|id| {
        genres
            .iter()
            .find(|g| g.id.to_string() == id)
            .map(|g| g.name.as_str())
    });
    match genre_name {
        Some(name) => format!("{} Movies", name),
        None => "Discover Movies".to_string(),
    }
}

/// `"2h 16m"`, or `N/A` when unknown.
pub fn format_runtime(minutes: Option<i64>) -> String {
    match minutes {
        Some(m) if m >= 0 => format!("{}h {}m", m / 60, m % 60),
        _ => "N/A".to_string(),
    }
}

pub fn release_year(release_date: Option<&str>) -> String {
    let date = match release_date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => d,
        None => return "N/A".to_string(),
    };
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.year().to_string(),
        Err(_) => date.split('-').next().unwrap_or(date).to_string(),
    }
}

/// One decimal place; a missing or zero average shows as `N/A`.
pub fn rating_label(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v != 0.0 => format!("{:.1}", v),
        _ => "N/A".to_string(),
    }
}
