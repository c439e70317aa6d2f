//! Remote movie catalog: wire types, the [`MovieCatalog`] seam and its
//! TMDB implementation.
//!
//! Endpoints used:
//! - `/discover/movie` - filtered, sorted listing
//! - `/search/movie` - free-text search
//! - `/genre/movie/list` - genre options for filtering
//! - `/movie/{id}` and `/movie/{id}/similar` - detail view

pub mod client;
pub mod images;
pub mod types;

pub use client::{MovieCatalog, TmdbClient};
pub use images::{PosterUrls, CARD_PLACEHOLDER, DETAIL_PLACEHOLDER};
pub use types::{Genre, MovieDetail, MovieSummary, SortKey};
