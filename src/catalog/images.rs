/// Substituted when a listing card has no loadable poster.
pub const CARD_PLACEHOLDER: &str = "https://placehold.co/500x750/1c1c1c/E50914?text=No+Image";
/// Substituted when the detail poster fails to load.
pub const DETAIL_PLACEHOLDER: &str = "https://placehold.co/300x450/1c1c1c/E50914?text=No+Poster";

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Builds poster URLs from catalog `poster_path` values.
#[derive(Debug, Clone)]
pub struct PosterUrls {
    base: String,
}

impl PosterUrls {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// `poster_path` values start with a slash, e.g. `/abc.jpg`.
    pub fn poster(&self, poster_path: &str) -> String {
        if poster_path.starts_with('/') {
            format!("{}{}", self.base, poster_path)
        } else {
            format!("{}/{}", self.base, poster_path)
        }
    }
}

impl Default for PosterUrls {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE)
    }
}
