//! Application orchestrator: wires the listing controller, the detail flow
//! and the favorites store to one catalog, and decides which screen is up.
//!
//! Primary flows (listing, search, detail, favorites page) route failures
//! to a single error screen. Best-effort flows (genre options, similar
//! movies) log and degrade. Every failure leaves the app navigable.

use futures::future::try_join_all;
use tracing::{info, warn};

use crate::catalog::{Genre, MovieCatalog, MovieDetail, PosterUrls, SortKey};
use crate::detail::{DetailFlow, DetailState};
use crate::error::StorageError;
use crate::favorites::{FavoritesStore, KeyValueStore};
use crate::session::{FetchTicket, ListingController};
use crate::view::{self, FavoritesView, ListingView, ScreenView};

const LISTING_ERROR: &str = "Failed to fetch movies.";
const DETAIL_ERROR: &str = "Failed to fetch movie details.";
const FAVORITES_ERROR: &str = "Failed to fetch favorite movie details.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Favorites,
    Detail,
    Error(String),
}

pub struct App<C: MovieCatalog, S: KeyValueStore> {
    catalog: C,
    favorites: FavoritesStore<S>,
    listing: ListingController,
    detail: DetailFlow,
    genres: Vec<Genre>,
    /// Details of the favorites page; `None` while loading.
    favorite_movies: Option<Vec<MovieDetail>>,
    screen: Screen,
    posters: PosterUrls,
}

impl<C: MovieCatalog, S: KeyValueStore> App<C, S> {
    /// Create the app. Favorites are loaded from `backend` immediately.
    pub fn new(catalog: C, backend: S, default_sort: SortKey, posters: PosterUrls) -> Self {
        Self {
            catalog,
            favorites: FavoritesStore::load(backend),
            listing: ListingController::new(default_sort),
            detail: DetailFlow::new(),
            genres: Vec::new(),
            favorite_movies: None,
            screen: Screen::Home,
            posters,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn listing(&self) -> &ListingController {
        &self.listing
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn detail(&self) -> &DetailFlow {
        &self.detail
    }

    /// Genre options for the filter. Empty if the genre list failed.
    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    /// Session start: genre options, then the first listing page.
    pub async fn start(&mut self) {
        self.load_genres().await;
        self.show_home();
        let ticket = self.listing.refresh();
        self.run_listing(ticket).await;
    }

    async fn load_genres(&mut self) {
        match self.catalog.genre_catalog().await {
            Ok(genres) => {
                info!("Loaded {} genres", genres.len());
                self.genres = genres;
            }
            Err(e) => warn!("Failed to fetch genres: {}", e),
        }
    }

    pub fn show_home(&mut self) {
        self.screen = Screen::Home;
        self.listing.resume_pagination();
    }

    pub fn go_back(&mut self) {
        self.detail.reset();
        self.show_home();
    }

    pub async fn search(&mut self, text: &str) {
        self.screen = Screen::Home;
        let ticket = self.listing.set_query(text);
        self.run_listing(ticket).await;
    }

    pub async fn select_genre(&mut self, genre_id: Option<&str>) {
        self.screen = Screen::Home;
        let ticket = self.listing.set_genre(genre_id);
        self.run_listing(ticket).await;
    }

    /// Returns false when the input was rejected as a partial year.
    pub async fn set_year(&mut self, text: &str) -> bool {
        let Some(ticket) = self.listing.set_year(text) else {
            return false;
        };
        self.screen = Screen::Home;
        self.run_listing(ticket).await;
        true
    }

    pub async fn set_sort(&mut self, key: SortKey) {
        self.screen = Screen::Home;
        let ticket = self.listing.set_sort(key);
        self.run_listing(ticket).await;
    }

    /// Visibility observation from the infinite-scroll signal.
    pub async fn on_scroll_signal(&mut self, visible: bool) {
        if self.screen != Screen::Home {
            return;
        }
        if let Some(ticket) = self.listing.on_visibility(visible) {
            self.run_listing(ticket).await;
        }
    }

    pub async fn load_next_page(&mut self) {
        if let Some(ticket) = self.listing.load_next_page() {
            self.run_listing(ticket).await;
        }
    }

    async fn run_listing(&mut self, ticket: FetchTicket) {
        if let Err(e) = self.listing.run(&self.catalog, ticket).await {
            warn!("Listing fetch failed: {}", e);
            self.show_error(LISTING_ERROR);
        }
    }

    pub async fn show_detail(&mut self, id: i64) {
        self.listing.suspend_pagination();
        self.screen = Screen::Detail;
        if let Err(e) = self.detail.open(&self.catalog, id).await {
            warn!("Detail fetch for {} failed: {}", id, e);
            self.show_error(DETAIL_ERROR);
        }
    }

    pub async fn show_favorites(&mut self) {
        self.listing.suspend_pagination();
        self.screen = Screen::Favorites;
        self.favorite_movies = None;

        let ids = self.favorites.ids();
        if ids.is_empty() {
            self.favorite_movies = Some(Vec::new());
            return;
        }

        let catalog = &self.catalog;
        let result = try_join_all(ids.iter().map(|&id| catalog.movie_detail(id))).await;
        match result {
            Ok(movies) => {
                info!("Loaded {} favorite movies", movies.len());
                self.favorite_movies = Some(movies);
            }
            Err(e) => {
                warn!("Favorites fetch failed: {}", e);
                self.show_error(FAVORITES_ERROR);
            }
        }
    }

    /// Flip favorite status; returns the new membership of `id`.
    pub fn toggle_favorite(&mut self, id: i64) -> Result<bool, StorageError> {
        self.favorites.toggle(id)
    }

    /// Remove from favorites and refresh the favorites page.
    pub async fn remove_favorite(&mut self, id: i64) -> Result<(), StorageError> {
        self.favorites.remove(id)?;
        self.show_favorites().await;
        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        self.listing.suspend_pagination();
        self.screen = Screen::Error(message.to_string());
    }

    /// Project the current screen into a view model.
    pub fn render(&self) -> ScreenView {
        match &self.screen {
            Screen::Home => {
                let state = self.listing.state();
                ScreenView::Listing(ListingView {
                    page_title: view::listing_title(state),
                    heading: view::listing_heading(state, &self.genres),
                    cards: view::movie_cards(self.listing.movies(), &self.posters),
                    empty: self.listing.is_empty_result(),
                    loading: state.fetch_in_flight,
                })
            }
            Screen::Detail => match self.detail.state() {
                DetailState::Shown { detail, similar } => ScreenView::Detail(view::detail_view(
                    detail,
                    similar.movies(),
                    self.favorites.contains(detail.id),
                    &self.posters,
                )),
                DetailState::Error { .. } => view::error_view(DETAIL_ERROR),
                DetailState::Idle | DetailState::Loading { .. } => ScreenView::DetailLoading,
            },
            Screen::Favorites => match &self.favorite_movies {
                None => ScreenView::FavoritesLoading,
                Some(movies) => {
                    let summaries: Vec<_> = movies.iter().map(MovieDetail::summary).collect();
                    let message = if movies.is_empty() {
                        Some(view::NO_FAVORITES_MESSAGE)
                    } else {
                        None
                    };
                    ScreenView::Favorites(FavoritesView {
                        page_title: view::FAVORITES_TITLE,
                        cards: view::movie_cards(&summaries, &self.posters),
                        message,
                    })
                }
            },
            Screen::Error(message) => view::error_view(message),
        }
    }
}
