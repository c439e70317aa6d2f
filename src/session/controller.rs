use tracing::{debug, info};

use super::pagination::PaginationDriver;
use super::state::{FetchRequest, SessionFilterState};
use crate::catalog::{MovieCatalog, MovieSummary, SortKey};
use crate::error::FetchError;

/// How a ticket's results land in the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    Replace,
    Append,
}

/// One issued listing request, tagged with the listing generation it
/// belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: FetchRequest,
    pub mode: ApplyMode,
}

/// What happened when a ticket completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Results were applied; `added` movies are new in the listing.
    Applied { added: usize },
    /// A newer listing superseded the ticket; its result was dropped.
    Stale,
}

/// Single source of truth for what the listing should fetch and show.
///
/// State-changing operations return a [`FetchTicket`]; the caller executes
/// it and hands the result back through [`complete`](Self::complete).
/// Every fresh listing bumps the generation so late results from older
/// listings are discarded instead of being mixed in.
pub struct ListingController {
    state: SessionFilterState,
    generation: u64,
    movies: Vec<MovieSummary>,
    empty_result: bool,
    pagination: PaginationDriver,
}

impl ListingController {
    pub fn new(default_sort: SortKey) -> Self {
        Self {
            state: SessionFilterState::new(default_sort),
            generation: 0,
            movies: Vec::new(),
            empty_result: false,
            pagination: PaginationDriver::new(),
        }
    }

    pub fn state(&self) -> &SessionFilterState {
        &self.state
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    /// True when the latest fresh listing came back with no results.
    pub fn is_empty_result(&self) -> bool {
        self.empty_result
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pagination(&self) -> &PaginationDriver {
        &self.pagination
    }

    /// Set the search text. Clears genre and year; the sort order stays.
    pub fn set_query(&mut self, text: &str) -> FetchTicket {
        self.state.query_text = text.to_string();
        self.state.genre_id = None;
        self.state.year_text = None;
        self.refresh()
    }

    /// Set or clear (`None` / empty) the genre filter. Clears the query.
    pub fn set_genre(&mut self, genre_id: Option<&str>) -> FetchTicket {
        self.state.query_text.clear();
        self.state.genre_id = genre_id
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string);
        self.refresh()
    }

    /// Set the release-year filter. Only empty input or a 4-digit year is
    /// accepted; anything else leaves the state untouched and returns `None`.
    pub fn set_year(&mut self, text: &str) -> Option<FetchTicket> {
        let text = text.trim();
        if !is_acceptable_year(text) {
            debug!("Ignoring partial year input '{}'", text);
            return None;
        }
        self.state.query_text.clear();
        self.state.year_text = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
        Some(self.refresh())
    }

    /// Change the sort order. Clears the query.
    pub fn set_sort(&mut self, key: SortKey) -> FetchTicket {
        self.state.query_text.clear();
        self.state.sort_key = key;
        self.refresh()
    }

    /// Start a fresh listing from page 1 with the current filters.
    ///
    /// The pagination signal is torn down and re-armed first so a page
    /// trigger from the previous listing cannot fire into this one.
    pub fn refresh(&mut self) -> FetchTicket {
        self.pagination.rearm();
        self.generation += 1;
        self.state.page_number = 1;
        self.state.fetch_in_flight = true;
        self.movies.clear();
        self.empty_result = false;

        let ticket = FetchTicket {
            generation: self.generation,
            request: self.state.request_for(1),
            mode: ApplyMode::Replace,
        };
        info!(
            "Listing generation {}: {:?}",
            self.generation, ticket.request
        );
        ticket
    }

    /// Request the page after the last applied one. Returns `None` while
    /// another listing request is outstanding.
    pub fn load_next_page(&mut self) -> Option<FetchTicket> {
        if self.state.fetch_in_flight {
            debug!("Next page requested while a fetch is in flight, ignoring");
            return None;
        }
        self.state.fetch_in_flight = true;
        let page = self.state.page_number + 1;
        Some(FetchTicket {
            generation: self.generation,
            request: self.state.request_for(page),
            mode: ApplyMode::Append,
        })
    }

    /// Feed a visibility observation from the pagination signal.
    pub fn on_visibility(&mut self, visible: bool) -> Option<FetchTicket> {
        if self.pagination.signal(visible) {
            self.load_next_page()
        } else {
            None
        }
    }

    /// Stop reacting to the pagination signal (listing hidden).
    pub fn suspend_pagination(&mut self) {
        self.pagination.disarm();
    }

    /// Resume reacting to the pagination signal (listing shown again).
    pub fn resume_pagination(&mut self) {
        self.pagination.rearm();
    }

    /// Apply the outcome of a ticket.
    ///
    /// The in-flight flag is cleared whether the fetch succeeded or failed,
    /// but only for the current generation: a stale completion neither
    /// touches the listing nor unblocks the newer fetch.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<MovieSummary>, FetchError>,
    ) -> Result<Completion, FetchError> {
        if ticket.generation != self.generation {
            debug!(
                "Discarding result of generation {} (current {})",
                ticket.generation, self.generation
            );
            return Ok(Completion::Stale);
        }
        self.state.fetch_in_flight = false;

        let results = result?;
        let added = match ticket.mode {
            ApplyMode::Replace => {
                self.empty_result = results.is_empty();
                self.movies = results;
                self.movies.len()
            }
            ApplyMode::Append => {
                let before = self.movies.len();
                for movie in results {
                    if !self.movies.iter().any(|m| m.id == movie.id) {
                        self.movies.push(movie);
                    }
                }
                self.movies.len() - before
            }
        };
        self.state.page_number = ticket.request.page();
        info!(
            "Applied page {} ({} new, {} total)",
            self.state.page_number,
            added,
            self.movies.len()
        );
        Ok(Completion::Applied { added })
    }

    /// Execute `ticket` against `catalog` and apply the result.
    pub async fn run<C: MovieCatalog + ?Sized>(
        &mut self,
        catalog: &C,
        ticket: FetchTicket,
    ) -> Result<Completion, FetchError> {
        let result = ticket.request.execute(catalog).await;
        self.complete(&ticket, result)
    }
}

fn is_acceptable_year(text: &str) -> bool {
    text.is_empty() || (text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            poster_path: Some(format!("/{}.jpg", id)),
            release_date: Some("2020-01-01".to_string()),
            vote_average: Some(7.0),
        }
    }

    fn transport_error() -> FetchError {
        FetchError::Transport {
            url: "https://api.example.com".to_string(),
            message: "offline".to_string(),
        }
    }

    #[test]
    fn test_set_query_clears_genre_and_year_but_not_sort() {
        let mut ctl = ListingController::new(SortKey::default());
        ctl.set_sort(SortKey::RevenueDesc);
        ctl.set_genre(Some("28"));
        ctl.set_year("1999").unwrap();

        let ticket = ctl.set_query("matrix");
        let state = ctl.state();
        assert_eq!(state.query_text, "matrix");
        assert_eq!(state.genre_id, None);
        assert_eq!(state.year_text, None);
        assert_eq!(state.sort_key, SortKey::RevenueDesc);
        assert!(matches!(ticket.request, FetchRequest::Search { page: 1, .. }));
    }

    #[test]
    fn test_filter_changes_clear_query() {
        let mut ctl = ListingController::new(SortKey::default());
        ctl.set_query("matrix");
        ctl.set_genre(Some("28"));
        assert_eq!(ctl.state().query_text, "");

        ctl.set_query("matrix");
        ctl.set_sort(SortKey::VoteAverageDesc);
        assert_eq!(ctl.state().query_text, "");

        ctl.set_query("matrix");
        ctl.set_year("").unwrap();
        assert_eq!(ctl.state().query_text, "");
    }

    #[test]
    fn test_partial_year_is_rejected_without_side_effects() {
        let mut ctl = ListingController::new(SortKey::default());
        ctl.set_query("heat");
        let before = ctl.state().clone();
        let generation = ctl.generation();

        for input in ["1", "19", "199", "19999", "abcd", "20x4"] {
            assert!(ctl.set_year(input).is_none(), "accepted {:?}", input);
        }
        assert_eq!(ctl.state(), &before);
        assert_eq!(ctl.generation(), generation);
    }

    #[test]
    fn test_load_next_page_blocked_while_in_flight() {
        let mut ctl = ListingController::new(SortKey::default());
        let first = ctl.refresh();
        assert!(ctl.state().fetch_in_flight);
        assert!(ctl.load_next_page().is_none());

        ctl.complete(&first, Ok(vec![movie(1)])).unwrap();
        let next = ctl.load_next_page().unwrap();
        assert_eq!(next.request.page(), 2);
        assert_eq!(next.mode, ApplyMode::Append);
        assert!(ctl.load_next_page().is_none());
    }

    #[test]
    fn test_failure_clears_in_flight_and_keeps_page() {
        let mut ctl = ListingController::new(SortKey::default());
        let first = ctl.refresh();
        ctl.complete(&first, Ok(vec![movie(1)])).unwrap();

        let next = ctl.load_next_page().unwrap();
        assert!(ctl.complete(&next, Err(transport_error())).is_err());
        assert!(!ctl.state().fetch_in_flight);
        assert_eq!(ctl.state().page_number, 1);

        let retry = ctl.load_next_page().unwrap();
        assert_eq!(retry.request.page(), 2);
    }

    #[test]
    fn test_append_keeps_prefix_and_skips_duplicates() {
        let mut ctl = ListingController::new(SortKey::default());
        let first = ctl.refresh();
        ctl.complete(&first, Ok(vec![movie(1), movie(2)])).unwrap();

        let next = ctl.load_next_page().unwrap();
        let outcome = ctl
            .complete(&next, Ok(vec![movie(2), movie(3), movie(4)]))
            .unwrap();
        assert_eq!(outcome, Completion::Applied { added: 2 });

        let ids: Vec<i64> = ctl.movies().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(ctl.state().page_number, 2);
    }

    #[test]
    fn test_stale_page_after_reset_is_discarded() {
        let mut ctl = ListingController::new(SortKey::default());
        let first = ctl.refresh();
        ctl.complete(&first, Ok(vec![movie(1)])).unwrap();
        let page_two = ctl.load_next_page().unwrap();

        // Filter changes before page two lands.
        let fresh = ctl.set_genre(Some("18"));
        assert_eq!(
            ctl.complete(&page_two, Ok(vec![movie(50)])).unwrap(),
            Completion::Stale
        );
        assert!(ctl.movies().is_empty());
        assert!(ctl.state().fetch_in_flight, "stale completion must not unblock");

        ctl.complete(&fresh, Ok(vec![movie(7)])).unwrap();
        let ids: Vec<i64> = ctl.movies().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![7]);
    }

    #[test]
    fn test_stale_error_is_swallowed() {
        let mut ctl = ListingController::new(SortKey::default());
        let old = ctl.set_query("a");
        let _new = ctl.set_query("ab");
        assert_eq!(
            ctl.complete(&old, Err(transport_error())).unwrap(),
            Completion::Stale
        );
    }

    #[test]
    fn test_empty_first_page_sets_empty_flag() {
        let mut ctl = ListingController::new(SortKey::default());
        let ticket = ctl.set_query("zzzzzz");
        ctl.complete(&ticket, Ok(vec![])).unwrap();
        assert!(ctl.is_empty_result());

        let ticket = ctl.set_query("alien");
        assert!(!ctl.is_empty_result());
        ctl.complete(&ticket, Ok(vec![movie(1)])).unwrap();
        assert!(!ctl.is_empty_result());
    }

    #[test]
    fn test_visibility_drives_next_page_once() {
        let mut ctl = ListingController::new(SortKey::default());
        let first = ctl.refresh();
        ctl.complete(&first, Ok(vec![movie(1)])).unwrap();

        let ticket = ctl.on_visibility(true).unwrap();
        assert_eq!(ticket.request.page(), 2);
        assert!(ctl.on_visibility(true).is_none());

        ctl.suspend_pagination();
        ctl.complete(&ticket, Ok(vec![movie(2)])).unwrap();
        assert!(ctl.on_visibility(false).is_none());
        assert!(ctl.on_visibility(true).is_none());
    }

    #[test]
    fn test_refresh_rearms_pagination() {
        let mut ctl = ListingController::new(SortKey::default());
        ctl.suspend_pagination();
        assert!(!ctl.pagination().is_armed());
        let before = ctl.pagination().subscription();
        ctl.set_sort(SortKey::PopularityAsc);
        assert!(ctl.pagination().is_armed());
        assert!(ctl.pagination().subscription() > before);
    }
}
