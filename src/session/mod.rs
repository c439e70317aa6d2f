//! View-state for the movie listing: filters, pagination and the
//! generation-tagged fetch cycle.

pub mod controller;
pub mod debounce;
pub mod pagination;
pub mod state;

pub use controller::{ApplyMode, Completion, FetchTicket, ListingController};
pub use debounce::Debouncer;
pub use pagination::PaginationDriver;
pub use state::{FetchRequest, SessionFilterState};
