//! Line-oriented terminal front end. Reads commands from stdin, feeds them
//! to [`App`], and prints the rendered screen.
//!
//! `search` and `year` go through a [`Debouncer`], like typing into the
//! corresponding inputs: only the last value of a quick burst is applied.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::warn;

use crate::app::App;
use crate::catalog::{MovieCatalog, SortKey};
use crate::favorites::KeyValueStore;
use crate::session::Debouncer;
use crate::view::{MovieCard, ScreenView};

const HELP: &str = "\
Commands:
  search <text>      search by title (empty text returns to discover)
  genre <id|none>    filter by genre
  year <yyyy|none>   filter by release year
  sort <key>         popularity.desc, vote_average.desc, primary_release_date.desc, ...
  more               load the next page
  open <id>          show movie details
  fav <id>           toggle favorite
  remove <id>        remove from favorites
  favorites          show favorites
  home | back        back to the listing
  genres             list genre ids
  help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Genre(Option<String>),
    Year(String),
    Sort(SortKey),
    More,
    Open(i64),
    Favorite(i64),
    Remove(i64),
    Favorites,
    Home,
    Back,
    Genres,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let id = |arg: &str| -> Result<i64, String> {
        arg.parse::<i64>()
            .map_err(|_| format!("Expected a movie id, got '{}'", arg))
    };
    let none_or = |arg: &str| -> Option<String> {
        if arg.is_empty() || arg.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(arg.to_string())
        }
    };

    match word.to_ascii_lowercase().as_str() {
        "search" | "s" => Ok(Command::Search(rest.to_string())),
        "genre" | "g" => Ok(Command::Genre(none_or(rest))),
        "year" | "y" => Ok(Command::Year(none_or(rest).unwrap_or_default())),
        "sort" => rest.parse::<SortKey>().map(Command::Sort),
        "more" | "m" => Ok(Command::More),
        "open" | "o" => id(rest).map(Command::Open),
        "fav" | "f" => id(rest).map(Command::Favorite),
        "remove" | "rm" => id(rest).map(Command::Remove),
        "favorites" | "favs" => Ok(Command::Favorites),
        "home" => Ok(Command::Home),
        "back" | "b" => Ok(Command::Back),
        "genres" => Ok(Command::Genres),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" => Err("Empty command".to_string()),
        other => Err(format!("Unknown command '{}'. Type 'help'.", other)),
    }
}

/// Plain-text rendering of a screen.
pub fn render_text(screen: &ScreenView) -> String {
    TextScreen(screen).to_string()
}

struct TextScreen<'a>(&'a ScreenView);

impl fmt::Display for TextScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ScreenView::Listing(listing) => {
                writeln!(f, "== {} ==", listing.page_title)?;
                writeln!(f, "{}", listing.heading)?;
                if listing.empty {
                    writeln!(f, "No movies found.")?;
                }
                write_cards(f, &listing.cards)?;
                if listing.loading {
                    writeln!(f, "Loading...")?;
                }
            }
            ScreenView::DetailLoading => writeln!(f, "Loading details...")?,
            ScreenView::Detail(detail) => {
                writeln!(f, "== {} ==", detail.page_title)?;
                writeln!(
                    f,
                    "{}  |  {}  |  {}  |  {}",
                    detail.title, detail.rating, detail.runtime, detail.year
                )?;
                if !detail.genres.is_empty() {
                    writeln!(f, "[{}]", detail.genres.join("] ["))?;
                }
                writeln!(f, "{}", detail.overview)?;
                writeln!(f, "Poster: {}", detail.poster_url)?;
                writeln!(f, "({} with 'fav {}')", detail.favorite_label, detail.id)?;
                if !detail.similar.is_empty() {
                    writeln!(f, "-- Similar Movies --")?;
                    write_cards(f, &detail.similar)?;
                }
            }
            ScreenView::FavoritesLoading => writeln!(f, "Loading your favorite movies...")?,
            ScreenView::Favorites(favorites) => {
                writeln!(f, "== {} ==", favorites.page_title)?;
                if let Some(message) = favorites.message {
                    writeln!(f, "{}", message)?;
                }
                write_cards(f, &favorites.cards)?;
            }
            ScreenView::Error {
                page_title,
                message,
            } => {
                writeln!(f, "== {} ==", page_title)?;
                writeln!(f, "{}", message)?;
                writeln!(f, "Type 'home' to go back.")?;
            }
        }
        Ok(())
    }
}

fn write_cards(f: &mut fmt::Formatter<'_>, cards: &[MovieCard]) -> fmt::Result {
    for card in cards {
        writeln!(
            f,
            "{:>8}  {:>4}  {}  ({})",
            card.id, card.rating, card.title, card.year
        )?;
    }
    Ok(())
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(due) => tokio::time::sleep_until(due).await,
        None => std::future::pending::<()>().await,
    }
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}

async fn execute<C: MovieCatalog, S: KeyValueStore>(app: &mut App<C, S>, command: Command) {
    match command {
        Command::Genre(genre) => app.select_genre(genre.as_deref()).await,
        Command::Sort(key) => app.set_sort(key).await,
        Command::More => {
            // The loader scrolls into view, then out again.
            app.on_scroll_signal(true).await;
            app.on_scroll_signal(false).await;
        }
        Command::Open(id) => app.show_detail(id).await,
        Command::Favorite(id) => {
            if let Err(e) = app.toggle_favorite(id) {
                warn!("Failed to toggle favorite {}: {}", id, e);
            }
        }
        Command::Remove(id) => {
            if let Err(e) = app.remove_favorite(id).await {
                warn!("Failed to remove favorite {}: {}", id, e);
            }
        }
        Command::Favorites => app.show_favorites().await,
        Command::Home => app.show_home(),
        Command::Back => app.go_back(),
        Command::Search(_) | Command::Year(_) | Command::Genres | Command::Help | Command::Quit => {}
    }
}

/// Run the interactive loop until `quit` or end of input.
pub async fn run_shell<C: MovieCatalog, S: KeyValueStore>(
    app: &mut App<C, S>,
    debounce: Duration,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut search_input: Debouncer<String> = Debouncer::new(debounce);
    let mut year_input: Debouncer<String> = Debouncer::new(debounce);

    println!("{}", render_text(&app.render()));

    loop {
        let deadline = earliest(search_input.deadline(), year_input.deadline());
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{}", HELP),
                    Ok(Command::Genres) => {
                        if app.genres().is_empty() {
                            println!("No genres available.");
                        }
                        for genre in app.genres() {
                            println!("{:>6}  {}", genre.id, genre.name);
                        }
                    }
                    Ok(Command::Search(text)) => search_input.schedule(text, Instant::now()),
                    Ok(Command::Year(text)) => year_input.schedule(text, Instant::now()),
                    Ok(command) => {
                        execute(app, command).await;
                        println!("{}", render_text(&app.render()));
                    }
                    Err(message) => println!("{}", message),
                }
            }
            _ = wait_until(deadline) => {
                let now = Instant::now();
                if let Some(text) = search_input.poll(now) {
                    app.search(&text).await;
                    println!("{}", render_text(&app.render()));
                }
                if let Some(text) = year_input.poll(now) {
                    if app.set_year(&text).await {
                        println!("{}", render_text(&app.render()));
                    } else {
                        println!("Year must be four digits or 'none'.");
                    }
                }
            }
        }
    }
    Ok(())
}
