use std::fmt::Write as _;
use std::io::Write as _;

use crate::media::{genre_name, MovieSummary, ViewState};
use crate::App;

/// A command typed at the prompt. Everything state-changing is translated
/// into a `Message` by the runtime; `Quit` ends the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(String),
    NextPage,
    PreviousPage,
    Open(usize),
    OpenTrending(usize),
    Back,
    Quit,
}

/// `/text` feeds the search input (a bare `/` clears it back to discover
/// mode). The search text is passed through untouched; matching against
/// the trending store is exact.
pub fn parse_command(line: &str) -> Option<Command> {
    if let Some(text) = line.strip_prefix('/') {
        return Some(Command::Input(text.to_string()));
    }
    let mut parts = line.split_whitespace();
    let command = match (parts.next()?, parts.next()) {
        ("n", None) => Command::NextPage,
        ("p", None) => Command::PreviousPage,
        ("b", None) => Command::Back,
        ("q", None) | ("quit", None) => Command::Quit,
        ("o", Some(index)) => Command::Open(index.parse().ok()?),
        ("t", Some(index)) => Command::OpenTrending(index.parse().ok()?),
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

pub const HELP_LINE: &str =
    "commands: /<text> search · n next page · p previous page · o <n> open · t <n> trending · b back · q quit";

fn rating_label(vote_average: f32) -> String {
    if vote_average == 0.0 {
        String::from("N/A")
    } else {
        format!("{:.1}", vote_average)
    }
}

fn year_label(release_date: Option<&str>) -> &str {
    release_date
        .and_then(|date| date.split('-').next())
        .filter(|year| !year.is_empty())
        .unwrap_or("N/A")
}

fn movie_line(index: usize, movie: &MovieSummary) -> String {
    let genre = movie
        .genre_ids
        .first()
        .map_or("N/A", |id| genre_name(*id));
    format!(
        "{:>3}. {}  \u{2605} {} \u{b7} {} \u{b7} {} \u{b7} {}",
        index,
        movie.title,
        rating_label(movie.vote_average),
        movie.original_language.as_deref().unwrap_or("N/A"),
        year_label(movie.release_date.as_deref()),
        genre,
    )
}

pub fn render(app: &App) -> String {
    match &app.view {
        ViewState::List => render_list(app),
        ViewState::Detail(movie) => render_detail(app, movie),
    }
}

fn render_list(app: &App) -> String {
    let mut frame = String::new();
    let _ = writeln!(frame, "CINEFIND: find movies you'll love");
    if app.discovery.search_text.is_empty() {
        let _ = writeln!(frame, "mode: discover (most popular)");
    } else {
        let _ = writeln!(frame, "search: {:?}", app.discovery.search_text);
    }
    let _ = writeln!(frame);

    if app.trending.is_loading {
        let _ = writeln!(frame, "Trending searches: loading...");
    } else if let Some(error) = &app.trending.error {
        let _ = writeln!(frame, "Trending searches unavailable: {}", error);
    } else if !app.trending.entries.is_empty() {
        let _ = writeln!(frame, "Trending searches:");
        for (index, entry) in app.trending.entries.iter().enumerate() {
            let _ = writeln!(
                frame,
                "{:>3}. {} ({} searches)",
                index + 1,
                entry.search_term,
                entry.count
            );
        }
    }
    let _ = writeln!(frame);

    let _ = writeln!(frame, "All movies (page {})", app.discovery.page);
    if let Some(error) = &app.discovery.error {
        let _ = writeln!(frame, "{}", error);
    } else {
        for (index, movie) in app.discovery.movies.iter().enumerate() {
            let _ = writeln!(frame, "{}", movie_line(index + 1, movie));
        }
    }
    if app.discovery.is_loading {
        let _ = writeln!(frame, "loading...");
    }

    let _ = writeln!(frame);
    if app.discovery.can_go_previous() {
        let _ = writeln!(frame, "{}", HELP_LINE);
    } else {
        let _ = writeln!(frame, "{} (previous disabled on page 1)", HELP_LINE);
    }
    frame
}

fn render_detail(app: &App, movie: &MovieSummary) -> String {
    let mut frame = String::new();

    if app.detail.is_loading {
        let _ = writeln!(frame, "{}", movie.title);
        let _ = writeln!(frame, "loading details...");
        let _ = writeln!(frame, "b to go back \u{b7} q to quit");
        return frame;
    }
    if let Some(error) = &app.detail.error {
        let _ = writeln!(frame, "{}", movie.title);
        let _ = writeln!(frame, "{}", error);
        let _ = writeln!(frame, "b to go back \u{b7} q to quit");
        return frame;
    }
    let Some(view_model) = &app.detail.view_model else {
        let _ = writeln!(frame, "{}", movie.title);
        let _ = writeln!(frame, "b to go back \u{b7} q to quit");
        return frame;
    };

    let details = &view_model.details;
    let _ = writeln!(frame, "{}", details.title);
    if let Some(tagline) = &details.tagline {
        let _ = writeln!(frame, "{}", tagline);
    }
    let _ = writeln!(
        frame,
        "\u{2605} {} \u{b7} {} \u{b7} {}",
        rating_label(details.vote_average),
        year_label(details.release_date.as_deref()),
        details
            .runtime
            .map_or_else(|| String::from("N/A"), |minutes| format!("{} min", minutes)),
    );
    if let Some(status) = &details.status {
        let _ = writeln!(frame, "status: {}", status);
    }
    if !details.genres.is_empty() {
        let names: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        let _ = writeln!(frame, "genres: {}", names.join(", "));
    }
    let _ = writeln!(frame);
    let _ = writeln!(frame, "{}", details.overview);
    let _ = writeln!(frame);
    if details.budget > 0 {
        let _ = writeln!(frame, "budget: ${}", details.budget);
    }
    if details.revenue > 0 {
        let _ = writeln!(frame, "revenue: ${}", details.revenue);
    }
    if !details.production_companies.is_empty() {
        let names: Vec<&str> = details
            .production_companies
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        let _ = writeln!(frame, "production: {}", names.join(", "));
    }
    if !details.production_countries.is_empty() {
        let names: Vec<&str> = details
            .production_countries
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        let _ = writeln!(frame, "countries: {}", names.join(", "));
    }
    if !details.spoken_languages.is_empty() {
        let names: Vec<&str> = details
            .spoken_languages
            .iter()
            .map(|l| l.english_name.as_str())
            .collect();
        let _ = writeln!(frame, "languages: {}", names.join(", "));
    }
    if let Some(key) = &view_model.trailer_key {
        let _ = writeln!(frame, "trailer: https://www.youtube.com/watch?v={}", key);
    }
    let _ = writeln!(frame);
    let _ = writeln!(frame, "b to go back \u{b7} q to quit");
    frame
}

/// The terminal stands in for the original page: scroll-to-top becomes
/// clearing the screen so the next frame starts at the top row.
pub struct Screen;

impl Screen {
    pub fn scroll_to_top(&mut self) {
        print!("\x1b[2J\x1b[H");
        let _ = std::io::stdout().flush();
    }
}
