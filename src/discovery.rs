use crate::media::{ApiError, Effect, MovieSummary, Query};

pub const NO_RESULTS_MESSAGE: &str = "No movies found for your search.";
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching movies. Please try again later";

/// Discovery state: settled query text, page, and the visible list. Loading
/// keeps the previous list on screen; only errors and empty responses clear
/// it.
#[derive(Debug, Clone)]
pub struct DiscoveryState {
    pub search_text: String,
    pub page: u32,
    pub movies: Vec<MovieSummary>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for DiscoveryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            page: 1,
            movies: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

impl DiscoveryState {
    pub fn can_go_previous(&self) -> bool {
        self.page > 1
    }

    /// The query a fetch issued right now would carry. Responses tagged
    /// with anything else are stale.
    pub fn current_query(&self) -> Query {
        Query::new(self.search_text.clone(), self.page)
    }

    fn start_fetch(&mut self) -> Effect {
        self.is_loading = true;
        self.error = None;
        Effect::FetchMovies(self.current_query())
    }
}

pub fn handle_query_settled(state: &mut DiscoveryState, text: String) -> Vec<Effect> {
    state.search_text = text;
    // Entering search mode anchors pagination back to the first page.
    if !state.search_text.is_empty() {
        state.page = 1;
    }
    vec![state.start_fetch()]
}

pub fn handle_next_page(state: &mut DiscoveryState) -> Vec<Effect> {
    // Search results are pinned to page 1; paginating them would re-run the
    // search and record another trending hit for the same term.
    if !state.search_text.is_empty() {
        return Vec::new();
    }
    state.page += 1;
    vec![state.start_fetch(), Effect::ScrollToTop]
}

pub fn handle_previous_page(state: &mut DiscoveryState) -> Vec<Effect> {
    if !state.search_text.is_empty() || !state.can_go_previous() {
        return Vec::new();
    }
    state.page -= 1;
    vec![state.start_fetch(), Effect::ScrollToTop]
}

pub fn handle_movies_loaded(
    state: &mut DiscoveryState,
    tag: Query,
    result: Result<Vec<MovieSummary>, ApiError>,
) -> Vec<Effect> {
    if tag != state.current_query() {
        // Completion of a superseded request; a newer fetch is in flight.
        return Vec::new();
    }
    state.is_loading = false;

    match result {
        Ok(movies) if movies.is_empty() => {
            state.movies.clear();
            state.error = Some(String::from(NO_RESULTS_MESSAGE));
            Vec::new()
        }
        Ok(movies) => {
            state.error = None;
            state.movies = movies;
            if tag.is_search() {
                let first = state.movies[0].clone();
                return vec![Effect::RecordSearchHit {
                    term: state.search_text.clone(),
                    movie: first,
                }];
            }
            Vec::new()
        }
        Err(error) => {
            state.movies.clear();
            state.error = Some(match error {
                ApiError::Api { message } => message,
                _ => String::from(FETCH_FAILED_MESSAGE),
            });
            Vec::new()
        }
    }
}
