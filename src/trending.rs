use crate::counter_store::{CounterStore, NewTrendingEntry};
use crate::media::{Effect, MovieSummary, StoreError, TrendingEntry, IMAGE_BASE_URL};

/// Trending state is loaded once per session and is completely independent
/// of Discovery: its loading flag and error never gate the movie list.
#[derive(Debug, Clone, Default)]
pub struct TrendingState {
    pub entries: Vec<TrendingEntry>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub fn start_load(state: &mut TrendingState) -> Vec<Effect> {
    state.is_loading = true;
    state.error = None;
    vec![Effect::LoadTrending]
}

pub fn handle_loaded(
    state: &mut TrendingState,
    result: Result<Vec<TrendingEntry>, StoreError>,
) -> Vec<Effect> {
    state.is_loading = false;
    match result {
        Ok(entries) => {
            state.entries = entries;
            state.error = None;
        }
        Err(error) => {
            tracing::warn!("loading trending searches failed: {}", error);
            state.error = Some(error.to_string());
        }
    }
    Vec::new()
}

/// Outcome of a fire-and-forget record-hit task. Failures are logged and
/// swallowed here; they never reach Discovery.
pub fn handle_hit_recorded(
    _state: &mut TrendingState,
    term: String,
    result: Result<(), StoreError>,
) -> Vec<Effect> {
    if let Err(error) = result {
        tracing::warn!("recording search hit for {:?} failed: {}", term, error);
    }
    Vec::new()
}

/// Upsert keyed on the exact search term: existing entries get their count
/// bumped by one, unknown terms get a fresh entry illustrated by the
/// representative movie. Terms are matched case-sensitively and untrimmed.
pub async fn record_search_hit(
    store: &dyn CounterStore,
    term: &str,
    movie: &MovieSummary,
) -> Result<(), StoreError> {
    match store.find_by_search_term(term).await? {
        Some(entry) => {
            store
                .increment_count(&entry.document_id, entry.count)
                .await
        }
        None => {
            store
                .create_entry(NewTrendingEntry {
                    search_term: term.to_string(),
                    movie_id: movie.id,
                    poster_url: poster_url(movie.poster_path.as_deref()),
                })
                .await?;
            Ok(())
        }
    }
}

fn poster_url(poster_path: Option<&str>) -> String {
    poster_path
        .map(|path| format!("{}{}", IMAGE_BASE_URL, path))
        .unwrap_or_default()
}
