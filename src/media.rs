use serde::Deserialize;

use crate::detail::MovieDetailView;

pub type MovieId = u64;

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

const GENRE_TABLE: [(u32, &str); 19] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Display name for a genre id. Unknown ids are not an error, they render
/// as the same "N/A" placeholder used for every other missing field.
pub fn genre_name(id: u32) -> &'static str {
    GENRE_TABLE
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map_or("N/A", |(_, name)| *name)
}

/// One fetch request against the catalog. Doubles as the request tag used
/// to discard out-of-order completions: a response is only applied while
/// its query still equals the controller's current effective query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub page: u32,
}

impl Query {
    /// Search ignores the caller-provided page and always runs on page 1.
    pub fn new(text: String, page: u32) -> Self {
        let page = if text.is_empty() { page } else { 1 };
        Self { text, page }
    }

    pub fn is_search(&self) -> bool {
        !self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    pub original_language: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductionCompany {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductionCountry {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpokenLanguage {
    pub english_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetails {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    pub original_language: Option<String>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    pub status: Option<String>,
    pub tagline: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
}

/// Aggregated record of how often a search term has been searched, shared
/// across all users through the counter store. Attribute names match the
/// store collection schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrendingEntry {
    #[serde(rename = "$id")]
    pub document_id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub count: u32,
    pub movie_id: MovieId,
    #[serde(default)]
    pub poster_url: String,
}

impl From<&TrendingEntry> for MovieSummary {
    // Only the id is needed to route into the detail view; everything else
    // is replaced by the detail fetch.
    fn from(entry: &TrendingEntry) -> Self {
        Self {
            id: entry.movie_id,
            title: entry.search_term.clone(),
            poster_path: None,
            vote_average: 0.0,
            original_language: None,
            release_date: None,
            genre_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    List,
    Detail(MovieSummary),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Parse(String),
    #[error("{message}")]
    Api { message: String },
    #[error("rate limited by the catalog API")]
    RateLimit,
    #[error("catalog API rejected the credentials")]
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Parse(String),
    #[error("{message}")]
    Api { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    SearchInputChanged(String),
    QuerySettled(String),
    NextPage,
    PreviousPage,
    MoviesLoaded(Query, Result<Vec<MovieSummary>, ApiError>),
    TrendingLoaded(Result<Vec<TrendingEntry>, StoreError>),
    SearchHitRecorded(String, Result<(), StoreError>),
    MovieSelected(MovieSummary),
    TrendingSelected(TrendingEntry),
    DetailLoaded(MovieId, Result<MovieDetailView, ApiError>),
    ReturnToList,
}

/// Side effects requested by the reducer. The runtime in `main.rs` executes
/// them; completions come back as `Message`s over the same channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Debounce(String),
    FetchMovies(Query),
    LoadTrending,
    RecordSearchHit { term: String, movie: MovieSummary },
    LoadDetail(MovieSummary),
    ScrollToTop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_lookup_maps_known_ids() {
        assert_eq!(genre_name(28), "Action");
        assert_eq!(genre_name(878), "Science Fiction");
    }

    #[test]
    fn genre_lookup_falls_back_for_unknown_ids() {
        assert_eq!(genre_name(0), "N/A");
        assert_eq!(genre_name(4242), "N/A");
    }

    #[test]
    fn search_query_is_forced_to_page_one() {
        let query = Query::new(String::from("batman"), 3);
        assert_eq!(query.page, 1);
        assert!(query.is_search());
    }

    #[test]
    fn discover_query_keeps_its_page() {
        let query = Query::new(String::new(), 3);
        assert_eq!(query.page, 3);
        assert!(!query.is_search());
    }

    #[test]
    fn trending_entry_adapts_to_summary_by_movie_id() {
        let entry = TrendingEntry {
            document_id: String::from("doc-1"),
            search_term: String::from("fight club"),
            count: 7,
            movie_id: 550,
            poster_url: String::from("https://image.tmdb.org/t/p/w500/poster.jpg"),
        };
        let summary = MovieSummary::from(&entry);
        assert_eq!(summary.id, 550);
        assert_eq!(summary.title, "fight club");
    }
}
