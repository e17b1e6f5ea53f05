use crate::media::{ApiError, Effect, MovieDetails, MovieId, MovieSummary, ViewState};
use crate::tmdb::{MovieCatalog, MovieVideo};

/// Combined read-only view-model for the detail screen. Rebuilt from
/// scratch for every selected movie.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailView {
    pub details: MovieDetails,
    pub trailer_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub view_model: Option<MovieDetailView>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl DetailState {
    pub fn loading() -> Self {
        Self {
            view_model: None,
            is_loading: true,
            error: None,
        }
    }
}

/// Fetches details and the video listing concurrently. Details are fatal to
/// the view; a failed video listing just means no trailer.
pub async fn load_detail(
    catalog: &dyn MovieCatalog,
    movie: &MovieSummary,
) -> Result<MovieDetailView, ApiError> {
    let (details, videos) = tokio::join!(catalog.details(movie.id), catalog.videos(movie.id));
    let details = details?;
    let trailer_key = match videos {
        Ok(videos) => select_trailer(&videos).map(|video| video.key.clone()),
        Err(error) => {
            tracing::warn!("video listing for movie {} failed: {}", movie.id, error);
            None
        }
    };
    Ok(MovieDetailView {
        details,
        trailer_key,
    })
}

/// First entry hosted on YouTube with type "Trailer"; anything else means
/// the view has no trailer.
pub fn select_trailer(videos: &[MovieVideo]) -> Option<&MovieVideo> {
    videos
        .iter()
        .find(|video| video.site == "YouTube" && video.video_type == "Trailer")
}

pub fn handle_detail_loaded(
    state: &mut DetailState,
    view: &ViewState,
    movie_id: MovieId,
    result: Result<MovieDetailView, ApiError>,
) -> Vec<Effect> {
    // Completions for a movie that is no longer selected are dropped.
    match view {
        ViewState::Detail(selected) if selected.id == movie_id => {}
        _ => return Vec::new(),
    }
    state.is_loading = false;
    match result {
        Ok(view_model) => {
            state.view_model = Some(view_model);
            state.error = None;
        }
        Err(error) => {
            state.view_model = None;
            state.error = Some(error.to_string());
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeCatalog {
        details: Result<MovieDetails, ApiError>,
        videos: Result<Vec<MovieVideo>, ApiError>,
    }

    #[async_trait]
    impl MovieCatalog for FakeCatalog {
        async fn discover(&self, _page: u32) -> Result<Vec<MovieSummary>, ApiError> {
            unimplemented!("not exercised by detail loading")
        }

        async fn search(&self, _query: &str) -> Result<Vec<MovieSummary>, ApiError> {
            unimplemented!("not exercised by detail loading")
        }

        async fn details(&self, _id: MovieId) -> Result<MovieDetails, ApiError> {
            self.details.clone()
        }

        async fn videos(&self, _id: MovieId) -> Result<Vec<MovieVideo>, ApiError> {
            self.videos.clone()
        }
    }

    fn details(id: MovieId) -> MovieDetails {
        MovieDetails {
            id,
            title: String::from("Fight Club"),
            poster_path: None,
            vote_average: 8.4,
            original_language: Some(String::from("en")),
            release_date: Some(String::from("1999-10-15")),
            overview: String::from("An insomniac office worker..."),
            runtime: Some(139),
            budget: 63_000_000,
            revenue: 100_853_753,
            status: Some(String::from("Released")),
            tagline: Some(String::from("Mischief. Mayhem. Soap.")),
            genres: Vec::new(),
            production_companies: Vec::new(),
            production_countries: Vec::new(),
            spoken_languages: Vec::new(),
        }
    }

    fn summary(id: MovieId) -> MovieSummary {
        MovieSummary {
            id,
            title: String::from("Fight Club"),
            poster_path: None,
            vote_average: 8.4,
            original_language: None,
            release_date: None,
            genre_ids: Vec::new(),
        }
    }

    fn video(site: &str, video_type: &str, key: &str) -> MovieVideo {
        MovieVideo {
            key: String::from(key),
            site: String::from(site),
            video_type: String::from(video_type),
        }
    }

    #[test]
    fn trailer_selection_takes_the_first_youtube_trailer() {
        let videos = vec![
            video("YouTube", "Teaser", "teaser"),
            video("Vimeo", "Trailer", "vimeo"),
            video("YouTube", "Trailer", "first"),
            video("YouTube", "Trailer", "second"),
        ];
        assert_eq!(select_trailer(&videos).map(|v| v.key.as_str()), Some("first"));
    }

    #[test]
    fn no_qualifying_video_means_no_trailer() {
        let videos = vec![
            video("YouTube", "Featurette", "a"),
            video("Vimeo", "Trailer", "b"),
        ];
        assert!(select_trailer(&videos).is_none());
    }

    #[tokio::test]
    async fn video_failure_is_not_fatal() {
        let catalog = FakeCatalog {
            details: Ok(details(550)),
            videos: Err(ApiError::Network(String::from("timeout"))),
        };

        let view_model = load_detail(&catalog, &summary(550)).await.unwrap();

        assert_eq!(view_model.details.id, 550);
        assert!(view_model.trailer_key.is_none());
    }

    #[tokio::test]
    async fn details_failure_is_fatal() {
        let catalog = FakeCatalog {
            details: Err(ApiError::Api {
                message: String::from("The resource you requested could not be found."),
            }),
            videos: Ok(vec![video("YouTube", "Trailer", "abc")]),
        };

        assert!(load_detail(&catalog, &summary(550)).await.is_err());
    }

    #[tokio::test]
    async fn both_fetches_merge_into_one_view_model() {
        let catalog = FakeCatalog {
            details: Ok(details(550)),
            videos: Ok(vec![
                video("YouTube", "Teaser", "teaser"),
                video("YouTube", "Trailer", "trailer-key"),
            ]),
        };

        let view_model = load_detail(&catalog, &summary(550)).await.unwrap();

        assert_eq!(view_model.trailer_key.as_deref(), Some("trailer-key"));
        assert_eq!(view_model.details.runtime, Some(139));
    }

    #[test]
    fn completions_for_a_deselected_movie_are_dropped() {
        let mut state = DetailState::loading();
        let view = ViewState::Detail(summary(603));

        let effects = handle_detail_loaded(
            &mut state,
            &view,
            550,
            Ok(MovieDetailView {
                details: details(550),
                trailer_key: None,
            }),
        );

        assert!(effects.is_empty());
        assert!(state.view_model.is_none());
        assert!(state.is_loading);
    }

    #[test]
    fn completions_after_returning_to_the_list_are_dropped() {
        let mut state = DetailState::loading();

        handle_detail_loaded(
            &mut state,
            &ViewState::List,
            550,
            Err(ApiError::Network(String::from("late failure"))),
        );

        assert!(state.error.is_none());
        assert!(state.is_loading);
    }

    #[test]
    fn matching_completion_fills_the_view_model() {
        let mut state = DetailState::loading();
        let view = ViewState::Detail(summary(550));

        handle_detail_loaded(
            &mut state,
            &view,
            550,
            Ok(MovieDetailView {
                details: details(550),
                trailer_key: Some(String::from("abc")),
            }),
        );

        assert!(!state.is_loading);
        assert_eq!(
            state.view_model.as_ref().and_then(|v| v.trailer_key.as_deref()),
            Some("abc")
        );
    }
}
