use crate::detail::{self, DetailState};
use crate::discovery;
use crate::media::{Effect, Message, MovieSummary, ViewState};
use crate::trending;
use crate::App;

/// Single reducer over the application state. Every message deterministically
/// produces the next state plus the side effects to run; the runtime
/// executes those and feeds completions back in as new messages.
pub fn handle_message(app: &mut App, message: Message) -> Vec<Effect> {
    match message {
        Message::SearchInputChanged(text) => vec![Effect::Debounce(text)],
        Message::QuerySettled(text) => discovery::handle_query_settled(&mut app.discovery, text),
        Message::NextPage => discovery::handle_next_page(&mut app.discovery),
        Message::PreviousPage => discovery::handle_previous_page(&mut app.discovery),
        Message::MoviesLoaded(tag, result) => {
            discovery::handle_movies_loaded(&mut app.discovery, tag, result)
        }
        Message::TrendingLoaded(result) => trending::handle_loaded(&mut app.trending, result),
        Message::SearchHitRecorded(term, result) => {
            trending::handle_hit_recorded(&mut app.trending, term, result)
        }
        Message::MovieSelected(movie) => handle_movie_selected(app, movie),
        Message::TrendingSelected(entry) => {
            let movie = MovieSummary::from(&entry);
            handle_movie_selected(app, movie)
        }
        Message::DetailLoaded(movie_id, result) => {
            detail::handle_detail_loaded(&mut app.detail, &app.view, movie_id, result)
        }
        Message::ReturnToList => handle_return_to_list(app),
    }
}

fn handle_movie_selected(app: &mut App, movie: MovieSummary) -> Vec<Effect> {
    app.detail = DetailState::loading();
    app.view = ViewState::Detail(movie.clone());
    vec![Effect::LoadDetail(movie)]
}

fn handle_return_to_list(app: &mut App) -> Vec<Effect> {
    app.view = ViewState::List;
    app.detail = DetailState::default();
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{ApiError, MovieId, Query, TrendingEntry};

    fn app() -> App {
        App::default()
    }

    fn summary(id: MovieId, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: String::from(title),
            poster_path: None,
            vote_average: 6.0,
            original_language: None,
            release_date: None,
            genre_ids: Vec::new(),
        }
    }

    #[test]
    fn raw_input_only_restarts_the_debouncer() {
        let mut app = app();

        let effects = handle_message(&mut app, Message::SearchInputChanged(String::from("bat")));

        assert_eq!(effects, vec![Effect::Debounce(String::from("bat"))]);
        assert!(app.discovery.search_text.is_empty());
        assert!(!app.discovery.is_loading);
    }

    #[test]
    fn selecting_a_movie_enters_the_detail_view() {
        let mut app = app();
        let movie = summary(550, "Fight Club");

        let effects = handle_message(&mut app, Message::MovieSelected(movie.clone()));

        assert_eq!(app.view, ViewState::Detail(movie.clone()));
        assert!(app.detail.is_loading);
        assert_eq!(effects, vec![Effect::LoadDetail(movie)]);
    }

    #[test]
    fn selecting_a_trending_entry_routes_by_its_movie_id() {
        let mut app = app();
        let entry = TrendingEntry {
            document_id: String::from("doc"),
            search_term: String::from("fight club"),
            count: 3,
            movie_id: 550,
            poster_url: String::new(),
        };

        let effects = handle_message(&mut app, Message::TrendingSelected(entry));

        match &effects[..] {
            [Effect::LoadDetail(movie)] => assert_eq!(movie.id, 550),
            other => panic!("unexpected effects: {:?}", other),
        }
        assert!(matches!(&app.view, ViewState::Detail(m) if m.id == 550));
    }

    #[test]
    fn returning_home_resets_the_detail_record_but_not_discovery() {
        let mut app = app();
        handle_message(&mut app, Message::QuerySettled(String::from("batman")));
        handle_message(
            &mut app,
            Message::MoviesLoaded(
                Query::new(String::from("batman"), 1),
                Ok(vec![summary(268, "Batman")]),
            ),
        );
        handle_message(&mut app, Message::MovieSelected(summary(268, "Batman")));

        let effects = handle_message(&mut app, Message::ReturnToList);

        assert!(effects.is_empty());
        assert_eq!(app.view, ViewState::List);
        assert!(app.detail.view_model.is_none());
        assert!(!app.detail.is_loading);
        assert_eq!(app.discovery.movies.len(), 1);
        assert_eq!(app.discovery.search_text, "batman");
    }

    #[test]
    fn a_detail_failure_never_contaminates_discovery_or_trending() {
        let mut app = app();
        handle_message(&mut app, Message::MovieSelected(summary(550, "Fight Club")));

        handle_message(
            &mut app,
            Message::DetailLoaded(
                550,
                Err(ApiError::Network(String::from("connection reset"))),
            ),
        );

        assert!(app.detail.error.is_some());
        assert!(app.discovery.error.is_none());
        assert!(app.trending.error.is_none());
    }

    #[test]
    fn a_failed_hit_recording_leaves_every_error_slot_untouched() {
        let mut app = app();

        let effects = handle_message(
            &mut app,
            Message::SearchHitRecorded(
                String::from("batman"),
                Err(crate::media::StoreError::Network(String::from("timeout"))),
            ),
        );

        assert!(effects.is_empty());
        assert!(app.discovery.error.is_none());
        assert!(app.trending.error.is_none());
    }
}
