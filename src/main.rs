mod counter_store;
mod debounce;
mod detail;
mod discovery;
mod handlers;
mod media;
mod settings;
mod tmdb;
mod trending;
mod ui;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing_subscriber::EnvFilter;

use counter_store::{CounterStore, CounterStoreClient};
use debounce::SearchDebouncer;
use detail::DetailState;
use discovery::DiscoveryState;
use media::{Effect, Message, ViewState};
use settings::AppSettings;
use tmdb::{MovieCatalog, TmdbClient};
use trending::TrendingState;
use ui::{Command, Screen};

/// Application state: one independently-owned record per component,
/// combined only at the rendering boundary through `ViewState`.
pub struct App {
    pub discovery: DiscoveryState,
    pub trending: TrendingState,
    pub detail: DetailState,
    pub view: ViewState,
}

impl Default for App {
    fn default() -> Self {
        Self {
            discovery: DiscoveryState::default(),
            trending: TrendingState::default(),
            detail: DetailState::default(),
            view: ViewState::List,
        }
    }
}

/// Executes the effects the reducer asks for. Network effects run as
/// spawned tasks whose completions come back over the message channel; the
/// event loop stays the only owner of `App`.
struct Runtime {
    catalog: Arc<dyn MovieCatalog>,
    store: Arc<dyn CounterStore>,
    sender: UnboundedSender<Message>,
    debouncer: SearchDebouncer,
    screen: Screen,
}

impl Runtime {
    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Debounce(text) => self.debouncer.input(text),
            Effect::ScrollToTop => self.screen.scroll_to_top(),
            Effect::FetchMovies(query) => {
                let catalog = Arc::clone(&self.catalog);
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let result = if query.is_search() {
                        catalog.search(&query.text).await
                    } else {
                        catalog.discover(query.page).await
                    };
                    let _ = sender.send(Message::MoviesLoaded(query, result));
                });
            }
            Effect::LoadTrending => {
                let store = Arc::clone(&self.store);
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let _ = sender.send(Message::TrendingLoaded(store.list_all().await));
                });
            }
            Effect::RecordSearchHit { term, movie } => {
                let store = Arc::clone(&self.store);
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let result =
                        trending::record_search_hit(store.as_ref(), &term, &movie).await;
                    let _ = sender.send(Message::SearchHitRecorded(term, result));
                });
            }
            Effect::LoadDetail(movie) => {
                let catalog = Arc::clone(&self.catalog);
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    let result = detail::load_detail(catalog.as_ref(), &movie).await;
                    let _ = sender.send(Message::DetailLoaded(movie.id, result));
                });
            }
        }
    }
}

fn dispatch(app: &mut App, runtime: &mut Runtime, message: Message) {
    let effects = handlers::handle_message(app, message);
    for effect in effects {
        runtime.run(effect);
    }
}

fn command_to_message(app: &App, command: Command) -> Option<Message> {
    match command {
        Command::Input(text) => Some(Message::SearchInputChanged(text)),
        Command::NextPage => Some(Message::NextPage),
        Command::PreviousPage => Some(Message::PreviousPage),
        Command::Back => Some(Message::ReturnToList),
        Command::Open(index) => {
            let movie = app.discovery.movies.get(index.checked_sub(1)?)?;
            Some(Message::MovieSelected(movie.clone()))
        }
        Command::OpenTrending(index) => {
            let entry = app.trending.entries.get(index.checked_sub(1)?)?;
            Some(Message::TrendingSelected(entry.clone()))
        }
        Command::Quit => None,
    }
}

fn print_setup_instructions() {
    eprintln!("cinefind is not configured: a catalog API token is required.");
    eprintln!("Set the TMDB_API_TOKEN environment variable, or create a config file:");
    if let Some(path) = AppSettings::config_path() {
        eprintln!("  {}", path.display());
    }
    eprintln!("with at least: {{\"tmdb_api_token\": \"<your token>\"}}");
    eprintln!("Trending searches additionally need COUNTER_STORE_PROJECT_ID,");
    eprintln!("COUNTER_STORE_DATABASE_ID and COUNTER_STORE_COLLECTION_ID.");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = AppSettings::load();
    if !settings.is_valid() {
        print_setup_instructions();
        std::process::exit(1);
    }
    if !settings.has_counter_store() {
        tracing::warn!("counter store not configured; trending searches will be unavailable");
    }

    let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbClient::from_settings(&settings));
    let store: Arc<dyn CounterStore> = Arc::new(CounterStoreClient::from_settings(&settings));

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let (command_sender, mut command_receiver) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(command) = ui::parse_command(&line) {
                if command_sender.send(command).is_err() {
                    break;
                }
            }
        }
    });

    let mut app = App::default();
    let mut runtime = Runtime {
        catalog,
        store,
        sender: sender.clone(),
        debouncer: SearchDebouncer::new(sender),
        screen: Screen,
    };

    // Session start: one discover fetch for page 1 plus the trending load.
    for effect in trending::start_load(&mut app.trending) {
        runtime.run(effect);
    }
    for effect in discovery::handle_query_settled(&mut app.discovery, String::new()) {
        runtime.run(effect);
    }
    println!("{}", ui::render(&app));

    loop {
        tokio::select! {
            Some(message) = receiver.recv() => {
                dispatch(&mut app, &mut runtime, message);
            }
            command = command_receiver.recv() => {
                match command {
                    // Quit command or end of input.
                    Some(Command::Quit) | None => break,
                    Some(command) => {
                        if let Some(message) = command_to_message(&app, command) {
                            dispatch(&mut app, &mut runtime, message);
                        }
                    }
                }
            }
        }
        println!("{}", ui::render(&app));
    }
}
