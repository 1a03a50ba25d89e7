use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use booking_console::config::{AppConfig, DEFAULT_LOG_FILTER};
use booking_console::handlers::session;
use booking_console::services::api::ApiClient;
use booking_console::services::token_store::TokenStore;
use booking_console::state::AppState;
use booking_console::view::ViewState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they stay out of the transcript.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();

    let tokens = TokenStore::open(&config.token_store_path)?;
    let api = ApiClient::new(&config.api_url, tokens.clone())?;
    tracing::info!("using booking service at {}", api.base_url());

    let state = AppState {
        config,
        api: Box::new(api),
        tokens,
    };
    let mut view = ViewState::new();

    println!("Booking console connected to {}", state.config.api_url);
    println!("Type /help for commands.");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session::run(&state, &mut view, stdin, &mut stdout).await
}
