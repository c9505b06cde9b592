mod api;
mod app;
mod auth;
mod bootstrap;
mod cli;
mod config;
mod export;
mod logging;
mod login;
mod runtime;
mod session_store;
mod time_utils;
mod ui;

use anyhow::{Context, Result};
use api::ApiClient;
use app::App;
use auth::AuthContext;
use clap::Parser;
use cli::{Cli, Commands};
use config::TripConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use session_store::SessionStore;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = TripConfig::load()?.with_env_overrides();

    match TripConfig::log_path().and_then(|path| logging::init(&path, &cfg.log_level)) {
        Ok(()) => tracing::info!(api_url = %cfg.api_url, "starting trip-tui"),
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::ConfigPath => {
            let path = TripConfig::config_path()?;
            if !path.exists() {
                TripConfig::default().save_to(&path)?;
                println!("Created default config.");
            }
            println!("{}", path.display());
        }
        Commands::Logout => {
            let store = SessionStore::default_location()?;
            store.clear()?;
            match store.path() {
                Some(path) => println!("Logged out. Removed {}", path.display()),
                None => println!("Logged out."),
            }
        }
        Commands::Login { username } => {
            let mut auth = AuthContext::init(SessionStore::default_location()?);
            let mut client = ApiClient::new(&cfg.api_url, None)?;
            login::run_login(&mut client, &mut auth, username).await?;
        }
        Commands::Export { trip_id } => {
            let auth = AuthContext::init(SessionStore::default_location()?);
            let token = auth
                .token()
                .context("Not logged in. Run `trip-tui login` first.")?;
            let client = ApiClient::new(&cfg.api_url, Some(token.to_string()))?;
            let path = export::export_trip(&client, trip_id, &cfg.export_dir()).await?;
            println!("Saved {}", path.display());
        }
        Commands::Dev => {
            let auth = AuthContext::init(SessionStore::in_memory());
            run_tui(&cfg, auth, ApiClient::dev()?).await?;
        }
        Commands::Run => {
            let auth = AuthContext::init(SessionStore::default_location()?);
            let client = ApiClient::new(&cfg.api_url, auth.token().map(str::to_string))?;
            run_tui(&cfg, auth, client).await?;
        }
    }

    Ok(())
}

async fn run_tui(cfg: &TripConfig, auth: AuthContext, mut client: ApiClient) -> Result<()> {
    let mut app = App::new(cfg, auth);
    bootstrap::initialize_app_state(&mut app, &mut client).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, &mut client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("event loop failed: {err:#}");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
