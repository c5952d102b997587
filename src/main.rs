
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use languagebooster::config::{ClientConfig, ConfigError};
use languagebooster::net::api::{ApiError, HttpTransport};
use languagebooster::state::navigation::HistoryNavigator;
use languagebooster::state::session::{SessionError, SessionStore};
use languagebooster::state::token_store::FileTokenStore;
use languagebooster::util::auth::GuardOutcome;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_CONFIG",
            Self::Api(e) | Self::Session(SessionError::Api(e)) => e.error_code(),
            Self::Session(SessionError::Store(_)) => "E_TOKEN_STORE",
            Self::InvalidJson(_) => "E_JSON",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "languagebooster", about = "LanguageBooster API client")]
struct Cli {
    /// Overrides `LANGUAGEBOOSTER_API_URL`.
    #[arg(long)]
    api_url: Option<String>,

    /// Overrides `LANGUAGEBOOSTER_TOKEN_FILE`.
    #[arg(long)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "LANGUAGEBOOSTER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and store the session token.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long, env = "LANGUAGEBOOSTER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Fetch the current user with the stored token.
    Whoami,
    /// Print the authorization header object for the stored token.
    Headers,
    /// Run the route guard for a navigation.
    Guard {
        to: String,
        #[arg(long, default_value = "/")]
        from: String,
    },
    /// Report whether a session token is stored.
    Token,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config.with_api_url(api_url)?;
    }
    if let Some(token_file) = cli.token_file {
        config.token_file = token_file;
    }
    let transport = HttpTransport::from_config(&config)?;
    tracing::debug!(api_url = transport.base_url(), token_file = %config.token_file.display(), "config loaded");

    let navigator = Arc::new(HistoryNavigator::new());
    let store = SessionStore::new(
        Arc::new(transport),
        Arc::new(FileTokenStore::new(config.token_file.clone())),
        navigator.clone(),
    );

    match cli.command {
        Command::Login { username, password } => {
            let user = store.login(&username, &password).await?;
            print_json(&user)?;
            print_navigation(&navigator);
        }
        Command::Register { name, username, password } => {
            let user = store.register(&name, &username, &password).await?;
            print_json(&user)?;
            print_navigation(&navigator);
        }
        Command::Whoami => {
            let user = store.load_user().await?;
            print_json(&user)?;
        }
        Command::Headers => print_json(&store.request_headers())?,
        Command::Guard { to, from } => match store.guard(&to, &from) {
            GuardOutcome::Allow => println!("allow"),
            GuardOutcome::Redirect(target) => println!("redirect {target}"),
        },
        Command::Token => {
            if store.is_authenticated() {
                println!("token stored");
            } else {
                println!("no token");
            }
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn print_navigation(navigator: &HistoryNavigator) {
    if let Some(route) = navigator.current() {
        println!("navigated to {route}");
    }
}
