mod config;
mod interactive;
mod logging;
mod render;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use user_directory::GithubDirectoryClient;
use user_directory_sdk::UserDirectoryClient;
use user_search::{SearchController, SearchOutcome};

use crate::config::AppConfig;
use crate::render::{ResultsView, UserCard};

/// Search GitHub users by username
#[derive(Parser)]
#[command(name = "usersearch-cli")]
#[command(about = "Search GitHub users by username")]
#[command(version, arg_required_else_help = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search once and print a page of results
    Search {
        query: String,

        /// Page to fetch (1-100)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Results per page (1-100); overrides search.page_size
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        page_size: Option<u32>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single profile
    User {
        login: String,

        #[arg(long)]
        json: bool,
    },
    /// Search as you type; reads queries and commands from stdin
    Interactive,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(Commands::Search {
        page_size: Some(page_size),
        ..
    }) = &cli.command
    {
        config.search.page_size = *page_size;
    }

    let _log_guard = logging::init(&config.logging, cli.verbose)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "usersearch starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command {
        Some(Commands::Search {
            query, page, json, ..
        }) => search(&config, &query, page, json).await,
        Some(Commands::User { login, json }) => user(&config, &login, json).await,
        Some(Commands::Interactive) => {
            let controller = SearchController::new(directory(&config)?, &config.search);
            interactive::run(&controller).await
        }
        Some(Commands::Check) => check(&config),
        None => bail!("no command given; see --help"),
    }
}

fn directory(config: &AppConfig) -> Result<Arc<dyn UserDirectoryClient>> {
    let client =
        GithubDirectoryClient::new(&config.directory).context("failed to build GitHub client")?;
    Ok(Arc::new(client))
}

async fn search(config: &AppConfig, query: &str, page: u32, json: bool) -> Result<()> {
    let controller = SearchController::new(directory(config)?, &config.search);
    match controller.search(query, page).await {
        SearchOutcome::Applied => {}
        SearchOutcome::Failed(err) | SearchOutcome::Rejected(err) => {
            tracing::debug!(error = %err, "search failed");
            bail!("{}", err.user_message());
        }
        SearchOutcome::Superseded => bail!("search was superseded"),
    }

    let state = controller.state();
    if json {
        println!("{}", serde_json::to_string_pretty(&state.results)?);
    } else {
        let pagination = state.pagination();
        print!(
            "{}",
            ResultsView {
                result: &state.results,
                pagination: &pagination,
            }
        );
    }
    Ok(())
}

async fn user(config: &AppConfig, login: &str, json: bool) -> Result<()> {
    let directory = directory(config)?;
    let profile = match directory.get_user_detail(login).await {
        Ok(profile) => profile,
        Err(err) => {
            tracing::debug!(error = %err, "profile lookup failed");
            bail!("{}", err.user_message());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print!("{}", UserCard(&profile));
    }
    Ok(())
}

fn check(config: &AppConfig) -> Result<()> {
    tracing::info!("checking configuration");
    // Building the client validates the base URL and TLS setup.
    GithubDirectoryClient::new(&config.directory).context("invalid directory configuration")?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}
