//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvTableAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::graphql_adapter::SorareGraphqlAdapter;
use crate::domain::aggregator::Aggregator;
use crate::domain::error::BoardError;
use crate::domain::position::Position;
use crate::domain::roster::Roster;
use crate::domain::settings::Settings;

pub const DEFAULT_CONFIG: &str = "roster.ini";

#[derive(Parser, Debug)]
#[command(
    name = "sorare-limited",
    version,
    about = "Sorare MLS Limited auction price aggregator and dashboard"
)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch auction history for every rostered player and write the tables
    Fetch {
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
    /// Start the dashboard web server
    Serve {
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
    /// Check the config and roster without touching the network
    Validate {
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(&cli.log_level);
    let result = match cli.command {
        Command::Fetch { config } => run_fetch(&config),
        Command::Serve { config } => run_serve(&config),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_config() => {
            error!("{e}; no requests were made");
            ExitCode::from(&e)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(&e)
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--log-level`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BoardError> {
    FileConfigAdapter::from_file(path).map_err(|e| BoardError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Loads and validates everything a command needs from the config file.
pub fn load_run_config(path: &Path) -> Result<(Settings, Roster), BoardError> {
    info!(path = %path.display(), "loading config");
    let config = load_config(path)?;
    let settings = Settings::from_config(&config)?;
    let roster = Roster::from_config(&config)?;
    Ok((settings, roster))
}

fn run_fetch(config_path: &Path) -> Result<(), BoardError> {
    let (settings, roster) = load_run_config(config_path)?;
    info!(
        players = roster.player_count(),
        rarity = %settings.feed.rarity,
        delay_secs = settings.feed.request_delay.as_secs_f64(),
        "starting fetch"
    );

    let feed = SorareGraphqlAdapter::from_settings(&settings.feed)?;
    let tables = CsvTableAdapter::new(settings.output.data_dir.clone(), &settings.feed.rarity);
    let summary = Aggregator::new(&feed, &settings.feed).run(&roster, &tables)?;

    for (position, path) in &summary.tables {
        println!("{}\t{}", position.code(), path.display());
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), BoardError> {
    let (settings, roster) = load_run_config(config_path)?;
    for position in Position::ALL {
        println!("{}\t{}", position.code(), roster.players(position).len());
    }
    println!("total\t{}", roster.player_count());
    info!(
        data_dir = %settings.output.data_dir.display(),
        listen = %settings.web.listen,
        "configuration is valid"
    );
    Ok(())
}

fn run_serve(config_path: &Path) -> Result<(), BoardError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::sync::Arc;

        let config = load_config(config_path)?;
        let settings = Settings::from_config(&config)?;
        let tables = CsvTableAdapter::new(settings.output.data_dir.clone(), &settings.feed.rarity);

        let state = AppState {
            tables: Arc::new(tables),
            rarity: settings.feed.rarity.clone(),
            title: settings.web.title.clone(),
            static_dir: settings.web.static_dir.clone(),
        };
        let router = build_router(state);
        let addr = settings.web.listen;

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(
                %addr,
                data_dir = %settings.output.data_dir.display(),
                static_dir = %settings.web.static_dir.display(),
                "dashboard listening"
            );
            axum::serve(listener, router).await
        })?;
        Ok(())
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        Err(BoardError::invalid(
            "web",
            "listen",
            "this build was compiled without the web feature",
        ))
    }
}
