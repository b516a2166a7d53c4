use super::cli_tables::{element_table, elements_table, resolution_table};
use crate::ai::error::AiError;
use crate::ai::transport::OpenRouterTransport;
use crate::chemistry::elements::{Element, ElementCategory};
use crate::library_manager::{LibraryError, LibraryManager};
use crate::server::{self, AppState, StartupError};
use crate::settings::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use log::{LevelFilter, SetLoggerError, error, info, warn};
use simplelog::{ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "chemverse",
    version,
    about = "Educational chemistry lab: periodic table, element mixing, lessons and an AI tutor"
)]
pub struct Cli {
    /// configuration file (defaults to chemverse_config.json when present)
    #[arg(long, global = true, env = "CHEMVERSE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the periodic table, optionally one category
    Elements {
        #[arg(long)]
        category: Option<ElementCategory>,
    },
    /// Print one element
    Element { symbol: String },
    /// Mix elements and print the resulting reaction
    Mix {
        #[arg(required = true, num_args = 1..)]
        symbols: Vec<String>,
    },
    /// Ask the chemistry assistant a question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Validate the configured OpenRouter API key
    CheckKey,
    /// Write a configuration file with the default settings
    InitConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error("unknown element '{0}'")]
    UnknownElement(String),
    #[error("'{0}' already exists, use --force to overwrite it")]
    ConfigExists(PathBuf),
    #[error("failed to open log file: {0}")]
    LogFile(#[from] std::io::Error),
    #[error("failed to initialize logging: {0}")]
    Logger(#[from] SetLoggerError),
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Terminal logging on stderr, plus a log file when one is configured.
pub fn init_logging(level: LevelFilter, log_file: Option<&PathBuf>) -> Result<(), CliError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

pub async fn execute(cli: Cli) -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_sources(cli.config.as_deref())?;
    init_logging(config.level_filter()?, config.log_file.as_ref())?;
    if config.ai.api_key().is_none() {
        warn!("OPENROUTER_API_KEY is not set, AI features will answer with fallbacks");
    }

    let command = cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });
    match command {
        Command::Serve { host, port } => {
            let mut settings = config.server.clone();
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            let state = AppState::from_config(&config)?;
            server::serve(&settings, state).await?;
        }
        Command::Elements { category } => {
            let store = LibraryManager::with_paths(config.libraries.clone()).build_store()?;
            let elements: Vec<&Element> = match category {
                Some(category) => store.elements.by_category(category),
                None => store.elements.get_all().iter().collect(),
            };
            elements_table(&elements).printstd();
        }
        Command::Element { symbol } => {
            let store = LibraryManager::with_paths(config.libraries.clone()).build_store()?;
            let element = store
                .elements
                .get_by_symbol(&symbol)
                .ok_or_else(|| CliError::UnknownElement(symbol.clone()))?;
            element_table(element).printstd();
        }
        Command::Mix { symbols } => {
            let state = AppState::from_config(&config)?;
            match state.resolver.resolve(symbols.as_slice()).await {
                Ok(resolution) => {
                    resolution_table(&resolution).printstd();
                }
                Err(outcome) => {
                    println!("No stable compound can be formed from {}.", outcome.reactants);
                    println!("{}", outcome.explanation);
                }
            }
        }
        Command::Ask { question } => {
            let state = AppState::from_config(&config)?;
            let answer = state.gateway.assistant_chat(&question.join(" ")).await?;
            println!("{}", answer);
        }
        Command::CheckKey => {
            let transport = OpenRouterTransport::new(&config.ai)?;
            let details = transport.check_key().await?;
            println!("API key is valid");
            println!("{:#}", details);
        }
        Command::InitConfig { path, force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists(path));
            }
            AppConfig::default().save(&path)?;
            info!("Default configuration written to '{}'", path.display());
            println!("Configuration written to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["chemverse"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["chemverse", "--config", "my.json", "mix", "H", "O"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("my.json")));
        match cli.command {
            Some(Command::Mix { symbols }) => assert_eq!(symbols, vec!["H", "O"]),
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["chemverse", "elements", "--category", "noble gas"]).unwrap();
        match cli.command {
            Some(Command::Elements { category }) => {
                assert_eq!(category, Some(ElementCategory::NobleGas))
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["chemverse", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Some(Command::Serve { host, port }) => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(Cli::try_parse_from(["chemverse", "mix"]).is_err());
        assert!(Cli::try_parse_from(["chemverse", "elements", "--category", "plasma"]).is_err());
        assert!(Cli::try_parse_from(["chemverse", "serve", "--port", "high"]).is_err());
    }
}
