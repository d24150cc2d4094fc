//! `navigator` - build, query and play the character relationship graph.

use character_catalog::{Catalog, CatalogError, CharacterId};
use clap::{Parser, Subcommand};
use navigation_core::{
    logging, save_gml, ConfigError, GameService, NavigatorConfig, RelationshipGraph,
    ServiceError, SessionError, SessionId, SessionState,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Parser)]
#[command(name = "navigator")]
#[command(about = "Weighted character relationship graph and navigation game", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and save it as GML
    Export {
        /// Character catalog (JSON array)
        #[arg(long)]
        catalog: PathBuf,

        /// Output GML file
        #[arg(long)]
        output: PathBuf,
    },

    /// Print a character's strongest connections
    Top {
        /// Character catalog (JSON array)
        #[arg(long)]
        catalog: PathBuf,

        /// Character name, exact match
        #[arg(long)]
        name: String,

        /// Maximum number of connections
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Play a navigation game on stdin
    Play {
        /// Character catalog (JSON array)
        #[arg(long)]
        catalog: PathBuf,

        /// Initial character id (random when omitted)
        #[arg(long)]
        from: Option<u64>,

        /// Destination character id (random when omitted)
        #[arg(long)]
        to: Option<u64>,

        /// Move limit (overrides the configured one)
        #[arg(long)]
        moves: Option<u32>,
    },
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => NavigatorConfig::load(path)?,
        None => NavigatorConfig::from_env(),
    };
    logging::parse_level(&config.logging.level)?;
    logging::init(&config.logging.level)?;

    match cli.command {
        Commands::Export { catalog, output } => {
            let graph = build_graph(&config, &catalog)?;
            save_gml(&graph, &output)?;
            println!(
                "Wrote {} characters and {} relations to {}",
                graph.node_count(),
                graph.edge_count(),
                output.display()
            );
        }
        Commands::Top {
            catalog,
            name,
            limit,
        } => {
            let graph = build_graph(&config, &catalog)?;
            match graph.top_connections(&name, limit) {
                Ok(connections) if connections.is_empty() => {
                    println!("{name} has no connections");
                }
                Ok(connections) => {
                    for (rank, c) in connections.iter().enumerate() {
                        println!("{:>3}. {:<30} {:.1}", rank + 1, c.name, c.weight);
                    }
                }
                Err(e) => println!("{e}"),
            }
        }
        Commands::Play {
            catalog,
            from,
            to,
            moves,
        } => {
            let graph = Arc::new(build_graph(&config, &catalog)?);
            let service = GameService::new(graph, moves.or(config.game.move_limit));
            let started = service.start_session(from.map(CharacterId), to.map(CharacterId))?;

            let stdin = io::stdin();
            let stdout = io::stdout();
            play(
                &service,
                started.session_id,
                stdin.lock(),
                &mut stdout.lock(),
            )?;
            service.end_session(started.session_id);
        }
    }

    Ok(())
}

fn build_graph(config: &NavigatorConfig, catalog: &Path) -> Result<RelationshipGraph, AppError> {
    let catalog = Catalog::load(catalog)?;
    info!(records = catalog.len(), "catalog loaded");
    Ok(config.graph_builder().build(catalog.records()))
}

/// Interactive loop: one option list per turn, one id per input line.
/// `q` or end of input quits.
fn play(
    service: &GameService,
    session_id: SessionId,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let status = service.get_status(session_id)?;
    writeln!(
        out,
        "Get from {} to {}.",
        status.initial.name, status.destination.name
    )?;

    let mut lines = input.lines();
    loop {
        let status = service.get_status(session_id)?;
        match status.state {
            SessionState::Won => {
                writeln!(
                    out,
                    "Reached {} in {} moves!",
                    status.destination.name, status.moves_taken
                )?;
                break;
            }
            SessionState::Exhausted => {
                writeln!(out, "Out of moves at {}.", status.current.name)?;
                break;
            }
            SessionState::Active => {}
        }

        let options = service.get_options(session_id)?;
        if options.is_empty() {
            writeln!(out, "{} has no connections. Game over.", status.current.name)?;
            break;
        }

        let remaining = match status.move_limit {
            Some(limit) => format!(", {} left", limit.saturating_sub(status.moves_taken)),
            None => String::new(),
        };
        writeln!(
            out,
            "\nAt {} ({} moves{remaining}). Next:",
            status.current.name, status.moves_taken
        )?;
        for option in &options {
            writeln!(out, "  [{}] {}", option.id, option.name)?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        let Ok(choice) = line.parse::<u64>() else {
            writeln!(out, "Enter an id from the list, or q to quit.")?;
            continue;
        };

        match service.choose_next(session_id, CharacterId(choice)) {
            Ok(_) => {}
            Err(ServiceError::Session(SessionError::InvalidChoice(id))) => {
                writeln!(out, "{id} is not one of the options.")?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
