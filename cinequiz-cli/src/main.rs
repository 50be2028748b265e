mod catalog;
mod play;
mod render;
mod store;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use cinequiz_game::{Quiz, QuizError, SUGGESTION_LIMIT, suggest_titles};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::io::{Write, stdout};
use std::path::PathBuf;

use catalog::{CatalogOrigin, load_catalog};
use store::{FileStore, default_data_dir};

/// Exit code used when no movie can be selected; the player may retry later.
const EXIT_NO_MOVIE: i32 = 2;

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Show today's board (default)
    Status,
    /// Submit a guess for today's movie
    Guess {
        /// Movie title; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Reveal the next cast member (costs one attempt)
    Hint,
    /// Start today's game over
    Reset,
    /// Play interactively until the game ends (not combinable with --json)
    Play,
    /// List catalog titles matching a query
    Suggest {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Maximum number of titles to show
        #[arg(long, default_value_t = SUGGESTION_LIMIT)]
        limit: usize,
    },
}

#[derive(Debug, Parser)]
#[command(name = "cinequiz", version)]
#[command(about = "Guess the daily movie from its release year and genres")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Play as if today were this date (YYYY-MM-DD, defaults to today's UTC date)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Directory holding saved progress
    #[arg(long, global = true, env = "CINEQUIZ_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Load the catalog from a local JSON file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Download the catalog from this URL
    #[arg(long, global = true, env = "CINEQUIZ_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Download attempts before falling back to the built-in catalog
    #[arg(long, global = true, default_value_t = 3)]
    retries: u32,

    /// Print machine-readable JSON instead of the colored board
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let command = args.command.clone().unwrap_or(Command::Status);
    if args.json && matches!(command, Command::Play) {
        bail!("`play` is interactive and does not support --json");
    }

    let today = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let origin = CatalogOrigin::from_flags(
        args.catalog.clone(),
        args.catalog_url.clone(),
        args.retries,
    );
    let catalog = load_catalog(&origin).await;
    log::debug!("catalog ready: {} movies from {origin:?}", catalog.len());

    let mut out = stdout().lock();

    if let Command::Suggest { query, limit } = &command {
        let titles = suggest_titles(&catalog, &query.join(" "), *limit);
        if args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&titles)?)?;
        } else {
            render::suggestions(&mut out, &titles)?;
        }
        return Ok(());
    }

    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;
    log::debug!("saving progress under {}", store.dir().display());

    let mut quiz = match Quiz::initialize(store, catalog, today) {
        Ok(quiz) => quiz,
        Err(QuizError::NoMovieAvailable) => {
            eprintln!("We couldn't load today's movie quiz. Please try again later.");
            std::process::exit(EXIT_NO_MOVIE);
        }
    };

    if !args.json && !matches!(command, Command::Play) {
        render::banner(&mut out)?;
    }

    let event = match command {
        Command::Status | Command::Suggest { .. } => json!(null),
        Command::Guess { title } => {
            let outcome = quiz.submit_guess(&title.join(" "));
            if !args.json {
                render::guess_result(&mut out, outcome)?;
            }
            json!({ "guess": format!("{outcome:?}") })
        }
        Command::Hint => {
            let outcome = quiz.reveal_hint();
            if !args.json {
                render::hint_result(&mut out, &outcome)?;
            }
            json!({ "hint": format!("{outcome:?}") })
        }
        Command::Reset => {
            if let Err(err) = quiz.reset() {
                eprintln!("{err}");
                std::process::exit(EXIT_NO_MOVIE);
            }
            json!({ "reset": true })
        }
        Command::Play => {
            render::banner(&mut out)?;
            play::run(&mut quiz, std::io::stdin().lock(), &mut out)?;
            return Ok(());
        }
    };

    if args.json {
        let payload = json!({ "event": event, "view": quiz.view() });
        writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
    } else {
        render::board(&mut out, &quiz.view())?;
    }
    out.flush()?;
    Ok(())
}
