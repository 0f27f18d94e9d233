//! Moviegrid CLI - thin rendering layer over the search engine.
//!
//! Reads raw search terms from stdin (one per line), drives the debounced
//! search lifecycle, and prints state snapshots. An empty line shows the
//! popular-movies feed.

#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use moviegrid::catalog::{CatalogClient, CatalogSource};
use moviegrid::cli::Cli;
use moviegrid::config::Config;
use moviegrid::recorder::{CountStore, HttpCountStore, MemoryCountStore, Recorder};
use moviegrid::search::{NO_RESULTS_MESSAGE, SearchController, SearchPhase, SearchState};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut config = Config::from_env();
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }
    if let Some(ms) = cli.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }

    let catalog = CatalogClient::new(&config.api_base_url, &config.api_token)?;

    if let Some(query) = cli.once {
        return run_once(&catalog, &query, cli.json).await;
    }

    let store: Arc<dyn CountStore> = match &config.store {
        Some(store_config) => Arc::new(HttpCountStore::new(store_config.clone())?),
        None => {
            tracing::info!("no count store configured; search counts stay in memory");
            Arc::new(MemoryCountStore::new())
        }
    };
    let recorder = Arc::new(Recorder::new(store));

    let controller =
        SearchController::new(Arc::new(catalog), Some(recorder), config.debounce);

    if io::stdin().is_terminal() {
        eprintln!("Type to search; an empty line shows popular movies. Ctrl-D exits.");
    }

    let (raw_tx, raw_rx) = mpsc::unbounded_channel();
    let reader = tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if raw_tx.send(line).is_err() {
                break;
            }
        }
    });

    let json = cli.json;
    controller.run(raw_rx, move |state| render(state, json)).await;
    reader.abort();
    Ok(())
}

async fn run_once(catalog: &CatalogClient, query: &str, json: bool) -> Result<()> {
    let movies = catalog.fetch(query).await?;
    if json {
        println!("{}", serde_json::to_string(&movies)?);
    } else if movies.is_empty() {
        println!("{NO_RESULTS_MESSAGE}");
    } else {
        for movie in &movies {
            println!("{}  (id {})", movie.title, movie.id);
        }
    }
    Ok(())
}

fn render(state: &SearchState, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(state) {
            println!("{line}");
        }
        return;
    }

    match state.phase() {
        SearchPhase::Loading if state.debounced_term.is_empty() => {
            println!("Loading popular movies...");
        }
        SearchPhase::Loading => println!("Searching for {:?}...", state.debounced_term),
        SearchPhase::WithResults => {
            println!("-- {} movies --", state.results.len());
            for movie in &state.results {
                println!("  {}  (id {})", movie.title, movie.id);
            }
        }
        SearchPhase::Empty | SearchPhase::Failed => println!("{}", state.error_message),
        SearchPhase::Idle => {}
    }
}
