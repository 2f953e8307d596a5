//! # News Desk
//!
//! Search and browse articles from three news APIs (NewsAPI, the New York
//! Times and The Guardian) from the command line. Every provider's response
//! is normalized into one article model, filtered, and rendered as Markdown.
//!
//! ## Usage
//!
//! ```sh
//! news_desk -p guardian -k floods -d 2024-05-01
//! news_desk -p nyt --mode feed -c politics --save-dir ./state
//! news_desk --clear --save-dir ./state
//! ```
//!
//! ## Architecture
//!
//! 1. **Query**: The chosen provider turns the filters into its own query parameters
//! 2. **Fetch**: One HTTP GET against the provider (optionally repeated on network failure)
//! 3. **Normalize**: The provider adapter maps the payload onto [`models::Article`]
//! 4. **Filter**: Filters the provider cannot express are applied locally
//! 5. **Output**: The store view is printed and optionally saved as JSON

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod desk;
mod filter;
mod models;
mod outputs;
mod providers;
mod retry;
mod search;
mod store;
#[cfg(test)]
mod test_support;
mod utils;

use cli::Cli;
use config::Config;
use desk::Desk;
use outputs::json::{SavedSearch, clear_last_search, read_last_search, write_last_search};
use outputs::markdown;
use retry::{Backoff, run_with_retries};
use search::{HttpTransport, Searcher};
use store::StoreView;
use utils::ensure_writable_dir;

fn print_view(view: &StoreView<'_>, as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", markdown::render(view));
    }
    Ok(())
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_desk starting up");

    let args = Cli::parse();
    debug!(provider = %args.provider, mode = ?args.mode, retries = args.retries, "Parsed CLI arguments");

    // ---- Replay a saved search ----
    if args.show_last {
        let dir = args.save_dir.as_deref().unwrap_or(".");
        let saved = read_last_search(dir).await?;
        info!(provider = %saved.request.provider, saved_at = %saved.saved_at, "Showing saved search");
        return print_view(&saved.view(), args.json);
    }

    // ---- Wire up the desk ----
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_api_keys(&mut config);
    let transport = HttpTransport::new(&config)?;
    let searcher = Searcher::from_config(transport, &config)?;
    let mut desk = Desk::new(searcher);

    // ---- Clear results ----
    if args.clear {
        desk.clear();
        if let Some(dir) = &args.save_dir {
            clear_last_search(dir).await?;
        }
        info!("Cleared results");
        return print_view(&desk.view(), args.json);
    }

    // Early check so a long search isn't wasted on an unwritable directory
    if let Some(dir) = &args.save_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Save directory is not writable");
            return Err(e);
        }
    }

    // ---- Search ----
    let request = args.request();
    let backoff = Backoff::new(args.retries, Duration::from_secs(1));
    let outcome = run_with_retries(&mut desk, &request, &backoff).await;

    let view = desk.view();
    print_view(&view, args.json)?;

    // ---- Persist ----
    if let Some(dir) = &args.save_dir {
        let saved = SavedSearch::capture(&request, &view);
        if let Err(e) = write_last_search(dir, &saved).await {
            error!(error = %e, "Failed to save last search");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        status = %view.status,
        articles = view.articles.map_or(0, <[_]>::len),
        "Execution complete"
    );

    outcome.map(|_| ()).map_err(|e| e.into())
}
