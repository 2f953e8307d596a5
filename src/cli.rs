//! Command-line interface definitions for News Desk.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API keys can be provided via flags or environment variables.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::config::Config;
use crate::desk::{Mode, SearchRequest};
use crate::models::{FilterCriteria, ProviderId};

/// Which provider endpoint to hit.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Provider search with the given filters
    Search,
    /// Current top stories, filters ignored
    Headlines,
    /// Top stories filtered locally
    Feed,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Search => Mode::Search,
            ModeArg::Headlines => Mode::Headlines,
            ModeArg::Feed => Mode::Feed,
        }
    }
}

/// Command-line arguments for the News Desk application.
///
/// # Examples
///
/// ```sh
/// # Guardian search for one day
/// news_desk -p guardian -k floods -d 2024-05-01
///
/// # NYT top stories filtered by section, keys from the environment
/// NYT_API_KEY=... news_desk -p nyt --mode feed -c politics
///
/// # Retry network failures twice and save the result
/// news_desk -p newsapi -k election --retries 2 --save-dir ./state
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News provider: headline (newsapi), longform (nyt) or regional (guardian)
    #[arg(short, long, default_value = "headline")]
    pub provider: String,

    /// What to fetch
    #[arg(short, long, value_enum, default_value_t = ModeArg::Search)]
    pub mode: ModeArg,

    /// Case-insensitive keyword
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Publication day, YYYY-MM-DD
    #[arg(short, long, value_parser = parse_day)]
    pub date: Option<NaiveDate>,

    /// Section or category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Source name or NewsAPI source id
    #[arg(short, long)]
    pub source: Option<String>,

    /// Author name
    #[arg(short, long)]
    pub author: Option<String>,

    /// Optional path to a YAML config file
    #[arg(long)]
    pub config: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub newsapi_key: Option<String>,

    /// New York Times API key
    #[arg(long, env = "NYT_API_KEY", hide_env_values = true)]
    pub nyt_api_key: Option<String>,

    /// Guardian Open Platform key
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true)]
    pub guardian_api_key: Option<String>,

    /// Repeat network failures this many times with backoff
    #[arg(long, default_value_t = 0)]
    pub retries: usize,

    /// Directory for last_search.json
    #[arg(long)]
    pub save_dir: Option<String>,

    /// Print the saved last search instead of fetching
    #[arg(long, requires = "save_dir")]
    pub show_last: bool,

    /// Clear results instead of fetching; also deletes the saved last search
    #[arg(long, conflicts_with = "show_last")]
    pub clear: bool,

    /// Print the store view as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

impl Cli {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            keyword: self.keyword.clone(),
            date: self.date,
            category: self.category.clone(),
            source: self.source.clone(),
            author: self.author.clone(),
        }
    }

    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            provider: self.provider.clone(),
            criteria: self.criteria(),
            mode: self.mode.into(),
        }
    }

    /// Keys from flags or environment take precedence over the config file.
    pub fn apply_api_keys(&self, config: &mut Config) {
        config.set_api_key(ProviderId::Headline, self.newsapi_key.clone());
        config.set_api_key(ProviderId::LongForm, self.nyt_api_key.clone());
        config.set_api_key(ProviderId::Regional, self.guardian_api_key.clone());
    }
}
