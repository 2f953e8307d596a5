//! Output collaborators that consume the store view.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders the current status and articles for the terminal
//! - [`json`]: Saves and reloads the last search
//!
//! # Output Structure
//!
//! ```text
//! save_dir/
//! └── last_search.json   # request, status, articles, error, saved_at
//! ```

pub mod json;
pub mod markdown;
