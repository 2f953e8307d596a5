//! Markdown rendering of the store view.
//!
//! One section per article:
//!
//! ```text
//! ### [Title](https://link)
//! *The Guardian · Jane Doe · 2024-05-01 · World news*
//!
//! Description text.
//!
//! ![](https://image)
//! ```

use std::fmt::Write;

use crate::models::{Article, FetchStatus};
use crate::store::StoreView;
use crate::utils::calendar_day;

/// Day an article was published, or `Unknown date`.
pub fn published_label(article: &Article) -> String {
    article
        .published_at
        .as_deref()
        .and_then(calendar_day)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown date".to_string())
}

fn write_article(md: &mut String, article: &Article) {
    writeln!(md, "### [{}]({})", article.title, article.url).unwrap();

    let date = published_label(article);
    let meta: Vec<&str> = [
        article.source_name.as_deref(),
        article.author.as_deref(),
        Some(date.as_str()),
        article.category.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    writeln!(md, "*{}*\n", meta.join(" · ")).unwrap();

    if let Some(description) = &article.description {
        writeln!(md, "{description}\n").unwrap();
    }
    if let Some(image) = &article.image_url {
        writeln!(md, "![]({image})\n").unwrap();
    }
}

fn write_articles(md: &mut String, articles: &[Article]) {
    for article in articles {
        write_article(md, article);
    }
}

/// Render loading, error, empty and populated states.
pub fn render(view: &StoreView<'_>) -> String {
    let mut md = String::new();
    match view.status {
        FetchStatus::Idle => md.push_str("No search has been run.\n"),
        FetchStatus::Loading => md.push_str("Loading news...\n"),
        FetchStatus::Failed => {
            writeln!(md, "Error: {}\n", view.error.unwrap_or("Something went wrong")).unwrap();
            if let Some(previous) = view.articles.filter(|a| !a.is_empty()) {
                writeln!(md, "## Previous results ({})\n", previous.len()).unwrap();
                write_articles(&mut md, previous);
            }
        }
        FetchStatus::Succeeded => match view.articles {
            Some(articles) if !articles.is_empty() => {
                writeln!(md, "## {} articles\n", articles.len()).unwrap();
                write_articles(&mut md, articles);
            }
            _ => md.push_str("No articles found.\n"),
        },
    }
    md
}
