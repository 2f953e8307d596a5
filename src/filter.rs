//! Client-side filter predicates over normalized articles.
//!
//! Every text criterion is a case-insensitive substring match. A criterion
//! that is present excludes articles missing the field it inspects.

use crate::models::{Article, FilterCriteria};
use crate::utils::calendar_day;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn field_matches(field: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => field.is_some_and(|f| contains_ci(f, needle)),
    }
}

/// `true` when `article` satisfies every present criterion.
pub fn matches(article: &Article, criteria: &FilterCriteria) -> bool {
    if let Some(keyword) = criteria.keyword() {
        let in_description = article.description.as_deref().is_some_and(|d| contains_ci(d, keyword));
        if !contains_ci(&article.title, keyword) && !in_description {
            return false;
        }
    }

    if let Some(day) = criteria.date {
        let published = article.published_at.as_deref().and_then(calendar_day);
        if published != Some(day) {
            return false;
        }
    }

    field_matches(article.category.as_deref(), criteria.category())
        && field_matches(article.source_name.as_deref(), criteria.source())
        && field_matches(article.author.as_deref(), criteria.author())
}

/// Keep the articles that match, in their original order.
pub fn filter_many(articles: Vec<Article>, criteria: &FilterCriteria) -> Vec<Article> {
    if criteria.is_empty() {
        return articles;
    }
    articles.into_iter().filter(|a| matches(a, criteria)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
            description: None,
            author: None,
            image_url: None,
            published_at: None,
            source_name: None,
            category: None,
        }
    }

    #[test]
    fn test_empty_criteria_always_match() {
        let a = article("Anything");
        assert!(matches(&a, &FilterCriteria::default()));
        let blank = FilterCriteria {
            keyword: Some("".into()),
            category: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches(&a, &blank));
    }

    #[test]
    fn test_keyword_is_case_insensitive_without_description() {
        let a = article("Election Results 2024");
        let criteria = FilterCriteria {
            keyword: Some("election".into()),
            ..Default::default()
        };
        assert!(matches(&a, &criteria));
    }

    #[test]
    fn test_keyword_searches_description() {
        let mut a = article("Morning briefing");
        a.description = Some("Polls open across the STATE".into());
        let hit = FilterCriteria {
            keyword: Some("state".into()),
            ..Default::default()
        };
        let miss = FilterCriteria {
            keyword: Some("weather".into()),
            ..Default::default()
        };
        assert!(matches(&a, &hit));
        assert!(!matches(&a, &miss));
    }

    #[test]
    fn test_keyword_does_not_span_title_and_description() {
        let mut a = article("Results 2024");
        a.description = Some("polls closed".into());
        let spanning = FilterCriteria {
            keyword: Some("2024 polls".into()),
            ..Default::default()
        };
        assert!(!matches(&a, &spanning));
    }

    #[test]
    fn test_missing_category_fails_category_filter() {
        let a = article("No section");
        let criteria = FilterCriteria {
            category: Some("politics".into()),
            ..Default::default()
        };
        assert!(!matches(&a, &criteria));

        let mut b = article("Sectioned");
        b.category = Some("US Politics".into());
        assert!(matches(&b, &criteria));
    }

    #[test]
    fn test_date_matches_calendar_day_only() {
        let mut a = article("Dated");
        a.published_at = Some("2024-05-01T22:00:00-04:00".into());
        let same_day = FilterCriteria {
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        let next_day = FilterCriteria {
            date: NaiveDate::from_ymd_opt(2024, 5, 2),
            ..Default::default()
        };
        assert!(matches(&a, &same_day));
        assert!(!matches(&a, &next_day));

        let undated = article("Undated");
        assert!(!matches(&undated, &same_day));
    }

    #[test]
    fn test_source_and_author_are_anded() {
        let mut a = article("Both");
        a.source_name = Some("The Guardian".into());
        a.author = Some("Jane Doe".into());

        let both = FilterCriteria {
            source: Some("guardian".into()),
            author: Some("doe".into()),
            ..Default::default()
        };
        let wrong_author = FilterCriteria {
            source: Some("guardian".into()),
            author: Some("roe".into()),
            ..Default::default()
        };
        assert!(matches(&a, &both));
        assert!(!matches(&a, &wrong_author));
    }

    #[test]
    fn test_filter_many_preserves_order() {
        let mut b = article("B rain");
        b.description = Some("rain".into());
        let c = article("C rain");
        let a = article("A sun");

        let criteria = FilterCriteria {
            keyword: Some("rain".into()),
            ..Default::default()
        };
        let kept = filter_many(vec![a, b.clone(), c.clone()], &criteria);
        assert_eq!(kept, vec![b, c]);
    }
}
