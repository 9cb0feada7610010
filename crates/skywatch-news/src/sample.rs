//! Built-in headlines shown when the news API cannot be reached.

use chrono::{DateTime, Duration, Utc};

use crate::types::Article;

/// Two placeholder headlines, one current and one a day old.
pub fn sample_articles(now: DateTime<Utc>) -> Vec<Article> {
    vec![
        Article {
            title: "Sample story: Wildfire near Shymkent".to_string(),
            description: Some(
                "A forest fire broke out near Shymkent; authorities are responding.".to_string(),
            ),
            url: "#".to_string(),
            published_at: now,
        },
        Article {
            title: "Sample story: Earthquake in Almaty".to_string(),
            description: Some(
                "A minor earthquake was recorded in Almaty, no casualties reported.".to_string(),
            ),
            url: "#".to_string(),
            published_at: now - Duration::hours(24),
        },
    ]
}
