//! Public catalogue: formations and news.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esst_core::{Entity, FormationId, NewsId, entity};

use crate::matches_query;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formation {
    pub id: FormationId,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub level: String,
    pub department: String,
    pub requirements: Vec<String>,
    pub objectives: Vec<String>,
}

impl Entity for Formation {
    type Id = FormationId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: NewsId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub tags: Vec<String>,
}

impl Entity for NewsItem {
    type Id = NewsId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormationFilter {
    pub query: String,
    pub level: Option<String>,
    pub department: Option<String>,
}

impl FormationFilter {
    pub fn matches(&self, formation: &Formation) -> bool {
        (matches_query(&formation.title, &self.query)
            || matches_query(&formation.description, &self.query))
            && self.level.as_ref().is_none_or(|l| *l == formation.level)
            && self.department.as_ref().is_none_or(|d| *d == formation.department)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    formations: Vec<Formation>,
    news: Vec<NewsItem>,
}

impl Catalog {
    pub fn new(formations: Vec<Formation>, mut news: Vec<NewsItem>) -> Self {
        news.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Self { formations, news }
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn formation(&self, id: FormationId) -> Option<&Formation> {
        entity::find(&self.formations, id)
    }

    pub fn filter(&self, filter: &FormationFilter) -> Vec<&Formation> {
        self.formations.iter().filter(|f| filter.matches(f)).collect()
    }

    /// News, newest first.
    pub fn news(&self) -> &[NewsItem] {
        &self.news
    }

    pub fn latest_news(&self, n: usize) -> &[NewsItem] {
        &self.news[..n.min(self.news.len())]
    }
}
