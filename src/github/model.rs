use chrono::{DateTime, Utc};
use serde::Deserialize;

// REST payload shapes, limited to the fields we read.

#[derive(Debug, Clone, Deserialize)]
pub struct GhUser {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhPull {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub user: Option<GhUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub requested_reviewers: Vec<GhUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhReview {
    pub user: Option<GhUser>,
    pub state: String,
    // Absent on reviews that were never submitted (e.g. pending drafts).
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}
