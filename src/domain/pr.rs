use chrono::{DateTime, Utc};

// Domain data structures shared across modules.

/// Outcome of classifying the signed-in user's review history on one PR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// The user still owes a review (no review yet, or only comments).
    Pending,
    Approved,
    ChangesRequested,
}

impl ReviewState {
    pub fn label(&self) -> &'static str {
        match self {
            ReviewState::Pending => "Pending Review",
            ReviewState::Approved => "Approved",
            ReviewState::ChangesRequested => "Changes Requested",
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Author {
    pub login: String,
    pub avatar_url: Option<String>,
}

/// One open pull request the user was asked to review.
///
/// Rebuilt from scratch every poll cycle; `review_state` is derived from the
/// user's review history, never updated incrementally.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct PullRequest {
    /// Stable id assigned by GitHub; the dedup key across cycles and restarts.
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub url: String,
    /// `owner/name` slug of the repository the PR belongs to.
    pub repository: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub draft: bool,
    pub review_state: ReviewState,
}

/// A single submitted review, as input to classification. Not persisted.
#[derive(Debug, Clone)]
pub struct ReviewRecord {
    pub reviewer_login: String,
    /// Raw review status from the API, e.g. `APPROVED` or `COMMENTED`.
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Pull requests partitioned by review state, discovery order preserved.
#[derive(Debug, Default)]
pub struct PrGroups {
    pub pending: Vec<PullRequest>,
    pub changes_requested: Vec<PullRequest>,
    pub approved: Vec<PullRequest>,
}
