pub mod model;

use std::time::Duration;

use model::{GhPull, GhReview, GhUser};
use octocrab::Octocrab;
use thiserror::Error;
use tracing::warn;

use crate::domain::pr::{Author, PrGroups, PullRequest, ReviewRecord, ReviewState};
use crate::usecase::classify;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build GitHub client: {0}")]
    Client(#[source] octocrab::Error),
    #[error("GitHub authentication failed (check your token): {0}")]
    Auth(#[source] octocrab::Error),
    #[error("GitHub API request failed: {0}")]
    Api(#[from] octocrab::Error),
    #[error("GitHub API request timed out after {0:?}")]
    Timeout(Duration),
}

/// Read-only GitHub client scoped to one personal access token.
pub struct GithubClient {
    octo: Octocrab,
}

impl GithubClient {
    pub fn new(token: &str) -> Result<Self, FetchError> {
        let octo = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { octo })
    }

    /// Identity of the token owner. Failures here mean the token itself is
    /// bad, which is fatal to the whole fetch cycle.
    pub async fn viewer(&self) -> Result<GhUser, FetchError> {
        self.get("/user".to_string()).await.map_err(|err| match err {
            FetchError::Api(inner) => FetchError::Auth(inner),
            other => other,
        })
    }

    pub async fn open_pull_requests(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<GhPull>, FetchError> {
        self.get(format!("/repos/{owner}/{name}/pulls?state=open&per_page=100"))
            .await
    }

    pub async fn reviews(
        &self,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<Vec<GhReview>, FetchError> {
        self.get(format!(
            "/repos/{owner}/{name}/pulls/{number}/reviews?per_page=100"
        ))
        .await
    }

    /// One full aggregation pass over the configured repositories.
    ///
    /// A failure in one repository is logged and leaves that repository's
    /// contribution empty for the cycle; the others are unaffected. Only an
    /// auth failure aborts the pass.
    pub async fn fetch_pull_requests(
        &self,
        repositories: &[String],
    ) -> Result<PrGroups, FetchError> {
        let viewer = self.viewer().await?;
        let mut all = Vec::new();

        for slug in repositories {
            let Some((owner, name)) = split_slug(slug) else {
                warn!(repository = %slug, "skipping malformed repository entry");
                continue;
            };
            match self.fetch_repo(owner, name, slug, &viewer.login).await {
                Ok(mut prs) => all.append(&mut prs),
                Err(err) => {
                    warn!(repository = %slug, error = %err, "skipping repository this cycle");
                }
            }
        }

        Ok(classify::partition(all))
    }

    async fn fetch_repo(
        &self,
        owner: &str,
        name: &str,
        slug: &str,
        viewer_login: &str,
    ) -> Result<Vec<PullRequest>, FetchError> {
        let pulls = self.open_pull_requests(owner, name).await?;
        let mut out = Vec::new();

        for pull in pulls {
            // Only PRs where the user is an explicitly requested reviewer.
            let requested = pull
                .requested_reviewers
                .iter()
                .any(|r| r.login == viewer_login);
            if !requested {
                continue;
            }

            let reviews = self.reviews(owner, name, pull.number).await?;
            let records: Vec<ReviewRecord> = reviews.into_iter().map(to_review_record).collect();
            let state = classify::review_state(&records, viewer_login);
            out.push(to_pull_request(pull, slug, state));
        }

        Ok(out)
    }

    async fn get<R>(&self, route: String) -> Result<R, FetchError>
    where
        R: octocrab::FromResponse,
    {
        match tokio::time::timeout(REQUEST_TIMEOUT, self.octo.get(&route, None::<&()>)).await {
            Ok(result) => result.map_err(FetchError::Api),
            Err(_) => Err(FetchError::Timeout(REQUEST_TIMEOUT)),
        }
    }
}

/// Check a token by fetching the identity it authenticates as.
pub async fn validate_token(token: &str) -> Result<GhUser, FetchError> {
    GithubClient::new(token)?.viewer().await
}

fn split_slug(slug: &str) -> Option<(&str, &str)> {
    let (owner, name) = slug.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}

fn to_review_record(review: GhReview) -> ReviewRecord {
    ReviewRecord {
        reviewer_login: review.user.map(|u| u.login).unwrap_or_default(),
        state: review.state,
        submitted_at: review.submitted_at,
    }
}

fn to_pull_request(pull: GhPull, slug: &str, state: ReviewState) -> PullRequest {
    let author = pull
        .user
        .map(|u| Author {
            login: u.login,
            avatar_url: u.avatar_url,
        })
        .unwrap_or_else(|| Author {
            login: "unknown".to_string(),
            avatar_url: None,
        });

    PullRequest {
        id: pull.id,
        number: pull.number,
        title: pull.title,
        url: pull.html_url,
        repository: slug.to_string(),
        author,
        created_at: pull.created_at,
        updated_at: pull.updated_at,
        draft: pull.draft,
        review_state: state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_slug_accepts_owner_name_pairs() {
        assert_eq!(split_slug("acme/widgets"), Some(("acme", "widgets")));
        assert_eq!(split_slug("acme"), None);
        assert_eq!(split_slug("/widgets"), None);
        assert_eq!(split_slug("acme/"), None);
        assert_eq!(split_slug("a/b/c"), None);
    }

    #[test]
    fn review_record_tolerates_missing_user() {
        let record = to_review_record(GhReview {
            user: None,
            state: "APPROVED".to_string(),
            submitted_at: None,
        });
        assert!(record.reviewer_login.is_empty());
    }
}
