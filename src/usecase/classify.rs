use crate::domain::pr::{PrGroups, PullRequest, ReviewRecord, ReviewState};

/// Classify a PR by the viewer's own review history.
///
/// Only the chronologically latest review by the viewer counts. Reviews with
/// equal (or missing) timestamps resolve to the last one in source order:
/// `max_by_key` returns the last maximal element, and GitHub's missing
/// `submitted_at` sorts below any present timestamp.
pub fn review_state(reviews: &[ReviewRecord], viewer_login: &str) -> ReviewState {
    let latest = reviews
        .iter()
        .filter(|r| r.reviewer_login == viewer_login)
        .max_by_key(|r| r.submitted_at);

    match latest.map(|r| r.state.as_str()) {
        Some("APPROVED") => ReviewState::Approved,
        Some("CHANGES_REQUESTED") => ReviewState::ChangesRequested,
        // COMMENTED, DISMISSED, anything else: the user still owes a review.
        _ => ReviewState::Pending,
    }
}

/// Stable partition on `review_state`, preserving discovery order.
pub fn partition(prs: Vec<PullRequest>) -> PrGroups {
    let mut groups = PrGroups::default();
    for pr in prs {
        match pr.review_state {
            ReviewState::Pending => groups.pending.push(pr),
            ReviewState::ChangesRequested => groups.changes_requested.push(pr),
            ReviewState::Approved => groups.approved.push(pr),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn review(login: &str, state: &str, submitted_at: Option<DateTime<Utc>>) -> ReviewRecord {
        ReviewRecord {
            reviewer_login: login.to_string(),
            state: state.to_string(),
            submitted_at,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn no_reviews_by_viewer_is_pending() {
        assert_eq!(review_state(&[], "me"), ReviewState::Pending);

        let reviews = vec![review("someone-else", "APPROVED", Some(at(100)))];
        assert_eq!(review_state(&reviews, "me"), ReviewState::Pending);
    }

    #[test]
    fn latest_review_wins_regardless_of_older_entries() {
        let reviews = vec![
            review("me", "CHANGES_REQUESTED", Some(at(100))),
            review("me", "APPROVED", Some(at(200))),
        ];
        assert_eq!(review_state(&reviews, "me"), ReviewState::Approved);

        let reviews = vec![
            review("me", "APPROVED", Some(at(200))),
            review("me", "CHANGES_REQUESTED", Some(at(100))),
        ];
        assert_eq!(review_state(&reviews, "me"), ReviewState::Approved);
    }

    #[test]
    fn equal_timestamps_resolve_to_last_in_source_order() {
        let reviews = vec![
            review("me", "APPROVED", Some(at(100))),
            review("me", "CHANGES_REQUESTED", Some(at(100))),
        ];
        assert_eq!(review_state(&reviews, "me"), ReviewState::ChangesRequested);
    }

    #[test]
    fn missing_timestamps_resolve_to_last_in_source_order() {
        let reviews = vec![
            review("me", "APPROVED", None),
            review("me", "CHANGES_REQUESTED", None),
        ];
        assert_eq!(review_state(&reviews, "me"), ReviewState::ChangesRequested);
    }

    #[test]
    fn comment_only_review_is_pending() {
        let reviews = vec![
            review("me", "APPROVED", Some(at(100))),
            review("me", "COMMENTED", Some(at(200))),
        ];
        assert_eq!(review_state(&reviews, "me"), ReviewState::Pending);
    }

    #[test]
    fn partition_is_stable_and_disjoint() {
        use crate::domain::pr::{Author, PullRequest};

        let pr = |id: u64, state: ReviewState| PullRequest {
            id,
            number: id,
            title: format!("PR {id}"),
            url: String::new(),
            repository: "acme/widgets".to_string(),
            author: Author {
                login: "author".to_string(),
                avatar_url: None,
            },
            created_at: at(0),
            updated_at: at(0),
            draft: false,
            review_state: state,
        };

        let groups = partition(vec![
            pr(1, ReviewState::Pending),
            pr(2, ReviewState::Approved),
            pr(3, ReviewState::Pending),
            pr(4, ReviewState::ChangesRequested),
        ]);

        let ids = |prs: &[PullRequest]| prs.iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids(&groups.pending), vec![1, 3]);
        assert_eq!(ids(&groups.changes_requested), vec![4]);
        assert_eq!(ids(&groups.approved), vec![2]);
    }

    #[test]
    fn other_reviewers_do_not_affect_classification() {
        let reviews = vec![
            review("me", "CHANGES_REQUESTED", Some(at(100))),
            review("teammate", "APPROVED", Some(at(500))),
        ];
        assert_eq!(review_state(&reviews, "me"), ReviewState::ChangesRequested);
    }
}
