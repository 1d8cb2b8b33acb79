use std::fmt;

use serde::{Deserialize, Serialize};

/// Metric files published per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Openrank,
    Activity,
    Participants,
    Stars,
    TechnicalFork,
    Attention,
    Commits,
    NewContributors,
    Contributors,
    InactiveContributors,
    BusFactor,
    IssuesNew,
    IssuesClosed,
    IssueComments,
    IssueResponseTime,
    IssueResolutionDuration,
    IssueAge,
    ChangeRequests,
    ChangeRequestsAccepted,
    ChangeRequestsReviews,
    ChangeRequestResponseTime,
    ChangeRequestResolutionDuration,
    ChangeRequestAge,
}

impl Metric {
    /// Loaded together for overview and comparison pages.
    pub const CORE: [Metric; 3] = [Metric::Openrank, Metric::Activity, Metric::Participants];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Openrank => "openrank",
            Metric::Activity => "activity",
            Metric::Participants => "participants",
            Metric::Stars => "stars",
            Metric::TechnicalFork => "technical_fork",
            Metric::Attention => "attention",
            Metric::Commits => "commits",
            Metric::NewContributors => "new_contributors",
            Metric::Contributors => "contributors",
            Metric::InactiveContributors => "inactive_contributors",
            Metric::BusFactor => "bus_factor",
            Metric::IssuesNew => "issues_new",
            Metric::IssuesClosed => "issues_closed",
            Metric::IssueComments => "issue_comments",
            Metric::IssueResponseTime => "issue_response_time",
            Metric::IssueResolutionDuration => "issue_resolution_duration",
            Metric::IssueAge => "issue_age",
            Metric::ChangeRequests => "change_requests",
            Metric::ChangeRequestsAccepted => "change_requests_accepted",
            Metric::ChangeRequestsReviews => "change_requests_reviews",
            Metric::ChangeRequestResponseTime => "change_request_response_time",
            Metric::ChangeRequestResolutionDuration => "change_request_resolution_duration",
            Metric::ChangeRequestAge => "change_request_age",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// Duration metrics wrap their series in an `avg` field alongside
    /// quantiles.
    pub fn is_duration(&self) -> bool {
        matches!(
            self,
            Metric::IssueResponseTime
                | Metric::IssueResolutionDuration
                | Metric::IssueAge
                | Metric::ChangeRequestResponseTime
                | Metric::ChangeRequestResolutionDuration
                | Metric::ChangeRequestAge
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_serde() {
        for metric in [Metric::Openrank, Metric::TechnicalFork, Metric::ChangeRequestAge] {
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json, format!("\"{}\"", metric.name()));
        }
        assert_eq!(Metric::BusFactor.file_name(), "bus_factor.json");
    }

    #[test]
    fn duration_metrics() {
        assert!(Metric::IssueAge.is_duration());
        assert!(Metric::ChangeRequestResponseTime.is_duration());
        assert!(!Metric::IssuesNew.is_duration());
        assert!(!Metric::Openrank.is_duration());
    }
}
