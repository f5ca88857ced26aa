//! Check suite domain model
//!
//! A check suite groups the status checks one CI integration reports for a
//! commit. The action only looks at suites owned by a single application and
//! reduces them to a [`Verdict`].

use serde::{Deserialize, Serialize};

/// Name of the application that owns GitHub Actions check suites
pub const GITHUB_ACTIONS_APP: &str = "GitHub Actions";

/// Terminal conclusion of a check suite
///
/// A suite that is still running has no conclusion at all, which is modelled
/// as `Option<CheckConclusion>` on [`CheckSuite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    TimedOut,
    ActionRequired,
    Skipped,
    Stale,
    StartupFailure,

    /// Any conclusion this crate does not know about yet
    #[serde(other)]
    Unknown,
}

impl CheckConclusion {
    /// Whether this conclusion counts as a pass
    pub fn is_success(self) -> bool {
        self == CheckConclusion::Success
    }
}

impl std::fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CheckConclusion::Success => "SUCCESS",
            CheckConclusion::Failure => "FAILURE",
            CheckConclusion::Neutral => "NEUTRAL",
            CheckConclusion::Cancelled => "CANCELLED",
            CheckConclusion::TimedOut => "TIMED_OUT",
            CheckConclusion::ActionRequired => "ACTION_REQUIRED",
            CheckConclusion::Skipped => "SKIPPED",
            CheckConclusion::Stale => "STALE",
            CheckConclusion::StartupFailure => "STARTUP_FAILURE",
            CheckConclusion::Unknown => "UNKNOWN",
        };
        write!(f, "{}", name)
    }
}

/// A check suite attached to a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSuite {
    /// Name of the application that owns the suite, if reported
    pub app_name: Option<String>,

    /// Conclusion, or `None` while the suite is still pending
    pub conclusion: Option<CheckConclusion>,

    /// Database id of the workflow run backing the suite, if any
    pub workflow_run_id: Option<u64>,
}

impl CheckSuite {
    /// Whether the suite is owned by the named application
    pub fn is_owned_by(&self, app_name: &str) -> bool {
        self.app_name.as_deref() == Some(app_name)
    }

    /// Whether the suite reached a conclusion other than success
    pub fn is_unsuccessful(&self) -> bool {
        matches!(self.conclusion, Some(conclusion) if !conclusion.is_success())
    }
}

/// The head commit of a branch together with its check suites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadCommit {
    /// URL of a tarball with the commit's tree
    pub tarball_url: Option<String>,

    /// Check suites in the order the API returned them
    pub check_suites: Vec<CheckSuite>,
}

impl HeadCommit {
    /// Check suites owned by the named application, in their original order
    pub fn suites_owned_by(&self, app_name: &str) -> Vec<CheckSuite> {
        self.check_suites
            .iter()
            .filter(|suite| suite.is_owned_by(app_name))
            .cloned()
            .collect()
    }
}

/// Combined state of a set of check suites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// At least one suite exists and every suite succeeded
    Succeeded,

    /// Some suite concluded with anything but success
    Failed,

    /// Nothing conclusive yet
    Pending,
}

impl Verdict {
    /// Reduces a set of suites to a verdict
    ///
    /// Success is checked first and requires a non-empty set. Failure only
    /// needs one suite with a non-success conclusion, even while others are
    /// still running.
    pub fn of(suites: &[CheckSuite]) -> Self {
        let all_succeeded = !suites.is_empty()
            && suites
                .iter()
                .all(|suite| suite.conclusion == Some(CheckConclusion::Success));

        if all_succeeded {
            Verdict::Succeeded
        } else if suites.iter().any(CheckSuite::is_unsuccessful) {
            Verdict::Failed
        } else {
            Verdict::Pending
        }
    }
}
