//! Check-suite poller
//!
//! Polls the default branch head of a repository until the check suites of
//! one application all succeed, one of them concludes otherwise, or the
//! attempt budget runs out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use greenlight_core::domain::check_suite::{CheckSuite, HeadCommit, Verdict};
use tracing::{debug, info, warn};

use crate::config::PollerConfig;
use crate::error::{ActionError, Result};
use crate::repository::{BranchHeadSnapshot, CheckSuiteRepository};
use crate::runtime;
use crate::scheduler::{Attempt, RetryError, retry};

/// A default branch head whose monitored check suites all succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenHead {
    /// Tarball of the head commit
    pub tarball_url: String,

    /// The succeeded suites, in the order the API returned them
    pub suites: Vec<CheckSuite>,
}

/// Receives warning annotations
type WarningSink = Box<dyn Fn(&str) + Send + Sync>;

/// Poller that waits for the default branch checks to pass
pub struct CheckSuitePoller {
    config: PollerConfig,
    checks: Arc<dyn CheckSuiteRepository>,
    warn_sink: WarningSink,
    /// Set once the partial-response warning went out
    warned: AtomicBool,
}

impl CheckSuitePoller {
    /// Creates a new check-suite poller
    pub fn new(config: PollerConfig, checks: Arc<dyn CheckSuiteRepository>) -> Self {
        Self {
            config,
            checks,
            warn_sink: Box::new(runtime::warning),
            warned: AtomicBool::new(false),
        }
    }

    /// Sends warning annotations to `sink` instead of the runner
    #[cfg(test)]
    pub fn with_warning_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.warn_sink = Box::new(sink);
        self
    }

    /// Polls until the checks pass
    ///
    /// # Returns
    /// The green head, or the error that ended polling: failed checks, an
    /// unreadable head, or a timeout.
    pub async fn wait_for_green(&self) -> Result<GreenHead> {
        let policy = self.config.retry_policy();
        info!(
            "Waiting for {} checks of {} (up to {} attempts, every {:?})",
            self.config.app_name,
            self.config.repository(),
            policy.max_attempts,
            policy.interval
        );

        match retry(&policy, |attempt| self.poll_once(attempt)).await {
            Ok(green) => Ok(green),
            Err(RetryError::Aborted(e)) => Err(e),
            Err(RetryError::Exhausted { attempts }) => Err(ActionError::Timeout {
                repository: self.config.repository(),
                attempts,
            }),
        }
    }

    /// Performs a single poll
    ///
    /// Returns `Done` once every monitored suite succeeded and `Pending`
    /// while nothing is conclusive yet.
    pub async fn poll_once(&self, attempt: u32) -> Result<Attempt<GreenHead>> {
        debug!("Polling check suites (attempt {})", attempt);

        let head = self.fetch_head().await?;
        let suites = head.suites_owned_by(&self.config.app_name);

        match Verdict::of(&suites) {
            Verdict::Succeeded => {
                let tarball_url = head
                    .tarball_url
                    .ok_or_else(|| self.upstream_error("head commit has no tarball URL"))?;

                info!(
                    "All {} check suite(s) of {} succeeded",
                    suites.len(),
                    self.config.repository()
                );
                Ok(Attempt::Done(GreenHead {
                    tarball_url,
                    suites,
                }))
            }
            Verdict::Failed => Err(ActionError::ChecksFailed {
                repository: self.config.repository(),
                details: describe_unsuccessful(&suites),
            }),
            Verdict::Pending => {
                let concluded = suites.iter().filter(|s| s.conclusion.is_some()).count();
                info!(
                    "Waiting for checks of {} to complete ({}/{} suite(s) done, attempt {}/{})",
                    self.config.repository(),
                    concluded,
                    suites.len(),
                    attempt,
                    self.config.max_attempts
                );
                Ok(Attempt::Pending)
            }
        }
    }

    /// Fetches the head commit, tolerating partial responses
    async fn fetch_head(&self) -> Result<HeadCommit> {
        let result = self
            .checks
            .fetch_default_branch_head(
                &self.config.owner,
                &self.config.repo,
                self.config.check_suites,
            )
            .await;

        let head = match result {
            Ok(BranchHeadSnapshot { head, errors }) => {
                if !errors.is_empty() {
                    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                    self.warn_partial(&messages);
                }
                head
            }
            Err(e) => {
                self.warn_partial(&[e.to_string()]);
                return Err(self.upstream_error(format!("query failed: {}", e)));
            }
        };

        head.ok_or_else(|| self.upstream_error("response has no default branch head"))
    }

    /// Warns about query errors, once per run
    fn warn_partial(&self, messages: &[String]) {
        if self.warned.swap(true, Ordering::SeqCst) {
            debug!("Query errors: {}", messages.join("; "));
            return;
        }

        (self.warn_sink)("Using partial GraphQL response because of errors");
        for message in messages {
            warn!("GraphQL error: {}", message);
        }
    }

    fn upstream_error(&self, reason: impl Into<String>) -> ActionError {
        ActionError::UpstreamQuery {
            repository: self.config.repository(),
            reason: reason.into(),
        }
    }
}

/// Lists the conclusions that failed the checks, e.g. `FAILURE (run 42)`
fn describe_unsuccessful(suites: &[CheckSuite]) -> String {
    suites
        .iter()
        .filter(|suite| suite.is_unsuccessful())
        .filter_map(|suite| {
            let conclusion = suite.conclusion?;
            Some(match suite.workflow_run_id {
                Some(run_id) => format!("{} (run {})", conclusion, run_id),
                None => conclusion.to_string(),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
