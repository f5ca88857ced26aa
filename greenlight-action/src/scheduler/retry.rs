//! Bounded retry combinator
//!
//! Runs a step until it reports completion, fails, or the attempt budget is
//! spent. The step does not know about time; sleeping happens here, and only
//! between attempts.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// How often and how many times to run a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_attempts: u32,

    /// Delay between two attempts
    pub interval: Duration,
}

/// Outcome of one attempt that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// Stop and return this value
    Done(T),

    /// Try again after the interval
    Pending,
}

/// Why [`retry`] gave up
#[derive(Debug, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt came back pending
    Exhausted { attempts: u32 },

    /// A step failed; no further attempts were made
    Aborted(E),
}

/// Runs `step` until it returns [`Attempt::Done`] or an error
///
/// `step` receives the 1-based attempt number. Exactly `max_attempts` steps
/// run at most, with `interval` slept between consecutive ones.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut step: F) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Attempt<T>, E>>,
{
    for attempt in 1..=policy.max_attempts {
        match step(attempt).await {
            Ok(Attempt::Done(value)) => return Ok(value),
            Ok(Attempt::Pending) => {}
            Err(e) => return Err(RetryError::Aborted(e)),
        }

        if attempt < policy.max_attempts {
            debug!(
                "Attempt {}/{} pending, retrying in {:?}",
                attempt, policy.max_attempts, policy.interval
            );
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(RetryError::Exhausted {
        attempts: policy.max_attempts,
    })
}
