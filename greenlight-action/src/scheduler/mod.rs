//! Scheduler layer
//!
//! Drives the check-suite poll loop. The retry combinator owns attempt
//! counting and sleeping; the poller decides what each attempt means.

pub mod poller;
pub mod retry;

pub use poller::CheckSuitePoller;
pub use retry::{Attempt, RetryError, RetryPolicy, retry};
