//! Retries for page fetches and downloads.
//!
//! A failed attempt is classified (`ErrorKind`), the policy decides whether
//! and how long to wait, and `run_with_retry` drives the loop on the
//! calling thread.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::TransferError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
