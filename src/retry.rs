//! Retry classification and backoff schedule.

use std::time::Duration;

use rand::Rng;

use crate::profile::RetryPolicy;

/// Provider error codes worth retrying, matched on the full code or its
/// `Category.` prefix.
const RETRYABLE_CODES: &[&str] = &["RequestLimitExceeded", "InternalError", "ServiceUnavailable"];

/// Action-name prefixes that mutate state. Responses to these actions are
/// never retried; only failures before bytes reach the wire are.
const MUTATING_PREFIXES: &[&str] = &[
    "Create",
    "Run",
    "Allocate",
    "Delete",
    "Terminate",
    "Reset",
    "Modify",
    "Associate",
    "Disassociate",
    "Purchase",
    "Renew",
    "Import",
    "Start",
    "Stop",
    "Reboot",
];

pub(crate) fn is_retryable_code(code: &str) -> bool {
    RETRYABLE_CODES
        .iter()
        .any(|c| code == *c || (code.starts_with(c) && code.as_bytes().get(c.len()) == Some(&b'.')))
}

/// Whether the action may be safely re-sent after a response or an
/// ambiguous failure was observed.
pub(crate) fn is_idempotent_action(action: &str) -> bool {
    !MUTATING_PREFIXES.iter().any(|p| action.starts_with(p))
}

/// Whether a failed round trip may be retried for this action.
///
/// Connect-stage failures happen before any bytes reach the wire and are
/// safe for every action. Anything later (timeouts, resets mid-body) is
/// only safe for idempotent actions.
pub(crate) fn should_retry_transport(err: &reqwest::Error, idempotent: bool) -> bool {
    if err.is_connect() {
        return true;
    }
    idempotent && (err.is_timeout() || err.is_request())
}

/// Exponential backoff with 50-100% jitter. `retry` is 1 for the sleep
/// before the second attempt.
pub(crate) fn backoff_delay(policy: &RetryPolicy, retry: u32) -> Duration {
    let exp = policy
        .base_delay
        .saturating_mul(1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX))
        .min(policy.max_delay);
    let jitter = rand::thread_rng().gen_range(0.5..=1.0);
    exp.mul_f64(jitter)
}
