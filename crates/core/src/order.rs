//! Merchant order id generation and sanitization.
//!
//! The merchant order id is the idempotency key tying one payment attempt
//! to at most one registration. It is generated fresh per attempt as
//! `<prefix>_<millis>_<random>`.

use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};

/// Fallback prefix when the caller-supplied one sanitizes to nothing.
pub const DEFAULT_ORDER_ID_PREFIX: &str = "TEST";

const MAX_PREFIX_LEN: usize = 20;
const RANDOM_SUFFIX_LEN: usize = 6;

/// Reduces a caller-supplied order id prefix to alphanumerics and
/// underscores, capped at 20 chars. Empty or fully-invalid input falls back
/// to [`DEFAULT_ORDER_ID_PREFIX`].
pub fn sanitize_order_id_prefix(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(MAX_PREFIX_LEN)
        .collect();

    if cleaned.is_empty() {
        DEFAULT_ORDER_ID_PREFIX.to_string()
    } else {
        cleaned
    }
}

/// Generates a practically-unique merchant order id for one payment attempt.
pub fn generate_merchant_order_id(prefix: &str) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!(
        "{}_{}_{}",
        sanitize_order_id_prefix(prefix),
        Utc::now().timestamp_millis(),
        suffix
    )
}
