use thiserror::Error;

/// Errors from the PhonePe gateway client.
#[derive(Debug, Error)]
pub enum PhonePeError {
    /// Missing or partial gateway configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The client-credential token exchange failed. Fatal to the attempt;
    /// the caller is expected to retry the whole flow.
    #[error("token exchange failed: {0}")]
    Token(String),

    /// Non-2xx from the gateway, with its own message text where available.
    #[error("gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// Transport-level failure (DNS, TLS, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
