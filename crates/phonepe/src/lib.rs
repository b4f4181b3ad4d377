//! PhonePe checkout client for the CodeMasti site.
//!
//! This crate provides:
//! - Env-driven gateway configuration (sandbox by default)
//! - Bearer-token acquisition with an in-process cache and injected clock
//! - Hosted-checkout session creation and order-status polling
//!
//! The client is a thin, mostly stateless wrapper: the only state it holds
//! across requests is the cached access token. Any non-2xx from the gateway
//! surfaces as an error carrying the gateway's own message text; retries, if
//! any, are the caller's responsibility.

mod client;
mod config;
mod error;
mod token;

pub use client::{OrderStatus, PaymentSession, PhonePeClient};
pub use config::{auth_url_for, env_name_for, sandbox_from_env, PhonePeConfig};
pub use error::PhonePeError;
pub use token::{Clock, SystemClock, TokenCache};

pub type Result<T> = std::result::Result<T, PhonePeError>;
