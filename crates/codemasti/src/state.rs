//! Shared application state.
//!
//! Cloned per request handler. All collaborators sit behind trait objects so
//! tests can substitute fakes; nothing here holds state across requests
//! except the provider clients' own token caches.

use std::sync::Arc;
use std::time::Duration;

use codemasti_phonepe::PhonePeClient;

use crate::config::Config;
use crate::gateway::PaymentGateway;
use crate::ledger::{GoogleSheetsLedger, InMemoryLedger, LedgerRepository};
use crate::mailer::{LogMailer, Mailer, SmtpMailer};
use crate::pending::{InMemoryPendingStore, PendingStore};

#[derive(Clone)]
pub struct AppState {
    /// Spreadsheet ledger, the operational database substitute.
    pub ledger: Arc<dyn LedgerRepository>,
    /// Outbound transactional email.
    pub mailer: Arc<dyn Mailer>,
    /// Payment gateway; `None` when payments are not configured.
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    /// Pending-registration continuation records, keyed by merchant order id.
    pub pending: Arc<dyn PendingStore>,
    /// Plain HTTP client for ancillary probes (deliverability check).
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire collaborators from configuration. Missing blocks degrade to
    /// local fallbacks (in-memory ledger, logging mailer, no gateway) with a
    /// warning, so the server always starts.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let ledger: Arc<dyn LedgerRepository> = match &config.sheets {
            Some(sheets) => Arc::new(GoogleSheetsLedger::new(sheets)?),
            None => {
                tracing::warn!("Google Sheets not configured, using in-memory ledger");
                Arc::new(InMemoryLedger::new())
            }
        };

        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpMailer::new(smtp)?),
            None => {
                tracing::warn!("SMTP not configured, emails will only be logged");
                Arc::new(LogMailer)
            }
        };

        let gateway: Option<Arc<dyn PaymentGateway>> = match &config.phonepe {
            Some(phonepe) => {
                tracing::info!(env = phonepe.env_name(), "PhonePe gateway configured");
                Some(Arc::new(PhonePeClient::new(phonepe.clone())?))
            }
            None => {
                tracing::warn!("PhonePe not configured, payment endpoints disabled");
                None
            }
        };

        let http = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            ledger,
            mailer,
            gateway,
            pending: Arc::new(InMemoryPendingStore::new()),
            http,
            config: Arc::new(config),
        })
    }
}

// ============================================================================
// Test support - scripted collaborators for endpoint tests
// ============================================================================
