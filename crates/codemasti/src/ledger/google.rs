//! Google Sheets ledger backend.
//!
//! Authenticates as a service account: a short-lived RS256 JWT is exchanged
//! for an access token, cached until near expiry. Rows are appended through
//! the `values.append` endpoint; the header row is ensured lazily on every
//! append, which keeps the call idempotent at this system's low volume.

use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use codemasti_core::{SheetRow, SHEET_HEADER};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::config::SheetsConfig;
use crate::error::ApiError;
use crate::ledger::{is_plausible_sheet_id, LedgerRepository};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const VALUES_RANGE: &str = "Sheet1!A:N";
const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);

// Refresh the access token a minute before Google expires it.
const TOKEN_REFRESH_MARGIN_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

pub struct GoogleSheetsLedger {
    http: reqwest::Client,
    sheet_id: String,
    service_account_email: String,
    encoding_key: EncodingKey,
    token: RwLock<Option<(String, u64)>>,
}

impl GoogleSheetsLedger {
    /// Build a ledger for the configured spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the sheet id fails the
    /// plausibility check or the private key is not valid RSA PEM.
    pub fn new(config: &SheetsConfig) -> Result<Self, ApiError> {
        if !is_plausible_sheet_id(&config.sheet_id) {
            return Err(ApiError::Config(
                "GOOGLE_SHEET_ID does not look like a spreadsheet id".into(),
            ));
        }

        let encoding_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
            .map_err(|e| ApiError::Config(format!("invalid service-account key: {e}")))?;

        let http = reqwest::ClientBuilder::new()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            sheet_id: config.sheet_id.clone(),
            service_account_email: config.service_account_email.clone(),
            encoding_key,
            token: RwLock::new(None),
        })
    }

    fn now_epoch_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Service-account token exchange, cached until near expiry. Concurrent
    /// refreshes just exchange twice; the grant is side-effect-free.
    async fn access_token(&self) -> Result<String, ApiError> {
        let now = Self::now_epoch_secs();

        if let Ok(guard) = self.token.read() {
            if let Some((token, expires_at)) = guard.as_ref() {
                if now + TOKEN_REFRESH_MARGIN_SECS < *expires_at {
                    return Ok(token.clone());
                }
            }
        }

        let claims = JwtClaims {
            iss: &self.service_account_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + 3600,
        };

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Upstream(format!("sheets: failed to sign JWT: {e}")))?;

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("sheets: token exchange failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "sheets: token exchange returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("sheets: bad token response: {e}")))?;

        if let Ok(mut guard) = self.token.write() {
            *guard = Some((token.access_token.clone(), now + token.expires_in));
        }

        Ok(token.access_token)
    }

    async fn read_rows(&self) -> Result<Vec<Vec<String>>, ApiError> {
        let token = self.access_token().await?;
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
            self.sheet_id, VALUES_RANGE
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("sheets: read failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ApiError::Upstream(format!("sheets: read returned {status}")));
        }

        let values: ValuesResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("sheets: bad read response: {e}")))?;

        Ok(values.values)
    }

    async fn append_cells(&self, cells: Vec<String>) -> Result<(), ApiError> {
        let token = self.access_token().await?;
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
            self.sheet_id, VALUES_RANGE
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&serde_json::json!({ "values": [cells] }))
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("sheets: append failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "sheets: append returned {status}: {body}"
            )));
        }

        Ok(())
    }

    async fn ensure_header(&self) -> Result<(), ApiError> {
        let rows = self.read_rows().await?;
        if rows.is_empty() {
            tracing::info!(sheet_id = %self.sheet_id, "Initializing ledger header row");
            self.append_cells(SHEET_HEADER.iter().map(|s| s.to_string()).collect())
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for GoogleSheetsLedger {
    async fn append(&self, row: SheetRow) -> Result<(), ApiError> {
        self.ensure_header().await?;
        self.append_cells(row.to_cells().to_vec()).await?;

        tracing::info!(kind = row.kind.as_str(), "Appended ledger row");
        Ok(())
    }

    async fn registration_email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let rows = self.read_rows().await?;

        // Column 2 is Email, column 6 is Type; skip the header.
        Ok(rows.iter().skip(1).any(|row| {
            row.get(6).map(String::as_str) == Some("Registration")
                && row
                    .get(2)
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
        }))
    }
}
