use crate::error::PhonePeError;

const SANDBOX_BASE_URL: &str = "https://api-preprod.phonepe.com/apis/pg-sandbox";
const PRODUCTION_BASE_URL: &str = "https://api.phonepe.com/apis/pg";

const SANDBOX_AUTH_URL: &str =
    "https://api-preprod.phonepe.com/apis/pg-sandbox/v1/oauth/token";
const PRODUCTION_AUTH_URL: &str =
    "https://api.phonepe.com/apis/identity-manager/v1/oauth/token";

/// PhonePe gateway configuration.
#[derive(Debug, Clone)]
pub struct PhonePeConfig {
    pub client_id: String,
    pub client_secret: String,
    pub client_version: String,
    /// Sandbox (pre-prod) gateway. Defaults to true; set `PHONEPE_SANDBOX=false`
    /// to hit production.
    pub sandbox: bool,
}

impl PhonePeConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PHONEPE_CLIENT_ID`: merchant client id (optional, enables payments)
    /// - `PHONEPE_CLIENT_SECRET`: merchant secret (required if client id set)
    /// - `PHONEPE_CLIENT_VERSION`: API client version (default: `1`)
    /// - `PHONEPE_SANDBOX`: use the pre-prod gateway (default: `true`)
    ///
    /// Returns `Ok(None)` when payments are not configured at all, and an
    /// error when the configuration is partial (client id without secret).
    pub fn from_env() -> Result<Option<Self>, PhonePeError> {
        let client_id = match std::env::var("PHONEPE_CLIENT_ID") {
            Ok(id) if !id.is_empty() => id,
            _ => return Ok(None),
        };

        let client_secret = std::env::var("PHONEPE_CLIENT_SECRET").map_err(|_| {
            PhonePeError::Config("PHONEPE_CLIENT_SECRET is required when PHONEPE_CLIENT_ID is set".into())
        })?;

        Ok(Some(Self {
            client_id,
            client_secret,
            client_version: std::env::var("PHONEPE_CLIENT_VERSION")
                .unwrap_or_else(|_| "1".to_string()),
            sandbox: sandbox_from_env(),
        }))
    }

    pub fn base_url(&self) -> &'static str {
        if self.sandbox {
            SANDBOX_BASE_URL
        } else {
            PRODUCTION_BASE_URL
        }
    }

    pub fn auth_url(&self) -> &'static str {
        auth_url_for(self.sandbox)
    }

    pub fn env_name(&self) -> &'static str {
        env_name_for(self.sandbox)
    }
}

/// Reads `PHONEPE_SANDBOX` (default true). Used by the config itself and by
/// the diagnostic endpoint, which must work even when no secret is set.
pub fn sandbox_from_env() -> bool {
    std::env::var("PHONEPE_SANDBOX")
        .map(|v| v != "false" && v != "0")
        .unwrap_or(true)
}

pub fn auth_url_for(sandbox: bool) -> &'static str {
    if sandbox {
        SANDBOX_AUTH_URL
    } else {
        PRODUCTION_AUTH_URL
    }
}

pub fn env_name_for(sandbox: bool) -> &'static str {
    if sandbox {
        "sandbox"
    } else {
        "production"
    }
}
