use codemasti_phonepe::PhonePeConfig;

/// Application configuration loaded from environment variables.
///
/// Collaborator blocks (sheets, SMTP, gateway) are each optional so the
/// server always starts; endpoints that need a missing block answer with a
/// configuration error instead of the process crashing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public base URL of the site, used as the default payment-redirect
    /// origin (default: `http://localhost:3000`).
    pub app_url: String,
    /// Recipient for admin notification emails (default: the SMTP user).
    pub admin_email: Option<String>,
    pub sheets: Option<SheetsConfig>,
    pub smtp: Option<SmtpConfig>,
    pub phonepe: Option<PhonePeConfig>,
    /// Optional mails.so key enabling the newsletter deliverability probe.
    pub mails_so_api_key: Option<String>,
}

/// Google Sheets service-account configuration.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub sheet_id: String,
    pub service_account_email: String,
    /// PEM-encoded RSA private key. Literal `\n` sequences (common when the
    /// key is pasted into an env var) are unescaped on load.
    pub private_key: String,
    /// Note: Recognized for parity with the service-account JSON, but the
    /// Sheets calls only need the email and key.
    #[allow(dead_code)]
    pub project_id: Option<String>,
}

/// SMTP transport configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Implicit TLS (465) when true, STARTTLS otherwise.
    pub secure: bool,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `APP_URL` (fallback: `NEXT_PUBLIC_APP_URL`) - public site URL
    /// - `ADMIN_EMAIL` - admin notification recipient
    /// - `GOOGLE_SHEET_ID`, `GOOGLE_SERVICE_ACCOUNT_EMAIL`,
    ///   `GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY`, `GOOGLE_PROJECT_ID`
    /// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_SECURE`, `SMTP_USER`, `SMTP_PASS`
    /// - `PHONEPE_CLIENT_ID`, `PHONEPE_CLIENT_SECRET`,
    ///   `PHONEPE_CLIENT_VERSION`, `PHONEPE_SANDBOX`
    /// - `MAILS_SO_API_KEY`
    ///
    /// Partial blocks are logged and dropped rather than failing startup.
    pub fn from_env() -> Self {
        let app_url = std::env::var("APP_URL")
            .or_else(|_| std::env::var("NEXT_PUBLIC_APP_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let sheets = match sheets_from_env() {
            Ok(sheets) => sheets,
            Err(missing) => {
                tracing::warn!(missing, "Partial Google Sheets configuration, ledger disabled");
                None
            }
        };

        let smtp = match smtp_from_env() {
            Ok(smtp) => smtp,
            Err(missing) => {
                tracing::warn!(missing, "Partial SMTP configuration, mailer disabled");
                None
            }
        };

        let phonepe = match PhonePeConfig::from_env() {
            Ok(phonepe) => phonepe,
            Err(err) => {
                tracing::warn!(error = %err, "Partial PhonePe configuration, payments disabled");
                None
            }
        };

        let admin_email = std::env::var("ADMIN_EMAIL")
            .ok()
            .or_else(|| smtp.as_ref().map(|s| s.user.clone()));

        Self {
            app_url,
            admin_email,
            sheets,
            smtp,
            phonepe,
            mails_so_api_key: std::env::var("MAILS_SO_API_KEY").ok(),
        }
    }
}

fn sheets_from_env() -> Result<Option<SheetsConfig>, &'static str> {
    let sheet_id = match std::env::var("GOOGLE_SHEET_ID") {
        Ok(id) if !id.is_empty() => id,
        _ => return Ok(None),
    };

    let service_account_email =
        std::env::var("GOOGLE_SERVICE_ACCOUNT_EMAIL").map_err(|_| "GOOGLE_SERVICE_ACCOUNT_EMAIL")?;
    let private_key = std::env::var("GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY")
        .map_err(|_| "GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY")?
        .replace("\\n", "\n");

    Ok(Some(SheetsConfig {
        sheet_id,
        service_account_email,
        private_key,
        project_id: std::env::var("GOOGLE_PROJECT_ID").ok(),
    }))
}

fn smtp_from_env() -> Result<Option<SmtpConfig>, &'static str> {
    let host = match std::env::var("SMTP_HOST") {
        Ok(host) if !host.is_empty() => host,
        _ => return Ok(None),
    };

    let user = std::env::var("SMTP_USER").map_err(|_| "SMTP_USER")?;
    let pass = std::env::var("SMTP_PASS").map_err(|_| "SMTP_PASS")?;

    let secure = std::env::var("SMTP_SECURE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let port = std::env::var("SMTP_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(if secure { 465 } else { 587 });

    let from = std::env::var("SMTP_FROM").unwrap_or_else(|_| user.clone());

    Ok(Some(SmtpConfig {
        host,
        port,
        secure,
        user,
        pass,
        from,
    }))
}
