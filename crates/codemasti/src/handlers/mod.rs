pub mod contact;
mod emails;
pub mod health;
pub mod newsletter;
pub mod pages;
pub mod payments;
pub mod register;

use serde::Serialize;

/// Success envelope shared by the submission endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    /// Whether the user-facing confirmation email went out. Email failure is
    /// non-fatal; this flag is how it surfaces.
    pub email_sent: bool,
}
