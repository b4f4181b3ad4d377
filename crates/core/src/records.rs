//! Transient records passed between collaborators.
//!
//! There is no internal store; these types travel between the browser, the
//! payment gateway and the spreadsheet ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The in-progress registration form state.
///
/// All five fields must be individually valid before any submission is
/// allowed; the API layer enforces that with the `validation` module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub student_class: String,
    pub batch: String,
}

/// Kind of submission a ledger row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Contact,
    Newsletter,
    Registration,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            Self::Newsletter => "Newsletter",
            Self::Registration => "Registration",
        }
    }
}

/// Client-perceived state of a payment attempt, as reported by the gateway.
///
/// The taxonomy is open: the provider may add states, so anything beyond the
/// three known terminals passes through opaquely rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderState {
    Completed,
    Failed,
    Pending,
    Other(String),
}

impl OrderState {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Pending => "PENDING",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for OrderState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            "PENDING" => Self::Pending,
            _ => Self::Other(s),
        }
    }
}

impl From<OrderState> for String {
    fn from(state: OrderState) -> Self {
        state.as_str().to_string()
    }
}

/// Header row for the shared spreadsheet ledger.
pub const SHEET_HEADER: [&str; 14] = [
    "Timestamp",
    "Name",
    "Email",
    "Phone",
    "Class",
    "Message",
    "Type",
    "Resolved",
    "Batch",
    "Admission",
    "Founder Note",
    "Notes",
    "Payment Ref",
    "Payment Status",
];

/// One append-only record in the external spreadsheet ledger.
///
/// Fixed 14-column layout; missing fields are written as empty strings so
/// column alignment is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub student_class: String,
    pub message: String,
    pub kind: SubmissionKind,
    pub resolved: String,
    pub batch: String,
    pub admission: String,
    pub founder_note: String,
    pub notes: String,
    pub payment_ref: String,
    pub payment_status: String,
}

impl SheetRow {
    fn blank(kind: SubmissionKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            student_class: String::new(),
            message: String::new(),
            kind,
            resolved: String::new(),
            batch: String::new(),
            admission: String::new(),
            founder_note: String::new(),
            notes: String::new(),
            payment_ref: String::new(),
            payment_status: String::new(),
        }
    }

    /// Row for a contact-form submission.
    pub fn contact(
        timestamp: DateTime<Utc>,
        name: &str,
        email: &str,
        phone: &str,
        student_class: &str,
        message: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            student_class: student_class.to_string(),
            message: message.to_string(),
            ..Self::blank(SubmissionKind::Contact, timestamp)
        }
    }

    /// Row for a newsletter signup.
    pub fn newsletter(timestamp: DateTime<Utc>, email: &str) -> Self {
        Self {
            email: email.to_string(),
            ..Self::blank(SubmissionKind::Newsletter, timestamp)
        }
    }

    /// Row for a registration, paid or pay-later.
    pub fn registration(
        timestamp: DateTime<Utc>,
        draft: &RegistrationDraft,
        payment_ref: &str,
        payment_status: &str,
    ) -> Self {
        Self {
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            student_class: draft.student_class.clone(),
            batch: draft.batch.clone(),
            payment_ref: payment_ref.to_string(),
            payment_status: payment_status.to_string(),
            ..Self::blank(SubmissionKind::Registration, timestamp)
        }
    }

    /// Serializes into the fixed 14-cell layout.
    pub fn to_cells(&self) -> [String; 14] {
        [
            self.timestamp.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.student_class.clone(),
            self.message.clone(),
            self.kind.as_str().to_string(),
            self.resolved.clone(),
            self.batch.clone(),
            self.admission.clone(),
            self.founder_note.clone(),
            self.notes.clone(),
            self.payment_ref.clone(),
            self.payment_status.clone(),
        ]
    }
}
