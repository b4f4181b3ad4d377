//! In-memory ledger for tests and sheet-less local runs.

use async_trait::async_trait;
use codemasti_core::{SheetRow, SubmissionKind};
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::ledger::LedgerRepository;

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    rows: RwLock<Vec<SheetRow>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all appended rows, in append order.
    pub async fn rows(&self) -> Vec<SheetRow> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedger {
    async fn append(&self, row: SheetRow) -> Result<(), ApiError> {
        self.rows.write().await.push(row);
        Ok(())
    }

    async fn registration_email_exists(&self, email: &str) -> Result<bool, ApiError> {
        Ok(self.rows.read().await.iter().any(|row| {
            row.kind == SubmissionKind::Registration && row.email.eq_ignore_ascii_case(email)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use codemasti_core::RegistrationDraft;

    fn draft(email: &str) -> RegistrationDraft {
        RegistrationDraft {
            name: "Asha".into(),
            email: email.into(),
            phone: "8228907407".into(),
            student_class: "8".into(),
            batch: "spark".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_check_is_case_insensitive() {
        let ledger = InMemoryLedger::new();
        ledger
            .append(SheetRow::registration(Utc::now(), &draft("x@y.com"), "", ""))
            .await
            .unwrap();

        assert!(ledger.registration_email_exists("X@Y.com").await.unwrap());
        assert!(!ledger.registration_email_exists("z@y.com").await.unwrap());
    }

    #[tokio::test]
    async fn non_registration_rows_do_not_count_as_duplicates() {
        let ledger = InMemoryLedger::new();
        ledger
            .append(SheetRow::newsletter(Utc::now(), "x@y.com"))
            .await
            .unwrap();

        assert!(!ledger.registration_email_exists("x@y.com").await.unwrap());
    }
}
