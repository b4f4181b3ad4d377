//! Spreadsheet ledger backends.
//!
//! The shared spreadsheet is the operational database substitute: a
//! write-mostly, append-only log staff follow up from. Handlers depend on
//! the [`LedgerRepository`] trait; production uses the Google Sheets
//! implementation, tests and sheet-less local runs use the in-memory one.

mod google;
mod inmemory;

use async_trait::async_trait;
use codemasti_core::SheetRow;

pub use google::GoogleSheetsLedger;
pub use inmemory::InMemoryLedger;

use crate::error::ApiError;

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Appends exactly one fixed-width row, lazily creating the header row
    /// first. Missing fields are already empty strings in the row.
    async fn append(&self, row: SheetRow) -> Result<(), ApiError>;

    /// Best-effort duplicate check: does any existing row with type
    /// "Registration" carry this email (case-insensitive)?
    ///
    /// This scans all existing rows on every call, an accepted O(n)
    /// ceiling at the expected volume.
    async fn registration_email_exists(&self, email: &str) -> Result<bool, ApiError>;
}

/// A spreadsheet id must be at least 20 chars and limited to
/// `[A-Za-z0-9_-]`; anything else is a misconfigured env var.
pub fn is_plausible_sheet_id(id: &str) -> bool {
    id.len() >= 20
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_sheet_ids() {
        assert!(is_plausible_sheet_id(
            "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms"
        ));
        assert!(!is_plausible_sheet_id(""));
        assert!(!is_plausible_sheet_id("short"));
        assert!(!is_plausible_sheet_id(
            "1BxiMVs0XRA5nFMdKvBdBZjgmUU/ptlbs74OgvE2upms"
        ));
    }
}
