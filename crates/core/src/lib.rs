//! Functional core for the CodeMasti site.
//!
//! Everything in this crate is pure: field validation, transient record
//! types, merchant order id handling and redirect-base checks. No I/O and
//! no async, so the server and gateway crates can test against it without
//! network access.

mod error;
mod order;
mod records;
mod redirect;
mod validation;

pub use error::{Error, Result};
pub use order::{generate_merchant_order_id, sanitize_order_id_prefix, DEFAULT_ORDER_ID_PREFIX};
pub use records::{OrderState, RegistrationDraft, SheetRow, SubmissionKind, SHEET_HEADER};
pub use redirect::{is_allowed_redirect_base, normalize_redirect_url};
pub use validation::{
    validate_batch, validate_email, validate_name, validate_phone, validate_student_class, Batch,
    STUDENT_CLASSES,
};
