//! Customer domain types.

use chrono::{DateTime, Utc};

use clearbank_core::{CustomerId, Email};

/// A registered customer (domain type).
///
/// The password hash is deliberately not carried here; the authenticate path
/// fetches it separately and it never leaves the service layer.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Store-assigned surrogate key.
    pub id: CustomerId,
    /// Customer's first name.
    pub first_name: String,
    /// Customer's last name.
    pub last_name: String,
    /// Unique, lowercased email address (the business key).
    pub email: Email,
    /// When the customer registered. Immutable.
    pub created_at: DateTime<Utc>,
}

/// A partial edit to a customer record.
///
/// `None` fields are left unchanged. Values are raw strings; the service
/// validates and parses them before anything is persisted, so an edit either
/// applies in full or not at all.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    /// New first name, if changing.
    pub first_name: Option<String>,
    /// New last name, if changing.
    pub last_name: Option<String>,
    /// New email address, if changing.
    pub email: Option<String>,
}

impl CustomerUpdate {
    /// Whether this update changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}
