//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update/report),
//! keeping call sites readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Role, TransactionType, export::ExportFormat};

/// Create a transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: Uuid,
    pub kind: TransactionType,
    pub amount_minor: i64,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        kind: TransactionType,
        amount_minor: i64,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            kind,
            amount_minor,
            description: description.into(),
            category: category.into(),
            date,
            notes: None,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Partial update of a transaction. `Some` replaces the stored value, `None`
/// keeps it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionType>,
    pub amount_minor: Option<i64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl TransactionPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial update of the caller's profile. `avatar: Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<Option<String>>,
}

/// Create a user account.
#[derive(Clone, Debug)]
pub struct NewUserCmd {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUserCmd {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: Role::User,
        }
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Parameters of a custom report.
///
/// Dates stay raw so the report can echo them; they only filter when both
/// are present. `types: None` selects both types.
#[derive(Clone, Debug, Default)]
pub struct ReportSpec {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: ExportFormat,
    pub include_categories: Vec<String>,
    pub exclude_categories: Vec<String>,
    pub types: Option<Vec<String>>,
}
