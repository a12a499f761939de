//! Domain models passed between the manager and the terminal front-end. The
//! types stay light-weight data holders; the rules that decide whether a
//! record may enter the store live in the free functions below so that both
//! `Customer` and `NewCustomer` share one definition of "valid".

use std::fmt;

use crate::error::Violation;

/// Check the three customer fields against the validity rules, reporting the
/// first rule that fails. Blank means empty or whitespace only.
pub fn validate_fields(first_name: &str, last_name: &str, email: &str) -> Result<(), Violation> {
    if first_name.trim().is_empty() {
        return Err(Violation::BlankFirstName);
    }
    if last_name.trim().is_empty() {
        return Err(Violation::BlankLastName);
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(Violation::InvalidEmail);
    }
    Ok(())
}

/// Lowercase an email so two addresses can be compared for identity.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Fields for a customer that has not been given an id yet. The manager turns
/// it into a `Customer` when the add succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl NewCustomer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Violation> {
        validate_fields(&self.first_name, &self.last_name, &self.email)
    }
}

/// A stored customer. The id is fixed at creation; the remaining fields are
/// overwritten in place by `CustomerManager::update_customer`.
///
/// Equality between customers is deliberately not derived. Two records refer
/// to the same person when their emails match case-insensitively, which is
/// what `same_email` checks.
#[derive(Debug, Clone)]
pub struct Customer {
    id: u32,
    /// Given name as typed by the user (already trimmed by the form).
    pub first_name: String,
    pub last_name: String,
    /// Deduplication key, compared through `normalize_email`.
    pub email: String,
}

impl Customer {
    pub(crate) fn with_id(id: u32, fields: NewCustomer) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
        }
    }

    /// Sequential identifier assigned by the owning manager, starting at 1.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// `First Last`, the label used in lists and confirmation prompts.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate(&self) -> Result<(), Violation> {
        validate_fields(&self.first_name, &self.last_name, &self.email)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// True when `email` identifies this customer, ignoring case.
    pub fn same_email(&self, email: &str) -> bool {
        normalize_email(&self.email) == normalize_email(email)
    }
}

impl fmt::Display for Customer {
    /// One-line summary, handy for log lines and debugging output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Email: {}",
            self.id,
            self.full_name(),
            self.email
        )
    }
}
