//! Error types shared by the store and the manager. The front-end converts
//! these into `anyhow` errors so the status line can surface the message.

use thiserror::Error;

/// A position outside the current bounds of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} is out of range (count is {count})")]
pub struct IndexOutOfRange {
    pub index: usize,
    pub count: usize,
}

/// The first rule a customer record breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("first name must not be blank")]
    BlankFirstName,
    #[error("last name must not be blank")]
    BlankLastName,
    #[error("email must contain an '@'")]
    InvalidEmail,
}

/// Failures returned by `CustomerManager`. A duplicate email is not one of
/// them; see `AddOutcome::Duplicate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomerError {
    #[error("customer data is invalid: {0}")]
    Invalid(#[from] Violation),
    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),
}
