//! Core library surface for the customer manager.
//!
//! The manager and its store carry all the rules (validation, duplicate-email
//! rejection, id assignment, change notifications). The `ui` module is a thin
//! terminal client on top of that API, and `config` holds the binary's
//! command-line options and log setup.
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod store;
pub mod ui;

pub use error::{CustomerError, IndexOutOfRange, Violation};

pub use manager::{AddOutcome, CustomerEvent, CustomerManager, CustomerObserver};
pub use models::{Customer, NewCustomer};
pub use store::CustomerCollection;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
