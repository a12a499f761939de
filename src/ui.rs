//! Ratatui front-end for the customer manager. It plays the part of the
//! window the user types into: a list of customers, an add/update form, a
//! delete confirmation, and a status line. Every change goes through
//! `CustomerManager`; the status line is driven by the manager's
//! notifications rather than by the form itself.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
