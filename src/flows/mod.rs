//! Simulated submit flows: vote launch, DR events, drafts, clipboard and toasts.
//!
//! None of these reach a backend. Submits validate their required fields,
//! then complete after a fixed delay driven by the application's timer queue.

pub mod clipboard;
/// Demand-response event form and actions.
pub mod dr;
pub mod notify;
/// Local key-value persistence.
pub mod store;
pub mod vote;

/// Error toast shown for any missing-field failure.
pub const MSG_MISSING_FIELDS: &str = "Please fill in all required fields";
