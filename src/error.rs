//! Error types shared by the flows and the application controller.

use thiserror::Error;

/// Anticipated, user-facing failures of a submit-like action.
///
/// Every variant aborts the action before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// One or more required fields were empty.
    #[error("Please fill in all required fields")]
    MissingFields {
        /// Labels of the empty fields, in form order.
        fields: Vec<&'static str>,
    },

    /// A field held a value of the wrong shape.
    #[error("{field} must be {expected}, got \"{value}\"")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The same submit is already waiting on its simulated round trip.
    #[error("{0} is already in progress")]
    InProgress(&'static str),

    /// The action can only happen once and already has.
    #[error("{0} has already been completed")]
    Completed(&'static str),
}

/// Failure of the local key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store file is not a JSON object")]
    NotAnObject,
}

/// Failure to write to the clipboard.
#[derive(Debug, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Any failure that can reach the application controller.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;
