//! Error types for the tracking core
//!
//! Internal APIs return `Result` so callers can distinguish fault kinds
//! for logging; nothing here escapes the public agent surface.

use thiserror::Error;

/// Main error type for the attribution tracking core
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Storage faults: the backing cookie store refused the write
    #[error("Cookie write rejected for {name}: {reason}")]
    WriteBlocked { name: String, reason: String },

    /// Parse faults: the cookie value is not valid percent-encoded UTF-8
    #[error("Cookie {name} is not valid percent-encoded UTF-8")]
    MalformedEncoding { name: String },

    /// Parse faults: the decoded cookie value is not session JSON
    #[error("Cookie {name} does not contain valid session JSON: {source}")]
    MalformedSession {
        name: String,
        source: serde_json::Error,
    },

    /// Serialization errors
    #[error("Session serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Callback faults: the on_track hook panicked
    #[error("on_track callback panicked: {0}")]
    CallbackPanicked(String),

    /// Conversion reports need a non-empty attribution path
    #[error("Conversion report requires at least one tracker")]
    EmptyTrackers,

    /// Conversion amounts must be strictly positive
    #[error("Conversion amount must be positive, got {amount}")]
    NonPositiveAmount { amount: f64 },

    /// Currency code outside the supported ISO 4217 subset
    #[error("Unsupported currency code: {0}")]
    UnsupportedCurrency(String),
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
