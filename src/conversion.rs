//! Conversion-report payload contract
//!
//! The shape handed to the external Conversion API. Attribution weighting
//! (U-shaped/position-based) happens on the backend; this module only
//! guarantees the submission satisfies its preconditions: a non-empty
//! ordered tracker list, a positive amount, and a supported currency.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, TrackerError};
use crate::types::{AttributionEvent, SessionRecord};

/// Supported ISO 4217 currency codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Inr,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "USD" => Ok(Currency::Usd),
            "INR" => Ok(Currency::Inr),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            other => Err(TrackerError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// One conversion submission: the session's ordered attribution path plus
/// the monetary outcome to distribute across it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Application-level session identifier (not the cookie)
    pub session_id: String,
    /// Ordered touchpoints, oldest first; the backend weights first and
    /// last most heavily
    pub trackers: Vec<AttributionEvent>,
    /// Monetary amount, strictly positive
    pub amount: f64,
    /// ISO 4217 code from the supported subset
    pub currency: Currency,
}

impl ConversionReport {
    /// Build a report from a captured session.
    ///
    /// Generates a v4 UUID session id when the application does not
    /// supply one. Fails on an empty attribution path or a non-positive
    /// amount; nothing downstream can attribute either.
    pub fn from_session(
        session_id: Option<String>,
        record: &SessionRecord,
        amount: f64,
        currency: Currency,
    ) -> Result<Self> {
        if record.is_empty() {
            return Err(TrackerError::EmptyTrackers);
        }
        if amount <= 0.0 {
            return Err(TrackerError::NonPositiveAmount { amount });
        }

        Ok(Self {
            session_id: session_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            trackers: record.trackers.clone(),
            amount,
            currency,
        })
    }
}
