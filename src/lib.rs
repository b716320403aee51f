//! HanamiTracker attribution core
//!
//! Captures click/UTM attribution parameters from a page URL, persists a
//! bounded ordered history of attribution events in a single cookie
//! across page loads and subdomains, and exposes a stable query surface
//! that conversion reporting depends on.
//!
//! # Architecture
//!
//! - **Session Store**: cookie-backed persistence of the session record
//!   (percent-encoded JSON, expiry, domain scoping)
//! - **Tracker Agent**: the per-page-load `init` merge algorithm plus the
//!   read-only query surface
//! - **Global namespace**: the shared process-wide agent the embed
//!   contract exposes

pub mod agent;
pub mod config;
pub mod conversion;
pub mod cookie;
pub mod errors;
pub mod global;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use agent::TrackerAgent;
pub use config::{OnTrack, TrackerConfig, TrackerOptions};
pub use conversion::{ConversionReport, Currency};
pub use cookie::CookiePolicy;
pub use errors::{Result, TrackerError};
pub use store::{CookieJar, CookieStore, MemoryJar, SessionStore};
pub use types::{AttributionEvent, SessionRecord, TrackedParams};
