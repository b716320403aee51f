//! Tracker configuration
//!
//! Defaults mirror the shipped SDK snippet; `TrackerOptions` is the
//! caller-facing override set applied on every `init`, where unset fields
//! keep their current values (a full merge, not a replacement).

use std::fmt;

use crate::types::AttributionEvent;

/// Cookie holding the serialized session record
pub const DEFAULT_COOKIE_NAME: &str = "hanami_tracking_session";

/// Cookie lifetime in days
pub const DEFAULT_COOKIE_DAYS: u32 = 30;

/// Upper bound on trackers kept per session (cookie size guard)
pub const DEFAULT_MAX_TRACKERS: usize = 10;

/// Side-effecting integration hook invoked with the current touchpoint
pub type OnTrack = Box<dyn FnMut(&AttributionEvent) + Send>;

/// Query parameters captured from the page URL by default
pub fn default_tracked_params() -> Vec<String> {
    ["tracking_code", "utm_source", "utm_medium", "click_id"]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Effective agent configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Name of the session cookie
    pub cookie_name: String,
    /// Query parameter names captured from the URL
    pub tracked_params: Vec<String>,
    /// Cookie expiry window in days
    pub cookie_days: u32,
    /// Bound on the session record, oldest evicted first
    pub max_trackers: usize,
    /// Explicit cookie domain for cross-subdomain sharing; `None` scopes
    /// the cookie to the current origin
    pub cookie_domain: Option<String>,
    /// Gates the verbose per-init traces
    pub debug: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            tracked_params: default_tracked_params(),
            cookie_days: DEFAULT_COOKIE_DAYS,
            max_trackers: DEFAULT_MAX_TRACKERS,
            cookie_domain: None,
            debug: false,
        }
    }
}

impl TrackerConfig {
    /// Overlay the provided options; fields left unset keep their
    /// current values. The `on_track` hook is owned by the agent and is
    /// taken out of the options before they reach this merge.
    pub fn apply(&mut self, options: TrackerOptions) {
        if let Some(name) = options.cookie_name {
            self.cookie_name = name;
        }
        if let Some(params) = options.tracked_params {
            self.tracked_params = params;
        }
        if let Some(days) = options.cookie_days {
            self.cookie_days = days;
        }
        if let Some(max) = options.max_trackers {
            self.max_trackers = max;
        }
        if let Some(domain) = options.cookie_domain {
            self.cookie_domain = Some(domain);
        }
        if let Some(debug) = options.debug {
            self.debug = debug;
        }
    }
}

/// Per-`init` overrides; every field is optional
#[derive(Default)]
pub struct TrackerOptions {
    pub cookie_name: Option<String>,
    pub tracked_params: Option<Vec<String>>,
    pub cookie_days: Option<u32>,
    pub max_trackers: Option<usize>,
    pub cookie_domain: Option<String>,
    pub debug: Option<bool>,
    /// Invoked with the new or merged touchpoint; panics are isolated
    pub on_track: Option<OnTrack>,
}

impl fmt::Debug for TrackerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerOptions")
            .field("cookie_name", &self.cookie_name)
            .field("tracked_params", &self.tracked_params)
            .field("cookie_days", &self.cookie_days)
            .field("max_trackers", &self.max_trackers)
            .field("cookie_domain", &self.cookie_domain)
            .field("debug", &self.debug)
            .field("on_track", &self.on_track.as_ref().map(|_| "<callback>"))
            .finish()
    }
}
