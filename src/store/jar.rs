//! Cookie jar abstraction
//!
//! [`CookieJar`] models the ambient per-page cookie string store (the
//! `document.cookie` equivalent): values are read back by name, writes go
//! through full set-cookie strings. [`MemoryJar`] is the provided backend
//! for test harnesses and server-side shadows.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::cookie;
use crate::errors::{Result, TrackerError};

/// Raw cookie storage shared by every script on the page
pub trait CookieJar {
    /// The raw (still percent-encoded) value stored under `name`
    fn get(&self, name: &str) -> Option<String>;

    /// Apply one set-cookie string. An already-expired `expires`
    /// attribute deletes the entry, as a browser would.
    fn set(&self, header: &str) -> Result<()>;
}

/// In-memory [`CookieJar`] with browser-like set semantics.
///
/// Clones share state, so a harness can keep a handle for inspection
/// while the agent's store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryJar {
    inner: Arc<Mutex<JarState>>,
}

#[derive(Debug, Default)]
struct JarState {
    cookies: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a blocked cookie store (cookies disabled, policy denial).
    /// Subsequent writes fail; reads still serve existing values.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Raw stored value under `name`, for direct inspection
    pub fn raw(&self, name: &str) -> Option<String> {
        self.state().cookies.get(name).cloned()
    }

    /// Store a raw value directly, bypassing set-cookie parsing. Models an
    /// unrelated script (or manual tampering) writing the same cookie.
    pub fn seed_raw(&self, name: &str, value: &str) {
        self.state()
            .cookies
            .insert(name.to_string(), value.to_string());
    }

    /// Number of cookies currently stored
    pub fn len(&self) -> usize {
        self.state().cookies.len()
    }

    /// True when the jar holds no cookies
    pub fn is_empty(&self) -> bool {
        self.state().cookies.is_empty()
    }

    fn state(&self) -> MutexGuard<'_, JarState> {
        // A poisoned jar still holds coherent string data
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieJar for MemoryJar {
    fn get(&self, name: &str) -> Option<String> {
        self.state().cookies.get(name).cloned()
    }

    fn set(&self, header: &str) -> Result<()> {
        let (name, value, expired) = parse_set_cookie(header)?;

        let mut state = self.state();
        if state.fail_writes {
            return Err(TrackerError::WriteBlocked {
                name,
                reason: "cookie store is disabled".to_string(),
            });
        }

        if expired {
            state.cookies.remove(&name);
        } else {
            state.cookies.insert(name, value);
        }
        Ok(())
    }
}

/// Split a set-cookie string into name, value, and whether its `expires`
/// attribute already lies in the past.
fn parse_set_cookie(header: &str) -> Result<(String, String, bool)> {
    let mut parts = header.split(';');
    let pair = parts.next().unwrap_or_default();
    let Some((name, value)) = pair.split_once('=') else {
        return Err(TrackerError::WriteBlocked {
            name: pair.to_string(),
            reason: "malformed set-cookie string".to_string(),
        });
    };

    let mut expired = false;
    for attr in parts {
        if let Some((key, attr_value)) = attr.trim().split_once('=') {
            if key.eq_ignore_ascii_case("expires") {
                if let Some(at) = cookie::parse_expires(attr_value) {
                    expired = at <= Utc::now();
                }
            }
        }
    }

    Ok((name.trim().to_string(), value.to_string(), expired))
}
