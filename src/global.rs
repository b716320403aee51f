//! Process-wide tracker namespace
//!
//! The embed contract exposes one well-known access point reachable from
//! arbitrary unrelated call sites. This module is its Rust rendering: a
//! lazily constructed shared agent behind free functions mirroring the
//! public SDK surface. For isolated instances (tests, harnesses),
//! construct a [`TrackerAgent`] directly instead.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use url::Url;

use crate::agent::TrackerAgent;
use crate::config::TrackerOptions;
use crate::store::{CookieStore, MemoryJar};
use crate::types::{AttributionEvent, SessionRecord};

type SharedAgent = TrackerAgent<CookieStore<MemoryJar>>;

fn agent() -> &'static Mutex<SharedAgent> {
    static AGENT: OnceLock<Mutex<SharedAgent>> = OnceLock::new();
    AGENT.get_or_init(|| Mutex::new(TrackerAgent::new(CookieStore::new(MemoryJar::new()))))
}

fn lock() -> MutexGuard<'static, SharedAgent> {
    // A poisoned lock still guards a coherent agent; the namespace stays
    // usable rather than propagating the panic to the host
    agent().lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run the capture algorithm on the shared agent
pub fn init(page_url: &Url, options: TrackerOptions) {
    lock().init(page_url, options);
}

/// Click id captured by the last [`init`]
pub fn get_click_id() -> Option<String> {
    lock().click_id().map(str::to_owned)
}

/// Fresh read of the shared session record
pub fn get_session_data() -> Option<SessionRecord> {
    lock().session_data()
}

/// Most recent touchpoint in the shared session
pub fn get_last_tracker() -> Option<AttributionEvent> {
    lock().last_tracker()
}

/// All touchpoints in the shared session, oldest first
pub fn get_all_trackers() -> Vec<AttributionEvent> {
    lock().all_trackers()
}

/// Expire the shared session cookie immediately
pub fn clear_session() {
    lock().clear_session();
}
