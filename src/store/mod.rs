//! Session persistence
//!
//! The session record's only durable home is a single cookie. This module
//! defines the store interface the agent runs against, the jar abstraction
//! underneath it, and the provided in-memory jar so the merge/eviction
//! logic can be exercised without a browser.

pub mod cookie_store;
pub mod jar;

// Re-export commonly used types
pub use cookie_store::CookieStore;
pub use jar::{CookieJar, MemoryJar};

use crate::cookie::CookiePolicy;
use crate::errors::Result;
use crate::types::SessionRecord;

/// Durable, cross-navigation persistence of a [`SessionRecord`].
///
/// Implementations return `Err` on storage and parse faults; callers are
/// expected to log and degrade (missing history must never break the host
/// page), which is why the agent never surfaces these errors.
pub trait SessionStore {
    /// Read and parse the record stored under `name`.
    ///
    /// A missing cookie is `Ok(None)`; a present but unparseable value is
    /// an error so callers can distinguish the fault kind when logging.
    fn read(&self, name: &str) -> Result<Option<SessionRecord>>;

    /// Serialize and persist `record` under `name`
    fn write(&self, name: &str, record: &SessionRecord, policy: &CookiePolicy) -> Result<()>;

    /// Expire the cookie immediately, deleting it on next read
    fn clear(&self, name: &str, domain: Option<&str>) -> Result<()>;
}
