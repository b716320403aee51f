//! Cookie-backed session store
//!
//! Serializes the session record to percent-encoded JSON and persists it
//! through a [`CookieJar`]. Parsing is defensive: the cookie is shared
//! storage and other writers are tolerated, not trusted.

use log::{debug, warn};

use crate::cookie::{self, CookiePolicy, MAX_COOKIE_BYTES};
use crate::errors::{Result, TrackerError};
use crate::store::{CookieJar, SessionStore};
use crate::types::SessionRecord;

/// [`SessionStore`] implementation over any cookie jar
#[derive(Debug, Clone)]
pub struct CookieStore<J: CookieJar> {
    jar: J,
}

impl<J: CookieJar> CookieStore<J> {
    pub fn new(jar: J) -> Self {
        Self { jar }
    }

    /// The backing jar
    pub fn jar(&self) -> &J {
        &self.jar
    }
}

impl<J: CookieJar> SessionStore for CookieStore<J> {
    fn read(&self, name: &str) -> Result<Option<SessionRecord>> {
        let Some(encoded) = self.jar.get(name) else {
            return Ok(None);
        };

        let raw = cookie::decode_value(&encoded).ok_or_else(|| TrackerError::MalformedEncoding {
            name: name.to_string(),
        })?;

        let record =
            serde_json::from_str(&raw).map_err(|source| TrackerError::MalformedSession {
                name: name.to_string(),
                source,
            })?;

        Ok(Some(record))
    }

    fn write(&self, name: &str, record: &SessionRecord, policy: &CookiePolicy) -> Result<()> {
        let raw = serde_json::to_string(record)?;
        let header = cookie::session_header(name, &raw, policy);

        if header.len() > MAX_COOKIE_BYTES {
            warn!(
                "tracking cookie {name} is {} bytes, past the {MAX_COOKIE_BYTES} byte limit; \
                 the user agent may drop it",
                header.len()
            );
        }

        self.jar.set(&header)?;
        debug!("cookie set: {name} ({} trackers)", record.len());
        Ok(())
    }

    fn clear(&self, name: &str, domain: Option<&str>) -> Result<()> {
        self.jar.set(&cookie::removal_header(name, domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryJar;
    use crate::types::TrackedParams;
    use chrono::Utc;

    fn store() -> CookieStore<MemoryJar> {
        CookieStore::new(MemoryJar::new())
    }

    fn sample_record() -> SessionRecord {
        let mut record = SessionRecord::new();
        record.upsert(
            &TrackedParams {
                click_id: Some("c-1".to_string()),
                tracking_code: Some("AFF42".to_string()),
                ..TrackedParams::default()
            },
            Utc::now(),
        );
        record
    }

    #[test]
    fn test_read_missing_cookie_is_none() {
        assert!(store().read("session").unwrap().is_none());
    }

    #[test]
    fn test_write_read_round_trip() {
        let store = store();
        let record = sample_record();
        let policy = CookiePolicy::new(30, None, true);

        store.write("session", &record, &policy).unwrap();
        let loaded = store.read("session").unwrap().unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_stored_value_is_percent_encoded() {
        let store = store();
        let policy = CookiePolicy::new(30, None, true);
        store.write("session", &sample_record(), &policy).unwrap();

        let raw = store.jar().raw("session").unwrap();
        assert!(!raw.contains('{'));
        assert!(raw.starts_with("%7B"));
    }

    #[test]
    fn test_read_garbage_is_a_parse_fault() {
        let store = store();
        store.jar().seed_raw("session", "%7Bnot-json");

        let err = store.read("session").unwrap_err();
        assert!(matches!(err, TrackerError::MalformedSession { .. }));
    }

    #[test]
    fn test_read_bad_encoding_is_a_parse_fault() {
        let store = store();
        store.jar().seed_raw("session", "%FF%FE");

        let err = store.read("session").unwrap_err();
        assert!(matches!(err, TrackerError::MalformedEncoding { .. }));
    }

    #[test]
    fn test_clear_removes_the_cookie() {
        let store = store();
        let policy = CookiePolicy::new(30, None, true);
        store.write("session", &sample_record(), &policy).unwrap();

        store.clear("session", None).unwrap();

        assert!(store.read("session").unwrap().is_none());
        assert!(store.jar().is_empty());
    }

    #[test]
    fn test_blocked_write_surfaces_storage_fault() {
        let store = store();
        store.jar().set_fail_writes(true);

        let policy = CookiePolicy::new(30, None, true);
        let err = store.write("session", &sample_record(), &policy).unwrap_err();

        assert!(matches!(err, TrackerError::WriteBlocked { .. }));
    }
}
