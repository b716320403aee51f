//! Attribution data model
//!
//! One attribution event per acquisition touchpoint, collected into a
//! bounded, chronologically ordered session record. The serialized field
//! names are the cookie wire format consumed by the conversion backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded acquisition touchpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionEvent {
    /// Unique identifier correlating a click to a downstream conversion;
    /// also the dedup/merge key within a session record
    pub click_id: String,
    /// Affiliate/partner code
    pub tracking_code: Option<String>,
    /// Campaign provenance tag
    pub utm_source: Option<String>,
    /// Campaign provenance tag
    pub utm_medium: Option<String>,
    /// Capture time, set at merge time, never caller-supplied
    pub timestamp: DateTime<Utc>,
}

impl AttributionEvent {
    /// Build a fresh event from extracted URL parameters.
    ///
    /// Returns `None` when the extraction carried no `click_id`.
    pub fn from_params(params: &TrackedParams, timestamp: DateTime<Utc>) -> Option<Self> {
        let click_id = params.click_id.clone()?;
        Some(Self {
            click_id,
            tracking_code: params.tracking_code.clone(),
            utm_source: params.utm_source.clone(),
            utm_medium: params.utm_medium.clone(),
            timestamp,
        })
    }

    /// Field-wise merge: parameters present in the URL overwrite, absent
    /// parameters keep the prior capture. The timestamp always refreshes.
    pub fn merge_params(&mut self, params: &TrackedParams, timestamp: DateTime<Utc>) {
        if let Some(code) = &params.tracking_code {
            self.tracking_code = Some(code.clone());
        }
        if let Some(source) = &params.utm_source {
            self.utm_source = Some(source.clone());
        }
        if let Some(medium) = &params.utm_medium {
            self.utm_medium = Some(medium.clone());
        }
        self.timestamp = timestamp;
    }
}

/// Tracked parameters extracted from a page URL.
///
/// Every field is optional: a query parameter absent from the URL is `None`
/// here, never an empty string. An empty `click_id` means the visit carries
/// no attribution and the agent takes its read-only path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedParams {
    pub click_id: Option<String>,
    pub tracking_code: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
}

impl TrackedParams {
    /// True when no tracked parameter was present in the URL
    pub fn is_empty(&self) -> bool {
        self.click_id.is_none()
            && self.tracking_code.is_none()
            && self.utm_source.is_none()
            && self.utm_medium.is_none()
    }
}

/// The persisted unit: a bounded ordered history of attribution events.
///
/// Insertion order is chronological (oldest first, newest last); callers
/// read the last entry as the most recent touchpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// At most `max_trackers` events, oldest evicted first
    #[serde(default)]
    pub trackers: Vec<AttributionEvent>,
}

impl SessionRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update the event keyed by the extraction's `click_id`.
    ///
    /// An existing entry with the same `click_id` is merged in place
    /// (see [`AttributionEvent::merge_params`]); otherwise a new entry is
    /// appended at the end. Returns a clone of the resulting event, or
    /// `None` when the extraction carried no `click_id`.
    pub fn upsert(
        &mut self,
        params: &TrackedParams,
        timestamp: DateTime<Utc>,
    ) -> Option<AttributionEvent> {
        let click_id = params.click_id.as_deref()?;

        if let Some(existing) = self
            .trackers
            .iter_mut()
            .find(|tracker| tracker.click_id == click_id)
        {
            existing.merge_params(params, timestamp);
            return Some(existing.clone());
        }

        let event = AttributionEvent::from_params(params, timestamp)?;
        self.trackers.push(event.clone());
        Some(event)
    }

    /// Evict the oldest entries until at most `max` remain
    pub fn evict_to(&mut self, max: usize) {
        while self.trackers.len() > max {
            self.trackers.remove(0);
        }
    }

    /// The most recent touchpoint
    pub fn last(&self) -> Option<&AttributionEvent> {
        self.trackers.last()
    }

    /// Number of recorded touchpoints
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// True when no touchpoint has been recorded
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(click_id: &str) -> TrackedParams {
        TrackedParams {
            click_id: Some(click_id.to_string()),
            ..TrackedParams::default()
        }
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_upsert_appends_new_click_ids() {
        let mut record = SessionRecord::new();

        record.upsert(&params("a"), ts(1)).unwrap();
        record.upsert(&params("b"), ts(2)).unwrap();

        assert_eq!(record.len(), 2);
        assert_eq!(record.trackers[0].click_id, "a");
        assert_eq!(record.trackers[1].click_id, "b");
    }

    #[test]
    fn test_upsert_merges_duplicate_click_id_in_place() {
        let mut record = SessionRecord::new();

        record.upsert(
            &TrackedParams {
                click_id: Some("a".to_string()),
                tracking_code: Some("T1".to_string()),
                ..TrackedParams::default()
            },
            ts(1),
        );
        record.upsert(&params("b"), ts(2));

        // Re-visit "a" with only a utm_source
        let merged = record
            .upsert(
                &TrackedParams {
                    click_id: Some("a".to_string()),
                    utm_source: Some("facebook".to_string()),
                    ..TrackedParams::default()
                },
                ts(3),
            )
            .unwrap();

        assert_eq!(record.len(), 2);
        // Position is preserved, prior fields survive, new fields overwrite
        assert_eq!(record.trackers[0].click_id, "a");
        assert_eq!(merged.tracking_code.as_deref(), Some("T1"));
        assert_eq!(merged.utm_source.as_deref(), Some("facebook"));
        assert_eq!(merged.utm_medium, None);
        assert_eq!(merged.timestamp, ts(3));
    }

    #[test]
    fn test_upsert_without_click_id_is_a_no_op() {
        let mut record = SessionRecord::new();

        let result = record.upsert(
            &TrackedParams {
                utm_source: Some("newsletter".to_string()),
                ..TrackedParams::default()
            },
            ts(1),
        );

        assert!(result.is_none());
        assert!(record.is_empty());
    }

    #[test]
    fn test_fifo_eviction_drops_oldest() {
        let mut record = SessionRecord::new();

        for (i, id) in ["1", "2", "3", "4"].iter().enumerate() {
            record.upsert(&params(id), ts(i as i64));
            record.evict_to(3);
        }

        assert_eq!(record.len(), 3);
        assert_eq!(record.trackers[0].click_id, "2");
        assert_eq!(record.last().unwrap().click_id, "4");
    }

    #[test]
    fn test_wire_format_field_names() {
        let mut record = SessionRecord::new();
        record.upsert(
            &TrackedParams {
                click_id: Some("c-1".to_string()),
                tracking_code: Some("AFF42".to_string()),
                ..TrackedParams::default()
            },
            ts(0),
        );

        let json = serde_json::to_value(&record).unwrap();
        let tracker = &json["trackers"][0];
        assert_eq!(tracker["click_id"], "c-1");
        assert_eq!(tracker["tracking_code"], "AFF42");
        assert!(tracker["utm_source"].is_null());
        assert!(tracker["utm_medium"].is_null());
        assert_eq!(tracker["timestamp"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_deserialize_tolerates_foreign_fields() {
        // A server-side writer stores a session_id next to the trackers;
        // the record must still parse.
        let json = r#"{"session_id":"abc","trackers":[]}"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_empty());

        let bare: SessionRecord = serde_json::from_str("{}").unwrap();
        assert!(bare.is_empty());
    }
}
