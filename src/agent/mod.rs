//! Tracker agent
//!
//! Single entry point (`init`) run once per page load, plus a read-only
//! query surface. Every public method here is total: faults are logged
//! and absorbed, because an embedded tracking snippet must never break
//! the page that hosts it.

pub mod params;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use log::{debug, error, warn};
use url::Url;

use crate::config::{OnTrack, TrackerConfig, TrackerOptions};
use crate::cookie::CookiePolicy;
use crate::errors::TrackerError;
use crate::store::SessionStore;
use crate::types::{AttributionEvent, SessionRecord};

/// The attribution tracker: owns read-modify-write access to the session
/// record and the in-memory click id captured by the last `init`.
///
/// Construct isolated instances over any [`SessionStore`] for testing;
/// the [`crate::global`] facade holds the shared process-wide one.
pub struct TrackerAgent<S: SessionStore> {
    store: S,
    config: TrackerConfig,
    on_track: Option<OnTrack>,
    click_id: Option<String>,
}

impl<S: SessionStore> TrackerAgent<S> {
    /// Agent with default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, TrackerConfig::default())
    }

    /// Agent with an explicit starting configuration
    pub fn with_config(store: S, config: TrackerConfig) -> Self {
        Self {
            store,
            config,
            on_track: None,
            click_id: None,
        }
    }

    /// Effective configuration after all applied options
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// The backing session store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the page-load capture algorithm.
    ///
    /// Merges `options` over the current configuration, extracts the
    /// tracked parameters from `page_url`, and either upserts a touchpoint
    /// and persists the record (URL carried a `click_id`) or adopts the
    /// most recent persisted touchpoint read-only. Re-running is allowed
    /// and merges further; the agent is returned for chaining.
    pub fn init(&mut self, page_url: &Url, mut options: TrackerOptions) -> &mut Self {
        if let Some(hook) = options.on_track.take() {
            self.on_track = Some(hook);
        }
        self.config.apply(options);

        if self.config.debug {
            debug!("init on {page_url} with {:?}", self.config);
        }

        let extracted = params::extract(page_url, &self.config.tracked_params);
        let mut record = self.load_record();

        // upsert yields the merged touchpoint only when the URL carried a
        // click_id; otherwise the visit is attribution-free and read-only
        match record.upsert(&extracted, Utc::now()) {
            Some(event) => {
                record.evict_to(self.config.max_trackers);

                let policy = CookiePolicy::new(
                    self.config.cookie_days,
                    self.config.cookie_domain.clone(),
                    page_is_secure(page_url),
                );
                if let Err(err) = self.store.write(&self.config.cookie_name, &record, &policy) {
                    error!("failed to persist tracking session: {err}");
                }

                self.click_id = Some(event.click_id.clone());
                self.dispatch_on_track(&event);
            }
            None => {
                if let Some(last) = record.last().cloned() {
                    if self.config.debug {
                        debug!("found tracking data in cookie: {}", last.click_id);
                    }
                    self.click_id = Some(last.click_id.clone());
                    self.dispatch_on_track(&last);
                }
            }
        }

        self
    }

    /// Fresh read of the persisted record; reflects external cookie
    /// modification, `None` when absent or unreadable
    pub fn session_data(&self) -> Option<SessionRecord> {
        match self.store.read(&self.config.cookie_name) {
            Ok(record) => record,
            Err(err) => {
                warn!("discarding unreadable tracking session: {err}");
                None
            }
        }
    }

    /// Click id captured by the last `init`; `None` before the first
    /// `init` or when no touchpoint could be resolved
    pub fn click_id(&self) -> Option<&str> {
        self.click_id.as_deref()
    }

    /// Most recent persisted touchpoint
    pub fn last_tracker(&self) -> Option<AttributionEvent> {
        self.session_data()
            .and_then(|record| record.last().cloned())
    }

    /// All persisted touchpoints in chronological order; empty (never an
    /// error) when no session exists
    pub fn all_trackers(&self) -> Vec<AttributionEvent> {
        self.session_data()
            .map(|record| record.trackers)
            .unwrap_or_default()
    }

    /// Expire the session cookie immediately
    pub fn clear_session(&self) {
        if let Err(err) = self
            .store
            .clear(&self.config.cookie_name, self.config.cookie_domain.as_deref())
        {
            error!("failed to clear tracking session: {err}");
        }
    }

    fn load_record(&self) -> SessionRecord {
        match self.store.read(&self.config.cookie_name) {
            Ok(Some(record)) => record,
            Ok(None) => SessionRecord::new(),
            Err(err) => {
                // Corrupted history must not stop capture
                warn!("discarding unreadable tracking session: {err}");
                SessionRecord::new()
            }
        }
    }

    fn dispatch_on_track(&mut self, event: &AttributionEvent) {
        let Some(hook) = self.on_track.as_mut() else {
            return;
        };

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| hook(event))) {
            let err = TrackerError::CallbackPanicked(panic_message(payload.as_ref()));
            error!("{err}");
        }
    }
}

fn page_is_secure(url: &Url) -> bool {
    url.scheme() == "https"
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
