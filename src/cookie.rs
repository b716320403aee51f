//! Cookie wire format
//!
//! Builds and decodes the single tracking cookie: a percent-encoded JSON
//! value with an `expires` window, `path=/`, optional `domain` scoping,
//! and transport-sensitive `Secure`/`SameSite` attributes.

use chrono::{DateTime, Duration, Utc};
use log::warn;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left un-encoded in the cookie value, matching
/// `encodeURIComponent`. Everything else (including `;`, `=`, `,` and
/// whitespace) is escaped so the serialized JSON survives attribute
/// splitting intact.
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Cookie payloads past this size risk rejection or truncation by the
/// user agent; the tracker bound exists to stay under it
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Attribute context for one cookie write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Expiry window, `expires = now + days`
    pub days: u32,
    /// Explicit domain for cross-subdomain sharing
    pub domain: Option<String>,
    /// True when the page is served over a secure transport; selects
    /// `Secure; SameSite=None` instead of the `SameSite=Lax` fallback
    pub secure: bool,
}

impl CookiePolicy {
    pub fn new(days: u32, domain: Option<String>, secure: bool) -> Self {
        Self {
            days,
            domain,
            secure,
        }
    }
}

/// Percent-encode a serialized record for use as a cookie value
pub fn encode_value(raw: &str) -> String {
    utf8_percent_encode(raw, COOKIE_VALUE).to_string()
}

/// Decode a raw cookie value back to its serialized form.
///
/// Returns `None` when the value is not valid percent-encoded UTF-8.
pub fn decode_value(encoded: &str) -> Option<String> {
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(|value| value.into_owned())
}

/// Format an `expires` attribute value (RFC 1123, always GMT)
pub fn format_expires(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an `expires` attribute value as emitted by [`format_expires`]
pub fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Build the set-cookie string persisting `raw_value` under `name`.
///
/// `raw_value` is the serialized (not yet encoded) record JSON.
pub fn session_header(name: &str, raw_value: &str, policy: &CookiePolicy) -> String {
    let expires = Utc::now() + Duration::days(i64::from(policy.days));
    build_header(
        name,
        &encode_value(raw_value),
        expires,
        policy.domain.as_deref(),
        Some(policy.secure),
    )
}

/// Build the set-cookie string deleting `name`: an empty value with an
/// already-expired `expires` (epoch 0) under the same domain scope.
pub fn removal_header(name: &str, domain: Option<&str>) -> String {
    build_header(name, "", DateTime::<Utc>::UNIX_EPOCH, domain, None)
}

fn build_header(
    name: &str,
    encoded_value: &str,
    expires: DateTime<Utc>,
    domain: Option<&str>,
    secure: Option<bool>,
) -> String {
    let mut header = format!(
        "{}={}; expires={}; path=/",
        name,
        encoded_value,
        format_expires(expires)
    );

    if let Some(domain) = domain {
        if !domain.starts_with('.') {
            warn!(
                "cookie domain {domain:?} has no leading dot; subdomains will not share the session"
            );
        }
        header.push_str("; domain=");
        header.push_str(domain);
    }

    match secure {
        // Browsers only send the cookie in cross-site redirect chains when
        // it is Secure + SameSite=None
        Some(true) => header.push_str("; Secure; SameSite=None"),
        // Secure cookies are rejected over plain HTTP; fall back to Lax
        Some(false) => header.push_str("; SameSite=Lax"),
        None => {}
    }

    header
}
