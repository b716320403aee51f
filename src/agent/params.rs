//! Tracked-parameter extraction
//!
//! Pulls the configured attribution parameters out of a page URL's query
//! string. Absent parameters stay absent (no empty-string defaults), and
//! an empty value counts as absent, matching the shipped SDK's coercion.

use url::Url;

use crate::types::TrackedParams;

/// Extract the tracked parameters present in `url`.
///
/// Only names listed in `tracked` are captured; the first occurrence of a
/// repeated parameter wins. Names outside the event schema have no
/// destination field and are ignored, so a caller-supplied `tracked` set
/// can restrict capture but not extend it.
pub fn extract(url: &Url, tracked: &[String]) -> TrackedParams {
    let mut params = TrackedParams::default();

    for (key, value) in url.query_pairs() {
        if value.is_empty() || !tracked.iter().any(|name| name == key.as_ref()) {
            continue;
        }

        let slot = match key.as_ref() {
            "click_id" => &mut params.click_id,
            "tracking_code" => &mut params.tracking_code,
            "utm_source" => &mut params.utm_source,
            "utm_medium" => &mut params.utm_medium,
            _ => continue,
        };

        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tracked_params;

    fn page(query: &str) -> Url {
        Url::parse(&format!("https://shop.example.com/landing?{query}")).unwrap()
    }

    #[test]
    fn test_extracts_all_tracked_params() {
        let url = page("click_id=c1&tracking_code=AFF&utm_source=fb&utm_medium=cpc");
        let params = extract(&url, &default_tracked_params());

        assert_eq!(params.click_id.as_deref(), Some("c1"));
        assert_eq!(params.tracking_code.as_deref(), Some("AFF"));
        assert_eq!(params.utm_source.as_deref(), Some("fb"));
        assert_eq!(params.utm_medium.as_deref(), Some("cpc"));
    }

    #[test]
    fn test_absent_params_stay_none() {
        let url = page("click_id=c1");
        let params = extract(&url, &default_tracked_params());

        assert_eq!(params.click_id.as_deref(), Some("c1"));
        assert_eq!(params.tracking_code, None);
        assert_eq!(params.utm_source, None);
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let url = page("click_id=&tracking_code=AFF");
        let params = extract(&url, &default_tracked_params());

        assert_eq!(params.click_id, None);
        assert_eq!(params.tracking_code.as_deref(), Some("AFF"));
    }

    #[test]
    fn test_untracked_params_are_ignored() {
        let url = page("click_id=c1&gclid=xyz&ref=partner");
        let params = extract(&url, &default_tracked_params());

        assert_eq!(params.click_id.as_deref(), Some("c1"));
        assert!(params.tracking_code.is_none());
    }

    #[test]
    fn test_restricted_set_disables_capture() {
        let url = page("click_id=c1&utm_source=fb");
        let tracked = vec!["click_id".to_string()];
        let params = extract(&url, &tracked);

        assert_eq!(params.click_id.as_deref(), Some("c1"));
        assert_eq!(params.utm_source, None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let url = page("click_id=first&click_id=second");
        let params = extract(&url, &default_tracked_params());
        assert_eq!(params.click_id.as_deref(), Some("first"));
    }

    #[test]
    fn test_query_decoding() {
        let url = page("click_id=c1&utm_source=summer%20sale");
        let params = extract(&url, &default_tracked_params());
        assert_eq!(params.utm_source.as_deref(), Some("summer sale"));
    }
}
