//! Utility functions for maib operations.
//!
//! URL construction for endpoint paths and optional trailing entity ids.

use crate::errors::Result;
use url::Url;

/// Parses a base URL, making sure it ends with `/` so endpoint paths join
/// below it rather than replacing its last segment.
///
/// # Examples
///
/// ```
/// use maib_rs::utils::parse_base_url;
///
/// let base = parse_base_url("https://api.maibmerchants.md/v1").unwrap();
/// assert_eq!(base.as_str(), "https://api.maibmerchants.md/v1/");
/// ```
pub fn parse_base_url(base: &str) -> Result<Url> {
    if base.ends_with('/') {
        Ok(Url::parse(base)?)
    } else {
        Ok(Url::parse(&format!("{}/", base))?)
    }
}

/// Builds the full URL of an endpoint, with an optional entity id segment.
///
/// # Examples
///
/// ```
/// use maib_rs::utils::{build_url, parse_base_url};
///
/// let base = parse_base_url("https://api.maibmerchants.md/v1/").unwrap();
/// let url = build_url(&base, "pay-info", Some("f16a9006")).unwrap();
/// assert_eq!(url.as_str(), "https://api.maibmerchants.md/v1/pay-info/f16a9006");
///
/// let url = build_url(&base, "pay", None).unwrap();
/// assert_eq!(url.as_str(), "https://api.maibmerchants.md/v1/pay");
/// ```
pub fn build_url(base: &Url, endpoint: &str, entity_id: Option<&str>) -> Result<Url> {
    let mut url = base.join(endpoint)?;

    if let Some(id) = entity_id.filter(|id| !id.is_empty()) {
        // push_segment percent-encodes the id so it cannot alter the path
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
    }

    Ok(url)
}
