//! Search URL construction from the collection template
//!
//! Templates declare `{name}` placeholders. Every parameter the engine
//! resolves is substituted; placeholders the engine does not supply (the
//! template may declare optional parameters) are stripped rather than
//! treated as an error.

use crate::catalog::ProductCode;
use crate::timewindow::SearchWindow;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

/// Search page size requested from the catalog
pub const MAX_SEARCH_RECORDS: u32 = 100;

/// Matches any placeholder left unresolved after substitution
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("placeholder pattern is valid"));

/// Render a window bound in the catalog's timestamp format
pub fn format_search_timestamp(timestamp: NaiveDateTime) -> String {
    format!("{}.000Z", timestamp.format("%Y-%m-%dT%H:%M:%S"))
}

/// Substitute resolved parameters into the search template
///
/// Parameters: `productType` (the product's catalog search token),
/// `startDate`/`endDate` from the window, `maximumRecords`, and
/// `orbitNumber` when the window carries an orbit filter. Unresolved
/// placeholders are removed from the result.
pub fn build_search_url(template: &str, product: &ProductCode, window: &SearchWindow) -> String {
    let mut params: Vec<(&str, String)> = vec![
        ("productType", product.search_code().to_string()),
        ("startDate", format_search_timestamp(window.start)),
        ("endDate", format_search_timestamp(window.end)),
        ("maximumRecords", MAX_SEARCH_RECORDS.to_string()),
    ];
    if let Some(orbit) = window.orbit {
        params.push(("orbitNumber", orbit.to_string()));
    }

    let mut url = template.to_string();
    for (name, value) in &params {
        let placeholder = format!("{{{name}}}");
        if url.contains(&placeholder) {
            url = url.replace(&placeholder, value);
        }
    }

    PLACEHOLDER.replace_all(&url, "").into_owned()
}
