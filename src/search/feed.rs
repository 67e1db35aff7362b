//! Atom feed parsing for catalog search responses
//!
//! Search responses are Atom feeds; entries carry the product title, a set
//! of links, and a Dublin Core publication date. Only links whose relation
//! is `enclosure` or `alternate` are kept. A malformed document fails the
//! whole parse; a single undecodable entry is skipped with a warning and
//! does not abort the rest of the feed.

use super::template::{attribute_value, ns_is};
use super::{CandidateProduct, ProductLink, SearchError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::NsReader;
use tracing::warn;

const ATOM_NS: &[u8] = b"http://www.w3.org/2005/Atom";
const DC_NS: &[u8] = b"http://purl.org/dc/elements/1.1/";

/// Link relations retained on candidates
const KEPT_RELATIONS: [&str; 2] = ["enclosure", "alternate"];

/// Text field currently being captured inside an entry
enum Capture {
    Title,
    Date,
}

/// Parse an Atom search response into candidate products
///
/// # Errors
///
/// [`SearchError::FeedParse`] when the document is not well-formed XML. The
/// caller treats that as "no products found" for the current unit; it is
/// never fatal to the run.
pub fn parse_feed(xml: &str) -> Result<Vec<CandidateProduct>, SearchError> {
    let mut reader = NsReader::from_str(xml);
    let mut buf = Vec::new();

    let mut candidates = Vec::new();
    let mut in_entry = false;
    let mut entry_ok = true;
    let mut capture: Option<Capture> = None;
    let mut title = String::new();
    let mut date = String::new();
    let mut links: Vec<ProductLink> = Vec::new();

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Err(e) => return Err(SearchError::FeedParse(e.to_string())),
            Ok((_, Event::Eof)) => break,
            Ok((ns, Event::Start(element))) => {
                let local = element.local_name();
                if ns_is(&ns, ATOM_NS) && local.as_ref() == b"entry" {
                    in_entry = true;
                    entry_ok = true;
                    title.clear();
                    date.clear();
                    links.clear();
                } else if in_entry && ns_is(&ns, ATOM_NS) && local.as_ref() == b"title" {
                    capture = Some(Capture::Title);
                } else if in_entry && ns_is(&ns, DC_NS) && local.as_ref() == b"date" {
                    capture = Some(Capture::Date);
                } else if in_entry && ns_is(&ns, ATOM_NS) && local.as_ref() == b"link" {
                    push_link(&element, &mut links);
                }
            }
            Ok((ns, Event::Empty(element))) => {
                if in_entry && ns_is(&ns, ATOM_NS) && element.local_name().as_ref() == b"link" {
                    push_link(&element, &mut links);
                }
            }
            Ok((_, Event::Text(text))) => {
                if let Some(field) = &capture {
                    match text.unescape() {
                        Ok(value) => match field {
                            Capture::Title => title.push_str(&value),
                            Capture::Date => date.push_str(&value),
                        },
                        Err(e) => {
                            warn!(error = %e, "undecodable text in feed entry, skipping entry");
                            entry_ok = false;
                        }
                    }
                }
            }
            Ok((ns, Event::End(element))) => {
                let local = element.local_name();
                if ns_is(&ns, ATOM_NS) && local.as_ref() == b"entry" {
                    in_entry = false;
                    if entry_ok {
                        candidates.push(CandidateProduct {
                            title: title.trim().to_string(),
                            links: std::mem::take(&mut links),
                            date: date.trim().to_string(),
                        });
                    }
                } else if matches!(capture, Some(Capture::Title))
                    && ns_is(&ns, ATOM_NS)
                    && local.as_ref() == b"title"
                {
                    capture = None;
                } else if matches!(capture, Some(Capture::Date))
                    && ns_is(&ns, DC_NS)
                    && local.as_ref() == b"date"
                {
                    capture = None;
                }
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    Ok(candidates)
}

/// Append a link to the entry if its relation is one the engine keeps
fn push_link(element: &BytesStart<'_>, links: &mut Vec<ProductLink>) {
    let rel = attribute_value(element, b"rel").unwrap_or_default();
    if !KEPT_RELATIONS.contains(&rel.as_str()) {
        return;
    }
    links.push(ProductLink {
        rel,
        href: attribute_value(element, b"href").unwrap_or_default(),
        media_type: attribute_value(element, b"type").unwrap_or_default(),
    });
}
