//! OpenSearch descriptor parsing
//!
//! A collection descriptor is an OpenSearch description document. The piece
//! the engine needs is the `template` attribute of the `Url` declaration
//! whose `type` is `application/atom+xml`: a URL with `{name}` placeholders
//! describing how to build a search request.

use super::SearchError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// OpenSearch 1.1 namespace
pub(crate) const OPENSEARCH_NS: &[u8] = b"http://a9.com/-/spec/opensearch/1.1/";

const ATOM_MIME: &[u8] = b"application/atom+xml";

/// Check whether a resolved element namespace matches an expected one
pub(crate) fn ns_is(resolved: &ResolveResult<'_>, expected: &[u8]) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(ns)) if *ns == expected)
}

/// Extract the Atom search template from a descriptor document
///
/// Scans for a `Url` element in the OpenSearch namespace with
/// `type="application/atom+xml"` and returns its `template` attribute.
///
/// # Errors
///
/// [`SearchError::TemplateNotFound`] when no such declaration exists;
/// [`SearchError::DescriptorFetch`] when the document is not well-formed XML.
pub fn extract_template(xml: &str) -> Result<String, SearchError> {
    let mut reader = NsReader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Err(e) => {
                return Err(SearchError::DescriptorFetch(format!(
                    "invalid descriptor XML: {e}"
                )))
            }
            Ok((_, Event::Eof)) => break,
            Ok((ns, Event::Start(element))) | Ok((ns, Event::Empty(element))) => {
                if element.local_name().as_ref() == b"Url"
                    && ns_is(&ns, OPENSEARCH_NS)
                    && attribute_value(&element, b"type")
                        .is_some_and(|t| t.as_bytes() == ATOM_MIME)
                {
                    if let Some(template) = attribute_value(&element, b"template") {
                        return Ok(template);
                    }
                }
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    Err(SearchError::TemplateNotFound)
}

/// Read an attribute as an unescaped string, if present and decodable
pub(crate) fn attribute_value(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}
