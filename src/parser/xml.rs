//! Small quick-xml helpers shared by the XML-based readers

use crate::error::DecodeError;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, BytesText};
use std::collections::HashMap;

/// Default buffer capacity for XML parsing (4KB)
pub(crate) const XML_BUFFER_CAPACITY: usize = 4096;

/// Collect all attributes of an element into a map keyed by their local name
///
/// Slicer metadata is written with and without namespace prefixes
/// (`slic3rpe:` in attribute values, `p:` on attribute names), so prefixes are
/// dropped from keys here. Values are unescaped.
pub(crate) fn parse_attributes(
    e: &BytesStart,
    decoder: Decoder,
) -> Result<HashMap<String, String>, DecodeError> {
    let mut attrs = HashMap::with_capacity(8);

    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.decode_and_unescape_value(decoder)?;

        attrs.insert(local_name(key).to_string(), value.into_owned());
    }

    Ok(attrs)
}

/// Append the content of a text event
pub(crate) fn push_text(out: &mut String, text: &BytesText) -> Result<(), DecodeError> {
    let decoded = text
        .decode()
        .map_err(|e| DecodeError::XmlText(e.to_string()))?;
    out.push_str(&decoded);
    Ok(())
}

/// Append what an entity reference stands for
///
/// Character references and the predefined XML entities are resolved. Anything
/// else is a DTD entity this reader does not know, and is kept as written.
pub(crate) fn push_entity(out: &mut String, entity: &BytesRef) -> Result<(), DecodeError> {
    if let Some(ch) = entity
        .resolve_char_ref()
        .map_err(|e| DecodeError::XmlText(e.to_string()))?
    {
        out.push(ch);
        return Ok(());
    }

    let name = entity
        .decode()
        .map_err(|e| DecodeError::XmlText(e.to_string()))?;
    match resolve_predefined_entity(&name) {
        Some(resolved) => out.push_str(resolved),
        None => {
            out.push('&');
            out.push_str(&name);
            out.push(';');
        }
    }
    Ok(())
}

/// Extract local name from potentially namespaced XML name
///
/// - `"m:basematerials"` returns `"basematerials"`
/// - `"metadata"` returns `"metadata"`
pub(crate) fn local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Returns an attribute value, treating an empty string as absent
pub(crate) fn non_empty(attrs: &HashMap<String, String>, key: &str) -> Option<String> {
    attrs
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
