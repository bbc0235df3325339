//! Base materials from the 3MF model document

use super::builder::JobUpdate;
use super::values::normalize_hex_color;
use super::xml::{XML_BUFFER_CAPACITY, local_name, non_empty, parse_attributes};
use crate::error::DecodeError;
use crate::model::FilamentInfo;
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};

/// Read the first `basematerials` table of a model document
///
/// Each `base` element becomes one filament slot carrying its `name` and its
/// `displaycolor` normalized to lowercase `#rrggbb`. The whole document is read,
/// so a malformed model fails even when the table comes first. So does a model
/// that ends before its root element is closed.
pub(crate) fn parse_base_materials(xml: &str) -> Result<JobUpdate, DecodeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);

    let mut update = JobUpdate::default();
    let mut in_first_group = false;
    let mut seen_group = false;
    // Names of the elements still open, outermost first
    let mut open: Vec<String> = Vec::new();
    let mut root_closed = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.name();
                let name_str = local_name(std::str::from_utf8(name.as_ref())?);
                match name_str {
                    "basematerials" if !seen_group => {
                        seen_group = true;
                        in_first_group = true;
                    }
                    "base" if in_first_group => {
                        update.filaments.push(parse_base(e, reader.decoder())?);
                    }
                    _ => {}
                }
                open.push(name_str.to_string());
            }
            Event::Empty(ref e) => {
                let name = e.name();
                let name_str = local_name(std::str::from_utf8(name.as_ref())?);
                match name_str {
                    "basematerials" => seen_group = true,
                    "base" if in_first_group => {
                        update.filaments.push(parse_base(e, reader.decoder())?);
                    }
                    _ => {}
                }
                if open.is_empty() {
                    root_closed = true;
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                if local_name(std::str::from_utf8(name.as_ref())?) == "basematerials" {
                    in_first_group = false;
                }
                open.pop();
                if open.is_empty() {
                    root_closed = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(unclosed) = open.pop() {
        return Err(DecodeError::Xml(IllFormedError::MissingEndTag(unclosed).into()));
    }
    if !root_closed {
        return Err(DecodeError::Xml(
            IllFormedError::MissingEndTag("model".to_string()).into(),
        ));
    }

    Ok(update)
}

fn parse_base(e: &BytesStart, decoder: Decoder) -> Result<FilamentInfo, DecodeError> {
    let attrs = parse_attributes(e, decoder)?;
    Ok(FilamentInfo {
        name: non_empty(&attrs, "name"),
        color: attrs
            .get("displaycolor")
            .and_then(|c| normalize_hex_color(c)),
        ..Default::default()
    })
}
