//! Package relationship lookup

use super::content_types::normalize_path;
use super::{Package, RELS_PATH, THUMBNAIL_REL_TYPE};
use crate::error::DecodeError;
use crate::parser::xml::{XML_BUFFER_CAPACITY, local_name, parse_attributes};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Read, Seek};
use urlencoding::decode;

/// Find the entry declared as the package thumbnail in `_rels/.rels`
///
/// Targets are percent-decoded and stripped of their leading slash so they can
/// be used directly as entry names.
pub(super) fn package_thumbnail_target<R: Read + Seek>(
    package: &mut Package<R>,
) -> Result<Option<String>, DecodeError> {
    let Some(rels_content) = package.read_text(RELS_PATH)? else {
        return Ok(None);
    };
    let mut reader = Reader::from_str(&rels_content);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => {
                let name = e.name();
                if local_name(std::str::from_utf8(name.as_ref())?) == "Relationship" {
                    let attrs = parse_attributes(e, reader.decoder())?;
                    if let (Some(target), Some(rel_type)) =
                        (attrs.get("Target"), attrs.get("Type"))
                        && rel_type == THUMBNAIL_REL_TYPE
                    {
                        let target = decode(target)
                            .map(|t| t.into_owned())
                            .unwrap_or_else(|_| target.clone());
                        return Ok(Some(normalize_path(&target).to_string()));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}
