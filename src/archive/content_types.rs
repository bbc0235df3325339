//! Content type lookup from `[Content_Types].xml`

use super::{CONTENT_TYPES_PATH, Package};
use crate::error::DecodeError;
use crate::parser::xml::{XML_BUFFER_CAPACITY, local_name, parse_attributes};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::{Read, Seek};

/// Normalize OPC path by removing leading slash
pub(super) fn normalize_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Content types declared by a package
///
/// An `Override` for the exact part name wins over an extension `Default`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ContentTypes {
    /// Lowercase extension to content type
    defaults: HashMap<String, String>,
    /// Part name without leading slash to content type
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    /// Read `[Content_Types].xml`, or an empty table when the package has none
    pub(crate) fn read<R: Read + Seek>(package: &mut Package<R>) -> Result<Self, DecodeError> {
        match package.read_text(CONTENT_TYPES_PATH)? {
            Some(content) => Self::parse(&content),
            None => Ok(Self::default()),
        }
    }

    fn parse(xml: &str) -> Result<Self, DecodeError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);
        let mut types = Self::default();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(ref e) | Event::Start(ref e) => {
                    let name = e.name();
                    match local_name(std::str::from_utf8(name.as_ref())?) {
                        "Override" => {
                            let attrs = parse_attributes(e, reader.decoder())?;
                            if let (Some(part), Some(ct)) =
                                (attrs.get("PartName"), attrs.get("ContentType"))
                            {
                                types
                                    .overrides
                                    .entry(normalize_path(part).to_string())
                                    .or_insert_with(|| ct.clone());
                            }
                        }
                        "Default" => {
                            let attrs = parse_attributes(e, reader.decoder())?;
                            if let (Some(ext), Some(ct)) =
                                (attrs.get("Extension"), attrs.get("ContentType"))
                            {
                                types
                                    .defaults
                                    .entry(ext.to_ascii_lowercase())
                                    .or_insert_with(|| ct.clone());
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Declared content type of an entry, if any
    pub(crate) fn lookup(&self, path: &str) -> Option<&str> {
        if let Some(ct) = self.overrides.get(normalize_path(path)) {
            return Some(ct.as_str());
        }
        let (_, extension) = path.rsplit_once('.')?;
        self.defaults
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Guess an image content type from its leading bytes
pub(super) fn sniff_image_type(data: &[u8]) -> Option<&'static str> {
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    if data.starts_with(&PNG_SIGNATURE) {
        Some("image/png")
    } else if data.len() >= 3 && data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        Some("image/jpeg")
    } else if data.starts_with(b"GIF8") {
        Some("image/gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
