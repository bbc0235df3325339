//! Vendor metadata dialects found in other archive entries
//!
//! Slicers other than Bambu Studio leave their own files under `Metadata/`.
//! Each dialect recognises its files by content and extracts what it can.

use super::builder::JobUpdate;
use super::duration::parse_duration;
use super::header::{ScanScope, scan_comments};
use super::values::{hash_prefixed, parse_leading_f64, parse_leading_i64, split_list};
use super::xml::{XML_BUFFER_CAPACITY, local_name, parse_attributes, push_entity, push_text};
use crate::error::DecodeError;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use std::sync::OnceLock;

fn cura_weight_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"material_weight="([^"]+)""#).expect("Invalid Cura material weight regex")
    })
}

fn cura_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"print_time="([^"]+)""#).expect("Invalid Cura print time regex"))
}

fn generic_weight_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)weight[:\s=]+([0-9.]+)").expect("Invalid weight regex"))
}

/// Known metadata dialects, in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    /// PrusaSlicer and its forks (`slic3rpe:` keys or a `PrusaSlicer` banner)
    PrusaSlicer,
    /// Ultimaker Cura (`cura:` namespace)
    Cura,
    /// Loose `weight` pattern for anything else
    Generic,
}

impl Dialect {
    const SPECIFIC: [Dialect; 2] = [Dialect::PrusaSlicer, Dialect::Cura];

    /// Dialects that apply to a document
    ///
    /// Every specific dialect whose marker is present applies; the generic
    /// fallback only applies when none does.
    pub(crate) fn detect(text: &str) -> Vec<Dialect> {
        let matched: Vec<_> = Self::SPECIFIC
            .into_iter()
            .filter(|dialect| dialect.recognizes(text))
            .collect();

        if matched.is_empty() {
            vec![Dialect::Generic]
        } else {
            matched
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Dialect::PrusaSlicer => "PrusaSlicer",
            Dialect::Cura => "Cura",
            Dialect::Generic => "generic",
        }
    }

    fn recognizes(self, text: &str) -> bool {
        match self {
            Dialect::PrusaSlicer => text.contains("slic3rpe:") || text.contains("PrusaSlicer"),
            Dialect::Cura => text.contains("cura:"),
            Dialect::Generic => true,
        }
    }

    /// Extract a partial update from one document
    pub(crate) fn extract(self, text: &str) -> Result<JobUpdate, DecodeError> {
        match self {
            Dialect::PrusaSlicer => extract_prusa(text),
            Dialect::Cura => Ok(extract_cura(text)),
            Dialect::Generic => Ok(extract_generic(text)),
        }
    }
}

/// XML `metadata` documents are read by key; text configs go through the comment scanner
fn extract_prusa(text: &str) -> Result<JobUpdate, DecodeError> {
    if !text.trim_start().starts_with('<') {
        return Ok(scan_comments(text, ScanScope::Full));
    }

    // Values are trimmed once complete; trimming each text event would eat the
    // spaces around entity references
    let mut reader = Reader::from_str(text);
    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);

    let mut update = JobUpdate::default();
    // Key of the open `metadata` element and its text so far
    let mut open: Option<(String, String)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.name();
                if local_name(std::str::from_utf8(name.as_ref())?) == "metadata" {
                    let attrs = parse_attributes(e, reader.decoder())?;
                    if let Some(key) = attrs.get("name") {
                        match attrs.get("value") {
                            Some(value) => apply_prusa_metadata(&mut update, key, value),
                            None => open = Some((key.clone(), String::new())),
                        }
                    }
                }
            }
            Event::Empty(ref e) => {
                let name = e.name();
                if local_name(std::str::from_utf8(name.as_ref())?) == "metadata" {
                    let attrs = parse_attributes(e, reader.decoder())?;
                    if let (Some(key), Some(value)) = (attrs.get("name"), attrs.get("value")) {
                        apply_prusa_metadata(&mut update, key, value);
                    }
                }
            }
            Event::Text(ref t) => {
                if let Some((_, ref mut value)) = open {
                    push_text(value, t)?;
                }
            }
            Event::GeneralRef(ref r) => {
                if let Some((_, ref mut value)) = open {
                    push_entity(value, r)?;
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                if local_name(std::str::from_utf8(name.as_ref())?) == "metadata"
                    && let Some((key, value)) = open.take()
                {
                    apply_prusa_metadata(&mut update, &key, &value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(update)
}

fn apply_prusa_metadata(update: &mut JobUpdate, key: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    match local_name(key) {
        "filament_type" => {
            for (i, item) in split_list(value, ';').enumerate() {
                if !item.is_empty() {
                    update.filaments.slot_mut(i).material = Some(item.to_string());
                }
            }
        }
        "filament_colour" => {
            for (i, item) in split_list(value, ';').enumerate() {
                if let Some(color) = hash_prefixed(item) {
                    update.filaments.slot_mut(i).color = Some(color);
                }
            }
        }
        "total_weight" => {
            if let Some(weight) = parse_leading_f64(value) {
                update.filaments.slot_mut(0).weight = Some(weight);
            }
        }
        "estimated_printing_time" => {
            let seconds = parse_duration(value);
            if seconds > 0 {
                update.print_time = Some(seconds);
            }
        }
        _ => {}
    }
}

fn extract_cura(text: &str) -> JobUpdate {
    let mut update = JobUpdate::default();

    if let Some(weight) = cura_weight_regex()
        .captures(text)
        .and_then(|caps| parse_leading_f64(&caps[1]))
    {
        update.filaments.slot_mut(0).weight = Some(weight);
    }
    if let Some(seconds) = cura_time_regex()
        .captures(text)
        .and_then(|caps| parse_leading_i64(&caps[1]))
        .filter(|s| *s > 0)
    {
        update.print_time = Some(seconds.unsigned_abs());
    }

    update
}

fn extract_generic(text: &str) -> JobUpdate {
    let mut update = JobUpdate::default();
    if let Some(weight) = generic_weight_regex()
        .captures(text)
        .and_then(|caps| parse_leading_f64(&caps[1]))
    {
        update.filaments.slot_mut(0).weight = Some(weight);
    }
    update
}
