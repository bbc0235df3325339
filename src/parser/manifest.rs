//! Bambu Studio plate manifest (`Metadata/slice_info.config`)
//!
//! ```xml
//! <config>
//!   <plate>
//!     <metadata key="prediction" value="5025"/>
//!     <filament id="1" tray_info_idx="GFA00" type="PLA" color="#FF0000" used_m="3.2" used_g="10"/>
//!   </plate>
//! </config>
//! ```

use super::builder::JobUpdate;
use super::values::{parse_leading_f64, parse_leading_i64};
use super::xml::{XML_BUFFER_CAPACITY, local_name, non_empty, parse_attributes};
use crate::error::DecodeError;
use crate::model::FilamentInfo;
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Identity of a manifest filament: material type and colour
type FilamentKey = (Option<String>, Option<String>);

/// Collect the filaments listed under every `plate`
///
/// Filaments sharing a type and colour are merged into one record whose weight
/// and length are the sums over all plates. Lengths are converted from metres
/// to millimetres. The first positive `prediction` metadata value becomes the
/// print duration.
pub(crate) fn parse_slice_info(xml: &str) -> Result<JobUpdate, DecodeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);

    let mut filaments: Vec<FilamentInfo> = Vec::new();
    let mut index_by_key: HashMap<FilamentKey, usize> = HashMap::new();
    let mut plate_depth = 0usize;
    let mut update = JobUpdate::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.name();
                match local_name(std::str::from_utf8(name.as_ref())?) {
                    "plate" => plate_depth += 1,
                    other => handle_element(
                        other,
                        e,
                        reader.decoder(),
                        plate_depth > 0,
                        &mut filaments,
                        &mut index_by_key,
                        &mut update,
                    )?,
                }
            }
            Event::Empty(ref e) => {
                let name = e.name();
                let name_str = local_name(std::str::from_utf8(name.as_ref())?);
                if name_str != "plate" {
                    handle_element(
                        name_str,
                        e,
                        reader.decoder(),
                        plate_depth > 0,
                        &mut filaments,
                        &mut index_by_key,
                        &mut update,
                    )?;
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                if local_name(std::str::from_utf8(name.as_ref())?) == "plate" {
                    plate_depth = plate_depth.saturating_sub(1);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    update.filaments = filaments.into();
    Ok(update)
}

fn handle_element(
    name: &str,
    e: &BytesStart,
    decoder: Decoder,
    in_plate: bool,
    filaments: &mut Vec<FilamentInfo>,
    index_by_key: &mut HashMap<FilamentKey, usize>,
    update: &mut JobUpdate,
) -> Result<(), DecodeError> {
    match name {
        "filament" if in_plate => {
            let attrs = parse_attributes(e, decoder)?;
            let weight = attrs.get("used_g").and_then(|v| parse_leading_f64(v));
            let length = attrs
                .get("used_m")
                .and_then(|v| parse_leading_f64(v))
                .map(|metres| metres * 1000.0);
            let key = (non_empty(&attrs, "type"), non_empty(&attrs, "color"));

            if let Some(&index) = index_by_key.get(&key) {
                let existing = &mut filaments[index];
                if let Some(weight) = weight {
                    existing.weight = Some(existing.weight.unwrap_or(0.0) + weight);
                }
                if let Some(length) = length {
                    existing.length = Some(existing.length.unwrap_or(0.0) + length);
                }
            } else {
                filaments.push(FilamentInfo {
                    material: key.0.clone(),
                    color: key.1.clone(),
                    weight,
                    length,
                    vendor: non_empty(&attrs, "tray_info_idx"),
                    ..Default::default()
                });
                index_by_key.insert(key, filaments.len() - 1);
            }
        }
        "metadata" if update.print_time.is_none() => {
            let attrs = parse_attributes(e, decoder)?;
            if attrs.get("key").map(String::as_str) == Some("prediction")
                && let Some(seconds) = attrs
                    .get("value")
                    .and_then(|v| parse_leading_i64(v))
                    .filter(|s| *s > 0)
            {
                update.print_time = Some(seconds.unsigned_abs());
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_accumulates_usage() {
        let xml = r##"<?xml version="1.0" encoding="UTF-8"?>
<config>
  <header><header_item key="X-BBL-Client-Type" value="slicer"/></header>
  <plate>
    <metadata key="index" value="1"/>
    <metadata key="prediction" value="5025"/>
    <filament id="1" tray_info_idx="GFA00" type="PLA" color="#FF0000" used_m="1.5" used_g="10"/>
  </plate>
  <plate>
    <metadata key="prediction" value="99"/>
    <filament id="1" tray_info_idx="GFA00" type="PLA" color="#FF0000" used_m="0.5" used_g="5"/>
    <filament id="2" type="PETG" color="#00FF00" used_g="2.5"/>
  </plate>
</config>"##;
        let update = parse_slice_info(xml).unwrap();
        assert_eq!(update.print_time, Some(5025));

        let slots = update.filaments.into_vec();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].material.as_deref(), Some("PLA"));
        assert_eq!(slots[0].color.as_deref(), Some("#FF0000"));
        assert_eq!(slots[0].weight, Some(15.0));
        assert_eq!(slots[0].length, Some(2000.0));
        assert_eq!(slots[0].vendor.as_deref(), Some("GFA00"));
        assert_eq!(slots[1].material.as_deref(), Some("PETG"));
        assert_eq!(slots[1].weight, Some(2.5));
        assert_eq!(slots[1].length, None);
    }

    #[test]
    fn test_escaped_attribute_values() {
        let xml = r##"<config><plate>
  <filament id="1" type="PLA &amp; CF" color="#000000" used_g="3"/>
  <filament id="2" type="PLA &amp; CF" color="#000000" used_g="4"/>
</plate></config>"##;
        let slots = parse_slice_info(xml).unwrap().filaments.into_vec();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].material.as_deref(), Some("PLA & CF"));
        assert_eq!(slots[0].weight, Some(7.0));
    }

    #[test]
    fn test_filaments_outside_plates_ignored() {
        let xml = r##"<config><filament type="PLA" color="#FFFFFF" used_g="1"/></config>"##;
        let update = parse_slice_info(xml).unwrap();
        assert!(update.filaments.is_empty());
    }

    #[test]
    fn test_zero_prediction_ignored() {
        let xml = r#"<config><plate><metadata key="prediction" value="0"/></plate></config>"#;
        assert_eq!(parse_slice_info(xml).unwrap().print_time, None);
    }

    #[test]
    fn test_malformed_manifest() {
        assert!(parse_slice_info("<config><plate></config>").is_err());
    }
}
