//! Comment-line metadata scanner
//!
//! PrusaSlicer, SuperSlicer, Bambu Studio, Cura and Simplify3D all describe the
//! job in `;` comment lines of the form `; key = value` (or `;KEY:value`, or
//! `; key,value`). The same scanner reads G-code file headers, the config block
//! at the end of Bambu plate G-code, and PrusaSlicer text configs.

use super::builder::JobUpdate;
use super::duration::parse_duration;
use super::values::{
    hash_prefixed, non_blank, parse_leading_f64, parse_leading_i64, parse_temperature,
    split_list,
};
use crate::model::FilamentInfo;
use regex::Regex;
use std::sync::OnceLock;

fn bambu_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"BambuStudio\s+([\d.]+)").expect("Invalid BambuStudio regex"))
}

/// Which lines of a document are scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanScope {
    /// Stop at the first machine-code line; `M486` object labels do not count
    HeaderOnly,
    /// Scan the whole document, skipping non-comment lines
    Full,
}

/// Keys recognised in comment lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKey {
    Materials,
    Colors,
    Weights,
    Lengths,
    Costs,
    NozzleTemps,
    BedTemps,
    InitialBedTemps,
    Duration,
    DurationSeconds,
    LayerHeight,
    SingleMaterial,
    SingleWeight,
    SingleCost,
}

impl HeaderKey {
    fn classify(key: &str) -> Option<Self> {
        let key = match key {
            "filament_type" => Self::Materials,
            "filament_colour" => Self::Colors,
            "filament used [g]" | "total_filament_used" => Self::Weights,
            "filament used [mm]" => Self::Lengths,
            "filament_cost" => Self::Costs,
            "temperature" | "nozzle_temperature" => Self::NozzleTemps,
            "bed_temperature" => Self::BedTemps,
            "bed_temperature_initial_layer" => Self::InitialBedTemps,
            "TIME" => Self::DurationSeconds,
            "layer_height" | "Layer height" => Self::LayerHeight,
            "MATERIAL" => Self::SingleMaterial,
            "MATERIALWEIGHT" | "plasticWeight" => Self::SingleWeight,
            "MATERIALCOST" => Self::SingleCost,
            _ if is_duration_key(key) => Self::Duration,
            _ => return None,
        };
        Some(key)
    }
}

/// Normal-mode duration keys; the silent-mode estimate is ignored
fn is_duration_key(key: &str) -> bool {
    (key.starts_with("estimated printing time") || key.starts_with("total estimated printing time"))
        && !key.contains("silent")
}

/// Scan comment lines and collect everything recognised
///
/// Repeated keys overwrite earlier values. List values are assigned by position;
/// an item that is empty or does not parse leaves its slot untouched. A
/// single-filament record (`;MATERIAL:` and friends) is appended after the
/// listed slots.
pub(crate) fn scan_comments(text: &str, scope: ScanScope) -> JobUpdate {
    let mut update = JobUpdate::default();
    let mut single = FilamentInfo::default();

    for line in text.lines() {
        let trimmed = line.trim();

        if scope == ScanScope::HeaderOnly
            && !trimmed.is_empty()
            && !trimmed.starts_with(';')
            && !trimmed.starts_with("M486")
        {
            break;
        }

        let Some(body) = trimmed.strip_prefix(';') else {
            continue;
        };
        let body = body.trim();

        if let Some(banner) = strip_banner_prefix(body) {
            apply_banner(&mut update, banner);
            continue;
        }

        let matched = match split_key_value(body) {
            Some((key, value)) => match HeaderKey::classify(key) {
                Some(key) => {
                    apply_value(&mut update, &mut single, key, value);
                    true
                }
                None => false,
            },
            None => false,
        };

        if !matched && body.contains("BambuStudio") {
            update.slicer_name = Some("BambuStudio".to_string());
            if let Some(caps) = bambu_version_regex().captures(body) {
                update.slicer_version = Some(caps[1].to_string());
            }
        }
    }

    if !single.is_empty() {
        update.filaments.push(single);
    }
    update
}

/// Returns the text after a `generated by` / `generated with` banner prefix
fn strip_banner_prefix(body: &str) -> Option<&str> {
    ["generated by ", "generated with "].iter().find_map(|prefix| {
        body.get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| body[prefix.len()..].trim())
    })
}

/// Parse `<name> <version> [on <date>...]`
fn apply_banner(update: &mut JobUpdate, banner: &str) {
    let (name, rest) = match banner.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (banner, ""),
    };
    let version = rest.split(" on ").next().unwrap_or_default();

    if let Some(name) = non_blank(name) {
        update.slicer_name = Some(name.to_string());
    }
    update.slicer_version = non_blank(version).map(str::to_string);
}

/// Split a comment body at its first `=` or `:`, falling back to `,`
fn split_key_value(body: &str) -> Option<(&str, &str)> {
    let pos = body
        .find(['=', ':'])
        .or_else(|| body.find(','))?;
    Some((body[..pos].trim(), body[pos + 1..].trim()))
}

fn apply_value(update: &mut JobUpdate, single: &mut FilamentInfo, key: HeaderKey, value: &str) {
    let slots = &mut update.filaments;

    match key {
        HeaderKey::Materials => {
            for (i, item) in split_list(value, ';').enumerate() {
                if let Some(material) = non_blank(item) {
                    slots.slot_mut(i).material = Some(material.to_string());
                }
            }
        }
        HeaderKey::Colors => {
            for (i, item) in split_list(value, ';').enumerate() {
                if let Some(color) = hash_prefixed(item) {
                    slots.slot_mut(i).color = Some(color);
                }
            }
        }
        HeaderKey::Weights => {
            for (i, item) in split_list(value, ',').enumerate() {
                if let Some(weight) = parse_leading_f64(item) {
                    slots.slot_mut(i).weight = Some(weight);
                }
            }
        }
        HeaderKey::Lengths => {
            for (i, item) in split_list(value, ',').enumerate() {
                if let Some(length) = parse_leading_f64(item) {
                    slots.slot_mut(i).length = Some(length);
                }
            }
        }
        HeaderKey::Costs => {
            for (i, item) in split_list(value, ',').enumerate() {
                if let Some(cost) = parse_leading_f64(item) {
                    slots.slot_mut(i).cost = Some(cost);
                }
            }
        }
        HeaderKey::NozzleTemps => {
            for (i, item) in split_list(value, ',').enumerate() {
                if let Some(temp) = parse_temperature(item) {
                    slots.slot_mut(i).temperature = Some(temp);
                }
            }
        }
        HeaderKey::BedTemps => {
            for (i, item) in split_list(value, ',').enumerate() {
                if let Some(temp) = parse_temperature(item) {
                    slots.slot_mut(i).bed_temperature = Some(temp);
                }
            }
        }
        HeaderKey::InitialBedTemps => {
            for (i, item) in split_list(value, ',').enumerate() {
                if let Some(temp) = parse_temperature(item) {
                    slots.slot_mut(i).bed_temperature.get_or_insert(temp);
                }
            }
        }
        HeaderKey::Duration => {
            let seconds = parse_duration(value);
            if seconds > 0 {
                update.print_time = Some(seconds);
            }
        }
        HeaderKey::DurationSeconds => {
            if let Some(seconds) = parse_leading_i64(value).filter(|s| *s > 0) {
                update.print_time = Some(seconds.unsigned_abs());
            }
        }
        HeaderKey::LayerHeight => {
            if let Some(height) = parse_leading_f64(value) {
                update.layer_height = Some(height);
            }
        }
        HeaderKey::SingleMaterial => {
            if let Some(material) = non_blank(value) {
                single.material = Some(material.to_string());
            }
        }
        HeaderKey::SingleWeight => {
            if let Some(weight) = parse_leading_f64(value) {
                single.weight = Some(weight);
            }
        }
        HeaderKey::SingleCost => {
            if let Some(cost) = parse_leading_f64(value) {
                single.cost = Some(cost);
            }
        }
    }
}
