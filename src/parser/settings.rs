//! Bambu Studio project settings (`Metadata/project_settings.config`)
//!
//! A flat JSON object holding every slicer setting. Per-filament settings are
//! arrays indexed by filament slot, with every value written as a string.

use super::builder::JobUpdate;
use super::values::{hash_prefixed, non_blank, parse_leading_f64};
use crate::error::DecodeError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FilamentSettings {
    filament_colour: Value,
    filament_type: Value,
    filament_vendor: Value,
    filament_cost: Value,
}

/// Read the per-filament arrays of a project settings document
///
/// Colours, types, vendors and costs are zipped by position over as many slots
/// as the longer of the colour and type arrays. Empty strings count as absent.
/// Values that are not arrays are ignored.
pub(crate) fn parse_project_settings(json: &str) -> Result<JobUpdate, DecodeError> {
    let settings: FilamentSettings = serde_json::from_str(json)?;

    let colors = items(&settings.filament_colour);
    let types = items(&settings.filament_type);
    let vendors = items(&settings.filament_vendor);
    let costs = items(&settings.filament_cost);

    let mut update = JobUpdate::default();
    for i in 0..colors.len().max(types.len()) {
        let slot = update.filaments.slot_mut(i);

        if let Some(color) = text_at(&colors, i).and_then(|c| hash_prefixed(&c)) {
            slot.color = Some(color);
        }
        if let Some(material) = text_at(&types, i) {
            slot.material = Some(material);
        }
        if let Some(vendor) = text_at(&vendors, i) {
            slot.vendor = Some(vendor);
        }
        slot.cost = costs.get(i).and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_leading_f64(s),
            _ => None,
        });
    }

    Ok(update)
}

fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or_default()
}

fn text_at(values: &[Value], index: usize) -> Option<String> {
    match values.get(index)? {
        Value::String(s) => non_blank(s).map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
