//! Per-slot filament attributes

use serde::{Deserialize, Serialize};

/// One filament slot as discovered in a slicer file
///
/// Every field is optional: `None` means the file did not say, never zero.
/// Records are ordered by extruder/tool slot, so position `i` in
/// [`PrintJobInfo::filaments`](crate::PrintJobInfo::filaments) is slot `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilamentInfo {
    /// Human-readable filament or material name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Material type (e.g. "PLA", "PETG")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    /// Display colour as a `#`-prefixed hex string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Consumed weight in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Consumed length in millimetres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Cost, in whatever currency the slicer was configured with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Nozzle temperature in degrees Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i32>,
    /// Bed temperature in degrees Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_temperature: Option<i32>,
    /// Vendor, brand or spool/tray identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
}

impl FilamentInfo {
    /// Create an empty filament record
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no attribute is known
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the known attributes of `other` into `self`
    ///
    /// With `overwrite` set, every attribute present in `other` replaces the
    /// current value. Without it, only attributes still missing in `self` are filled.
    pub fn merge_from(&mut self, other: &FilamentInfo, overwrite: bool) {
        fn merge<T: Clone>(target: &mut Option<T>, source: &Option<T>, overwrite: bool) {
            if source.is_some() && (overwrite || target.is_none()) {
                target.clone_from(source);
            }
        }

        merge(&mut self.name, &other.name, overwrite);
        merge(&mut self.material, &other.material, overwrite);
        merge(&mut self.color, &other.color, overwrite);
        merge(&mut self.weight, &other.weight, overwrite);
        merge(&mut self.length, &other.length, overwrite);
        merge(&mut self.cost, &other.cost, overwrite);
        merge(&mut self.temperature, &other.temperature, overwrite);
        merge(&mut self.bed_temperature, &other.bed_temperature, overwrite);
        merge(&mut self.vendor, &other.vendor, overwrite);
    }
}
