//! Aggregate result of one parse call

use super::FilamentInfo;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Preview image embedded in a project archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewImage {
    /// Path of the image entry inside the archive
    pub path: String,
    /// MIME type (e.g. "image/png")
    pub content_type: String,
    /// Raw image bytes, serialized as base64
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl PreviewImage {
    /// Create a new preview image
    pub fn new(path: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Encode the image as a `data:` URL suitable for embedding in a project record
    ///
    /// # Example
    ///
    /// ```
    /// use printmeta::PreviewImage;
    ///
    /// let image = PreviewImage::new("Metadata/plate_1.png", "image/png", vec![1, 2, 3]);
    /// assert_eq!(image.to_data_url(), "data:image/png;base64,AQID");
    /// ```
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }
}

/// Filament and print-job metadata extracted from one slicer file
///
/// Built fresh for every parse call. `filaments` always holds at least one
/// entry after a successful parse; a file with no recoverable filament data
/// yields a single empty [`FilamentInfo`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintJobInfo {
    /// Name of the parsed file
    pub file_name: String,
    /// Filaments indexed by slot
    pub filaments: Vec<FilamentInfo>,
    /// Estimated print duration in whole seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_time: Option<u64>,
    /// Layer height in millimetres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_height: Option<f64>,
    /// Slicer program name (e.g. "PrusaSlicer", "BambuStudio")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slicer_name: Option<String>,
    /// Slicer program version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slicer_version: Option<String>,
    /// Main preview image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<PreviewImage>,
    /// Per-plate preview images, in plate order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plate_images: Vec<PreviewImage>,
}

impl PrintJobInfo {
    /// Sum of all known filament weights in grams, if any slot reports one
    pub fn total_weight(&self) -> Option<f64> {
        self.filaments
            .iter()
            .filter_map(|f| f.weight)
            .fold(None, |acc, w| Some(acc.unwrap_or(0.0) + w))
    }

    /// Sum of all known filament costs, if any slot reports one
    pub fn total_cost(&self) -> Option<f64> {
        self.filaments
            .iter()
            .filter_map(|f| f.cost)
            .fold(None, |acc, c| Some(acc.unwrap_or(0.0) + c))
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_encoding() {
        let png_magic = vec![0x89, b'P', b'N', b'G'];
        let image = PreviewImage::new("thumb.png", "image/png", png_magic);
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_totals() {
        let job = PrintJobInfo {
            filaments: vec![
                FilamentInfo {
                    weight: Some(10.0),
                    cost: Some(0.25),
                    ..Default::default()
                },
                FilamentInfo::default(),
                FilamentInfo {
                    weight: Some(5.5),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(job.total_weight(), Some(15.5));
        assert_eq!(job.total_cost(), Some(0.25));
    }

    #[test]
    fn test_totals_unknown() {
        let job = PrintJobInfo {
            filaments: vec![FilamentInfo::default()],
            ..Default::default()
        };
        assert_eq!(job.total_weight(), None);
        assert_eq!(job.total_cost(), None);
    }

    #[test]
    fn test_job_serialization_round_trip() {
        let job = PrintJobInfo {
            file_name: "benchy.3mf".to_string(),
            filaments: vec![FilamentInfo::default()],
            print_time: Some(5025),
            thumbnail: Some(PreviewImage::new("t.png", "image/png", vec![0, 1, 2])),
            ..Default::default()
        };
        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"fileName\":\"benchy.3mf\""));
        assert!(json.contains("\"printTime\":5025"));
        assert!(json.contains("\"data\":\"AAEC\""));
        assert!(!json.contains("plateImages"));

        let back: PrintJobInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}
