//! Access to 3MF project archives
//!
//! 3MF files are ZIP archives following the Open Packaging Conventions. Besides
//! the model document, slicers store their own settings, plate manifests and
//! preview images as extra entries, mostly under `Metadata/`.

mod content_types;
mod preview;
mod reader;
mod relationships;

pub use preview::{FALLBACK_THUMBNAIL_PATH, THUMBNAIL_CANDIDATES};
pub use reader::Package;

pub(crate) use content_types::ContentTypes;
pub(crate) use preview::{collect_plate_images, find_thumbnail};

/// Main 3D model file path within the 3MF archive
pub const MODEL_PATH: &str = "3D/3dmodel.model";

/// Content types file path
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// Relationships file path
pub const RELS_PATH: &str = "_rels/.rels";

/// Directory holding slicer-specific metadata
pub const METADATA_DIR: &str = "Metadata";

/// JSON project settings written by Bambu Studio and its forks
pub const PROJECT_SETTINGS_PATH: &str = "Metadata/project_settings.config";

/// G-code of the first plate, embedded by Bambu Studio when sliced
pub const PLATE_GCODE_PATH: &str = "Metadata/plate_1.gcode";

/// Plate and filament usage manifest written by Bambu Studio
pub const SLICE_INFO_PATH: &str = "Metadata/slice_info.config";

/// Prefix of the numbered plate preview images
pub const PLATE_IMAGE_PREFIX: &str = "Metadata/plate_";

/// Thumbnail relationship type (OPC standard)
pub const THUMBNAIL_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/thumbnail";
