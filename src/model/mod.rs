//! Data structures produced by the extractors

mod config;
mod filament;
mod job;

pub use config::{DEFAULT_HEADER_SCAN_LIMIT, DEFAULT_MAX_PLATE_IMAGES, ExtractorConfig};
pub use filament::FilamentInfo;
pub use job::{PreviewImage, PrintJobInfo};
