//! # printmeta
//!
//! Filament and print-job metadata extraction from slicer output files.
//!
//! Slicers describe the job they produced in several incompatible ways: the
//! base materials table of a 3MF model, vendor settings and manifests stored
//! next to it in the archive, and `; key = value` comment headers in G-code.
//! This crate reads all of them and merges what it finds into one
//! [`PrintJobInfo`].
//!
//! ## Features
//!
//! - 3MF project archives from Bambu Studio, OrcaSlicer, PrusaSlicer and Cura
//! - G-code headers from PrusaSlicer, SuperSlicer, Bambu Studio, Cura and Simplify3D
//! - Thumbnail and per-plate preview images
//! - Duration strings such as `1h 23m 45s` or `1:23:45`
//! - Best-effort extraction: only an unreadable file or a broken archive is an error
//!
//! ## Example
//!
//! ```no_run
//! use printmeta::PrintJobInfo;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("benchy.3mf")?;
//! let job = PrintJobInfo::from_reader("benchy.3mf", file)?;
//!
//! println!("{} filament(s), {:?} seconds", job.filaments.len(), job.print_time);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod error;
pub mod model;
pub mod parser;

pub use error::{DecodeError, Error, ErrorContext, Result};
pub use model::{
    DEFAULT_HEADER_SCAN_LIMIT, DEFAULT_MAX_PLATE_IMAGES, ExtractorConfig, FilamentInfo,
    PreviewImage, PrintJobInfo,
};
pub use parser::{
    FileFormat, format_duration, parse_3mf, parse_3mf_with_config, parse_duration, parse_gcode,
    parse_gcode_with_config, parse_reader, parse_reader_with_config, parse_slicer_file,
    parse_slicer_file_with_config,
};

use std::io::{Read, Seek};
use std::path::Path;

impl PrintJobInfo {
    /// Extract metadata from a reader, choosing the extractor by file name
    ///
    /// # Arguments
    ///
    /// * `file_name` - Name of the file, used for format detection and reported in the result
    /// * `reader` - A reader containing the file data
    ///
    /// # Example
    ///
    /// ```
    /// use printmeta::PrintJobInfo;
    /// use std::io::Cursor;
    ///
    /// let gcode = "; filament_type = PLA\n; filament_colour = #FF0000\nG28\n";
    /// let job = PrintJobInfo::from_reader("cube.gcode", Cursor::new(gcode))?;
    /// assert_eq!(job.filaments[0].material.as_deref(), Some("PLA"));
    /// assert_eq!(job.filaments[0].color.as_deref(), Some("#FF0000"));
    /// # Ok::<(), printmeta::Error>(())
    /// ```
    pub fn from_reader<R: Read + Seek>(file_name: &str, reader: R) -> Result<Self> {
        parser::parse_reader(file_name, reader)
    }

    /// Extract metadata from a reader with custom configuration
    pub fn from_reader_with_config<R: Read + Seek>(
        file_name: &str,
        reader: R,
        config: &ExtractorConfig,
    ) -> Result<Self> {
        parser::parse_reader_with_config(file_name, reader, config)
    }

    /// Extract metadata from a file on disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        parser::parse_slicer_file(path)
    }
}
