//! Slicer file parsing
//!
//! [`parse_slicer_file`] and [`parse_reader`] pick the extractor from the file
//! extension. [`parse_3mf`] and [`parse_gcode`] call one extractor directly.

mod builder;
mod dialect;
mod duration;
mod gcode;
mod header;
mod manifest;
mod model_xml;
mod settings;
mod three_mf;
mod values;
pub(crate) mod xml;

pub use duration::{format_duration, parse_duration};
pub use gcode::{parse_gcode, parse_gcode_with_config};
pub use three_mf::{parse_3mf, parse_3mf_with_config};

use crate::error::{Error, Result};
use crate::model::{ExtractorConfig, PrintJobInfo};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Slicer file formats understood by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// 3MF project archive (`.3mf`)
    ThreeMf,
    /// G-code text file (`.gcode`, `.gco`, `.g`)
    GCode,
}

impl FileFormat {
    /// Pick the format from a file name's extension
    ///
    /// The extension is everything after the last dot, compared in lowercase.
    /// A name without a dot is treated as its own extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] naming the lowercase extension.
    ///
    /// # Example
    ///
    /// ```
    /// use printmeta::{Error, FileFormat};
    ///
    /// assert_eq!(FileFormat::from_file_name("Benchy.3MF").unwrap(), FileFormat::ThreeMf);
    /// assert_eq!(FileFormat::from_file_name("part.gco").unwrap(), FileFormat::GCode);
    /// assert!(matches!(
    ///     FileFormat::from_file_name("README"),
    ///     Err(Error::UnsupportedFormat(ext)) if ext == "readme"
    /// ));
    /// ```
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = extension_of(file_name);
        match extension.as_str() {
            "3mf" => Ok(FileFormat::ThreeMf),
            "gcode" | "gco" | "g" => Ok(FileFormat::GCode),
            _ => Err(Error::UnsupportedFormat(extension)),
        }
    }
}

fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(_, ext)| ext)
        .to_lowercase()
}

/// Parse a slicer file from a reader, choosing the extractor by file name
///
/// # Errors
///
/// - [`Error::UnsupportedFormat`] for an unknown extension
/// - [`Error::ArchiveParse`] for a malformed 3MF archive
/// - [`Error::FileRead`] if the reader fails
pub fn parse_reader<R: Read + Seek>(file_name: &str, reader: R) -> Result<PrintJobInfo> {
    parse_reader_with_config(file_name, reader, &ExtractorConfig::default())
}

/// Parse a slicer file from a reader with custom configuration
pub fn parse_reader_with_config<R: Read + Seek>(
    file_name: &str,
    reader: R,
    config: &ExtractorConfig,
) -> Result<PrintJobInfo> {
    let format = FileFormat::from_file_name(file_name)?;
    debug!(file = file_name, ?format, "dispatching slicer file");

    match format {
        FileFormat::ThreeMf => parse_3mf_with_config(file_name, reader, config),
        FileFormat::GCode => parse_gcode_with_config(file_name, reader, config),
    }
}

/// Parse a slicer file from the filesystem
///
/// The file name reported in the result is the final path component. The
/// format is checked before the file is opened, so an unsupported extension
/// never touches the filesystem.
///
/// # Example
///
/// ```no_run
/// use printmeta::parse_slicer_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let job = parse_slicer_file("benchy.3mf")?;
/// for (slot, filament) in job.filaments.iter().enumerate() {
///     println!("slot {}: {:?} {:?}", slot, filament.material, filament.color);
/// }
/// # Ok(())
/// # }
/// ```
pub fn parse_slicer_file(path: impl AsRef<Path>) -> Result<PrintJobInfo> {
    parse_slicer_file_with_config(path, &ExtractorConfig::default())
}

/// Parse a slicer file from the filesystem with custom configuration
pub fn parse_slicer_file_with_config(
    path: impl AsRef<Path>,
    config: &ExtractorConfig,
) -> Result<PrintJobInfo> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    FileFormat::from_file_name(&file_name)?;
    let file = File::open(path).map_err(|e| Error::file_read(&file_name, e))?;
    parse_reader_with_config(&file_name, BufReader::new(file), config)
}
