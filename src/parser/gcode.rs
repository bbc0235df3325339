//! G-code header extraction

use super::builder::{JobBuilder, MergeStrategy};
use super::header::{ScanScope, scan_comments};
use crate::error::{Error, Result};
use crate::model::{ExtractorConfig, PrintJobInfo};
use std::io::Read;
use tracing::{debug, instrument};

/// Extract metadata from the comment header of a G-code file
///
/// Only the first [`ExtractorConfig::header_scan_limit`] bytes are read. Scanning
/// stops at the first machine-code line. The content itself never makes the
/// call fail: a file without any recognised comment yields one empty filament.
///
/// # Errors
///
/// Returns [`Error::FileRead`] if the reader fails.
pub fn parse_gcode<R: Read>(file_name: &str, reader: R) -> Result<PrintJobInfo> {
    parse_gcode_with_config(file_name, reader, &ExtractorConfig::default())
}

/// Extract metadata from a G-code file with custom configuration
#[instrument(skip(reader, config), fields(limit = config.header_scan_limit()))]
pub fn parse_gcode_with_config<R: Read>(
    file_name: &str,
    reader: R,
    config: &ExtractorConfig,
) -> Result<PrintJobInfo> {
    let limit = config.header_scan_limit();
    let mut prefix = Vec::with_capacity(limit.min(64 * 1024));
    // One byte past the limit tells whether the file goes on
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut prefix)
        .map_err(|e| Error::file_read(file_name, e))?;

    if prefix.len() > limit {
        let next = prefix[limit];
        prefix.truncate(limit);

        // A line cut by the limit is dropped rather than read half
        if next != b'\n'
            && next != b'\r'
            && let Some(last_newline) = prefix.iter().rposition(|&b| b == b'\n')
        {
            prefix.truncate(last_newline + 1);
        }
    }

    let text = String::from_utf8_lossy(&prefix);
    let update = scan_comments(&text, ScanScope::HeaderOnly);
    debug!(
        bytes = prefix.len(),
        filaments = update.filaments.len(),
        slicer = update.slicer_name.as_deref().unwrap_or("unknown"),
        "scanned G-code header"
    );

    let mut builder = JobBuilder::new(file_name);
    builder.apply(update, MergeStrategy::Overwrite);
    Ok(builder.finish())
}
