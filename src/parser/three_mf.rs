//! 3MF project archive extraction
//!
//! Sources are applied from least to most authoritative:
//!
//! 1. base materials of `3D/3dmodel.model`
//! 2. `Metadata/project_settings.config`
//! 3. `Metadata/plate_1.gcode`
//! 4. `Metadata/slice_info.config`, whose filament list replaces everything before it
//! 5. any other metadata entry a known dialect recognises, filling gaps only

use super::builder::{JobBuilder, MergeStrategy};
use super::dialect::Dialect;
use super::header::{ScanScope, scan_comments};
use super::manifest::parse_slice_info;
use super::model_xml::parse_base_materials;
use super::settings::parse_project_settings;
use crate::archive::{
    ContentTypes, METADATA_DIR, MODEL_PATH, PLATE_GCODE_PATH, PROJECT_SETTINGS_PATH, Package,
    SLICE_INFO_PATH, collect_plate_images, find_thumbnail,
};
use crate::error::{DecodeError, Error, Result};
use crate::model::{ExtractorConfig, PrintJobInfo};
use std::io::{Read, Seek};
use tracing::{debug, instrument, trace, warn};

/// Entries with a dedicated reader, never handed to the dialect registry
const DEDICATED_ENTRIES: [&str; 3] = [PROJECT_SETTINGS_PATH, PLATE_GCODE_PATH, SLICE_INFO_PATH];

/// Extract metadata from a 3MF project archive
///
/// # Errors
///
/// Returns [`Error::ArchiveParse`] if the archive cannot be opened or its model
/// document is malformed.
pub fn parse_3mf<R: Read + Seek>(file_name: &str, reader: R) -> Result<PrintJobInfo> {
    parse_3mf_with_config(file_name, reader, &ExtractorConfig::default())
}

/// Extract metadata from a 3MF project archive with custom configuration
///
/// With [`ExtractorConfig::with_strict_metadata`] enabled, a malformed project
/// settings document or plate manifest is also fatal.
#[instrument(skip(reader, config), fields(strict = config.strict_metadata()))]
pub fn parse_3mf_with_config<R: Read + Seek>(
    file_name: &str,
    reader: R,
    config: &ExtractorConfig,
) -> Result<PrintJobInfo> {
    let mut package = Package::open(reader).map_err(|e| {
        Error::archive(file_name, "open archive", e)
            .with_hint("3MF projects are ZIP archives; the file may be truncated")
    })?;
    debug!(entries = package.len(), "opened archive");

    let mut builder = JobBuilder::new(file_name);

    let model_xml = package
        .read_text(MODEL_PATH)
        .map_err(|e| Error::archive_entry(file_name, "model document", MODEL_PATH, e))?;
    if let Some(model_xml) = model_xml {
        let update = parse_base_materials(&model_xml).map_err(|e| {
            Error::archive_entry(file_name, "model document", MODEL_PATH, e)
                .with_hint("re-export the project from the slicer")
        })?;
        debug!(count = update.filaments.len(), "read base materials");
        builder.apply(update, MergeStrategy::Overwrite);
    } else {
        debug!("archive has no model document");
    }

    if package.has_directory(METADATA_DIR) {
        read_metadata(&mut package, &mut builder, file_name, config)?;
    }

    let content_types = ContentTypes::read(&mut package).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable content types");
        ContentTypes::default()
    });
    builder.set_thumbnail(find_thumbnail(&mut package, &content_types, config));
    builder.set_plate_images(collect_plate_images(&mut package, &content_types, config));

    debug!(filaments = builder.filament_count(), "finished archive");
    Ok(builder.finish())
}

fn read_metadata<R: Read + Seek>(
    package: &mut Package<R>,
    builder: &mut JobBuilder,
    file_name: &str,
    config: &ExtractorConfig,
) -> Result<()> {
    if let Some(text) = read_optional(package, PROJECT_SETTINGS_PATH) {
        match parse_project_settings(&text) {
            Ok(update) => {
                debug!(count = update.filaments.len(), "read project settings");
                builder.apply(update, MergeStrategy::Overwrite);
            }
            Err(e) => soft_failure(file_name, "project settings", PROJECT_SETTINGS_PATH, e, config)?,
        }
    }

    if let Some(text) = read_optional(package, PLATE_GCODE_PATH) {
        let update = scan_comments(&text, ScanScope::Full);
        debug!(count = update.filaments.len(), "read plate G-code");
        builder.apply(update, MergeStrategy::Overwrite);
    }

    if let Some(text) = read_optional(package, SLICE_INFO_PATH) {
        match parse_slice_info(&text) {
            Ok(update) => {
                debug!(count = update.filaments.len(), "read slice info manifest");
                builder.apply(update, MergeStrategy::Replace);
            }
            Err(e) => soft_failure(file_name, "slice info manifest", SLICE_INFO_PATH, e, config)?,
        }
    }

    for entry in package.file_names() {
        if !is_dialect_candidate(&entry) {
            continue;
        }
        let Some(text) = read_optional(package, &entry) else {
            continue;
        };

        for dialect in Dialect::detect(&text) {
            match dialect.extract(&text) {
                Ok(update) if update.is_empty() => {
                    trace!(entry = %entry, dialect = dialect.name(), "dialect found nothing");
                }
                Ok(update) => {
                    debug!(entry = %entry, dialect = dialect.name(), "applied dialect metadata");
                    builder.apply(update, MergeStrategy::FillGaps);
                }
                Err(e) => {
                    warn!(entry = %entry, dialect = dialect.name(), error = %e, "skipping unreadable dialect metadata");
                }
            }
        }
    }

    Ok(())
}

/// Metadata entries tried against the dialect registry
fn is_dialect_candidate(entry: &str) -> bool {
    entry.contains(METADATA_DIR)
        && (entry.ends_with(".xml") || entry.ends_with(".config") || entry.ends_with(".gcode"))
        && !DEDICATED_ENTRIES.contains(&entry)
}

/// Read an optional entry, logging and skipping it if it cannot be inflated
fn read_optional<R: Read + Seek>(package: &mut Package<R>, entry: &str) -> Option<String> {
    match package.read_text(entry) {
        Ok(Some(text)) => Some(text),
        Ok(None) => None,
        Err(e) => {
            warn!(entry, error = %e, "skipping unreadable metadata entry");
            None
        }
    }
}

/// Skip a malformed metadata document, or fail in strict mode
fn soft_failure(
    file_name: &str,
    stage: &str,
    entry: &str,
    source: DecodeError,
    config: &ExtractorConfig,
) -> Result<()> {
    if config.strict_metadata() {
        return Err(Error::archive_entry(file_name, stage, entry, source));
    }
    warn!(entry, error = %source, "skipping malformed {}", stage);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_candidates() {
        assert!(is_dialect_candidate("Metadata/Slic3r_PE.config"));
        assert!(is_dialect_candidate("Metadata/Slic3r_PE_model.config"));
        assert!(is_dialect_candidate("Metadata/cura.xml"));
        assert!(is_dialect_candidate("Metadata/plate_2.gcode"));
        assert!(!is_dialect_candidate("Metadata/plate_1.gcode"));
        assert!(!is_dialect_candidate("Metadata/slice_info.config"));
        assert!(!is_dialect_candidate("Metadata/project_settings.config"));
        assert!(!is_dialect_candidate("Metadata/plate_1.png"));
        assert!(!is_dialect_candidate("3D/3dmodel.model"));
    }

    #[test]
    fn test_soft_failure_respects_strict_mode() {
        let lenient = ExtractorConfig::default();
        let err = || DecodeError::XmlAttr("bad".to_string());
        assert!(soft_failure("a.3mf", "manifest", SLICE_INFO_PATH, err(), &lenient).is_ok());

        let strict = ExtractorConfig::new().with_strict_metadata(true);
        let result = soft_failure("a.3mf", "manifest", SLICE_INFO_PATH, err(), &strict);
        assert!(matches!(result, Err(Error::ArchiveParse { .. })));
    }
}
