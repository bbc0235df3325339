//! Preview image probing

use super::content_types::{ContentTypes, sniff_image_type};
use super::relationships::package_thumbnail_target;
use super::{Package, PLATE_IMAGE_PREFIX};
use crate::model::{ExtractorConfig, PreviewImage};
use std::io::{Read, Seek};
use tracing::{debug, trace, warn};

/// Preview locations probed for the main thumbnail, in priority order
pub const THUMBNAIL_CANDIDATES: [&str; 3] = [
    "Auxiliaries/.thumbnails/thumbnail_3mf.png",
    "Auxiliaries/.thumbnails/thumbnail_middle.png",
    "Auxiliaries/.thumbnails/thumbnail_small.png",
];

/// Thumbnail location used by PrusaSlicer, probed after every other candidate path
pub const FALLBACK_THUMBNAIL_PATH: &str = "Metadata/thumbnail.png";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Find the main preview image
///
/// Tries the built-in candidates, then the configured extra candidates, then
/// `Metadata/thumbnail.png`, then the thumbnail relationship declared by the
/// package. The first readable entry wins.
pub(crate) fn find_thumbnail<R: Read + Seek>(
    package: &mut Package<R>,
    content_types: &ContentTypes,
    config: &ExtractorConfig,
) -> Option<PreviewImage> {
    let candidates = THUMBNAIL_CANDIDATES
        .iter()
        .map(|s| s.to_string())
        .chain(config.extra_thumbnail_candidates().iter().cloned())
        .chain(std::iter::once(FALLBACK_THUMBNAIL_PATH.to_string()));

    for path in candidates {
        if let Some(image) = load_preview(package, content_types, &path) {
            debug!(path = %path, "found thumbnail");
            return Some(image);
        }
    }

    match package_thumbnail_target(package) {
        Ok(Some(path)) => {
            let image = load_preview(package, content_types, &path);
            if image.is_some() {
                debug!(path = %path, "found thumbnail through package relationship");
            }
            image
        }
        Ok(None) => {
            debug!("no thumbnail found in archive");
            None
        }
        Err(e) => {
            warn!(error = %e, "skipping unreadable package relationships");
            None
        }
    }
}

/// Collect `Metadata/plate_1.png`, `Metadata/plate_2.png`, ... in order
///
/// Stops at the first missing plate number or at the configured maximum. A
/// plate image that exists but cannot be read is skipped.
pub(crate) fn collect_plate_images<R: Read + Seek>(
    package: &mut Package<R>,
    content_types: &ContentTypes,
    config: &ExtractorConfig,
) -> Vec<PreviewImage> {
    let mut images = Vec::new();

    for plate in 1..=config.max_plate_images() {
        let path = format!("{}{}.png", PLATE_IMAGE_PREFIX, plate);
        if !package.has_file(&path) {
            break;
        }
        if let Some(image) = load_preview(package, content_types, &path) {
            images.push(image);
        }
    }

    if !images.is_empty() {
        debug!(count = images.len(), "extracted plate images");
    }
    images
}

/// Read one preview entry, resolving its content type
///
/// A missing or unreadable entry yields `None`.
fn load_preview<R: Read + Seek>(
    package: &mut Package<R>,
    content_types: &ContentTypes,
    path: &str,
) -> Option<PreviewImage> {
    let data = match package.read_binary(path) {
        Ok(Some(data)) => data,
        Ok(None) => {
            trace!(path, "preview candidate not present");
            return None;
        }
        Err(e) => {
            warn!(path, error = %e, "skipping unreadable preview image");
            return None;
        }
    };

    let content_type = content_types
        .lookup(path)
        .or_else(|| sniff_image_type(&data))
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();

    Some(PreviewImage::new(path, content_type, data))
}
