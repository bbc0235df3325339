//! Extraction settings

/// Bytes read from the start of a G-code file when looking for its header
///
/// Large enough for the header block of every known slicer.
pub const DEFAULT_HEADER_SCAN_LIMIT: usize = 51_200;

/// Upper bound on sequentially numbered plate preview images
pub const DEFAULT_MAX_PLATE_IMAGES: usize = 10;

/// Configuration for metadata extraction
///
/// The defaults match what the major slicers produce. Callers normally only
/// touch this to make metadata decoding strict, or to teach the extractor
/// about an extra preview image location.
///
/// # Example
///
/// ```
/// use printmeta::ExtractorConfig;
///
/// let config = ExtractorConfig::new()
///     .with_strict_metadata(true)
///     .with_thumbnail_candidate("Metadata/top_1.png");
/// assert!(config.strict_metadata());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    header_scan_limit: usize,
    max_plate_images: usize,
    strict_metadata: bool,
    extra_thumbnail_candidates: Vec<String>,
}

impl ExtractorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            header_scan_limit: DEFAULT_HEADER_SCAN_LIMIT,
            max_plate_images: DEFAULT_MAX_PLATE_IMAGES,
            strict_metadata: false,
            extra_thumbnail_candidates: Vec::new(),
        }
    }

    /// Set how many bytes of a G-code file are scanned for header comments
    pub fn with_header_scan_limit(mut self, bytes: usize) -> Self {
        self.header_scan_limit = bytes;
        self
    }

    /// Set the highest plate number probed for plate preview images
    pub fn with_max_plate_images(mut self, count: usize) -> Self {
        self.max_plate_images = count;
        self
    }

    /// Make malformed project settings or plate manifests fatal
    ///
    /// By default these documents are skipped with a warning and the parse
    /// continues with whatever else the archive provides.
    pub fn with_strict_metadata(mut self, strict: bool) -> Self {
        self.strict_metadata = strict;
        self
    }

    /// Add an archive path to probe for the main preview image
    ///
    /// Extra candidates are tried after the built-in locations.
    pub fn with_thumbnail_candidate(mut self, path: impl Into<String>) -> Self {
        self.extra_thumbnail_candidates.push(path.into());
        self
    }

    /// Bytes scanned at the start of G-code files
    pub fn header_scan_limit(&self) -> usize {
        self.header_scan_limit
    }

    /// Highest plate number probed for plate images
    pub fn max_plate_images(&self) -> usize {
        self.max_plate_images
    }

    /// Whether metadata decode failures abort the parse
    pub fn strict_metadata(&self) -> bool {
        self.strict_metadata
    }

    /// Extra preview image paths
    pub fn extra_thumbnail_candidates(&self) -> &[String] {
        &self.extra_thumbnail_candidates
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}
