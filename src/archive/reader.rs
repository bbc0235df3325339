//! Random-access reading of archive entries

use crate::error::DecodeError;
use std::io::{Read, Seek};
use urlencoding::decode;
use zip::ZipArchive;

/// A 3MF project archive opened for random access
///
/// Entries are looked up by name through the ZIP central directory; nothing is
/// inflated until it is read. Names may be given as OPC part names, with a
/// leading slash or percent-encoded characters.
pub struct Package<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    /// Open a project archive from a reader
    pub fn open(reader: R) -> Result<Self, DecodeError> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Get the number of entries in the archive
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Check if an entry exists
    pub fn has_file(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Check if any entry lives under the given directory
    pub fn has_directory(&self, dir: &str) -> bool {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.archive.file_names().any(|name| name.starts_with(&prefix))
    }

    /// Get a list of all entry names in central directory order
    pub fn file_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i).map(str::to_string))
            .collect()
    }

    /// Read an entry as bytes, or `None` if it does not exist
    pub fn read_binary(&mut self, name: &str) -> Result<Option<Vec<u8>>, DecodeError> {
        let Some(index) = self.index_of(name) else {
            return Ok(None);
        };
        let mut file = self.archive.by_index(index)?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(Some(content))
    }

    /// Read an entry as text, or `None` if it does not exist
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected and a leading
    /// byte order mark is dropped.
    pub fn read_text(&mut self, name: &str) -> Result<Option<String>, DecodeError> {
        Ok(self.read_binary(name)?.map(|bytes| {
            let text = String::from_utf8_lossy(&bytes);
            text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string()
        }))
    }

    /// Central directory index of an entry, trying the name as given, without a
    /// leading slash, then percent-decoded
    fn index_of(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.archive.index_for_name(name) {
            return Some(index);
        }

        let relative = name.strip_prefix('/').unwrap_or(name);
        if let Some(index) = self.archive.index_for_name(relative) {
            return Some(index);
        }

        match decode(relative) {
            Ok(decoded) if decoded != relative => self.archive.index_for_name(&decoded),
            _ => None,
        }
    }
}
