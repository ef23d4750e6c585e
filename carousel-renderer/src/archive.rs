//! Packaging exported slides into a single download.

use std::io::Write;

use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::{RenderError, RenderResult};

/// A named file produced by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Download file name.
    pub name: String,
    /// MIME type.
    pub mime: &'static str,
    /// File contents.
    pub data: Vec<u8>,
}

/// Bundles files into one archive.
pub trait Archiver: Send + Sync {
    /// MIME type of the produced archive.
    fn mime(&self) -> &'static str;

    /// Archive `files` in order.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Archive`] if the archive cannot be written.
    fn archive(&self, files: &[ExportedFile]) -> RenderResult<Vec<u8>>;
}

/// Deflate-compressed zip archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn mime(&self) -> &'static str {
        "application/zip"
    }

    fn archive(&self, files: &[ExportedFile]) -> RenderResult<Vec<u8>> {
        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for file in files {
            writer
                .start_file(file.name.as_str(), options)
                .map_err(|e| RenderError::Archive(format!("{}: {e}", file.name)))?;
            writer
                .write_all(&file.data)
                .map_err(|e| RenderError::Archive(format!("{}: {e}", file.name)))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| RenderError::Archive(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}
