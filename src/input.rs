//! Reading input files as text

use std::path::Path;

use crate::error::Error;

/// How far into a file to look for NUL bytes
const BINARY_SNIFF_LEN: usize = 8192;

/// Check if content appears to be binary
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

/// Decode bytes as UTF-8 without replacement characters.
/// A leading byte order mark is dropped.
pub fn decode(path: &Path, bytes: Vec<u8>) -> Result<String, Error> {
    if is_binary(&bytes) {
        return Err(Error::Binary {
            path: path.to_path_buf(),
        });
    }

    let mut text = String::from_utf8(bytes).map_err(|e| Error::Decode {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })?;

    if text.starts_with('\u{feff}') {
        text.replace_range(..'\u{feff}'.len_utf8(), "");
    }
    Ok(text)
}

/// Read a file fully and decode it
pub fn read_text(path: &Path) -> Result<String, Error> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(Error::IsDirectory(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    decode(path, bytes)
}
