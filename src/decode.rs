use std::fs;
use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{DedupError, Result};

pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DedupError::UnknownEncoding(label.to_string()))
}

/// Reads the whole input file and decodes it. Undecodable byte sequences are fatal.
pub fn read_input(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| DedupError::InputAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, actual, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(DedupError::Decode {
            path: path.to_path_buf(),
            encoding: actual.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

pub fn encode_output(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, _, _) = encoding.encode(text);
    bytes.into_owned()
}
