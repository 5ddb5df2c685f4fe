use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DedupError {
    #[error("cannot read input file {}: {source}", .path.display())]
    InputAccess { path: PathBuf, source: io::Error },
    #[error("cannot decode {} as {encoding}", .path.display())]
    Decode { path: PathBuf, encoding: String },
    #[error("unknown encoding label: {0:?}")]
    UnknownEncoding(String),
    #[error("column {name:?} not found in header row")]
    ColumnResolution { name: String },
    #[error("row {row} has {len} fields, column index {index} is out of range")]
    FieldIndex { row: u64, index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, DedupError>;
