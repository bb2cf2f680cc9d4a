use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Error type for I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("IO error: {0}")]
    StdIo(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
}

fn not_found_aware(path: &Path, e: std::io::Error) -> IoError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IoError::FileNotFound(path.to_path_buf())
    } else {
        IoError::StdIo(e)
    }
}

/// Reads a file to string with proper error handling
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String, IoError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| not_found_aware(path, e))
}

/// Writes string to file, creating parent directories if needed
pub fn write_string(path: impl AsRef<Path>, contents: impl AsRef<str>) -> Result<(), IoError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents.as_ref())?;
    Ok(())
}

/// Reads a JSON document into `T`
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, IoError> {
    let contents = read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Serializes data to a binary file using bincode, creating parent directories if needed
pub fn serialize_to_file<T: Serialize>(path: impl AsRef<Path>, data: &T) -> Result<(), IoError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, data)?;
    debug!(path = %path.display(), "wrote bincode file");
    Ok(())
}

/// Deserializes data from a binary file using bincode
pub fn deserialize_from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, IoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| not_found_aware(path, e))?;
    let reader = BufReader::new(file);
    let data = bincode::deserialize_from(reader)?;
    debug!(path = %path.display(), "read bincode file");
    Ok(data)
}
