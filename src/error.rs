use std::{
    fmt,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

/// Errors produced while setting up or invoking configuration providers.
///
/// Every variant carries its context as plain strings so the error can be
/// cloned: an error provider hands out the same failure on every resolve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigStoreError {
    /// I/O failure while reading or inspecting a file
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where the I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// File contents could not be decoded into items
    #[error("failed to decode {format} content: {details}")]
    DecodeError {
        /// Format the decoder expected (yaml, json, toml, ...)
        format: String,
        /// Decoder error details
        details: String,
    },

    /// A directory could not be listed
    #[error("failed to list directory '{path}': {details}")]
    DirectoryListError {
        /// Directory that failed to list
        path: PathBuf,
        /// Listing error details
        details: String,
    },

    /// A symbolic link target could not be resolved
    #[error("failed to resolve symlink '{path}': {details}")]
    SymlinkError {
        /// The link that failed to resolve
        path: PathBuf,
        /// Resolution error details
        details: String,
    },

    /// A provider reported a failure of its own
    #[error("provider '{name}' failed: {details}")]
    ProviderError {
        /// Name of the failing provider
        name: String,
        /// Failure details
        details: String,
    },

    /// Store options could not be parsed
    #[error("failed to parse store options from '{location}': {details}")]
    OptionsParseError {
        /// Location of the options (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },
}

/// A specialized `Result` type for configstore operations.
pub type Result<T> = result::Result<T, ConfigStoreError>;

impl ConfigStoreError {
    /// Creates an I/O error with file path context.
    pub fn io(error: impl fmt::Display, path: &Path) -> Self {
        ConfigStoreError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }

    /// Creates a decode error for the given format.
    ///
    /// # Arguments
    ///
    /// * `format` - Short name of the expected format
    /// * `error` - The underlying decoder error
    pub fn decode(format: &str, error: impl fmt::Display) -> Self {
        ConfigStoreError::DecodeError {
            format: format.to_string(),
            details: error.to_string(),
        }
    }

    /// Creates a provider failure for a named provider.
    pub fn provider(name: impl Into<String>, details: impl Into<String>) -> Self {
        ConfigStoreError::ProviderError {
            name: name.into(),
            details: details.into(),
        }
    }
}
