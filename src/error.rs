use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced by every compression stage
#[derive(Error, Debug)]
pub enum HuffError {
    /// Reading the named source failed
    #[error("failed reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the named sink failed
    #[error("failed writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O on a stream that has no associated path
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed tree, missing sentinel, or undecodable body
    #[error("invalid format: {message}")]
    Format { message: String },

    /// A built code table broke one of its own guarantees
    #[error("construction invariant violated: {message}")]
    ConstructionInvariant { message: String },

    /// Bad value in a properties file
    #[error("invalid configuration: {message}")]
    Configuration { message: String },
}

impl HuffError {
    pub fn format(message: impl Into<String>) -> Self {
        HuffError::Format { message: message.into() }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        HuffError::ConstructionInvariant { message: message.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        HuffError::Configuration { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, HuffError>;
