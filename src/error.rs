//! Error types for the standardization pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The configuration cannot produce a usable catalog (unreadable file,
    /// unmeasurable tileset image, ...). Fatal for the whole run.
    #[error("config: {0}")]
    Config(String),

    /// A map declares a tileset the catalog knows nothing about. Fatal for
    /// that map: any tile in that tileset's range would be misremapped or
    /// silently left behind.
    #[error("map declares tileset '{name}' (firstgid {first_gid}) that is absent from the catalog")]
    DeclarationMismatch { name: String, first_gid: u32 },

    /// A non-zero raw tile id that no declared tileset range covers.
    #[error("tile code {code} at {location} falls outside every declared tileset range")]
    UnresolvedTileCode { code: u32, location: Location },

    /// Structurally unusable map document.
    #[error("malformed map: {0}")]
    Map(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn map(msg: impl Into<String>) -> Self {
        Error::Map(msg.into())
    }
}

/// Where an offending tile code was found, precise enough to fix the map
/// in the editor without re-scanning the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Cell { layer: String, row: usize, col: usize },
    Object { group: String, id: u32 },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Cell { layer, row, col } => {
                write!(f, "layer '{layer}' row {row} col {col}")
            }
            Location::Object { group, id } => write!(f, "object {id} in group '{group}'"),
        }
    }
}
