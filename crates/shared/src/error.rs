use thiserror::Error;

/// Errors surfaced by dataset resolution, parsing and configuration.
///
/// None of these are fatal to the host: a renderer shows the message and
/// keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// No dataset is registered under the requested map name.
    #[error("map \"{0}\" was not found")]
    DatasetNotFound(String),

    /// A dataset exists but its document could not be decoded.
    #[error("dataset \"{name}\" is invalid: {reason}")]
    InvalidDataset { name: String, reason: String },

    /// A `viewBox` string that is not four finite numbers with positive size.
    #[error("invalid viewBox \"{0}\"")]
    InvalidViewBox(String),

    #[error("invalid map configuration: {0}")]
    InvalidConfig(String),

    /// Reading a dataset file failed.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl MapError {
    /// True when the error means "no such map", as opposed to a broken one.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MapError::DatasetNotFound(_))
    }

    /// Message suitable for showing to the person using the map.
    pub fn user_message(&self) -> String {
        match self {
            MapError::DatasetNotFound(name) => {
                format!("Could not load map data for \"{name}\". Check spelling and file names.")
            }
            other => other.to_string(),
        }
    }
}
