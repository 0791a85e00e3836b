//! Error type shared by every world operation.

use thiserror::Error;
use travels_core::GridError;

/// Failures raised while mutating or querying the game state.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A grid access fell outside the addressed area.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The requested map is not registered with the game state.
    #[error("map `{0}` does not exist")]
    MapNotFound(String),
    /// The requested named position is not registered on the map.
    #[error("location `{location}` does not exist on map `{map}`")]
    LocationNotFound {
        /// Map that was searched.
        map: String,
        /// Name that could not be resolved.
        location: String,
    },
    /// An authored action reported a failure of its own.
    #[error("{0}")]
    Action(String),
}

impl WorldError {
    /// Creates an action failure carrying a human readable message.
    #[must_use]
    pub fn action(message: impl Into<String>) -> Self {
        Self::Action(message.into())
    }
}
