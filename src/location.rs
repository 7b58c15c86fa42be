use serde::{Deserialize, Serialize};

use crate::grid::GridReference;
use crate::normalization::normalize_text;

/// A position as reported by the device.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Coords {
    /// Degrees north.
    pub latitude: f64,

    /// Degrees east.
    pub longitude: f64,

    /// Radius of uncertainty in metres.
    pub accuracy: f64,
}

/// A single recorded point.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Location {
    /// The reference shown to the user.
    pub(crate) id: String,

    /// Capture time in milliseconds since the Unix epoch.
    pub(crate) timestamp: i64,

    /// The raw device report.
    pub(crate) coords: Coords,

    /// The projected position, serialized as flat `eastings`/`northings`.
    #[serde(flatten)]
    pub(crate) grid: Option<GridReference>,

    /// The species recorded at this point, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) species: Option<String>,

    /// Free-text health status, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) health: Option<String>,
}

impl Location {
    pub fn new(id: String, timestamp: i64, coords: Coords, grid: Option<GridReference>) -> Self {
        Location {
            id,
            timestamp,
            coords,
            grid,
            species: None,
            health: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    pub fn grid(&self) -> Option<GridReference> {
        self.grid
    }

    pub fn species(&self) -> Option<&str> {
        self.species.as_deref()
    }

    pub fn health(&self) -> Option<&str> {
        self.health.as_deref()
    }

    /// Replaces the annotation fields. Geometry is never touched.
    pub(crate) fn apply(&mut self, details: Details) {
        self.species = details.species;
        self.health = details.health;
    }
}

/// The user-editable part of a [`Location`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Details {
    pub species: Option<String>,
    pub health: Option<String>,
}

impl Details {
    /// Normalizes both fields, treating blank text as absent.
    pub fn from_text(species: &str, health: &str) -> Self {
        Details {
            species: non_blank(species),
            health: non_blank(health),
        }
    }
}

fn non_blank(text: &str) -> Option<String> {
    let normalized = normalize_text(text);

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
