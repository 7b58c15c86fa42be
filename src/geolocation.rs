use std::str::FromStr;
use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, GeolocationError};
use crate::location::Coords;

/// The default deadline for a single position query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Options passed along with every position query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,

    /// How old a cached fix may be. Zero means always take a fresh one.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        PositionOptions {
            enable_high_accuracy: true,
            timeout: DEFAULT_TIMEOUT,
            maximum_age: Duration::from_millis(0),
        }
    }
}

/// A successful position fix.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Position {
    pub coords: Coords,
}

/// A single-shot source of the device's current position.
pub trait Geolocator: Send + Sync {
    fn current_position(&self, options: PositionOptions) -> BoxFuture<Result<Position, GeolocationError>>;
}

/// The error half of a device report, shaped like a W3C
/// `GeolocationPositionError`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ReportedError {
    pub code: u16,
    pub message: String,
}

/// The outcome of a position query performed on the client's device and
/// forwarded with a capture request.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceReport {
    Position(Position),
    Error(ReportedError),
}

impl Geolocator for DeviceReport {
    fn current_position(&self, _options: PositionOptions) -> BoxFuture<Result<Position, GeolocationError>> {
        let result = match self {
            DeviceReport::Position(position) => Ok(*position),
            DeviceReport::Error(ReportedError { code, message }) => {
                Err(GeolocationError::from_code(*code, message.clone()))
            }
        };

        future::ready(result).boxed()
    }
}

/// A host that never moves, such as a surveying station with a known fix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedGeolocator {
    position: Position,
}

impl FixedGeolocator {
    pub fn new(coords: Coords) -> Self {
        FixedGeolocator {
            position: Position { coords },
        }
    }
}

impl Geolocator for FixedGeolocator {
    fn current_position(&self, _options: PositionOptions) -> BoxFuture<Result<Position, GeolocationError>> {
        future::ready(Ok(self.position)).boxed()
    }
}

/// Parses `latitude,longitude,accuracy`.
impl FromStr for FixedGeolocator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedPosition(s.to_owned());
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;

        match parts.as_slice() {
            [latitude, longitude, accuracy] => Ok(FixedGeolocator::new(Coords {
                latitude: *latitude,
                longitude: *longitude,
                accuracy: *accuracy,
            })),
            _ => Err(malformed()),
        }
    }
}
