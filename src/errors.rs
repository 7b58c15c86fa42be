use thiserror::Error;

const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported on this host";

/// Enumerates the ways a single position query can fail. The device's
/// own message is carried verbatim so it can be shown to the user.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeolocationError {
    /// No geolocation capability is available at all.
    #[error("{}", UNSUPPORTED_MESSAGE)]
    Unsupported,

    /// The user or platform refused access to the position.
    #[error("{0}")]
    PermissionDenied(String),

    /// No fix arrived before the deadline.
    #[error("{0}")]
    Timeout(String),

    /// The device could not determine a position.
    #[error("{0}")]
    PositionUnavailable(String),
}

impl GeolocationError {
    /// Maps a W3C `GeolocationPositionError.code` onto the taxonomy.
    /// Unknown codes are treated as an unavailable position.
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();

        match code {
            1 => GeolocationError::PermissionDenied(message),
            3 => GeolocationError::Timeout(message),
            _ => GeolocationError::PositionUnavailable(message),
        }
    }

    pub(crate) fn deadline_expired() -> Self {
        GeolocationError::Timeout("Timeout expired".to_owned())
    }
}

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Represents a failed position query.
    #[error(transparent)]
    Geolocation {
        #[from]
        source: GeolocationError,
    },

    /// Represents an attempt to capture while another capture is pending.
    #[error("a capture is already in progress")]
    CaptureInProgress,

    /// Represents a lookup for a reference that was never recorded.
    #[error("no location with reference {0}")]
    UnknownLocation(String),

    /// Represents a capture that finished after its session was discarded.
    #[error("session was discarded while the capture was pending")]
    Discarded,

    /// Represents a reference id generator that kept producing taken ids.
    #[error("could not generate a unique reference (last attempt: {0})")]
    IdCollision(String),
}

impl TrackerError {
    /// Whether this error is one the user should be told about through a
    /// notification, as opposed to a protocol-level refusal.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, TrackerError::Geolocation { .. })
    }
}

/// Enumerates malformed configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Represents an id scheme other than `sequential` or `timestamp`.
    #[error("unknown id scheme {0:?} (expected sequential or timestamp)")]
    UnknownIdScheme(String),

    /// Represents a save mode other than `persist` or `cosmetic`.
    #[error("unknown save mode {0:?} (expected persist or cosmetic)")]
    UnknownSaveMode(String),

    /// Represents a fixed position that is not three comma-separated numbers.
    #[error("fixed position {0:?} must be latitude,longitude,accuracy")]
    MalformedPosition(String),
}
