use std::sync::Arc;
use std::time::Duration;

use log::Logger;

use crate::geolocation::{FixedGeolocator, Geolocator, PositionOptions, DEFAULT_TIMEOUT};
use crate::grid::{PlanarApproximation, Projection};
use crate::ids::IdScheme;
use crate::notify::{Outbox, DEFAULT_CAPACITY};
use crate::tracker::{SaveMode, Tracker};
use crate::urls::Urls;

/// The host's own position source, used when a capture request does not
/// carry a device report.
pub type SharedGeolocator = Arc<dyn Geolocator>;

#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub tracker: Arc<Tracker>,
    pub outbox: Arc<Outbox>,
    pub geolocator: Option<SharedGeolocator>,
    pub urls: Arc<Urls>,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        tracker: Arc<Tracker>,
        outbox: Arc<Outbox>,
        geolocator: Option<SharedGeolocator>,
        urls: Arc<Urls>,
    ) -> Self {
        Self {
            logger,
            tracker,
            outbox,
            geolocator,
            urls,
        }
    }

    /// Wires up a fresh session from `config`, projecting with
    /// [`PlanarApproximation`] and notifying through an [`Outbox`].
    pub fn from_config(logger: Arc<Logger>, urls: Arc<Urls>, config: &Config) -> Self {
        Self::with_projection(logger, urls, config, Arc::new(PlanarApproximation))
    }

    pub fn with_projection(
        logger: Arc<Logger>,
        urls: Arc<Urls>,
        config: &Config,
        projection: Arc<dyn Projection>,
    ) -> Self {
        let outbox = Arc::new(Outbox::new(logger.clone(), config.notification_capacity));
        let tracker = Arc::new(Tracker::new(
            logger.clone(),
            config.id_scheme.strategy(),
            projection,
            outbox.clone(),
            config.position_options(),
            config.save_mode,
        ));
        let geolocator = config
            .fixed_position
            .map(|fixed| Arc::new(fixed) as SharedGeolocator);

        Self::new(logger, tracker, outbox, geolocator, urls)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) id_scheme: IdScheme,
    pub(crate) save_mode: SaveMode,
    pub(crate) capture_timeout: Duration,
    pub(crate) fixed_position: Option<FixedGeolocator>,
    pub(crate) notification_capacity: usize,
}

impl Config {
    pub fn new(
        id_scheme: IdScheme,
        save_mode: SaveMode,
        capture_timeout: Duration,
        fixed_position: Option<FixedGeolocator>,
        notification_capacity: usize,
    ) -> Self {
        Self {
            id_scheme,
            save_mode,
            capture_timeout,
            fixed_position,
            notification_capacity,
        }
    }

    /// Reads the `FIELDMARK_*` variables, panicking on malformed values.
    pub fn from_env() -> Self {
        use crate::config::{get_optional_variable, parse_variable_or};

        let fixed_position = get_optional_variable("FIELDMARK_FIXED_POSITION").map(|value| {
            value
                .parse::<FixedGeolocator>()
                .unwrap_or_else(|e| panic!("parse FIELDMARK_FIXED_POSITION: {}", e))
        });

        Self::new(
            parse_variable_or("FIELDMARK_ID_SCHEME", IdScheme::default()),
            parse_variable_or("FIELDMARK_SAVE_MODE", SaveMode::default()),
            Duration::from_millis(parse_variable_or(
                "FIELDMARK_CAPTURE_TIMEOUT_MS",
                DEFAULT_TIMEOUT.as_millis() as u64,
            )),
            fixed_position,
            parse_variable_or("FIELDMARK_NOTIFICATION_CAPACITY", DEFAULT_CAPACITY),
        )
    }

    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            timeout: self.capture_timeout,
            ..PositionOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            IdScheme::default(),
            SaveMode::default(),
            DEFAULT_TIMEOUT,
            None,
            DEFAULT_CAPACITY,
        )
    }
}
