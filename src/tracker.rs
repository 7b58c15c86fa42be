use std::collections::{BTreeSet, HashMap, VecDeque};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info, o, warn, Logger};
use time::OffsetDateTime;

use crate::annotation::{reduce, Action, Annotation};
use crate::errors::{ConfigError, GeolocationError, TrackerError};
use crate::geolocation::{Geolocator, Position, PositionOptions};
use crate::grid::{GridReference, Projection};
use crate::ids::IdStrategy;
use crate::location::Location;
use crate::notify::{Notification, Notifier};

/// How many times to ask the id strategy for an unused reference.
const ID_ATTEMPTS: usize = 5;

/// What "save" does with an annotation draft.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SaveMode {
    /// Write the draft back into the session.
    Persist,

    /// Only confirm; the session keeps its previous details.
    Cosmetic,
}

impl Default for SaveMode {
    fn default() -> Self {
        SaveMode::Persist
    }
}

impl FromStr for SaveMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "persist" => Ok(SaveMode::Persist),
            "cosmetic" => Ok(SaveMode::Cosmetic),
            _ => Err(ConfigError::UnknownSaveMode(s.to_owned())),
        }
    }
}

/// The in-memory state of one surveying session.
#[derive(Default)]
struct Session {
    /// Bumped whenever the session is discarded, so that captures started
    /// before the discard can tell their result is no longer wanted.
    generation: u64,

    /// Newest first.
    locations: VecDeque<Location>,

    drafts: HashMap<String, Annotation>,
}

/// Records locations and their annotations for a single session.
pub struct Tracker {
    logger: Arc<Logger>,
    ids: Arc<dyn IdStrategy>,
    projection: Arc<dyn Projection>,
    notifier: Arc<dyn Notifier>,
    options: PositionOptions,
    save_mode: SaveMode,
    session: RwLock<Session>,
    capturing: AtomicBool,
}

impl Tracker {
    pub fn new(
        logger: Arc<Logger>,
        ids: Arc<dyn IdStrategy>,
        projection: Arc<dyn Projection>,
        notifier: Arc<dyn Notifier>,
        options: PositionOptions,
        save_mode: SaveMode,
    ) -> Self {
        Tracker {
            logger,
            ids,
            projection,
            notifier,
            options,
            save_mode,
            session: RwLock::new(Session::default()),
            capturing: AtomicBool::new(false),
        }
    }

    /// Queries `geolocator` once and records the result as the newest
    /// location. `None` means the host has no way to determine a position.
    ///
    /// Failures leave the session untouched. Both outcomes of the query
    /// are reported through the notifier.
    pub async fn capture(&self, geolocator: Option<&dyn Geolocator>) -> Result<Location, TrackerError> {
        let result = self.try_capture(geolocator).await;

        match &result {
            Ok(location) => {
                info!(self.logger, "Location recorded"; "id" => location.id());
                self.notifier.notify(Notification::new(
                    "Location Recorded",
                    format!("Reference: {}", location.id()),
                ));
            }
            Err(e) if e.is_user_facing() => {
                warn!(self.logger, "Capture failed"; "error" => %e);
                self.notifier
                    .notify(Notification::destructive("Error", e.to_string()));
            }
            Err(e) => {
                debug!(self.logger, "Capture refused"; "error" => %e);
            }
        }

        result
    }

    async fn try_capture(&self, geolocator: Option<&dyn Geolocator>) -> Result<Location, TrackerError> {
        let geolocator = geolocator.ok_or(GeolocationError::Unsupported)?;
        let _guard = CaptureGuard::acquire(&self.capturing).ok_or(TrackerError::CaptureInProgress)?;
        let generation = self.read().generation;

        debug!(self.logger, "Requesting position..."; "timeout_ms" => self.options.timeout.as_millis() as u64);
        let position = tokio::time::timeout(self.options.timeout, geolocator.current_position(self.options))
            .await
            .map_err(|_| GeolocationError::deadline_expired())??;

        self.record(generation, position, now_millis())
    }

    fn record(&self, generation: u64, position: Position, timestamp: i64) -> Result<Location, TrackerError> {
        let coords = position.coords;
        let grid = self.projection.project(coords.latitude, coords.longitude);

        let mut session = self.write();

        if session.generation != generation {
            return Err(TrackerError::Discarded);
        }

        let id = self.unused_id(&session, timestamp)?;
        let location = Location::new(id, timestamp, coords, Some(grid));

        session
            .drafts
            .insert(location.id().to_owned(), Annotation::for_location(&location));
        session.locations.push_front(location.clone());

        Ok(location)
    }

    fn unused_id(&self, session: &Session, timestamp: i64) -> Result<String, TrackerError> {
        // every recorded id has a draft, so the draft map doubles as an index
        let existing = session.locations.len();
        let mut id = self.ids.generate(existing, timestamp);

        for attempt in 1..ID_ATTEMPTS {
            if !session.drafts.contains_key(&id) {
                return Ok(id);
            }

            warn!(self.logger, "Reference already taken, retrying..."; "id" => &id, "attempt" => attempt);
            id = self.ids.generate(existing, timestamp);
        }

        if session.drafts.contains_key(&id) {
            Err(TrackerError::IdCollision(id))
        } else {
            Ok(id)
        }
    }

    /// Projects coordinates the same way captures are projected.
    pub fn project(&self, latitude: f64, longitude: f64) -> GridReference {
        self.projection.project(latitude, longitude)
    }

    /// Every location in the session, newest first.
    pub fn list(&self) -> Vec<Location> {
        self.read().locations.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Result<Location, TrackerError> {
        self.read()
            .locations
            .iter()
            .find(|location| location.id() == id)
            .cloned()
            .ok_or_else(|| TrackerError::UnknownLocation(id.to_owned()))
    }

    /// The distinct, non-empty species already recorded in the session.
    /// Sorted for stable output, though callers should not depend on it.
    pub fn existing_species(&self) -> Vec<String> {
        self.read()
            .locations
            .iter()
            .filter_map(|location| location.species())
            .filter(|species| !species.is_empty())
            .map(str::to_owned)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The current annotation draft for `id`.
    pub fn draft(&self, id: &str) -> Result<Annotation, TrackerError> {
        self.read()
            .drafts
            .get(id)
            .cloned()
            .ok_or_else(|| TrackerError::UnknownLocation(id.to_owned()))
    }

    /// Applies one form interaction to the draft for `id`. The recorded
    /// location itself is not changed.
    pub fn annotate(&self, id: &str, action: Action) -> Result<Annotation, TrackerError> {
        let mut session = self.write();
        let draft = session
            .drafts
            .get_mut(id)
            .ok_or_else(|| TrackerError::UnknownLocation(id.to_owned()))?;

        *draft = reduce(draft, action);

        Ok(draft.clone())
    }

    /// Confirms the draft for `id`, writing it into the session when the
    /// tracker is configured to persist.
    pub fn save_details(&self, id: &str) -> Result<Location, TrackerError> {
        let location = {
            let mut session = self.write();
            let Session {
                locations, drafts, ..
            } = &mut *session;

            let details = drafts
                .get(id)
                .map(Annotation::details)
                .ok_or_else(|| TrackerError::UnknownLocation(id.to_owned()))?;
            let location = locations
                .iter_mut()
                .find(|location| location.id() == id)
                .ok_or_else(|| TrackerError::UnknownLocation(id.to_owned()))?;

            if self.save_mode == SaveMode::Persist {
                location.apply(details);
            }

            location.clone()
        };

        let logger = self.logger.new(o!("id" => id.to_owned()));
        debug!(logger, "Details saved"; "persisted" => self.save_mode == SaveMode::Persist);
        self.notifier.notify(Notification::new(
            "Details Updated",
            "Location details have been saved",
        ));

        Ok(location)
    }

    /// Drops every location and draft, returning how many locations were
    /// discarded. Captures still pending will not be recorded.
    pub fn discard(&self) -> usize {
        let mut session = self.write();
        let discarded = session.locations.len();

        session.generation += 1;
        session.locations.clear();
        session.drafts.clear();

        info!(self.logger, "Session discarded"; "discarded" => discarded);

        discarded
    }

    fn read(&self) -> RwLockReadGuard<Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the capture flag for as long as it lives.
struct CaptureGuard<'a>(&'a AtomicBool);

impl<'a> CaptureGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CaptureGuard(flag))
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
