use serde::Serialize;

use crate::annotation::Annotation;
use crate::location::Location;
use crate::notify::Notification;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Discarded {
        discarded: usize,
    },
    Draft {
        id: String,
        draft: Annotation,
        species: Vec<String>,
    },
    Healthz {
        locations: usize,
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Locations {
        locations: Vec<Location>,
    },
    Notifications {
        notifications: Vec<Notification>,
    },
    Species {
        species: Vec<String>,
    },
}
