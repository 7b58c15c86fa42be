use std::time::{Duration, Instant};

use log::{debug, o};
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Json, Reply},
};

use crate::annotation::{Action, Annotation};
use crate::environment::Environment;
use crate::errors::TrackerError;
use crate::geolocation::Geolocator;
use crate::routes::{
    query::{CaptureRequest, GridQuery},
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::tracker::Tracker;

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn list(environment: Environment) -> RouteResult {
    timed! {
        let locations = environment.tracker.list();

        json(&SuccessResponse::Locations { locations })
    }
}

pub async fn capture(environment: Environment, request: CaptureRequest) -> RouteResult {
    timed! {
        let Environment {
            logger,
            tracker,
            geolocator,
            urls,
            ..
        } = environment;

        let error_handler = |e: TrackerError| Rejection::new(Context::capture(), e);

        // a report from the client's device wins over the host's own source
        let source = request
            .report
            .as_ref()
            .map(|report| report as &dyn Geolocator)
            .or_else(|| geolocator.as_deref());

        debug!(logger, "Capturing location..."; "reported" => request.report.is_some(), "available" => source.is_some());
        let location = tracker.capture(source).await.map_err(error_handler)?;

        let logger = logger.new(o!("id" => location.id().to_owned()));
        debug!(logger, "Sending response...");

        with_header(
            with_status(json(&location), StatusCode::CREATED),
            "location",
            urls.location(location.id()).as_str(),
        )
    }
}

pub async fn discard(environment: Environment) -> RouteResult {
    timed! {
        let discarded = environment.tracker.discard();

        json(&SuccessResponse::Discarded { discarded })
    }
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let location = environment
            .tracker
            .get(&id)
            .map_err(|e| Rejection::new(Context::retrieve(id.clone()), e))?;

        json(&location)
    }
}

pub async fn species(environment: Environment) -> RouteResult {
    timed! {
        let species = environment.tracker.existing_species();

        json(&SuccessResponse::Species { species })
    }
}

pub async fn notifications(environment: Environment) -> RouteResult {
    timed! {
        let notifications = environment.outbox.drain();

        json(&SuccessResponse::Notifications { notifications })
    }
}

pub async fn grid(environment: Environment, query: GridQuery) -> RouteResult {
    timed! {
        let GridQuery { latitude, longitude } = query;

        json(&environment.tracker.project(latitude, longitude))
    }
}

pub async fn draft(environment: Environment, id: String) -> RouteResult {
    timed! {
        let draft = environment
            .tracker
            .draft(&id)
            .map_err(|e| Rejection::new(Context::draft(id.clone()), e))?;

        draft_response(&environment.tracker, id, draft)
    }
}

pub async fn annotate(environment: Environment, id: String, action: Action) -> RouteResult {
    timed! {
        debug!(environment.logger, "Annotating location..."; "id" => &id, "action" => ?action);

        let draft = environment
            .tracker
            .annotate(&id, action)
            .map_err(|e| Rejection::new(Context::annotate(id.clone()), e))?;

        draft_response(&environment.tracker, id, draft)
    }
}

pub async fn save(environment: Environment, id: String) -> RouteResult {
    timed! {
        let location = environment
            .tracker
            .save_details(&id)
            .map_err(|e| Rejection::new(Context::save(id.clone()), e))?;

        json(&location)
    }
}

/// Renders a draft together with the species it can choose from.
fn draft_response(tracker: &Tracker, id: String, draft: Annotation) -> Json {
    json(&SuccessResponse::Draft {
        id,
        draft,
        species: tracker.existing_species(),
    })
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
