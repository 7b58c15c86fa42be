use std::sync::Arc;

use log::{error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::{GeolocationError, TrackerError};

pub mod admin;
mod handlers;
mod query;
mod rejection;
mod response;

pub use internal::*;

/// The maximum request body to accept. Capture requests and form actions
/// are tiny, so anything larger is a client bug.
const MAX_CONTENT_LENGTH: u64 = 64 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(logger, "Tracker error"; "context" => ?r.context, "error" => ?r.error, "status" => %status_code_for(e), "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    Err(rej)
}

fn status_code_for(e: &TrackerError) -> StatusCode {
    use TrackerError::*;

    match e {
        Geolocation { source } => match source {
            GeolocationError::Unsupported => StatusCode::NOT_IMPLEMENTED,
            GeolocationError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            GeolocationError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GeolocationError::PositionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        CaptureInProgress | Discarded => StatusCode::CONFLICT,
        UnknownLocation(..) => StatusCode::NOT_FOUND,
        IdCollision(..) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Every location route, with tracker errors rendered as JSON.
pub fn make_api(
    environment: Environment,
) -> impl Filter<Extract = (impl warp::Reply,), Error = reject::Rejection> + Clone {
    let logger = environment.logger.clone();

    make_species_route(environment.clone())
        .or(make_notifications_route(environment.clone()))
        .or(make_grid_route(environment.clone()))
        .or(make_list_route(environment.clone()))
        .or(make_capture_route(environment.clone()))
        .or(make_discard_route(environment.clone()))
        .or(make_retrieve_route(environment.clone()))
        .or(make_draft_route(environment.clone()))
        .or(make_annotate_route(environment.clone()))
        .or(make_save_route(environment))
        .recover(move |r| format_rejection(logger.clone(), r))
}

mod internal {
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{body, delete, get as g, path as p, path::param as par, post, query};

    use super::{handlers, query as q, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let r = environment.urls.locations_path.clone();

            let $route_variable = warp::any()
                .map(move || environment.clone())
                .and(p(r));

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_list_route => list, rt; end(), g());
    route!(make_capture_route => capture, rt; end(), post(), body::content_length_limit(MAX_CONTENT_LENGTH), body::json());
    route!(make_discard_route => discard, rt; end(), delete());
    route!(make_species_route => species, rt; p("species"), end(), g());
    route!(make_notifications_route => notifications, rt; p("notifications"), end(), g());
    route!(make_grid_route => grid, rt; p("grid"), end(), g(), query::<q::GridQuery>());
    route!(make_retrieve_route => retrieve, rt; p("id"), par::<String>(), end(), g());
    route!(make_draft_route => draft, rt; p("id"), par::<String>(), p("draft"), end(), g());
    route!(make_annotate_route => annotate, rt; p("id"), par::<String>(), p("draft"), end(), post(), body::content_length_limit(MAX_CONTENT_LENGTH), body::json());
    route!(make_save_route => save, rt; p("id"), par::<String>(), p("save"), end(), post());
}
