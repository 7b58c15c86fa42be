use std::error::Error;
use std::sync::Arc;

use warp::Filter;

use fieldmark::config::{get_optional_variable, get_variable};
use fieldmark::environment::{Config, Environment};
use fieldmark::routes;
use fieldmark::urls::Urls;
use futures::future::FutureExt;
use log::{info, initialize_logger};
use tokio::sync::mpsc;

const DEFAULT_LOCATIONS_PATH: &str = "locations";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    let main_port: u16 = get_variable("FIELDMARK_PORT")
        .parse()
        .expect("parse FIELDMARK_PORT as u16");
    let admin_port: u16 = get_variable("FIELDMARK_ADMIN_PORT")
        .parse()
        .expect("parse FIELDMARK_ADMIN_PORT as u16");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    let urls = Arc::new(Urls::new(
        get_variable("FIELDMARK_BASE_URL"),
        get_optional_variable("FIELDMARK_LOCATIONS_PATH")
            .unwrap_or_else(|| DEFAULT_LOCATIONS_PATH.to_owned()),
    ));

    let config = Config::from_env();
    info!(logger, "Configured session"; "config" => ?config);

    let environment = Environment::from_config(logger.clone(), urls, &config);

    if environment.geolocator.is_none() {
        info!(logger, "No host position configured; captures need a device report");
    }

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate = Arc::new(move || {
        let termination_sender = termination_sender.clone();

        async move {
            // a full channel means termination is already underway
            let _ = termination_sender.try_send(());
        }
        .boxed()
    });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let (_, main_server) = warp::serve(routes::make_api(environment.clone()))
            .bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully..."; "locations" => environment.tracker.len());

    Ok(())
}
