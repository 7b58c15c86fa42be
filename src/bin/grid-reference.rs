use std::error::Error;

use log::{debug, initialize_logger};
use structopt::StructOpt;

use fieldmark::grid::{PlanarApproximation, Projection};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "grid-reference",
    about = "Print approximate eastings and northings for the given coordinates"
)]
struct Opt {
    /// Latitude in degrees north
    #[structopt(allow_hyphen_values = true)]
    latitude: f64,

    /// Longitude in degrees east (negative for west)
    #[structopt(allow_hyphen_values = true)]
    longitude: f64,

    /// Print JSON instead of `eastings northings`
    #[structopt(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    let logger = initialize_logger();

    let reference = PlanarApproximation.project(opt.latitude, opt.longitude);
    debug!(logger, "Projected coordinates"; "latitude" => opt.latitude, "longitude" => opt.longitude);

    if opt.json {
        println!("{}", serde_json::to_string(&reference)?);
    } else {
        println!("{} {}", reference.eastings, reference.northings);
    }

    Ok(())
}
