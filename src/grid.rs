use serde::{Deserialize, Serialize};

/// Metres per degree of latitude used by the planar approximation.
const METRES_PER_DEGREE: f64 = 111_320.0;

/// Meridian (degrees east) at which eastings are zero.
const ORIGIN_LONGITUDE: f64 = -2.0;

/// Parallel (degrees north) at which northings are zero.
const ORIGIN_LATITUDE: f64 = 49.0;

/// A projected position on a planar grid, in whole metres.
///
/// Both components always come from the same latitude/longitude pair, so
/// they are kept in one value and never set independently.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct GridReference {
    pub eastings: i64,
    pub northings: i64,
}

/// Converts geographic coordinates (degrees) into a grid reference.
pub trait Projection: Send + Sync {
    fn project(&self, latitude: f64, longitude: f64) -> GridReference;
}

/// A local planar approximation anchored at 49°N 2°W, the true origin of
/// the British national grid.
///
/// This is **not** an OSGB36 conversion: there is no Airy 1830 ellipsoid,
/// no Helmert shift and no false origin. Distances near the origin are
/// roughly right; anything further away is only indicative. Inputs are not
/// validated, so out-of-range coordinates produce defined but meaningless
/// output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarApproximation;

impl Projection for PlanarApproximation {
    fn project(&self, latitude: f64, longitude: f64) -> GridReference {
        let eastings =
            (longitude - ORIGIN_LONGITUDE) * METRES_PER_DEGREE * latitude.to_radians().cos();
        let northings = (latitude - ORIGIN_LATITUDE) * METRES_PER_DEGREE;

        GridReference {
            eastings: eastings.floor() as i64,
            northings: northings.floor() as i64,
        }
    }
}

/// Projects with [`PlanarApproximation`].
///
/// ```
/// use fieldmark::grid::{transform, GridReference};
/// assert_eq!(transform(49.0, -2.0), GridReference { eastings: 0, northings: 0 });
/// ```
pub fn transform(latitude: f64, longitude: f64) -> GridReference {
    PlanarApproximation.project(latitude, longitude)
}
