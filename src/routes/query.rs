use serde::Deserialize;

use crate::geolocation::DeviceReport;

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
}

/// The body of a capture request. Without a report the host's own
/// position source (if any) is used.
#[derive(Debug, Default, Deserialize)]
pub struct CaptureRequest {
    #[serde(default)]
    pub(crate) report: Option<DeviceReport>,
}
