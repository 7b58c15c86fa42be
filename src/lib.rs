pub mod annotation;
pub mod config;
pub mod environment;
pub mod errors;
pub mod geolocation;
pub mod grid;
pub mod ids;
pub mod location;
pub mod normalization;
pub mod notify;
pub mod routes;
pub mod tracker;
pub mod urls;
