//! Core library for the `citycast` CLI.
//!
//! This crate defines:
//! - City name → provider code resolution
//! - Parsing of the provider payload into a six-day forecast model
//! - Air quality bands and temperature curve geometry
//! - The transport seam and the service that ties it all together
//!
//! It is used by `citycast-cli`, but can also back any other front end: the
//! core never draws anything, it only hands out models and points.

pub mod aqi;
pub mod city;
pub mod condition;
pub mod config;
pub mod curve;
pub mod error;
pub mod fetch;
pub mod model;
pub mod parser;
pub mod service;

pub use aqi::{AqiCategory, Rgb};
pub use city::{CityCodeResolver, CityIndex, CitySource};
pub use config::{Config, CurveConfig};
pub use curve::{Curve, CurveBuilder, CurveKind, CurvePoint, LineStyle, Segment};
pub use error::{DataLoadError, ParseError, ResolveError, ServiceError, TransportError};
pub use fetch::{Fetcher, HttpFetcher};
pub use model::{DAY_COUNT, DaySummary, Forecast, TodaySummary};
pub use parser::{ForecastParser, ParseOutcome};
pub use service::WeatherService;
