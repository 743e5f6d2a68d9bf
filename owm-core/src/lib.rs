//! Core library for the OpenWeatherMap alerting client.
//!
//! This crate defines:
//! - Local models of alerting resources (triggers, alerts, conditions, channels)
//! - Normalization of the time shapes the API accepts
//! - The registry of image types the API can deliver
//! - Configuration handling
//!
//! It is used by `owm-cli`, but can also be reused by other binaries or services.

pub mod alerting;
pub mod config;
pub mod error;
pub mod image_type;
pub mod time;

pub use alerting::{
    Alert, AlertChannel, Condition, Geometry, MetCondition, Operator, Point, Trigger,
    WeatherParameter,
};
pub use config::Config;
pub use error::{Error, Result};
pub use image_type::ImageType;
pub use time::{TimeInput, to_iso8601, to_unix_time};
