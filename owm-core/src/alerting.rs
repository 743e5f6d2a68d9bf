//! Local models of the OWM Alert API 3.0 resources.

pub mod alert;
pub mod channel;
pub mod condition;
pub mod document;
pub mod geo;
pub mod trigger;

pub use alert::{Alert, MetCondition};
pub use channel::AlertChannel;
pub use condition::{Condition, Operator, WeatherParameter};
pub use document::{load_trigger, parse_trigger};
pub use geo::{Geometry, Point, Position};
pub use trigger::{Trigger, TriggerBuilder};
