use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    alerting::{Condition, Point, WeatherParameter},
    error::{Error, Result},
    time::{TimeInput, to_iso8601, to_unix_time},
};

/// A condition of a trigger together with the weather value that satisfied it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetCondition {
    pub condition: Condition,
    /// Observed value, keyed by statistic (e.g. `min`, `max`).
    pub current_value: BTreeMap<String, f64>,
}

impl MetCondition {
    pub fn new(condition: Condition, current_value: BTreeMap<String, f64>) -> Self {
        Self { condition, current_value }
    }
}

/// Record of one or more conditions of a trigger having been met.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    id: String,
    trigger_id: String,
    met_conditions: Vec<MetCondition>,
    coordinates: Point,
    last_update: i64,
}

impl Alert {
    pub fn new(
        id: impl Into<String>,
        trigger_id: impl Into<String>,
        met_conditions: Vec<MetCondition>,
        coordinates: Point,
        last_update: impl Into<TimeInput>,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::invalid("an alert needs a non-empty id"));
        }
        let trigger_id = trigger_id.into();
        if trigger_id.is_empty() {
            return Err(Error::invalid(format!("alert '{id}' needs a non-empty trigger id")));
        }
        let last_update = to_unix_time(last_update)?;

        Ok(Self { id, trigger_id, met_conditions, coordinates, last_update })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn trigger_id(&self) -> &str {
        &self.trigger_id
    }

    pub fn met_conditions(&self) -> &[MetCondition] {
        &self.met_conditions
    }

    pub fn coordinates(&self) -> Point {
        self.coordinates
    }

    pub fn last_update(&self) -> i64 {
        self.last_update
    }

    /// Whether any met condition of this alert is on `param`.
    pub fn refers_to(&self, param: WeatherParameter) -> bool {
        self.met_conditions.iter().any(|m| m.condition.weather_param() == param)
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Alert(id={}, trigger_id={}, last_update={}, met_conditions={})",
            self.id,
            self.trigger_id,
            to_iso8601(self.last_update),
            self.met_conditions.len()
        )
    }
}
