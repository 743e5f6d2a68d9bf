use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::{
    alerting::{Alert, AlertChannel, Condition, Geometry, WeatherParameter},
    error::{Error, Result},
    time::{TimeInput, to_iso8601, to_unix_time},
};

/// A check of a set of weather conditions over a geographic area, active
/// between `start` and `end`.
///
/// The trigger is the local proxy of an entry on the OWM API, so its alerts
/// go stale as conditions are met remotely. Whoever synchronizes it appends
/// fresh alerts with [`Trigger::push_alert`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    start: i64,
    end: i64,
    conditions: Vec<Condition>,
    area: Vec<Geometry>,
    alerts: Vec<Alert>,
    alert_channels: Vec<AlertChannel>,
}

impl Trigger {
    /// Build a trigger from all of its inputs at once.
    ///
    /// Fails when `start` does not strictly precede `end`, or when
    /// `conditions` or `area` is empty. Missing or empty `alert_channels`
    /// default to OWM API polling.
    pub fn new(
        start: impl Into<TimeInput>,
        end: impl Into<TimeInput>,
        conditions: Vec<Condition>,
        area: Vec<Geometry>,
        alerts: Option<Vec<Alert>>,
        alert_channels: Option<Vec<AlertChannel>>,
        id: Option<String>,
    ) -> Result<Self> {
        let mut builder =
            Trigger::builder().start(start).end(end).conditions(conditions).area(area);
        if let Some(alerts) = alerts {
            builder = builder.alerts(alerts);
        }
        if let Some(channels) = alert_channels {
            builder = builder.alert_channels(channels);
        }
        if let Some(id) = id {
            builder = builder.id(id);
        }
        builder.build()
    }

    pub fn builder() -> TriggerBuilder {
        TriggerBuilder::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Record the id assigned by the remote API.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn start_iso(&self) -> String {
        to_iso8601(self.start)
    }

    pub fn end_iso(&self) -> String {
        to_iso8601(self.end)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn area(&self) -> &[Geometry] {
        &self.area
    }

    pub fn alert_channels(&self) -> &[AlertChannel] {
        &self.alert_channels
    }

    /// All alerts fired for this trigger so far, in the order they were added.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// The alert with the given id, if any.
    ///
    /// Alert ids are not checked for uniqueness; with duplicates the earliest
    /// added alert wins.
    pub fn alert(&self, alert_id: &str) -> Option<&Alert> {
        let found = self.alerts.iter().find(|a| a.id() == alert_id);
        debug!(alert_id, found = found.is_some(), "alert lookup");
        found
    }

    /// Alerts updated at or after `timestamp`, in stored order.
    pub fn alerts_since(&self, timestamp: impl Into<TimeInput>) -> Result<Vec<&Alert>> {
        let since = to_unix_time(timestamp)?;
        Ok(self.alerts.iter().filter(|a| a.last_update() >= since).collect())
    }

    /// Alerts with at least one met condition on `weather_param`.
    pub fn alerts_on(&self, weather_param: WeatherParameter) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| a.refers_to(weather_param)).collect()
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trigger(id={}, start={}, end={}, alerts={})",
            self.id.as_deref().unwrap_or("None"),
            self.start_iso(),
            self.end_iso(),
            self.alerts.len()
        )
    }
}

/// Step-by-step construction of a [`Trigger`]; validation runs in
/// [`TriggerBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct TriggerBuilder {
    start: Option<TimeInput>,
    end: Option<TimeInput>,
    conditions: Vec<Condition>,
    area: Vec<Geometry>,
    alerts: Vec<Alert>,
    alert_channels: Vec<AlertChannel>,
    id: Option<String>,
}

impl TriggerBuilder {
    pub fn start(mut self, start: impl Into<TimeInput>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn end(mut self, end: impl Into<TimeInput>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn area(mut self, area: Vec<Geometry>) -> Self {
        self.area = area;
        self
    }

    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.area.push(geometry);
        self
    }

    pub fn alerts(mut self, alerts: Vec<Alert>) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn alert_channels(mut self, channels: Vec<AlertChannel>) -> Self {
        self.alert_channels = channels;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn build(self) -> Result<Trigger> {
        let start = self.start.ok_or_else(|| Error::invalid("a trigger needs a start time"))?;
        let end = self.end.ok_or_else(|| Error::invalid("a trigger needs an end time"))?;

        let start = to_unix_time(start)?;
        let end = to_unix_time(end)?;
        if start >= end {
            return Err(Error::invalid(format!(
                "the start epoch must precede the end epoch (start={start}, end={end})"
            )));
        }

        if self.conditions.is_empty() {
            return Err(Error::invalid(
                "a trigger must contain at least one condition: you provided none",
            ));
        }
        if self.area.is_empty() {
            return Err(Error::invalid(
                "the area of a trigger must contain at least one geoJSON type: you provided none",
            ));
        }

        let alert_channels = if self.alert_channels.is_empty() {
            vec![AlertChannel::owm_api_polling()]
        } else {
            self.alert_channels
        };

        debug!(
            id = ?self.id,
            start,
            end,
            conditions = self.conditions.len(),
            geometries = self.area.len(),
            "trigger built"
        );

        Ok(Trigger {
            id: self.id,
            start,
            end,
            conditions: self.conditions,
            area: self.area,
            alerts: self.alerts,
            alert_channels,
        })
    }
}
