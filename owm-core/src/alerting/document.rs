//! TOML documents describing a trigger and the alerts fetched for it.
//!
//! Example:
//!
//! ```toml
//! id = "5852816a9aaacb00153134a3"
//! start = "2017-09-01 10:00:00+00:00"
//! end = 1504346400
//! alert_channels = ["OWM API POLLING"]
//!
//! [[conditions]]
//! weather_param = "temp"
//! operator = "$gt"
//! amount = 299.7
//!
//! [[area]]
//! type = "Point"
//! coordinates = [53.0, 37.0]
//!
//! [[alerts]]
//! id = "5853dbe27416a400011b1b77"
//! last_update = 1481890787
//! coordinates = { lon = 53.0, lat = 37.0 }
//!
//! [[alerts.met_conditions]]
//! current_value = { min = 300.1, max = 300.1 }
//! condition = { weather_param = "temp", operator = "$gt", amount = 299.7 }
//! ```
//!
//! Every entity goes through the same constructors as in code, so a document
//! is subject to the same validation.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

use crate::{
    alerting::{
        Alert, AlertChannel, Condition, Geometry, MetCondition, Operator, Point, Trigger,
        WeatherParameter,
    },
    time::TimeInput,
};

/// Timestamps are either epoch integers or quoted ISO-8601 strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocTime {
    Epoch(i64),
    Text(String),
}

impl From<DocTime> for TimeInput {
    fn from(value: DocTime) -> Self {
        match value {
            DocTime::Epoch(ts) => TimeInput::Unix(ts),
            DocTime::Text(s) => TimeInput::Iso8601(s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocCondition {
    weather_param: WeatherParameter,
    operator: Operator,
    amount: f64,
    id: Option<String>,
}

impl DocCondition {
    fn into_condition(self) -> Result<Condition> {
        let condition = Condition::new(self.weather_param, self.operator, self.amount)?;
        Ok(match self.id {
            Some(id) => condition.with_id(id),
            None => condition,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocPoint {
    lon: f64,
    lat: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocMetCondition {
    condition: DocCondition,
    #[serde(default)]
    current_value: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocAlert {
    id: String,
    trigger_id: Option<String>,
    #[serde(default)]
    met_conditions: Vec<DocMetCondition>,
    coordinates: DocPoint,
    last_update: DocTime,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TriggerDocument {
    id: Option<String>,
    start: Option<DocTime>,
    end: Option<DocTime>,
    #[serde(default)]
    conditions: Vec<DocCondition>,
    #[serde(default)]
    area: Vec<Geometry>,
    #[serde(default)]
    alerts: Vec<DocAlert>,
    #[serde(default)]
    alert_channels: Vec<String>,
}

impl TriggerDocument {
    fn into_trigger(self) -> Result<Trigger> {
        let mut builder = Trigger::builder();

        if let Some(start) = self.start {
            builder = builder.start(start);
        }
        if let Some(end) = self.end {
            builder = builder.end(end);
        }

        for (i, doc) in self.conditions.into_iter().enumerate() {
            let condition =
                doc.into_condition().with_context(|| format!("Invalid condition #{i}"))?;
            builder = builder.condition(condition);
        }

        for (i, geometry) in self.area.into_iter().enumerate() {
            geometry.validate().with_context(|| format!("Invalid area entry #{i}"))?;
            builder = builder.geometry(geometry);
        }

        let mut alerts = Vec::with_capacity(self.alerts.len());
        for doc in self.alerts {
            let alert = alert_from_doc(doc, self.id.as_deref())?;
            alerts.push(alert);
        }
        builder = builder.alerts(alerts);

        builder = builder
            .alert_channels(self.alert_channels.into_iter().map(AlertChannel::new).collect());

        if let Some(id) = self.id {
            builder = builder.id(id);
        }

        Ok(builder.build()?)
    }
}

fn alert_from_doc(doc: DocAlert, trigger_id: Option<&str>) -> Result<Alert> {
    let alert_id = doc.id;

    let trigger_id = doc.trigger_id.or_else(|| trigger_id.map(str::to_owned)).ok_or_else(|| {
        anyhow!("Alert '{alert_id}' has no trigger_id and the document has no trigger id")
    })?;

    let met_conditions = doc
        .met_conditions
        .into_iter()
        .map(|m| -> Result<MetCondition> {
            Ok(MetCondition::new(m.condition.into_condition()?, m.current_value))
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Invalid met condition in alert '{alert_id}'"))?;

    let coordinates = Point::new(doc.coordinates.lon, doc.coordinates.lat)
        .with_context(|| format!("Invalid coordinates in alert '{alert_id}'"))?;

    Alert::new(alert_id.clone(), trigger_id, met_conditions, coordinates, doc.last_update)
        .with_context(|| format!("Invalid alert '{alert_id}'"))
}

/// Parse a trigger from TOML text.
pub fn parse_trigger(text: &str) -> Result<Trigger> {
    let doc: TriggerDocument = toml::from_str(text).context("Failed to parse trigger document")?;
    doc.into_trigger()
}

/// Read and parse a trigger document from disk.
pub fn load_trigger(path: &Path) -> Result<Trigger> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trigger file: {}", path.display()))?;

    parse_trigger(&contents)
        .with_context(|| format!("Invalid trigger file: {}", path.display()))
}
