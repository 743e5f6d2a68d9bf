use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Weather variables a trigger condition can be set on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherParameter {
    #[serde(rename = "temp")]
    Temperature,
    #[serde(rename = "pressure")]
    Pressure,
    #[serde(rename = "humidity")]
    Humidity,
    #[serde(rename = "wind_speed")]
    WindSpeed,
    #[serde(rename = "wind_direction")]
    WindDirection,
    #[serde(rename = "clouds")]
    Clouds,
}

impl WeatherParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherParameter::Temperature => "temp",
            WeatherParameter::Pressure => "pressure",
            WeatherParameter::Humidity => "humidity",
            WeatherParameter::WindSpeed => "wind_speed",
            WeatherParameter::WindDirection => "wind_direction",
            WeatherParameter::Clouds => "clouds",
        }
    }

    pub const fn all() -> &'static [WeatherParameter] {
        &[
            WeatherParameter::Temperature,
            WeatherParameter::Pressure,
            WeatherParameter::Humidity,
            WeatherParameter::WindSpeed,
            WeatherParameter::WindDirection,
            WeatherParameter::Clouds,
        ]
    }
}

impl fmt::Display for WeatherParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WeatherParameter {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let lower = value.to_lowercase();

        WeatherParameter::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "Unknown weather parameter '{value}'. Supported: temp, pressure, humidity, \
                     wind_speed, wind_direction, clouds."
                ))
            })
    }
}

/// Comparison applied between an observed value and a condition's amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "$gt")]
    GreaterThan,
    #[serde(rename = "$gte")]
    GreaterThanEqual,
    #[serde(rename = "$lt")]
    LessThan,
    #[serde(rename = "$lte")]
    LessThanEqual,
    #[serde(rename = "$eq")]
    Equal,
    #[serde(rename = "$ne")]
    NotEqual,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::GreaterThan => "$gt",
            Operator::GreaterThanEqual => "$gte",
            Operator::LessThan => "$lt",
            Operator::LessThanEqual => "$lte",
            Operator::Equal => "$eq",
            Operator::NotEqual => "$ne",
        }
    }

    pub const fn all() -> &'static [Operator] {
        &[
            Operator::GreaterThan,
            Operator::GreaterThanEqual,
            Operator::LessThan,
            Operator::LessThanEqual,
            Operator::Equal,
            Operator::NotEqual,
        ]
    }

    /// Apply the comparison as `lhs <op> rhs`.
    pub fn evaluate(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Operator::GreaterThan => lhs > rhs,
            Operator::GreaterThanEqual => lhs >= rhs,
            Operator::LessThan => lhs < rhs,
            Operator::LessThanEqual => lhs <= rhs,
            Operator::Equal => lhs == rhs,
            Operator::NotEqual => lhs != rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Operator {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Operator::all()
            .iter()
            .copied()
            .find(|op| op.as_str() == value)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "Unknown operator '{value}'. Supported: $gt, $gte, $lt, $lte, $eq, $ne."
                ))
            })
    }
}

/// A single rule on the value of one weather parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    weather_param: WeatherParameter,
    operator: Operator,
    amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

impl Condition {
    pub fn new(weather_param: WeatherParameter, operator: Operator, amount: f64) -> Result<Self> {
        if !amount.is_finite() {
            return Err(Error::invalid(format!(
                "condition amount for '{weather_param}' must be a finite number, got {amount}"
            )));
        }

        Ok(Self { weather_param, operator, amount, id: None })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn weather_param(&self) -> WeatherParameter {
        self.weather_param
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether an observed value satisfies this condition.
    pub fn is_met_by(&self, value: f64) -> bool {
        self.operator.evaluate(value, self.amount)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.weather_param, self.operator, self.amount)
    }
}
