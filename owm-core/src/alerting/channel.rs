use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery mechanism through which alerts of a trigger reach the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertChannel {
    name: String,
}

impl AlertChannel {
    pub const OWM_API_POLLING: &'static str = "OWM API POLLING";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Alerts are fetched by polling the OWM API. Default for new triggers.
    pub fn owm_api_polling() -> Self {
        Self::new(Self::OWM_API_POLLING)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
