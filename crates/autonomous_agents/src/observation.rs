//! Observation types.
//!
//! Observations carry what an agent perceives from its environment. They are
//! immutable once built: consumers read them through accessors and never
//! alter the payload.

use crate::types::{Payload, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single, timestamped piece of environmental input.
///
/// # Examples
///
/// ```
/// # use autonomous_agents::Observation;
/// # use serde_json::json;
/// let obs = Observation::new(json!({"type": "hot", "temperature": 28}))
///     .with_metadata("sensor_id", "thermo_01");
///
/// assert_eq!(obs.data()["type"], "hot");
/// assert!(obs.metadata().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    data: Payload,
    timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<HashMap<String, Payload>>,
}

impl Observation {
    /// Creates an observation stamped with the current time.
    pub fn new(data: impl Into<Payload>) -> Self {
        Self::at(data, Timestamp::now())
    }

    /// Creates an observation with an explicit timestamp.
    pub fn at(data: impl Into<Payload>, timestamp: Timestamp) -> Self {
        Self {
            data: data.into(),
            timestamp,
            metadata: None,
        }
    }

    /// Attaches a metadata entry while the observation is being built.
    pub fn with_metadata(mut self, key: &str, value: impl Into<Payload>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value.into());
        self
    }

    /// The observed payload.
    pub fn data(&self) -> &Payload {
        &self.data
    }

    /// When the observation was made.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Optional metadata attached by the producer.
    pub fn metadata(&self) -> Option<&HashMap<String, Payload>> {
        self.metadata.as_ref()
    }

    /// Looks up a single metadata entry.
    pub fn metadata_value(&self, key: &str) -> Option<&Payload> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    /// Returns the age of the observation in seconds.
    pub fn age_secs(&self) -> u64 {
        self.timestamp.age_secs()
    }
}
