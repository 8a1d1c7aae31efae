//! Action types.
//!
//! Actions are the output of an agent's decision step: a name, a bag of
//! parameters and a confidence score.

use crate::types::{Confidence, Payload};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named, parameterized decision produced by an agent.
///
/// # Examples
///
/// ```
/// # use autonomous_agents::Action;
/// let action = Action::new("cool_down")
///     .with_param("target_temp", 20)
///     .with_confidence(0.9);
///
/// assert_eq!(action.name(), "cool_down");
/// assert_eq!(action.param("target_temp"), Some(&serde_json::json!(20)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    name: String,
    #[serde(default)]
    parameters: HashMap<String, Payload>,
    #[serde(default)]
    confidence: Confidence,
}

impl Action {
    /// Creates an action with no parameters and full confidence.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: HashMap::new(),
            confidence: Confidence::CERTAIN,
        }
    }

    /// Adds a parameter to the action.
    pub fn with_param(mut self, key: &str, value: impl Into<Payload>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    /// Sets the confidence, clamped to `[0.0, 1.0]`.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Confidence::new(confidence);
        self
    }

    /// The action identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All parameters of the action.
    pub fn parameters(&self) -> &HashMap<String, Payload> {
        &self.parameters
    }

    /// Looks up a single parameter.
    pub fn param(&self, key: &str) -> Option<&Payload> {
        self.parameters.get(key)
    }

    /// The confidence score in `[0.0, 1.0]`.
    pub fn confidence(&self) -> f32 {
        self.confidence.value()
    }
}

/// The result of a reactive agent executing an [`Action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Name of the agent that executed the action.
    pub agent: String,
    /// Name of the executed action.
    pub action: String,
    /// The parameters the action was executed with.
    pub parameters: HashMap<String, Payload>,
    /// `true` if the action executed successfully.
    pub success: bool,
}

impl ActionResult {
    /// Creates a successful result for `action` executed by `agent`.
    pub fn success(agent: &str, action: &Action) -> Self {
        Self {
            agent: agent.to_string(),
            action: action.name().to_string(),
            parameters: action.parameters().clone(),
            success: true,
        }
    }
}
