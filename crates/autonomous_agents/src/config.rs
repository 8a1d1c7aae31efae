//! Configuration for reactive and Q-learning agents.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for a [`ReactiveAgent`](crate::ReactiveAgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactiveConfig {
    /// The human-readable name of the agent.
    pub name: String,
    /// The payload field holding the condition key for rule lookup.
    #[serde(default = "default_condition_field")]
    pub condition_field: String,
}

fn default_condition_field() -> String {
    "type".to_string()
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            name: "reactive_agent".to_string(),
            condition_field: default_condition_field(),
        }
    }
}

impl ReactiveConfig {
    /// Creates a new configuration with a specified name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Looks up condition keys under `field` instead of `"type"`.
    pub fn with_condition_field(mut self, field: &str) -> Self {
        self.condition_field = field.to_string();
        self
    }
}

/// Configuration for a [`QLearningAgent`](crate::QLearningAgent).
///
/// Every field is checked by [`QLearningConfig::validate`] when the agent is
/// built; out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// The human-readable name of the agent.
    pub name: String,
    /// The available action names, in declaration order. Greedy ties go to
    /// the earliest action.
    pub actions: Vec<String>,
    /// The learning rate (alpha), in `(0, 1]`.
    #[serde(default = "defaults::learning_rate")]
    pub learning_rate: f64,
    /// The discount factor (gamma), in `[0, 1]`.
    #[serde(default = "defaults::discount_factor")]
    pub discount_factor: f64,
    /// The exploration rate (epsilon), in `[0, 1]`.
    #[serde(default = "defaults::exploration_rate")]
    pub exploration_rate: f64,
    /// Factor applied to epsilon at the end of every episode, in `(0, 1]`.
    /// `1.0` keeps epsilon fixed.
    #[serde(default = "defaults::epsilon_decay")]
    pub epsilon_decay: f64,
    /// The floor epsilon decays towards, in `[0, exploration_rate]`.
    #[serde(default)]
    pub epsilon_min: f64,
    /// Seed for the exploration RNG. `None` seeds from the thread RNG.
    #[serde(default)]
    pub seed: Option<u64>,
}

mod defaults {
    pub fn learning_rate() -> f64 {
        0.1
    }

    pub fn discount_factor() -> f64 {
        0.9
    }

    pub fn exploration_rate() -> f64 {
        0.1
    }

    pub fn epsilon_decay() -> f64 {
        1.0
    }
}

impl QLearningConfig {
    /// Creates a configuration with `α = 0.1`, `γ = 0.9`, `ε = 0.1`.
    pub fn new<S: AsRef<str>>(name: &str, actions: &[S]) -> Self {
        Self {
            name: name.to_string(),
            actions: actions.iter().map(|a| a.as_ref().to_string()).collect(),
            learning_rate: defaults::learning_rate(),
            discount_factor: defaults::discount_factor(),
            exploration_rate: defaults::exploration_rate(),
            epsilon_decay: defaults::epsilon_decay(),
            epsilon_min: 0.0,
            seed: None,
        }
    }

    /// A configuration that starts fully exploratory and decays towards `0.05`.
    pub fn exploratory<S: AsRef<str>>(name: &str, actions: &[S]) -> Self {
        Self {
            exploration_rate: 1.0,
            epsilon_decay: 0.99,
            epsilon_min: 0.05,
            ..Self::new(name, actions)
        }
    }

    /// A configuration that never explores.
    pub fn greedy<S: AsRef<str>>(name: &str, actions: &[S]) -> Self {
        Self {
            exploration_rate: 0.0,
            ..Self::new(name, actions)
        }
    }

    /// Parses a JSON configuration and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the learning rate (alpha).
    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the discount factor (gamma).
    pub fn with_discount_factor(mut self, factor: f64) -> Self {
        self.discount_factor = factor;
        self
    }

    /// Sets the exploration rate (epsilon).
    pub fn with_exploration_rate(mut self, rate: f64) -> Self {
        self.exploration_rate = rate;
        self
    }

    /// Sets the per-episode epsilon decay and its floor.
    pub fn with_epsilon_decay(mut self, decay: f64, min: f64) -> Self {
        self.epsilon_decay = decay;
        self.epsilon_min = min;
        self
    }

    /// Seeds the exploration RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every parameter against its valid interval.
    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(Error::Config("actions must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for action in &self.actions {
            if !seen.insert(action.as_str()) {
                return Err(Error::Config(format!("duplicate action '{}'", action)));
            }
        }

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::Config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        check_unit_interval("discount_factor", self.discount_factor)?;
        check_unit_interval("exploration_rate", self.exploration_rate)?;
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(Error::Config(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            )));
        }
        check_unit_interval("epsilon_min", self.epsilon_min)?;
        if self.epsilon_min > self.exploration_rate {
            return Err(Error::Config(format!(
                "epsilon_min {} exceeds exploration_rate {}",
                self.epsilon_min, self.exploration_rate
            )));
        }
        Ok(())
    }
}

/// Rejects NaN and anything outside `[0, 1]`.
pub(crate) fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVES: [&str; 2] = ["left", "right"];

    #[test]
    fn test_default_reactive_config() {
        let config = ReactiveConfig::default();
        assert_eq!(config.name, "reactive_agent");
        assert_eq!(config.condition_field, "type");

        let config = ReactiveConfig::new("thermostat").with_condition_field("kind");
        assert_eq!(config.name, "thermostat");
        assert_eq!(config.condition_field, "kind");
    }

    #[test]
    fn test_q_config_defaults() {
        let config = QLearningConfig::new("q", &MOVES);
        assert_eq!(config.actions, vec!["left", "right"]);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount_factor, 0.9);
        assert_eq!(config.exploration_rate, 0.1);
        assert_eq!(config.epsilon_decay, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_q_config_presets() {
        let config = QLearningConfig::exploratory("q", &MOVES);
        assert_eq!(config.exploration_rate, 1.0);
        assert!(config.validate().is_ok());

        let config = QLearningConfig::greedy("q", &MOVES);
        assert_eq!(config.exploration_rate, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_actions_rejected() {
        let config = QLearningConfig::new::<&str>("q", &[]);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_duplicate_actions_rejected() {
        let config = QLearningConfig::new("q", &["up", "up"]);
        assert!(matches!(config.validate(), Err(Error::Config(msg)) if msg.contains("up")));
    }

    #[test]
    fn test_rate_bounds() {
        let base = QLearningConfig::new("q", &MOVES);

        assert!(base.clone().with_learning_rate(0.0).validate().is_err());
        assert!(base.clone().with_learning_rate(1.0).validate().is_ok());
        assert!(base.clone().with_learning_rate(1.01).validate().is_err());
        assert!(base.clone().with_learning_rate(f64::NAN).validate().is_err());

        assert!(base.clone().with_discount_factor(0.0).validate().is_ok());
        assert!(base.clone().with_discount_factor(1.0).validate().is_ok());
        assert!(base.clone().with_discount_factor(-0.1).validate().is_err());

        assert!(base.clone().with_exploration_rate(0.0).validate().is_ok());
        assert!(base.clone().with_exploration_rate(1.0).validate().is_ok());
        assert!(base.clone().with_exploration_rate(1.5).validate().is_err());
        assert!(base.clone().with_exploration_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_epsilon_decay_bounds() {
        let base = QLearningConfig::new("q", &MOVES).with_exploration_rate(0.5);

        assert!(base.clone().with_epsilon_decay(0.9, 0.1).validate().is_ok());
        assert!(base.clone().with_epsilon_decay(0.0, 0.1).validate().is_err());
        assert!(base.clone().with_epsilon_decay(0.9, 0.6).validate().is_err());
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let config = QLearningConfig::from_json(
            r#"{"name": "grid", "actions": ["up", "down"], "exploration_rate": 0.2}"#,
        )
        .unwrap();

        assert_eq!(config.name, "grid");
        assert_eq!(config.exploration_rate, 0.2);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_from_json_validates() {
        let err = QLearningConfig::from_json(r#"{"name": "grid", "actions": []}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = QLearningConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
