//! Stateless condition-action agent.
//!
//! A [`ReactiveAgent`] maps a condition key read from the observation payload
//! to an action generator. Unmatched keys fall back to an optional default
//! action; without a default the agent simply does nothing.

use crate::action::{Action, ActionResult};
use crate::agent::{Agent, AgentCore};
use crate::config::ReactiveConfig;
use crate::error::{Error, Result};
use crate::observation::Observation;
use crate::types::Payload;
use std::collections::HashMap;

/// Builds an action from an observation payload.
pub type ActionGenerator = Box<dyn Fn(&Payload) -> Result<Action> + Send + Sync>;

/// A rule-table agent that reacts to the most recent observation only.
///
/// The condition key is read from the payload:
/// - an object payload supplies the string at the configured condition field
///   (`"type"` by default);
/// - a string payload is its own key.
///
/// Any other shape fails with [`Error::MissingConditionKey`].
///
/// # Examples
///
/// ```
/// use autonomous_agents::{Action, Agent, Observation, ReactiveAgent};
/// use serde_json::json;
///
/// let mut agent = ReactiveAgent::new("thermostat");
/// agent.add_rule("hot", |data| {
///     Action::new("cool_down")
///         .with_param("target_temp", 20)
///         .with_param("current_temp", data["temperature"].clone())
/// });
///
/// let result = agent
///     .run_cycle(Observation::new(json!({"type": "hot", "temperature": 28})))
///     .unwrap()
///     .unwrap();
/// assert_eq!(result.action, "cool_down");
/// assert_eq!(result.parameters["target_temp"], 20);
/// ```
pub struct ReactiveAgent {
    core: AgentCore,
    config: ReactiveConfig,
    rules: HashMap<String, ActionGenerator>,
    default_action: Option<Action>,
    current_observation: Option<Observation>,
}

impl ReactiveAgent {
    /// Creates an agent with no rules that looks up keys under `"type"`.
    pub fn new(name: &str) -> Self {
        Self::with_config(ReactiveConfig::new(name))
    }

    /// Creates an agent from a configuration.
    pub fn with_config(config: ReactiveConfig) -> Self {
        log::info!(
            "reactive agent '{}' created (condition field '{}')",
            config.name,
            config.condition_field
        );
        Self {
            core: AgentCore::new(&config.name),
            config,
            rules: HashMap::new(),
            default_action: None,
            current_observation: None,
        }
    }

    /// Registers an infallible generator for `condition`, replacing any
    /// existing rule with the same key.
    pub fn add_rule<F>(&mut self, condition: &str, generator: F)
    where
        F: Fn(&Payload) -> Action + Send + Sync + 'static,
    {
        self.add_fallible_rule(condition, move |data| Ok(generator(data)));
    }

    /// Registers a generator that may fail. A failure surfaces from `decide`
    /// as [`Error::RuleFailed`] with the generator's error as its source. A
    /// generator that itself returns `RuleFailed` is passed through unchanged.
    pub fn add_fallible_rule<F>(&mut self, condition: &str, generator: F)
    where
        F: Fn(&Payload) -> Result<Action> + Send + Sync + 'static,
    {
        if self
            .rules
            .insert(condition.to_string(), Box::new(generator))
            .is_some()
        {
            log::debug!("agent '{}': rule '{}' replaced", self.core.name(), condition);
        }
    }

    /// Removes the rule for `condition`. Returns `true` if one existed.
    pub fn remove_rule(&mut self, condition: &str) -> bool {
        self.rules.remove(condition).is_some()
    }

    /// Returns `true` if a rule is registered for `condition`.
    pub fn has_rule(&self, condition: &str) -> bool {
        self.rules.contains_key(condition)
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Sets the action returned when no rule matches.
    pub fn set_default_action(&mut self, action: Action) {
        self.default_action = Some(action);
    }

    /// Removes the default action; unmatched observations then yield nothing.
    pub fn clear_default_action(&mut self) {
        self.default_action = None;
    }

    /// The action returned when no rule matches, if one is set.
    pub fn default_action(&self) -> Option<&Action> {
        self.default_action.as_ref()
    }

    /// The configuration this agent was built from.
    pub fn config(&self) -> &ReactiveConfig {
        &self.config
    }

    /// The observation the next `decide` will react to.
    pub fn current_observation(&self) -> Option<&Observation> {
        self.current_observation.as_ref()
    }

    /// Extracts the condition key from a payload.
    pub fn condition_key<'a>(&self, data: &'a Payload) -> Result<&'a str> {
        let key = match data {
            Payload::Object(map) => map
                .get(&self.config.condition_field)
                .and_then(Payload::as_str),
            Payload::String(s) => Some(s.as_str()),
            _ => None,
        };
        key.ok_or_else(|| Error::MissingConditionKey {
            field: self.config.condition_field.clone(),
        })
    }
}

impl Agent for ReactiveAgent {
    type Output = ActionResult;

    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn perceive(&mut self, observation: &Observation) -> Result<()> {
        self.current_observation = Some(observation.clone());
        Ok(())
    }

    fn decide(&mut self) -> Result<Option<Action>> {
        let Some(observation) = &self.current_observation else {
            return Ok(self.default_action.clone());
        };

        let data = observation.data();
        let key = self.condition_key(data)?;

        match self.rules.get(key) {
            Some(generator) => {
                log::debug!("agent '{}': rule '{}' matched", self.core.name(), key);
                generator(data).map(Some).map_err(|e| match e {
                    // A nested agent's rule failure already names its condition.
                    e @ Error::RuleFailed { .. } => e,
                    e => Error::RuleFailed {
                        condition: key.to_string(),
                        source: Box::new(e),
                    },
                })
            }
            None => {
                log::debug!(
                    "agent '{}': no rule for '{}', using {}",
                    self.core.name(),
                    key,
                    if self.default_action.is_some() {
                        "default action"
                    } else {
                        "no action"
                    }
                );
                Ok(self.default_action.clone())
            }
        }
    }

    fn act(&mut self, action: &Action) -> Result<ActionResult> {
        Ok(ActionResult::success(self.core.name(), action))
    }

    fn on_reset(&mut self) {
        self.current_observation = None;
    }
}
