//! # Autonomous Agents
//!
//! A small framework for agents that run a perceive-decide-act loop.
//!
//! ## Overview
//!
//! Every agent implements [`Agent`]: it perceives an [`Observation`], decides
//! on an optional [`Action`] and acts on it. The provided
//! [`Agent::run_cycle`] drives one full iteration and keeps the agent's
//! [`AgentState`] and history consistent. Two strategies ship with the crate:
//!
//! - [`ReactiveAgent`] maps a condition key in the observation to a rule.
//! - [`QLearningAgent`] learns action values with tabular Q-learning and
//!   picks actions epsilon-greedily.
//!
//! ## Lifecycle
//!
//! ```text
//!            ┌──────────────────────────────────────┐
//!            ▼                                      │
//!  ┌──────┐  perceive  ┌──────────┐  decide  ┌────────┐
//!  │ Idle │──────────►│ Thinking │─────────►│ Acting │
//!  └──────┘           └────┬─────┘          └────────┘
//!      ▲   no action       │  ▲ reward
//!      └───────────────────┤  │
//!                          ▼  │
//!                     ┌──────────┐
//!                     │ Learning │
//!                     └──────────┘
//! ```
//!
//! Any state may move to `Stopped` via [`Agent::terminate`]; only
//! [`Agent::reset`] brings a stopped agent back.
//!
//! ## Feature Flags
//!
//! - `std` (default): standard library support.
#![doc = include_str!("../README.md")]

pub mod action;
pub mod agent;
pub mod config;
pub mod error;
pub mod learning;
pub mod observation;
pub mod q_learning;
pub mod reactive;
pub mod types;

pub use action::{Action, ActionResult};
pub use agent::{Agent, AgentCore, AgentState};
pub use config::{QLearningConfig, ReactiveConfig};
pub use error::{Error, Result};
pub use learning::{
    ActionId, Experience, LearningAgent, QTable, QTableSummary, StateActionPair, StateId,
};
pub use observation::Observation;
pub use q_learning::{default_state_encoder, QLearningAgent, QStepResult, StateEncoder};
pub use reactive::{ActionGenerator, ReactiveAgent};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a reactive agent with no rules and the default condition field.
///
/// # Examples
///
/// ```
/// use autonomous_agents::{create_reactive_agent, Agent};
///
/// let agent = create_reactive_agent("thermostat");
/// assert_eq!(agent.name(), "thermostat");
/// assert_eq!(agent.rule_count(), 0);
/// ```
pub fn create_reactive_agent(name: &str) -> ReactiveAgent {
    ReactiveAgent::new(name)
}

/// Creates a Q-learning agent with `α = 0.1`, `γ = 0.9` and `ε = 0.1`.
///
/// Fails if `actions` is empty or contains duplicates.
///
/// # Examples
///
/// ```
/// use autonomous_agents::create_q_learning_agent;
///
/// let agent = create_q_learning_agent("walker", &["up", "down"]).unwrap();
/// assert_eq!(agent.exploration_rate(), 0.1);
/// assert!(create_q_learning_agent::<&str>("walker", &[]).is_err());
/// ```
pub fn create_q_learning_agent<S: AsRef<str>>(name: &str, actions: &[S]) -> Result<QLearningAgent> {
    QLearningAgent::with_actions(name, actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reactive_agent() {
        let agent = create_reactive_agent("reactive");
        assert_eq!(agent.name(), "reactive");
        assert_eq!(agent.state(), AgentState::Idle);
    }

    #[test]
    fn test_create_q_learning_agent() {
        let agent = create_q_learning_agent("q", &["a", "b"]).unwrap();
        assert_eq!(agent.name(), "q");
        assert_eq!(agent.actions().len(), 2);
        assert_eq!(agent.config().learning_rate, 0.1);
        assert_eq!(agent.config().discount_factor, 0.9);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
