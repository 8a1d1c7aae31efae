//! Error types for the agent framework.

use crate::agent::AgentState;

/// A specialized `Result` type for agent operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The primary error enum for all operations within the `autonomous_agents` crate.
#[derive(Debug)]
pub enum Error {
    /// The agent was constructed or reconfigured with invalid parameters.
    Config(String),
    /// A reactive agent could not extract a condition key from the observation payload.
    MissingConditionKey {
        /// The payload field the key was looked up under.
        field: String,
    },
    /// A rule's action generator failed while building an action.
    RuleFailed {
        /// The condition key of the failing rule.
        condition: String,
        /// The error the generator returned.
        source: Box<Error>,
    },
    /// An action could not be executed.
    Action(String),
    /// `learn` was called without a preceding `decide`.
    NoPendingDecision,
    /// `learn` was called with a NaN or infinite reward.
    NonFiniteReward(f64),
    /// A lifecycle transition that the state machine does not allow.
    InvalidTransition {
        /// The state the agent was in.
        from: AgentState,
        /// The state that was requested.
        to: AgentState,
    },
    /// A cycle was requested on a stopped agent.
    Stopped(String),
    /// An unexpected internal error, which may indicate a bug.
    Internal(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(s) => write!(f, "Configuration error: {}", s),
            Error::MissingConditionKey { field } => {
                write!(f, "Observation payload has no condition key at '{}'", field)
            }
            Error::RuleFailed { condition, source } => {
                write!(f, "Rule '{}' failed: {}", condition, source)
            }
            Error::Action(s) => write!(f, "Action error: {}", s),
            Error::NoPendingDecision => {
                write!(f, "Learning error: no decision is pending a reward")
            }
            Error::NonFiniteReward(r) => write!(f, "Learning error: reward {} is not finite", r),
            Error::InvalidTransition { from, to } => {
                write!(f, "Invalid state transition: {} -> {}", from, to)
            }
            Error::Stopped(name) => write!(f, "Agent '{}' is stopped", name),
            Error::Internal(s) => write!(f, "Internal error: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::RuleFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(e.to_string())
    }
}
