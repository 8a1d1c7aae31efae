//! The perceive-decide-act loop shared by every agent strategy.
//!
//! ```text
//!            run_cycle(observation)
//!  IDLE ──► THINKING ──perceive──decide──┬── no action ──► IDLE
//!                                        └── action ──► ACTING ──act──► IDLE
//! ```
//!
//! Strategies implement [`Agent::perceive`], [`Agent::decide`] and
//! [`Agent::act`]; the lifecycle state and the histories live in an
//! [`AgentCore`] that only the loop itself mutates.

use crate::action::Action;
use crate::error::{Error, Result};
use crate::observation::Observation;
use serde::{Deserialize, Serialize};

/// The lifecycle state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgentState {
    /// Waiting for the next observation.
    #[default]
    Idle,
    /// Perceiving and deciding.
    Thinking,
    /// Executing a decided action.
    Acting,
    /// Applying a reward to learned values.
    Learning,
    /// Terminated; only `reset` brings the agent back.
    Stopped,
}

impl AgentState {
    /// Returns `true` if the loop may move from `self` to `to`.
    ///
    /// `Stopped` is reachable from every state. Leaving `Stopped` is only
    /// possible through a reset, which bypasses this check. `Learning` is
    /// only entered from `Thinking` during a feedback cycle; a direct
    /// `learn` call leaves the lifecycle untouched.
    pub fn can_transition_to(self, to: AgentState) -> bool {
        use AgentState::*;

        matches!(
            (self, to),
            (_, Stopped)
                | (Idle, Thinking)
                | (Thinking, Acting)
                | (Thinking, Idle)
                | (Thinking, Learning)
                | (Learning, Thinking)
                | (Acting, Idle)
        )
    }

    /// Lowercase name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentState::Idle => "idle",
            AgentState::Thinking => "thinking",
            AgentState::Acting => "acting",
            AgentState::Learning => "learning",
            AgentState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity, lifecycle state and history owned by a single agent.
///
/// Histories are append-only while the agent runs and are exposed as
/// read-only slices. They grow without bound; callers that need bounded
/// memory should `reset` the agent periodically.
#[derive(Debug, Clone)]
pub struct AgentCore {
    name: String,
    state: AgentState,
    observations: Vec<Observation>,
    actions_taken: Vec<Action>,
}

impl AgentCore {
    /// Creates an idle core with empty histories.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: AgentState::Idle,
            observations: Vec::new(),
            actions_taken: Vec::new(),
        }
    }

    /// The agent's informational identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current lifecycle state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Every observation perceived since the last reset, oldest first.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Every action taken since the last reset, oldest first.
    pub fn actions_taken(&self) -> &[Action] {
        &self.actions_taken
    }

    pub(crate) fn transition(&mut self, to: AgentState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(Error::InvalidTransition {
                from: self.state,
                to,
            });
        }
        log::trace!("agent '{}': {} -> {}", self.name, self.state, to);
        self.state = to;
        Ok(())
    }

    /// Moves to `Stopped`, which every state may enter.
    fn stop(&mut self) {
        log::trace!("agent '{}': {} -> stopped", self.name, self.state);
        self.state = AgentState::Stopped;
    }

    /// Puts the agent back to `Idle` after a failed step.
    fn abort_to_idle(&mut self) {
        if self.state != AgentState::Stopped {
            log::trace!("agent '{}': {} -> idle (aborted)", self.name, self.state);
            self.state = AgentState::Idle;
        }
    }

    fn record_observation(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    fn record_action(&mut self, action: Action) {
        self.actions_taken.push(action);
    }

    fn clear(&mut self) {
        self.observations.clear();
        self.actions_taken.clear();
        self.state = AgentState::Idle;
    }
}

/// The capability set every agent strategy provides.
///
/// Implementors supply storage for an [`AgentCore`] and the three strategy
/// steps. The provided methods drive the cycle and must not be bypassed by
/// strategy code: they are the only place the lifecycle state changes.
///
/// # Examples
///
/// ```
/// use autonomous_agents::{Action, Agent, AgentCore, AgentState, Observation, Result};
///
/// struct Echo {
///     core: AgentCore,
///     last: Option<String>,
/// }
///
/// impl Agent for Echo {
///     type Output = String;
///
///     fn core(&self) -> &AgentCore {
///         &self.core
///     }
///
///     fn core_mut(&mut self) -> &mut AgentCore {
///         &mut self.core
///     }
///
///     fn perceive(&mut self, observation: &Observation) -> Result<()> {
///         self.last = observation.data().as_str().map(str::to_string);
///         Ok(())
///     }
///
///     fn decide(&mut self) -> Result<Option<Action>> {
///         Ok(self.last.as_deref().map(Action::new))
///     }
///
///     fn act(&mut self, action: &Action) -> Result<String> {
///         Ok(action.name().to_uppercase())
///     }
/// }
///
/// let mut agent = Echo { core: AgentCore::new("echo"), last: None };
/// let out = agent.run_cycle(Observation::new("ping")).unwrap();
/// assert_eq!(out.as_deref(), Some("PING"));
/// assert_eq!(agent.state(), AgentState::Idle);
/// ```
pub trait Agent {
    /// What executing an action yields.
    type Output;

    /// Read access to the agent's core.
    fn core(&self) -> &AgentCore;

    /// Write access to the agent's core.
    fn core_mut(&mut self) -> &mut AgentCore;

    /// Processes an observation. Must not alter the observation.
    fn perceive(&mut self, observation: &Observation) -> Result<()>;

    /// Chooses the next action, or `None` when there is nothing to do.
    fn decide(&mut self) -> Result<Option<Action>>;

    /// Executes an action and reports its effect.
    fn act(&mut self, action: &Action) -> Result<Self::Output>;

    /// Called by [`Agent::reset`] after the histories are cleared.
    fn on_reset(&mut self) {}

    /// The agent's informational identifier.
    fn name(&self) -> &str {
        self.core().name()
    }

    /// The current lifecycle state.
    fn state(&self) -> AgentState {
        self.core().state()
    }

    /// Every observation perceived since the last reset.
    fn observations(&self) -> &[Observation] {
        self.core().observations()
    }

    /// Every action taken since the last reset.
    fn actions_taken(&self) -> &[Action] {
        self.core().actions_taken()
    }

    /// Runs one perceive-decide-act cycle.
    ///
    /// Returns `Ok(None)` when `decide` produced no action. On failure the
    /// agent is returned to `Idle` and the error is handed to the caller.
    fn run_cycle(&mut self, observation: Observation) -> Result<Option<Self::Output>> {
        begin_cycle(self, observation)?;
        complete_cycle(self)
    }

    /// Clears both histories and returns to `Idle`, whatever the current state.
    fn reset(&mut self) {
        self.core_mut().clear();
        self.on_reset();
        log::debug!("agent '{}' reset", self.name());
    }

    /// Moves the agent to `Stopped`. Cycles fail until the next reset.
    fn terminate(&mut self) {
        self.core_mut().stop();
        log::info!("agent '{}' terminated", self.name());
    }
}

/// Runs a strategy step, returning the agent to `Idle` if it fails.
pub(crate) fn guarded<A, T>(agent: &mut A, step: impl FnOnce(&mut A) -> Result<T>) -> Result<T>
where
    A: Agent + ?Sized,
{
    let outcome = step(agent);
    if outcome.is_err() {
        agent.core_mut().abort_to_idle();
    }
    outcome
}

/// `IDLE -> THINKING`, records the observation and perceives it.
pub(crate) fn begin_cycle<A>(agent: &mut A, observation: Observation) -> Result<()>
where
    A: Agent + ?Sized,
{
    if agent.state() == AgentState::Stopped {
        return Err(Error::Stopped(agent.name().to_string()));
    }

    let core = agent.core_mut();
    core.transition(AgentState::Thinking)?;
    core.record_observation(observation.clone());

    guarded(agent, |a| a.perceive(&observation))
}

/// Decides from `THINKING` and, if an action results, acts on it.
pub(crate) fn complete_cycle<A>(agent: &mut A) -> Result<Option<A::Output>>
where
    A: Agent + ?Sized,
{
    let action = match guarded(agent, |a| a.decide())? {
        Some(action) => action,
        None => {
            agent.core_mut().transition(AgentState::Idle)?;
            return Ok(None);
        }
    };

    let core = agent.core_mut();
    core.transition(AgentState::Acting)?;
    core.record_action(action.clone());

    let output = guarded(agent, |a| a.act(&action))?;
    agent.core_mut().transition(AgentState::Idle)?;
    Ok(Some(output))
}
