//! Tabular Q-learning agent.
//!
//! The agent keeps a sparse Q-table over `(state, action)` pairs, chooses
//! actions epsilon-greedily and applies the one-step Bellman update
//!
//! ```text
//! Q(s, a) ← Q(s, a) + α · (r + γ · max_a' Q(s', a') − Q(s, a))
//! ```
//!
//! With a deterministic state encoder, a fixed finite state space and a
//! learning rate that decays appropriately, the table converges towards the
//! optimal action values.

use crate::action::Action;
use crate::agent::{Agent, AgentCore};
use crate::config::{check_unit_interval, QLearningConfig};
use crate::error::{Error, Result};
use crate::learning::{ActionId, Experience, LearningAgent, QTable, QTableSummary, StateId};
use crate::observation::Observation;
use crate::types::Payload;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Maps an observation payload to a discrete state key. Must be pure.
pub type StateEncoder = Box<dyn Fn(&Payload) -> StateId + Send + Sync>;

/// The encoder used unless one is supplied.
///
/// A string payload is its own state; anything else is keyed by its JSON
/// text, which lists object members in sorted key order.
pub fn default_state_encoder(data: &Payload) -> StateId {
    match data {
        Payload::String(s) => StateId::new(s.as_str()),
        other => StateId::new(other.to_string()),
    }
}

/// What executing an action reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QStepResult {
    /// Name of the agent that executed the action.
    pub agent: String,
    /// Name of the executed action.
    pub action: String,
    /// The state the action was taken in, if one has been perceived.
    pub state: Option<StateId>,
    /// The value of `(state, action)` at execution time.
    pub q_value: f64,
}

/// A learning agent driven by an epsilon-greedy policy over a Q-table.
///
/// # Examples
///
/// ```
/// use autonomous_agents::{Agent, LearningAgent, Observation, QLearningAgent, QLearningConfig};
///
/// let config = QLearningConfig::greedy("walker", &["left", "right"]);
/// let mut agent = QLearningAgent::new(config).unwrap();
///
/// agent.perceive(&Observation::new("s0")).unwrap();
/// let action = agent.decide().unwrap().unwrap();
/// agent.perceive(&Observation::new("s1")).unwrap();
/// agent.learn(10.0).unwrap();
///
/// // 0 + 0.1 * (10 + 0.9 * 0 - 0)
/// assert!((agent.q_value("s0", action.name()) - 1.0).abs() < 1e-9);
/// ```
pub struct QLearningAgent {
    core: AgentCore,
    config: QLearningConfig,
    actions: Vec<ActionId>,
    q_table: QTable,
    experiences: Vec<Experience>,
    encoder: StateEncoder,
    rng: StdRng,

    current_state: Option<StateId>,
    last_state: Option<StateId>,
    last_action: Option<ActionId>,

    total_updates: u64,
    episodes: u64,
    cumulative_reward: f64,
}

impl QLearningAgent {
    /// Creates an agent from a validated configuration.
    pub fn new(config: QLearningConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let actions = config.actions.iter().map(|a| ActionId::new(a.as_str())).collect();

        log::info!(
            "q-learning agent '{}' created: {} actions, alpha={}, gamma={}, epsilon={}",
            config.name,
            config.actions.len(),
            config.learning_rate,
            config.discount_factor,
            config.exploration_rate
        );

        Ok(Self {
            core: AgentCore::new(&config.name),
            config,
            actions,
            q_table: QTable::new(),
            experiences: Vec::new(),
            encoder: Box::new(default_state_encoder),
            rng,
            current_state: None,
            last_state: None,
            last_action: None,
            total_updates: 0,
            episodes: 0,
            cumulative_reward: 0.0,
        })
    }

    /// Creates an agent with default rates for the given actions.
    pub fn with_actions<S: AsRef<str>>(name: &str, actions: &[S]) -> Result<Self> {
        Self::new(QLearningConfig::new(name, actions))
    }

    /// Replaces the state encoder.
    pub fn with_state_encoder<F>(mut self, encoder: F) -> Self
    where
        F: Fn(&Payload) -> StateId + Send + Sync + 'static,
    {
        self.encoder = Box::new(encoder);
        self
    }

    /// The live configuration. `exploration_rate` reflects any decay applied
    /// by [`end_episode`](Self::end_episode).
    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// The configured actions in declaration order.
    pub fn actions(&self) -> &[ActionId] {
        &self.actions
    }

    /// The current exploration rate (epsilon).
    pub fn exploration_rate(&self) -> f64 {
        self.config.exploration_rate
    }

    /// Sets epsilon, e.g. to `0.0` for evaluating a trained policy.
    pub fn set_exploration_rate(&mut self, rate: f64) -> Result<()> {
        check_unit_interval("exploration_rate", rate)?;
        self.config.exploration_rate = rate;
        self.config.epsilon_min = self.config.epsilon_min.min(rate);
        Ok(())
    }

    /// The most recently perceived state.
    pub fn current_state(&self) -> Option<&StateId> {
        self.current_state.as_ref()
    }

    /// The state of the decision awaiting a reward.
    pub fn last_state(&self) -> Option<&StateId> {
        self.last_state.as_ref()
    }

    /// The action awaiting a reward.
    pub fn last_action(&self) -> Option<&ActionId> {
        self.last_action.as_ref()
    }

    /// Read-only view of the learned values.
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// The learned value of `(state, action)`, `0.0` if never updated.
    pub fn q_value(&self, state: &str, action: &str) -> f64 {
        self.q_table.get(&StateId::from(state), &ActionId::from(action))
    }

    /// Overwrites the value of `(state, action)`.
    ///
    /// The action must belong to the configured action set and the value must
    /// be finite.
    pub fn set_q_value(&mut self, state: &str, action: &str, value: f64) -> Result<()> {
        let action = self.known_action(action)?;
        if !value.is_finite() {
            return Err(Error::Config(format!("q-value must be finite, got {}", value)));
        }
        self.q_table.set(StateId::from(state), action, value);
        Ok(())
    }

    /// The greedy action at `state`, ties going to the first declared action.
    pub fn best_action(&self, state: &str) -> Option<&ActionId> {
        self.q_table.best_action(&StateId::from(state), &self.actions)
    }

    /// Table statistics together with the experience count.
    pub fn q_table_summary(&self) -> QTableSummary {
        self.q_table.summary(self.experiences.len())
    }

    /// Number of Bellman updates applied.
    pub fn total_updates(&self) -> u64 {
        self.total_updates
    }

    /// Number of completed episodes.
    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// Sum of every reward learned from.
    pub fn cumulative_reward(&self) -> f64 {
        self.cumulative_reward
    }

    /// Closes an episode: drops the transient state, counts the episode and
    /// decays epsilon towards its floor.
    pub fn end_episode(&mut self) {
        self.clear_transient_state();
        self.episodes += 1;
        self.config.exploration_rate = (self.config.exploration_rate * self.config.epsilon_decay)
            .max(self.config.epsilon_min);
        log::info!(
            "agent '{}': episode {} finished, epsilon={:.4}",
            self.core.name(),
            self.episodes,
            self.config.exploration_rate
        );
    }

    fn known_action(&self, name: &str) -> Result<ActionId> {
        self.actions
            .iter()
            .find(|a| a.as_str() == name)
            .cloned()
            .ok_or_else(|| {
                Error::Action(format!(
                    "unknown action '{}' for agent '{}'",
                    name,
                    self.core.name()
                ))
            })
    }

    fn clear_transient_state(&mut self) {
        self.current_state = None;
        self.last_state = None;
        self.last_action = None;
    }
}

impl std::fmt::Debug for QLearningAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QLearningAgent")
            .field("core", &self.core)
            .field("config", &self.config)
            .field("q_table", &self.q_table.len())
            .field("experiences", &self.experiences.len())
            .field("current_state", &self.current_state)
            .field("last_state", &self.last_state)
            .field("last_action", &self.last_action)
            .finish_non_exhaustive()
    }
}

impl Agent for QLearningAgent {
    type Output = QStepResult;

    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn perceive(&mut self, observation: &Observation) -> Result<()> {
        let state = (self.encoder)(observation.data());
        if self.last_action.is_some() {
            self.last_state = self.current_state.take();
        }
        self.current_state = Some(state);
        Ok(())
    }

    fn decide(&mut self) -> Result<Option<Action>> {
        let Some(state) = self.current_state.clone() else {
            return Ok(None);
        };

        let explore = self.rng.random::<f64>() < self.config.exploration_rate;
        let chosen = if explore {
            let idx = self.rng.random_range(0..self.actions.len());
            self.actions[idx].clone()
        } else {
            self.q_table
                .best_action(&state, &self.actions)
                .cloned()
                .ok_or_else(|| Error::Internal("action set is empty".into()))?
        };

        log::debug!(
            "agent '{}': {} '{}' at state '{}'",
            self.core.name(),
            if explore { "explore" } else { "exploit" },
            chosen,
            state
        );

        let action = Action::new(chosen.as_str());
        self.last_action = Some(chosen);
        self.last_state = Some(state);
        Ok(Some(action))
    }

    fn act(&mut self, action: &Action) -> Result<QStepResult> {
        let action_id = self.known_action(action.name())?;
        let q_value = self
            .current_state
            .as_ref()
            .map(|state| self.q_table.get(state, &action_id))
            .unwrap_or(0.0);

        Ok(QStepResult {
            agent: self.core.name().to_string(),
            action: action_id.as_str().to_string(),
            state: self.current_state.clone(),
            q_value,
        })
    }

    fn on_reset(&mut self) {
        self.clear_transient_state();
    }
}

impl LearningAgent for QLearningAgent {
    fn learn(&mut self, reward: f64) -> Result<()> {
        if !reward.is_finite() {
            return Err(Error::NonFiniteReward(reward));
        }
        let (Some(state), Some(action), Some(next_state)) = (
            self.last_state.clone(),
            self.last_action.clone(),
            self.current_state.clone(),
        ) else {
            return Err(Error::NoPendingDecision);
        };

        let old_q = self.q_table.get(&state, &action);
        let next_max = self.q_table.max_value(&next_state, &self.actions);
        let target = reward + self.config.discount_factor * next_max;
        let new_q = old_q + self.config.learning_rate * (target - old_q);

        self.q_table.set(state.clone(), action.clone(), new_q);
        log::debug!(
            "agent '{}': Q({}, {}) {:.4} -> {:.4} (reward {})",
            self.core.name(),
            state,
            action,
            old_q,
            new_q,
            reward
        );

        self.experiences
            .push(Experience::new(state, action, reward, next_state, new_q));
        self.last_action = None;
        self.last_state = None;
        self.total_updates += 1;
        self.cumulative_reward += reward;
        Ok(())
    }

    fn has_pending_action(&self) -> bool {
        self.last_action.is_some()
    }

    fn experiences(&self) -> &[Experience] {
        &self.experiences
    }
}
