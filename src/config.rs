use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Construction parameters for a `QLearner`. Everything except `epsilon` is
/// fixed for the lifetime of the agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QLearnerConfig {
    pub num_actions: usize,
    /// Discount factor, in [0, 1].
    pub gamma: f32,
    /// Value every Q(s, a) starts at. High values make the agent optimistic.
    pub initial_value: f32,
    /// Learning rate, in (0, 1].
    pub alpha: f32,
    /// Probability of a random action, in [0, 1].
    pub epsilon: f32,
    pub seed: u64,
}

impl Default for QLearnerConfig {
    fn default() -> Self {
        Self {
            num_actions: 4,
            gamma: 0.99,
            initial_value: 0.0,
            alpha: 0.3,
            epsilon: 0.1,
            seed: 1,
        }
    }
}

impl QLearnerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_actions == 0 {
            return Err(invalid("num_actions must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(invalid(format!("gamma {} is outside [0, 1]", self.gamma)));
        }
        if !self.initial_value.is_finite() {
            return Err(invalid(format!(
                "initial_value {} is not finite",
                self.initial_value
            )));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(invalid(format!("alpha {} is outside (0, 1]", self.alpha)));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(invalid(format!(
                "epsilon {} is outside [0, 1]",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Settings for the `qlearner` training binary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default)]
    pub agent: QLearnerConfig,
    #[serde(default = "default_episodes")]
    pub episodes: usize,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Multiplied into epsilon after every episode.
    #[serde(default = "default_epsilon_decay")]
    pub epsilon_decay: f32,
    #[serde(default)]
    pub min_epsilon: f32,
    #[serde(default = "default_grid_size")]
    pub width: u32,
    #[serde(default = "default_grid_size")]
    pub height: u32,
}

fn default_episodes() -> usize {
    500
}

fn default_max_steps() -> usize {
    200
}

fn default_epsilon_decay() -> f32 {
    0.99
}

fn default_grid_size() -> u32 {
    5
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            agent: QLearnerConfig::default(),
            episodes: default_episodes(),
            max_steps: default_max_steps(),
            epsilon_decay: default_epsilon_decay(),
            min_epsilon: 0.0,
            width: default_grid_size(),
            height: default_grid_size(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "grid {}x{} has no cells",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon_decay) || !(0.0..=1.0).contains(&self.min_epsilon)
        {
            return Err(invalid(
                "epsilon_decay and min_epsilon must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig { message }
}
