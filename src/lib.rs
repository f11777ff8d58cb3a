//! Tabular Q-learning with epsilon-greedy exploration.
//!
//! An environment loop feeds the agent one sensation (a fixed-length feature
//! vector) per step through [`Agent`] and gets back an action index. Every
//! distinct sensation is its own table row.

pub mod agents;
pub mod canonical;
pub mod config;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod policy_file;
pub mod value_table;

pub use agents::{Agent, Experience, QLearner, RandomAgent};
pub use canonical::{StateId, StateSpace};
pub use config::{QLearnerConfig, TrainingConfig};
pub use error::{Error, Result};
