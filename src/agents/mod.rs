pub mod agent;
pub mod qlearner;
pub mod random_agent;

pub use agent::{Agent, Experience};
pub use qlearner::QLearner;
pub use random_agent::RandomAgent;
