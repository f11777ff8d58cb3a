use std::path::Path;

use crate::error::Result;

/// One recorded transition, used to warm-start an agent from offline data.
#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    pub s: Vec<f32>,
    pub act: usize,
    pub reward: f32,
    pub next: Vec<f32>,
    pub terminal: bool,
}

/// The calls an environment loop makes into a learning agent, once per step.
///
/// A driver calls `first_action` at the start of an episode, `next_action`
/// after every following step and `last_action` when the episode reaches a
/// terminal state.
pub trait Agent {
    fn first_action(&mut self, s: &[f32]) -> usize;
    fn next_action(&mut self, r: f32, s: &[f32]) -> usize;
    fn last_action(&mut self, r: f32);

    /// Turns per-step tracing on or off.
    fn set_debug(&mut self, debug: bool);

    /// Learns from previously recorded transitions without acting.
    fn seed_exp(&mut self, experiences: &[Experience]);

    fn save_policy(&self, path: &Path) -> Result<()>;
}
