use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_xoshiro::SplitMix64;

use crate::agents::agent::{Agent, Experience};
use crate::error::{io_error, Result};
use crate::policy_file;

/// Baseline that ignores rewards and picks uniformly among actions.
#[derive(Debug)]
pub struct RandomAgent {
    num_actions: usize,
    rng: SplitMix64,
}

impl RandomAgent {
    pub fn new(num_actions: usize, seed: u64) -> Self {
        debug_assert!(num_actions > 0);
        RandomAgent {
            num_actions,
            rng: SplitMix64::seed_from_u64(seed),
        }
    }

    fn pick(&mut self) -> usize {
        self.rng.gen_range(0..self.num_actions)
    }
}

impl Agent for RandomAgent {
    fn first_action(&mut self, _s: &[f32]) -> usize {
        self.pick()
    }

    fn next_action(&mut self, _r: f32, _s: &[f32]) -> usize {
        self.pick()
    }

    fn last_action(&mut self, _r: f32) {}

    fn set_debug(&mut self, _debug: bool) {}

    fn seed_exp(&mut self, _experiences: &[Experience]) {}

    /// Writes an empty policy: nothing was learned.
    fn save_policy(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(io_error("create policy", path))?;
        let mut writer = BufWriter::new(file);
        policy_file::write(&mut writer, 0, self.num_actions, std::iter::empty())
            .map_err(io_error("write policy", path))?;
        writer.flush().map_err(io_error("write policy", path))
    }
}
