use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_xoshiro::SplitMix64;
use tracing::{debug, info};

use crate::agents::agent::{Agent, Experience};
use crate::canonical::{StateId, StateSpace};
use crate::config::QLearnerConfig;
use crate::error::{io_error, Error, Result};
use crate::policy_file;
use crate::value_table::{max_of, ValueTable};

/// Q-learning with a lookup table and epsilon-greedy exploration.
///
/// Every distinct sensation is its own state; nothing generalizes between
/// states. Not `Clone`: two agents must never share a random stream.
#[derive(Debug)]
pub struct QLearner {
    num_actions: usize,
    gamma: f32,
    alpha: f32,
    epsilon: f32,

    states: StateSpace,
    q: ValueTable,

    // Reproducible exploration: SplitMix64 seeded once at construction
    rng: SplitMix64,
    /// Pending (state, action) waiting for its reward. `None` between episodes.
    cursor: Option<(StateId, usize)>,
    debug: bool,
}

impl QLearner {
    pub fn new(config: QLearnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(QLearner {
            num_actions: config.num_actions,
            gamma: config.gamma,
            alpha: config.alpha,
            epsilon: config.epsilon,
            states: StateSpace::new(),
            q: ValueTable::new(config.num_actions, config.initial_value),
            rng: SplitMix64::seed_from_u64(config.seed),
            cursor: None,
            debug: false,
        })
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// # Panics
    /// If `epsilon` is outside [0, 1].
    pub fn set_epsilon(&mut self, epsilon: f32) {
        assert!(
            (0.0..=1.0).contains(&epsilon),
            "epsilon {} is outside [0, 1]",
            epsilon
        );
        self.epsilon = epsilon;
    }

    /// Multiplies epsilon by `factor`, never going below `floor`.
    pub fn anneal_epsilon(&mut self, factor: f32, floor: f32) {
        self.set_epsilon((self.epsilon * factor).max(floor).min(1.0));
    }

    pub fn in_episode(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.states
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.q
    }

    /// Q values for `sensation`, if that state has been seen.
    pub fn q_values(&self, sensation: &[f32]) -> Option<&[f32]> {
        self.states
            .lookup(sensation)
            .and_then(|state| self.q.row(state))
    }

    /// Replaces the whole table with the one stored at `path`. Any episode in
    /// progress is dropped. On error the agent is left untouched.
    pub fn load_policy(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).map_err(io_error("read policy", path))?;
        let snapshot = policy_file::parse(path, &text)?;
        if snapshot.num_actions != self.num_actions {
            return Err(Error::ActionCountMismatch {
                expected: self.num_actions,
                found: snapshot.num_actions,
            });
        }

        let mut states = match snapshot.dimensions {
            0 => StateSpace::new(),
            dims => StateSpace::with_dimensions(dims),
        };
        let mut q = ValueTable::new(self.num_actions, self.q.initial_value());
        for (line, record) in snapshot.records {
            let before = states.len();
            let state = states.canonicalize(&record.features);
            if states.len() == before {
                return Err(Error::Malformed {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("duplicate state {:?}", record.features),
                });
            }
            q.insert_row(state, record.values);
        }

        self.states = states;
        self.q = q;
        self.cursor = None;
        info!(
            path = %path.display(),
            states = self.states.len(),
            "loaded policy"
        );
        Ok(())
    }

    fn select_action(&mut self, state: StateId) -> usize {
        // First encounter creates the row whichever branch is taken
        self.q.row_for(state);
        if self.epsilon > 0.0 && self.rng.gen::<f32>() < self.epsilon {
            let action = self.rng.gen_range(0..self.num_actions);
            if self.debug {
                debug!(%state, action, "exploring");
            }
            return action;
        }

        let row = self.q.row_for(state);
        let best = max_of(row);
        let mut tied: Vec<usize> = row.iter().positions(|&v| v == best).collect();
        if tied.is_empty() {
            // Row holds NaN; fall back to every action
            tied = (0..self.num_actions).collect();
        }
        let action = if tied.len() == 1 {
            tied[0]
        } else {
            tied[self.rng.gen_range(0..tied.len())]
        };
        if self.debug {
            debug!(%state, action, value = best, ties = tied.len(), "greedy");
        }
        action
    }

    fn update(&mut self, state: StateId, action: usize, target: f32) {
        let q = self.q.value_of(state, action);
        self.q
            .set_value(state, action, q + self.alpha * (target - q));
    }

    fn take_cursor(&mut self, call: &str) -> (StateId, usize) {
        match self.cursor.take() {
            Some(pending) => pending,
            None => panic!("{} called with no episode in progress", call),
        }
    }
}

impl Agent for QLearner {
    fn first_action(&mut self, s: &[f32]) -> usize {
        if let Some((state, action)) = self.cursor.take() {
            debug!(%state, action, "episode restarted without last_action");
        }
        let state = self.states.canonicalize(s);
        let action = self.select_action(state);
        self.cursor = Some((state, action));
        action
    }

    fn next_action(&mut self, r: f32, s: &[f32]) -> usize {
        let (prev, prev_action) = self.take_cursor("next_action");
        let state = self.states.canonicalize(s);
        let target = r + self.gamma * self.q.max_value(state);
        self.update(prev, prev_action, target);

        let action = self.select_action(state);
        self.cursor = Some((state, action));
        action
    }

    fn last_action(&mut self, r: f32) {
        let (prev, prev_action) = self.take_cursor("last_action");
        self.update(prev, prev_action, r);
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn seed_exp(&mut self, experiences: &[Experience]) {
        for exp in experiences {
            assert!(
                exp.act < self.num_actions,
                "experience action {} out of range for {} actions",
                exp.act,
                self.num_actions
            );
            let state = self.states.canonicalize(&exp.s);
            let next = self.states.canonicalize(&exp.next);
            // Touch the successor row even for terminal tuples so every known
            // state has a row
            let best_next = self.q.max_value(next);
            let target = if exp.terminal {
                exp.reward
            } else {
                exp.reward + self.gamma * best_next
            };
            self.update(state, exp.act, target);
        }
    }

    fn save_policy(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(io_error("create policy", path))?;
        let mut writer = BufWriter::new(file);

        let records = self
            .states
            .iter()
            .filter_map(|(state, features)| self.q.row(state).map(|row| (features, row)));
        policy_file::write(
            &mut writer,
            self.states.dimensions().unwrap_or(0),
            self.num_actions,
            records,
        )
        .map_err(io_error("write policy", path))?;
        writer.flush().map_err(io_error("write policy", path))?;

        info!(
            path = %path.display(),
            states = self.states.len(),
            "saved policy"
        );
        Ok(())
    }
}
