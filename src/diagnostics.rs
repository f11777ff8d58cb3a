//! Read-only views of a learner's table for debugging and plotting.

use std::io::{self, Write};
use std::ops::RangeInclusive;

use itertools::{iproduct, Itertools};

use crate::agents::QLearner;
use crate::value_table::max_of;

impl QLearner {
    /// Estimated value of a state, `max_a Q(s, a)`. Unseen states report the
    /// initial value and are not added to the table.
    pub fn value_of_state(&self, sensation: &[f32]) -> f32 {
        self.q_values(sensation)
            .map(max_of)
            .unwrap_or_else(|| self.value_table().initial_value())
    }

    /// Writes the Q values for one sensation.
    pub fn dump_state<W: Write>(&self, out: &mut W, sensation: &[f32]) -> io::Result<()> {
        match self.q_values(sensation) {
            Some(row) => writeln!(
                out,
                "[{}] -> [{}]",
                sensation.iter().join(", "),
                row.iter().join(", ")
            ),
            None => writeln!(out, "[{}] unseen", sensation.iter().join(", ")),
        }
    }

    /// Writes every known state with its Q values, in the order first seen.
    pub fn dump_state_space<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (_, features) in self.state_space().iter() {
            self.dump_state(out, features)?;
        }
        Ok(())
    }

    /// Writes `x y value` for every integer point of a 2-D slice of the state
    /// space. Only meaningful for agents fed two-feature sensations.
    pub fn log_values<W: Write>(
        &self,
        out: &mut W,
        xs: RangeInclusive<i32>,
        ys: RangeInclusive<i32>,
    ) -> io::Result<()> {
        for (x, y) in iproduct!(xs, ys) {
            let value = self.value_of_state(&[x as f32, y as f32]);
            writeln!(out, "{} {} {}", x, y, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::agents::{Agent, Experience, QLearner};
    use crate::config::QLearnerConfig;

    fn seeded() -> QLearner {
        let mut learner = QLearner::new(QLearnerConfig {
            num_actions: 2,
            initial_value: -1.0,
            alpha: 1.0,
            epsilon: 0.0,
            ..Default::default()
        })
        .unwrap();
        learner.seed_exp(&[Experience {
            s: vec![0.0, 1.0],
            act: 1,
            reward: 3.0,
            next: vec![1.0, 1.0],
            terminal: true,
        }]);
        learner
    }

    #[test]
    fn test_value_of_state() {
        let learner = seeded();
        assert_eq!(3.0, learner.value_of_state(&[0.0, 1.0]));
        assert_eq!(-1.0, learner.value_of_state(&[5.0, 5.0]));
        assert_eq!(2, learner.state_space().len());
    }

    #[test]
    fn test_dump_state_space() {
        let mut learner = seeded();
        learner.first_action(&[1.0, 1.0]);
        let mut out = Vec::new();
        learner.dump_state_space(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!("[0, 1] -> [-1, 3]\n[1, 1] -> [-1, -1]\n", text);
    }

    #[test]
    fn test_log_values_covers_slice() {
        let learner = seeded();
        let mut out = Vec::new();
        learner.log_values(&mut out, 0..=1, 0..=1).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(vec!["0 0 -1", "0 1 3", "1 0 -1", "1 1 -1"], lines);
    }
}
