use std::fmt;

use crate::agents::Agent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResult {
    // Step taken, episode continues
    Continue(f32),
    // Step reached a terminal state
    Complete(f32),
}

/// The driver side of the agent loop.
pub trait Environment {
    fn num_actions(&self) -> usize;
    fn sensation(&self) -> Vec<f32>;
    fn apply(&mut self, action: usize) -> StepResult;
    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

/// Deterministic grid: start at (0, 0), goal at the opposite corner, -1 per
/// step that does not reach the goal. Moving into a wall stays in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridWorld {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
}

impl GridWorld {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        GridWorld {
            width,
            height,
            x: 0,
            y: 0,
        }
    }

    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn goal(&self) -> (u32, u32) {
        (self.width - 1, self.height - 1)
    }

    pub fn at_goal(&self) -> bool {
        self.position() == self.goal()
    }
}

impl Environment for GridWorld {
    fn num_actions(&self) -> usize {
        Move::ALL.len()
    }

    fn sensation(&self) -> Vec<f32> {
        vec![self.x as f32, self.y as f32]
    }

    fn apply(&mut self, action: usize) -> StepResult {
        match Move::ALL[action] {
            Move::Up => self.y = (self.y + 1).min(self.height - 1),
            Move::Down => self.y = self.y.saturating_sub(1),
            Move::Left => self.x = self.x.saturating_sub(1),
            Move::Right => self.x = (self.x + 1).min(self.width - 1),
        }
        if self.at_goal() {
            StepResult::Complete(0.0)
        } else {
            StepResult::Continue(-1.0)
        }
    }

    fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
    }
}

impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let cell = if (x, y) == self.position() {
                    'A'
                } else if (x, y) == self.goal() {
                    'G'
                } else {
                    '.'
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub steps: usize,
    pub total_reward: f32,
    pub reached_terminal: bool,
}

/// Runs one episode from a freshly reset environment. An episode cut off by
/// `max_steps` never calls `last_action`; the next `first_action` abandons it.
pub fn run_episode<A, E>(agent: &mut A, env: &mut E, max_steps: usize) -> EpisodeSummary
where
    A: Agent + ?Sized,
    E: Environment + ?Sized,
{
    env.reset();
    let mut action = agent.first_action(&env.sensation());
    let mut summary = EpisodeSummary {
        steps: 0,
        total_reward: 0.0,
        reached_terminal: false,
    };

    while summary.steps < max_steps {
        summary.steps += 1;
        match env.apply(action) {
            StepResult::Complete(reward) => {
                summary.total_reward += reward;
                summary.reached_terminal = true;
                agent.last_action(reward);
                break;
            }
            StepResult::Continue(reward) => {
                summary.total_reward += reward;
                action = agent.next_action(reward, &env.sensation());
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walls_and_goal() {
        let mut world = GridWorld::new(3, 2);
        assert_eq!(StepResult::Continue(-1.0), world.apply(1));
        assert_eq!(StepResult::Continue(-1.0), world.apply(2));
        assert_eq!((0, 0), world.position());

        assert_eq!(StepResult::Continue(-1.0), world.apply(3));
        assert_eq!(StepResult::Continue(-1.0), world.apply(0));
        assert_eq!(StepResult::Continue(-1.0), world.apply(0));
        assert_eq!(vec![1.0, 1.0], world.sensation());
        assert_eq!(StepResult::Complete(0.0), world.apply(3));
        assert!(world.at_goal());

        world.reset();
        assert_eq!((0, 0), world.position());
    }

    #[test]
    fn test_display() {
        let world = GridWorld::new(3, 2);
        assert_eq!("..G\nA..\n", world.to_string());
    }
}
