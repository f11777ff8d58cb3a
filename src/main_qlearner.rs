use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use qlearner::environment::{run_episode, Environment, GridWorld};
use qlearner::{Agent, QLearner, RandomAgent, TrainingConfig};

#[derive(Parser)]
#[command(name = "qlearner")]
#[command(about = "Train a tabular Q-learner on a grid world")]
struct Cli {
    /// JSON training config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    episodes: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    epsilon: Option<f32>,

    /// Start from a previously saved policy
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the learned policy here
    #[arg(long)]
    save: Option<PathBuf>,

    /// Write `x y value` lines for the whole grid here
    #[arg(long)]
    surface: Option<PathBuf>,

    /// Dump the full state space to stdout after training
    #[arg(long)]
    dump: bool,

    /// Trace every action choice
    #[arg(long)]
    debug: bool,
}

fn load_config(cli: &Cli) -> Result<TrainingConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => TrainingConfig::default(),
    };
    if let Some(episodes) = cli.episodes {
        config.episodes = episodes;
    }
    if let Some(seed) = cli.seed {
        config.agent.seed = seed;
    }
    if let Some(epsilon) = cli.epsilon {
        config.agent.epsilon = epsilon;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(config = ?config, "training");

    let mut world = GridWorld::new(config.width, config.height);
    let mut learner = QLearner::new(config.agent.clone())?;
    learner.set_debug(cli.debug);
    if let Some(path) = &cli.load {
        learner.load_policy(path)?;
    }

    let report_every = (config.episodes / 10).max(1);
    for episode in 0..config.episodes {
        let summary = run_episode(&mut learner, &mut world, config.max_steps);
        learner.anneal_epsilon(config.epsilon_decay, config.min_epsilon);
        debug!(episode, steps = summary.steps, reward = summary.total_reward);
        if (episode + 1) % report_every == 0 {
            info!(
                episode = episode + 1,
                steps = summary.steps,
                reward = summary.total_reward,
                epsilon = learner.epsilon(),
                states = learner.state_space().len(),
                "progress"
            );
        }
    }

    learner.set_epsilon(0.0);
    let greedy = run_episode(&mut learner, &mut world, config.max_steps);
    let mut baseline = RandomAgent::new(world.num_actions(), config.agent.seed);
    let random = run_episode(&mut baseline, &mut world, config.max_steps);
    println!(
        "greedy: {} steps (goal reached: {}), random baseline: {} steps (goal reached: {})",
        greedy.steps, greedy.reached_terminal, random.steps, random.reached_terminal
    );
    print!("{}", world);

    if let Some(path) = &cli.save {
        learner.save_policy(path)?;
        println!("Policy written to {}", path.display());
    }
    if let Some(path) = &cli.surface {
        let mut out = BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        );
        learner.log_values(
            &mut out,
            0..=config.width as i32 - 1,
            0..=config.height as i32 - 1,
        )?;
        out.flush()?;
    }
    if cli.dump {
        let stdout = io::stdout();
        learner.dump_state_space(&mut stdout.lock())?;
    }

    Ok(())
}
