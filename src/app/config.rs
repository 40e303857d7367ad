use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::solvers::Solver;

/// Command-line interface of the visualizer.
#[derive(Debug, Parser)]
#[command(name = "mazepath")]
#[command(version, about)]
#[command(long_about = "Carves a random perfect maze and animates path finding on it.\n\n\
    Examples:\n  \
    mazepath                            24x18 maze solved with BFS\n  \
    mazepath --solver all --seed 7      Every solver, one after the other\n  \
    mazepath --width 40 --headless      Print results without drawing")]
pub struct Cli {
    /// Maze width in cells
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u8).range(1..))]
    pub width: u8,

    /// Maze height in cells
    #[arg(long, default_value_t = 18, value_parser = clap::value_parser!(u8).range(1..))]
    pub height: u8,

    /// Seed for maze generation (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path finding algorithm to run
    #[arg(long, value_enum, ignore_case = true, default_value_t = SolverChoice::Bfs)]
    pub solver: SolverChoice,

    /// Delay between drawn updates, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 10)]
    pub delay_ms: u64,

    /// Print results without drawing
    #[arg(long)]
    pub headless: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolverChoice {
    Bfs,
    Dfs,
    #[value(alias = "bidirectional")]
    Bidir,
    #[value(name = "astar", alias = "a*")]
    AStar,
    #[value(alias = "greedy")]
    Gbfs,
    /// Every solver, one after the other
    All,
}

impl SolverChoice {
    fn solvers(self) -> Vec<Solver> {
        match self {
            SolverChoice::Bfs => vec![Solver::Bfs],
            SolverChoice::Dfs => vec![Solver::Dfs],
            SolverChoice::Bidir => vec![Solver::BidirectionalBfs],
            SolverChoice::AStar => vec![Solver::AStar],
            SolverChoice::Gbfs => vec![Solver::Gbfs],
            SolverChoice::All => Solver::ALL.to_vec(),
        }
    }
}

/// Run settings for the visualizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maze width in cells
    pub width: u8,
    /// Maze height in cells
    pub height: u8,
    /// Seed for maze generation. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Solvers to run one after the other on the same maze
    pub solvers: Vec<Solver>,
    /// Time the renderer waits after drawing each grid update
    pub delay: Duration,
    /// Skip the terminal UI and print a summary instead
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 24,
            height: 18,
            seed: None,
            solvers: vec![Solver::Bfs],
            delay: Duration::from_millis(10),
            headless: false,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            width: cli.width,
            height: cli.height,
            seed: cli.seed,
            solvers: cli.solver.solvers(),
            delay: Duration::from_millis(cli.delay_ms),
            headless: cli.headless,
        }
    }
}
