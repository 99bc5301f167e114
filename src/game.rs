//! Game state: columns, holding buffer, growth, pops, progression and game over.

use crate::color::{ColorSource, RandomColors};
use crate::growth::Growth;
use crate::matching::{PopReport, ScoringPolicy, pop_runs};
use crate::progression::Progression;
use crate::stack::{Column, STACK_COUNT, STACK_SIZE, Stack};
use crate::transfer::{self, Misplace};
use clap::ValueEnum;
use tracing::{debug, info, trace};

/// Holding buffer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HoldingMode {
    /// Holds up to a full column of blocks, last in first out.
    #[default]
    Stack,
    /// Holds a single block.
    Single,
}

impl HoldingMode {
    pub fn capacity(self) -> usize {
        match self {
            Self::Stack => STACK_SIZE,
            Self::Single => 1,
        }
    }
}

/// A discrete player request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pickup(usize),
    Place(usize),
    Pop,
}

impl Command {
    fn is_transfer(self) -> bool {
        matches!(self, Self::Pickup(_) | Self::Place(_))
    }
}

/// What an action did, for feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing worth reporting (a tick without a state change of note).
    Idle,
    Pickup,
    Place,
    Pop { points: u32 },
    Misplace(Misplace),
    LevelUp { levels: u32, points: u32 },
    /// The game has ended (this action ended it, or it was already over).
    GameOver,
}

#[derive(Debug)]
pub struct GameState<C: ColorSource = RandomColors> {
    columns: [Column; STACK_COUNT],
    holding: Stack,
    growth: Growth,
    scoring: ScoringPolicy,
    progression: Progression,
    game_over: bool,
    last_pop: Option<PopReport>,
    colors: C,
}

impl GameState {
    pub fn new(config: &crate::GameConfig) -> Self {
        let colors = match config.seed {
            Some(seed) => RandomColors::seeded(seed),
            None => RandomColors::from_entropy(),
        };
        Self::with_colors(config, colors)
    }
}

impl<C: ColorSource> GameState<C> {
    pub fn with_colors(config: &crate::GameConfig, mut colors: C) -> Self {
        let columns = std::array::from_fn(|_| Column::new(&mut colors));
        info!(
            growth = ?config.growth,
            holding = ?config.holding,
            scoring = ?config.scoring,
            speed = config.base_speed,
            "new game"
        );
        Self {
            columns,
            holding: Stack::new(config.holding.capacity()),
            growth: Growth::new(config.growth, config.empty_boost),
            scoring: config.scoring,
            progression: Progression::new(config.base_speed),
            game_over: false,
            last_pop: None,
            colors,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn holding(&self) -> &Stack {
        &self.holding
    }

    pub fn score(&self) -> u32 {
        self.progression.score
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn goal(&self) -> u32 {
        self.progression.goal
    }

    pub fn speed(&self) -> f32 {
        self.progression.speed
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Runs removed by the most recent successful pop.
    pub fn last_pop(&self) -> Option<&PopReport> {
        self.last_pop.as_ref()
    }

    /// Grow every column by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Outcome {
        debug_assert!(dt >= 0.0, "tick with negative or NaN dt {dt}");
        if self.game_over {
            return Outcome::GameOver;
        }
        let commits = self.growth.advance(
            &mut self.columns,
            self.progression.speed,
            dt,
            &mut self.colors,
        );
        if commits > 0 {
            trace!(commits, "blocks grew in");
        }
        self.finish(Outcome::Idle)
    }

    pub fn request_pickup(&mut self, column: usize) -> Outcome {
        if self.game_over {
            return Outcome::GameOver;
        }
        let outcome = match transfer::pickup(&mut self.columns[column].stack, &mut self.holding) {
            Ok(_) => Outcome::Pickup,
            Err(reason) => misplace(reason),
        };
        self.finish(outcome)
    }

    pub fn request_place(&mut self, column: usize) -> Outcome {
        if self.game_over {
            return Outcome::GameOver;
        }
        let outcome = match transfer::place(&mut self.holding, &mut self.columns[column].stack) {
            Ok(_) => Outcome::Place,
            Err(reason) => misplace(reason),
        };
        self.finish(outcome)
    }

    /// Pop every run of three or more and score it.
    pub fn request_match(&mut self) -> Outcome {
        if self.game_over {
            return Outcome::GameOver;
        }
        let report = pop_runs(&mut self.columns, self.scoring);
        if report.is_empty() {
            return self.finish(misplace(Misplace::NoRuns));
        }
        let points = report.points;
        for run in &report.runs {
            debug!(
                column = run.column,
                start = run.start,
                len = run.len,
                color = run.color.name(),
                "run popped"
            );
        }
        debug!(points, blocks = report.blocks, "pop");
        self.last_pop = Some(report);
        let levels = self.progression.award(points);
        let outcome = if levels > 0 {
            info!(
                level = self.progression.level,
                goal = self.progression.goal,
                speed = self.progression.speed,
                "level up"
            );
            Outcome::LevelUp { levels, points }
        } else {
            Outcome::Pop { points }
        };
        self.finish(outcome)
    }

    /// One frame: growth, then the first queued transfer, then a queued pop, then the
    /// game-over check.
    pub fn step(&mut self, dt: f32, commands: &[Command]) -> Vec<Outcome> {
        if self.game_over {
            return vec![Outcome::GameOver];
        }
        let mut outcomes = Vec::new();
        let grown = self.tick(dt);
        if grown != Outcome::Idle {
            outcomes.push(grown);
        }
        if !self.game_over {
            if let Some(cmd) = commands.iter().copied().find(|c| c.is_transfer()) {
                outcomes.push(self.apply(cmd));
            }
        }
        if !self.game_over && commands.contains(&Command::Pop) {
            outcomes.push(self.apply(Command::Pop));
        }
        outcomes
    }

    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Pickup(i) => self.request_pickup(i),
            Command::Place(i) => self.request_place(i),
            Command::Pop => self.request_match(),
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        debug_assert!(self.columns.iter().all(|c| c.stack.is_compact()));
        debug_assert!(self.holding.is_compact());
        if self.columns.iter().any(|c| c.stack.height() >= STACK_SIZE) {
            self.game_over = true;
            info!(
                score = self.progression.score,
                level = self.progression.level,
                "game over"
            );
            return Outcome::GameOver;
        }
        outcome
    }
}

fn misplace(reason: Misplace) -> Outcome {
    debug!(%reason, "misplace");
    Outcome::Misplace(reason)
}
