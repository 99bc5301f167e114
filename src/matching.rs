//! Popping runs: find, excise and score same-colour runs in every column.

use crate::color::BlockColor;
use crate::stack::Column;
use clap::ValueEnum;

/// Points for the first popped block.
pub const BASE_POINTS: u32 = 30;

/// Compounding factor between popped blocks (or between run lengths, per run).
const POINTS_GROWTH: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScoringPolicy {
    /// Every popped block scores, each worth 1.1x the previous one in the same pop.
    #[default]
    PerBlock,
    /// One award per run: `BASE_POINTS * 1.1^(len - 1)`.
    PerRun,
}

/// A run that was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popped {
    pub column: usize,
    pub start: usize,
    pub len: usize,
    pub color: BlockColor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopReport {
    pub points: u32,
    pub blocks: u32,
    pub runs: Vec<Popped>,
}

impl PopReport {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Remove every run of three or more from every column, re-scanning after each removal
/// so runs formed by blocks sliding down are popped in the same call.
pub fn pop_runs(columns: &mut [Column], scoring: ScoringPolicy) -> PopReport {
    let mut report = PopReport::default();
    let mut per_block = BASE_POINTS;
    for (i, col) in columns.iter_mut().enumerate() {
        while let Some(run) = col.stack.find_run() {
            col.stack.remove(run.start, run.len);
            report.points += match scoring {
                ScoringPolicy::PerBlock => (0..run.len)
                    .map(|_| {
                        let p = per_block;
                        per_block = (per_block as f32 * POINTS_GROWTH) as u32;
                        p
                    })
                    .sum::<u32>(),
                ScoringPolicy::PerRun => run_points(run.len),
            };
            report.blocks += run.len as u32;
            report.runs.push(Popped {
                column: i,
                start: run.start,
                len: run.len,
                color: run.color,
            });
        }
    }
    report
}

fn run_points(len: usize) -> u32 {
    (BASE_POINTS as f32 * POINTS_GROWTH.powi(len as i32 - 1)) as u32
}
