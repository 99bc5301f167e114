//! Column growth: accumulate elapsed time and commit blocks at the ground.

use crate::color::ColorSource;
use crate::stack::Column;
use clap::ValueEnum;

/// Grow speed at level 1, in blocks per second.
pub const BASE_SPEED: f32 = 0.2;

/// Extra speed multiplier for a column with no blocks (grows at `speed * (1 + boost)`).
pub const EMPTY_BOOST: f32 = 10.0;

/// How columns share growth time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GrowthPolicy {
    /// Each column keeps its own accumulator; empty columns are boosted.
    #[default]
    Independent,
    /// One shared accumulator; every column commits on the same beat.
    Synchronized,
}

#[derive(Debug, Clone)]
pub struct Growth {
    pub policy: GrowthPolicy,
    /// Only read by [`GrowthPolicy::Independent`].
    pub empty_boost: f32,
    shared: f32,
}

impl Growth {
    pub fn new(policy: GrowthPolicy, empty_boost: f32) -> Self {
        Self {
            policy,
            empty_boost,
            shared: 0.0,
        }
    }

    /// Advance growth by `dt` seconds at `speed`. Returns the number of blocks committed.
    ///
    /// A column that fills up stops committing and keeps its accumulator below one; the
    /// caller turns that into game over.
    pub fn advance(
        &mut self,
        columns: &mut [Column],
        speed: f32,
        dt: f32,
        colors: &mut dyn ColorSource,
    ) -> usize {
        match self.policy {
            GrowthPolicy::Independent => {
                let mut commits = 0;
                for col in columns.iter_mut() {
                    let boost = if col.stack.is_empty() {
                        1.0 + self.empty_boost
                    } else {
                        1.0
                    };
                    col.growth += speed * dt * boost;
                    commits += drain(col, colors);
                }
                commits
            }
            GrowthPolicy::Synchronized => {
                self.shared += speed * dt;
                let mut commits = 0;
                while self.shared >= 1.0 {
                    self.shared -= 1.0;
                    for col in columns.iter_mut().filter(|c| !c.stack.is_full()) {
                        col.commit(colors);
                        commits += 1;
                    }
                    if columns.iter().any(|c| c.stack.is_full()) {
                        self.shared = self.shared.fract();
                        break;
                    }
                }
                for col in columns.iter_mut() {
                    col.growth = self.shared;
                }
                commits
            }
        }
    }
}

/// Commit while the accumulator holds a whole block, carrying the remainder.
fn drain(col: &mut Column, colors: &mut dyn ColorSource) -> usize {
    let mut commits = 0;
    while col.growth >= 1.0 {
        if col.stack.is_full() {
            col.growth = col.growth.fract();
            break;
        }
        col.growth -= 1.0;
        col.commit(colors);
        commits += 1;
    }
    commits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BlockColor::{Blue, Green, Red};
    use crate::color::SequenceColors;
    use crate::stack::{STACK_COUNT, STACK_SIZE};

    fn columns(colors: &mut SequenceColors) -> Vec<Column> {
        (0..STACK_COUNT).map(|_| Column::new(colors)).collect()
    }

    #[test]
    fn test_empty_column_is_boosted() {
        let mut colors = SequenceColors::new(&[Red]);
        let mut cols = columns(&mut colors);
        let mut growth = Growth::new(GrowthPolicy::Independent, EMPTY_BOOST);
        // 0.2 * 0.25 * 11 = 0.55
        growth.advance(&mut cols, BASE_SPEED, 0.25, &mut colors);
        for c in &cols {
            assert!((c.growth - 0.55).abs() < 1e-5);
            assert!(c.stack.is_empty());
        }
    }

    #[test]
    fn test_overshoot_commits_every_whole_block() {
        let mut colors = SequenceColors::new(&[Red, Green, Blue]);
        let mut cols = columns(&mut colors);
        let mut growth = Growth::new(GrowthPolicy::Independent, 0.0);
        let commits = growth.advance(&mut cols, 1.0, 3.5, &mut colors);
        assert_eq!(commits, 3 * STACK_COUNT);
        for c in &cols {
            assert_eq!(c.stack.height(), 3);
            assert!((c.growth - 0.5).abs() < 1e-5);
            assert!(c.stack.is_compact());
        }
    }

    #[test]
    fn test_commit_order_is_ground_up() {
        let mut colors = SequenceColors::new(&[Red, Green, Blue]);
        let mut col = vec![Column::new(&mut colors)];
        let mut growth = Growth::new(GrowthPolicy::Independent, 0.0);
        growth.advance(&mut col, 1.0, 2.0, &mut colors);
        // Red went in first and has been lifted by Green.
        assert_eq!(col[0].stack.blocks().collect::<Vec<_>>(), vec![Green, Red]);
        assert_eq!(col[0].next, Blue);
    }

    #[test]
    fn test_growth_stops_at_capacity() {
        let mut colors = SequenceColors::new(&[Red, Green]);
        let mut cols = columns(&mut colors);
        let mut growth = Growth::new(GrowthPolicy::Independent, 0.0);
        growth.advance(&mut cols, 1.0, 100.25, &mut colors);
        for c in &cols {
            assert_eq!(c.stack.height(), STACK_SIZE);
            assert!((0.0..1.0).contains(&c.growth));
        }
    }

    #[test]
    fn test_synchronized_commits_together() {
        let mut colors = SequenceColors::new(&[Red, Green, Blue]);
        let mut cols = columns(&mut colors);
        cols[0].stack.push_top(Blue);
        let mut growth = Growth::new(GrowthPolicy::Synchronized, EMPTY_BOOST);
        let commits = growth.advance(&mut cols, 1.0, 0.6, &mut colors);
        assert_eq!(commits, 0);
        let commits = growth.advance(&mut cols, 1.0, 0.6, &mut colors);
        assert_eq!(commits, STACK_COUNT);
        assert_eq!(cols[0].stack.height(), 2);
        assert_eq!(cols[1].stack.height(), 1);
        for c in &cols {
            assert!((c.growth - 0.2).abs() < 1e-5);
        }
    }

    #[test]
    fn test_synchronized_overshoot_commits_every_beat() {
        let mut colors = SequenceColors::new(&[Red, Green, Blue]);
        let mut cols = columns(&mut colors);
        let mut growth = Growth::new(GrowthPolicy::Synchronized, EMPTY_BOOST);
        let commits = growth.advance(&mut cols, 1.0, 3.5, &mut colors);
        assert_eq!(commits, 3 * STACK_COUNT);
        for c in &cols {
            assert_eq!(c.stack.height(), 3);
            assert!((c.growth - 0.5).abs() < 1e-5);
            assert!(c.stack.is_compact());
        }
    }

    #[test]
    fn test_synchronized_stops_when_a_column_fills() {
        let mut colors = SequenceColors::new(&[Red, Green]);
        let mut cols = columns(&mut colors);
        for _ in 0..STACK_SIZE - 2 {
            cols[1].stack.push_top(Blue);
        }
        let mut growth = Growth::new(GrowthPolicy::Synchronized, 0.0);
        let commits = growth.advance(&mut cols, 1.0, 5.25, &mut colors);
        // Two beats fill column 1; the remaining three are dropped.
        assert_eq!(commits, 2 * STACK_COUNT);
        assert!(cols[1].stack.is_full());
        assert_eq!(cols[0].stack.height(), 2);
        for c in &cols {
            assert!((c.growth - 0.25).abs() < 1e-5);
        }
    }
}
