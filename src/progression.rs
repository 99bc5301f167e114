//! Score, goal and level: the difficulty curve.

use crate::growth::BASE_SPEED;
use crate::matching::BASE_POINTS;

/// Grow speed multiplier per level.
const SPEED_UP: f32 = 1.1;

/// Goal step growth per level.
const GOAL_GROWTH: f32 = 1.2;

/// Goal steps are `BASE_POINTS * GOAL_SCALE * GOAL_GROWTH^level`.
const GOAL_SCALE: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub score: u32,
    pub goal: u32,
    pub speed: f32,
    pub level: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(BASE_SPEED)
    }
}

impl Progression {
    pub fn new(base_speed: f32) -> Self {
        Self {
            score: 0,
            goal: BASE_POINTS * GOAL_SCALE,
            speed: base_speed,
            level: 1,
        }
    }

    /// Add `points`; returns how many levels were gained. Each level speeds growth up and
    /// pushes the goal further out. A goal saturated at `u32::MAX` is final.
    pub fn award(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        let mut gained = 0;
        while self.score >= self.goal && self.goal < u32::MAX {
            self.speed *= SPEED_UP;
            self.goal = self.goal.saturating_add(goal_step(self.level));
            self.level += 1;
            gained += 1;
        }
        gained
    }

    /// Progress from the previous goal towards the current one, in `[0, 1]`.
    pub fn goal_ratio(&self) -> f64 {
        let prev = if self.level <= 1 {
            0
        } else {
            self.goal.saturating_sub(goal_step(self.level - 1))
        };
        let span = self.goal.saturating_sub(prev).max(1);
        (f64::from(self.score.saturating_sub(prev)) / f64::from(span)).min(1.0)
    }
}

fn goal_step(level: u32) -> u32 {
    ((BASE_POINTS * GOAL_SCALE) as f32 * GOAL_GROWTH.powi(level as i32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_goal_no_level() {
        let mut p = Progression::default();
        assert_eq!(p.award(2999), 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.goal, 3000);
    }

    #[test]
    fn test_single_level_up() {
        let mut p = Progression::default();
        assert_eq!(p.award(3000), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.goal, 3000 + goal_step(1));
        assert!((p.speed - BASE_SPEED * SPEED_UP).abs() < 1e-6);
    }

    #[test]
    fn test_two_goals_in_one_award() {
        let mut p = Progression::default();
        let points = 3000 + goal_step(1);
        assert_eq!(p.award(points), 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.goal, 3000 + goal_step(1) + goal_step(2));
        assert!((p.speed - BASE_SPEED * SPEED_UP * SPEED_UP).abs() < 1e-6);
    }

    #[test]
    fn test_values_never_decrease() {
        let mut p = Progression::default();
        let mut last = p.clone();
        for points in [0, 99, 5000, 1, 0, 20_000, 7] {
            p.award(points);
            assert!(p.score >= last.score);
            assert!(p.goal >= last.goal);
            assert!(p.level >= last.level);
            assert!(p.speed >= last.speed);
            assert!(p.score < p.goal);
            last = p.clone();
        }
    }

    #[test]
    fn test_saturated_score_stops_levelling() {
        let mut p = Progression::default();
        let gained = p.award(u32::MAX);
        assert!(gained > 1);
        assert_eq!(p.score, u32::MAX);
        assert_eq!(p.goal, u32::MAX);
        assert_eq!(p.level, 1 + gained);
        assert_eq!(p.award(u32::MAX), 0);
    }

    #[test]
    fn test_goal_ratio() {
        let mut p = Progression::default();
        assert_eq!(p.goal_ratio(), 0.0);
        p.award(1500);
        assert!((p.goal_ratio() - 0.5).abs() < 1e-9);
    }
}
