//! Block palette and the colour source that feeds new blocks.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Number of distinct block colours.
pub const PALETTE_SIZE: usize = 4;

/// Colour of a block. Blocks carry no identity beyond their colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Red,
    Green,
    Blue,
    Violet,
}

impl BlockColor {
    pub const ALL: [Self; PALETTE_SIZE] = [Self::Red, Self::Green, Self::Blue, Self::Violet];

    /// Index 0..PALETTE_SIZE for theme lookups.
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Violet => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Violet => "violet",
        }
    }
}

/// Where new block colours come from. The game never touches randomness except through this.
pub trait ColorSource {
    fn next_color(&mut self) -> BlockColor;
}

/// Uniform draws over the palette from a seedable RNG.
#[derive(Debug, Clone)]
pub struct RandomColors {
    rng: SmallRng,
}

impl RandomColors {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self) -> BlockColor {
        BlockColor::ALL[self.rng.random_range(0..PALETTE_SIZE)]
    }
}

/// Replays a fixed sequence of colours, wrapping around at the end.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SequenceColors {
    seq: Vec<BlockColor>,
    pos: usize,
}

#[cfg(test)]
impl SequenceColors {
    pub fn new(seq: &[BlockColor]) -> Self {
        assert!(!seq.is_empty());
        Self {
            seq: seq.to_vec(),
            pos: 0,
        }
    }
}

#[cfg(test)]
impl ColorSource for SequenceColors {
    fn next_color(&mut self) -> BlockColor {
        let c = self.seq[self.pos % self.seq.len()];
        self.pos += 1;
        c
    }
}
