//! Bounded block stacks: the growing columns and the holding buffer.

use crate::color::{BlockColor, ColorSource};

/// Slots per column; a column that fills up ends the game.
pub const STACK_SIZE: usize = 16;

/// Number of columns on the field.
pub const STACK_COUNT: usize = 3;

/// Shortest run of one colour that pops.
pub const MIN_RUN: usize = 3;

/// Ordered blocks from the ground (index 0) upward.
///
/// `slots[..height]` are all `Some`, everything above is `None`. `capacity` is at most
/// [`STACK_SIZE`]; the single-slot holding buffer uses a capacity of 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    slots: [Option<BlockColor>; STACK_SIZE],
    height: usize,
    capacity: usize,
}

/// A maximal same-colour run inside a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: usize,
    pub len: usize,
    pub color: BlockColor,
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        assert!(
            (1..=STACK_SIZE).contains(&capacity),
            "stack capacity {capacity} out of range"
        );
        Self {
            slots: [None; STACK_SIZE],
            height: 0,
            capacity,
        }
    }

    /// Stack filled ground-up with `blocks`.
    #[cfg(test)]
    pub fn from_blocks(capacity: usize, blocks: &[BlockColor]) -> Self {
        let mut s = Self::new(capacity);
        for &b in blocks {
            s.push_top(b);
        }
        s
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.height >= self.capacity
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<BlockColor> {
        self.slots.get(index).copied().flatten()
    }

    pub fn top(&self) -> Option<BlockColor> {
        self.height.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Occupied blocks, ground first.
    pub fn blocks(&self) -> impl Iterator<Item = BlockColor> + '_ {
        self.slots[..self.height].iter().flatten().copied()
    }

    pub fn push_top(&mut self, color: BlockColor) {
        assert!(!self.is_full(), "push onto a full stack");
        self.slots[self.height] = Some(color);
        self.height += 1;
    }

    pub fn pop_top(&mut self) -> Option<BlockColor> {
        let i = self.height.checked_sub(1)?;
        let c = self.slots[i].take();
        self.height = i;
        c
    }

    /// Insert at the ground, lifting every occupied block by one slot.
    pub fn push_bottom(&mut self, color: BlockColor) {
        assert!(!self.is_full(), "commit into a full stack");
        for k in (1..=self.height).rev() {
            self.slots[k] = self.slots[k - 1];
        }
        self.slots[0] = Some(color);
        self.height += 1;
    }

    /// First maximal run of at least [`MIN_RUN`] blocks, scanning from the ground.
    pub fn find_run(&self) -> Option<Run> {
        let mut start = 0;
        while start < self.height {
            let color = self.slots[start]?;
            let mut end = start + 1;
            while end < self.height && self.slots[end] == Some(color) {
                end += 1;
            }
            let len = end - start;
            if len >= MIN_RUN {
                return Some(Run { start, len, color });
            }
            start = end;
        }
        None
    }

    /// Excise `len` blocks at `start` and close the gap from above.
    pub fn remove(&mut self, start: usize, len: usize) {
        assert!(start + len <= self.height, "removal past stack height");
        for k in start..self.height - len {
            self.slots[k] = self.slots[k + len];
        }
        for slot in &mut self.slots[self.height - len..self.height] {
            *slot = None;
        }
        self.height -= len;
    }

    /// True when the occupied prefix has no gaps and nothing sits above it.
    pub fn is_compact(&self) -> bool {
        self.height <= self.capacity
            && self.slots[..self.height].iter().all(Option::is_some)
            && self.slots[self.height..].iter().all(Option::is_none)
    }
}

/// One growing lane: its blocks, the colour about to rise in, and growth progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub stack: Stack,
    pub next: BlockColor,
    /// Fraction of the next block already grown, in `[0, 1)` between ticks.
    pub growth: f32,
}

impl Column {
    pub fn new(colors: &mut dyn ColorSource) -> Self {
        Self {
            stack: Stack::new(STACK_SIZE),
            next: colors.next_color(),
            growth: 0.0,
        }
    }

    /// Push `next` in at the ground and draw a fresh `next`.
    pub fn commit(&mut self, colors: &mut dyn ColorSource) {
        self.stack.push_bottom(self.next);
        self.next = colors.next_color();
    }
}
