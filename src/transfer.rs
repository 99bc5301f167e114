//! Moving top blocks between a column and the holding buffer.

use crate::color::BlockColor;
use crate::stack::Stack;
use thiserror::Error;

/// Why a player action did nothing. Never fatal; the state is left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Misplace {
    #[error("holding buffer is full")]
    HoldingFull,
    #[error("column is empty")]
    ColumnEmpty,
    #[error("nothing held")]
    NothingHeld,
    #[error("column is full")]
    ColumnFull,
    #[error("no runs to pop")]
    NoRuns,
}

/// Take the top block of `column` onto the holding buffer.
pub fn pickup(column: &mut Stack, holding: &mut Stack) -> Result<BlockColor, Misplace> {
    if holding.is_full() {
        return Err(Misplace::HoldingFull);
    }
    let color = column.pop_top().ok_or(Misplace::ColumnEmpty)?;
    holding.push_top(color);
    Ok(color)
}

/// Drop the holding buffer's top block onto `column`.
pub fn place(holding: &mut Stack, column: &mut Stack) -> Result<BlockColor, Misplace> {
    if column.is_full() {
        return Err(Misplace::ColumnFull);
    }
    let color = holding.pop_top().ok_or(Misplace::NothingHeld)?;
    column.push_top(color);
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BlockColor::{Blue, Green, Red};
    use crate::stack::STACK_SIZE;

    #[test]
    fn test_pickup_then_place_restores_column() {
        let mut col = Stack::from_blocks(STACK_SIZE, &[Red, Green, Blue]);
        let before = col.clone();
        let mut holding = Stack::new(STACK_SIZE);
        assert_eq!(pickup(&mut col, &mut holding), Ok(Blue));
        assert_eq!(col.height(), 2);
        assert_eq!(holding.top(), Some(Blue));
        assert_eq!(place(&mut holding, &mut col), Ok(Blue));
        assert_eq!(col, before);
        assert!(holding.is_empty());
    }

    #[test]
    fn test_pickup_from_empty_column() {
        let mut col = Stack::new(STACK_SIZE);
        let mut holding = Stack::new(STACK_SIZE);
        assert_eq!(pickup(&mut col, &mut holding), Err(Misplace::ColumnEmpty));
        assert!(holding.is_empty());
    }

    #[test]
    fn test_single_slot_holding_fills() {
        let mut col = Stack::from_blocks(STACK_SIZE, &[Red, Green]);
        let mut holding = Stack::new(1);
        assert!(pickup(&mut col, &mut holding).is_ok());
        assert_eq!(pickup(&mut col, &mut holding), Err(Misplace::HoldingFull));
        assert_eq!(col.blocks().collect::<Vec<_>>(), vec![Red]);
    }

    #[test]
    fn test_holding_is_lifo() {
        let mut a = Stack::from_blocks(STACK_SIZE, &[Red]);
        let mut b = Stack::from_blocks(STACK_SIZE, &[Blue]);
        let mut holding = Stack::new(STACK_SIZE);
        pickup(&mut a, &mut holding).unwrap();
        pickup(&mut b, &mut holding).unwrap();
        assert_eq!(place(&mut holding, &mut a), Ok(Blue));
        assert_eq!(place(&mut holding, &mut b), Ok(Red));
    }

    #[test]
    fn test_place_rejects() {
        let mut holding = Stack::new(STACK_SIZE);
        let mut col = Stack::new(STACK_SIZE);
        assert_eq!(place(&mut holding, &mut col), Err(Misplace::NothingHeld));

        let mut full = Stack::from_blocks(STACK_SIZE, &[Green; STACK_SIZE]);
        holding.push_top(Red);
        assert_eq!(place(&mut holding, &mut full), Err(Misplace::ColumnFull));
        assert_eq!(holding.height(), 1);
    }
}
