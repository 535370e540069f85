//! Index planning for reorder requests.
//!
//! Reorders are expressed as a pair of positions in the list the client
//! last saw. Planning only ever produces pairs inside `0..len`; the first
//! node has no "up" move and the last has no "down" move.

use crate::error::DispatchError;

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the front of the list (lower index).
    Up,
    /// Towards the back of the list (higher index).
    Down,
}

/// A validated `(cur_i, new_i)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// Position of the node to move.
    pub cur: usize,
    /// Position to move it to.
    pub new: usize,
}

impl Move {
    /// Validate an arbitrary move against a list of `len` nodes.
    pub fn between(len: usize, cur: usize, new: usize) -> Result<Self, DispatchError> {
        if cur >= len {
            return Err(DispatchError::OutOfRange { index: cur, len });
        }
        if new >= len {
            return Err(DispatchError::OutOfRange { index: new, len });
        }
        Ok(Self { cur, new })
    }

    /// Single-step move of the node at `index`, or `None` at a boundary.
    pub fn step(len: usize, index: usize, direction: Direction) -> Option<Self> {
        if !can_move(len, index, direction) {
            return None;
        }
        let new = match direction {
            Direction::Up => index - 1,
            Direction::Down => index + 1,
        };
        Some(Self { cur: index, new })
    }
}

/// Whether the node at `index` has a move in `direction`.
pub fn can_move(len: usize, index: usize, direction: Direction) -> bool {
    if index >= len {
        return false;
    }
    match direction {
        Direction::Up => index > 0,
        Direction::Down => index + 1 < len,
    }
}
