use thiserror::Error;

use crate::cells::{GridCoordinate, WallIndex};

/// What an `InvalidReference` failed to resolve.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Reference {
    OutOfGrid,
    NotANeighbour(GridCoordinate),
    NotAnAdjacentWall(WallIndex),
}

#[derive(Error, Eq, PartialEq, Clone, Debug)]
pub enum MazeError {
    #[error("a {width}x{height} grid is too small, each dimension must be at least {minimum}")]
    InvalidDimension {
        width: usize,
        height: usize,
        minimum: usize,
    },

    #[error("invalid grow action kind: {0:?}")]
    InvalidAction(String),

    #[error("mazes are carved into a blank grid, this one has {active_cells} active cells and \
             {inactive_walls} inactive walls")]
    NotBlank {
        active_cells: usize,
        inactive_walls: usize,
    },

    #[error("invalid reference from cell {from}: {reason:?}")]
    InvalidReference {
        from: GridCoordinate,
        reason: Reference,
    },
}

impl MazeError {
    pub(crate) fn out_of_grid(from: GridCoordinate) -> MazeError {
        MazeError::InvalidReference {
            from,
            reason: Reference::OutOfGrid,
        }
    }
}
