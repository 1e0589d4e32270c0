//! How each maze style turns "join these two floor cells" into grow actions.
//!
//! The generators are written once against `CarveStyle`. `ThickWalls` carves the cell between
//! two odd-coordinate floor cells, `ThinWalls` knocks down the wall between two adjacent cells.

use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{Direction, GridCoordinate};
use crate::errors::MazeError;
use crate::grid::{Grid, Style};
use crate::steps::{GrowAction, StepLog};

/// A candidate connection from one floor cell to another.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Edge {
    pub from: GridCoordinate,
    pub to: GridCoordinate,
    pub direction: Direction,
}

pub type EdgeSmallVec = SmallVec<[Edge; 4]>;

pub trait CarveStyle {
    const STYLE: Style;

    /// Distance in cells between two floor cells joined by an edge.
    const STRIDE: u32;

    fn is_floor(grid: &Grid, coord: GridCoordinate) -> bool;

    /// The action that opens the way along an edge once both ends are active.
    fn passage_action(grid: &Grid, edge: Edge) -> GrowAction;

    /// Work done once before carving starts. Recorded as a leading step if it changes anything.
    fn prepare(_grid: &mut Grid, _log: &mut StepLog) -> Result<(), MazeError> {
        Ok(())
    }

    fn floor_cells(grid: &Grid) -> Vec<GridCoordinate> {
        grid.iter().filter(|coord| Self::is_floor(grid, *coord)).collect()
    }

    fn random_floor_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<GridCoordinate> {
        Self::floor_cells(grid).choose(rng).cloned()
    }

    /// Edges leading out of a floor cell, in north, east, south, west order.
    fn edges_from(grid: &Grid, from: GridCoordinate) -> EdgeSmallVec {
        Direction::ALL
            .iter()
            .filter_map(|dir| {
                from.offset(*dir, Self::STRIDE)
                    .filter(|to| Self::is_floor(grid, *to))
                    .map(|to| {
                        Edge {
                            from,
                            to,
                            direction: *dir,
                        }
                    })
            })
            .collect()
    }

    /// Every edge between floor cells, each listed once.
    fn all_edges(grid: &Grid) -> Vec<Edge> {
        Self::floor_cells(grid)
            .into_iter()
            .flat_map(|from| {
                Self::edges_from(grid, from)
                    .into_iter()
                    .filter(|edge| edge.direction == Direction::East ||
                                   edge.direction == Direction::South)
            })
            .collect()
    }

    /// Joins the two ends of an edge on the live grid and returns the actions that did it, so a
    /// replay of the actions reproduces the grid exactly. Ends that are already active are not
    /// activated again.
    fn connect(grid: &mut Grid, edge: Edge) -> Result<Vec<GrowAction>, MazeError> {
        let mut actions = Vec::with_capacity(3);
        for end in &[edge.from, edge.to] {
            if !grid.is_cell_active(*end) {
                actions.push(GrowAction::activate_cell(*end));
            }
        }
        actions.push(Self::passage_action(grid, edge));
        apply_actions(grid, &actions)?;
        Ok(actions)
    }

    /// Activates a single floor cell, the seed of a maze.
    fn activate(grid: &mut Grid, cell: GridCoordinate) -> Result<Vec<GrowAction>, MazeError> {
        let actions = vec![GrowAction::activate_cell(cell)];
        apply_actions(grid, &actions)?;
        Ok(actions)
    }
}

fn apply_actions(grid: &mut Grid, actions: &[GrowAction]) -> Result<(), MazeError> {
    actions.iter().try_for_each(|action| action.apply(grid))
}

/// Floor cells sit at odd coordinates inside a one cell border, joined through the cell between
/// them. Walls are cleared up front and never drawn.
#[derive(Debug, Copy, Clone)]
pub struct ThickWalls;

impl CarveStyle for ThickWalls {
    const STYLE: Style = Style::Basic;
    const STRIDE: u32 = 2;

    fn is_floor(grid: &Grid, coord: GridCoordinate) -> bool {
        let (x, y) = (coord.x as usize, coord.y as usize);
        x % 2 == 1 && y % 2 == 1 && x + 1 < grid.width().0 && y + 1 < grid.height().0
    }

    fn passage_action(_grid: &Grid, edge: Edge) -> GrowAction {
        let between = GridCoordinate::new((edge.from.x + edge.to.x) / 2,
                                          (edge.from.y + edge.to.y) / 2);
        GrowAction::activate_cell(between)
    }

    fn prepare(grid: &mut Grid, log: &mut StepLog) -> Result<(), MazeError> {
        let actions = grid.walls()
            .iter()
            .filter(|wall| wall.is_active())
            .map(|wall| {
                let (cell, side) = wall.anchor();
                GrowAction::deactivate_wall(cell, side)
            })
            .collect::<Vec<_>>();
        apply_actions(grid, &actions)?;
        log.record(actions);
        Ok(())
    }
}

/// Every cell is floor and neighbouring cells are joined by deactivating the wall between them.
#[derive(Debug, Copy, Clone)]
pub struct ThinWalls;

impl CarveStyle for ThinWalls {
    const STYLE: Style = Style::Advanced;
    const STRIDE: u32 = 1;

    fn is_floor(grid: &Grid, coord: GridCoordinate) -> bool {
        grid.is_valid_coordinate(coord)
    }

    /// Addressed from the side of the newly reached cell.
    fn passage_action(_grid: &Grid, edge: Edge) -> GrowAction {
        GrowAction::deactivate_wall(edge.to, edge.direction.opposite())
    }
}
