//! **growing_mazes** generates perfect mazes and records how they grew.
//!
//! A generator carves a maze into a `Grid` and returns a `StepLog`, the exact sequence of cell and
//! wall changes it made. A `GrowingMaze` replays that log onto a blank grid a step at a time, so
//! a renderer can reveal the maze at its own pace.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_iterators;
pub mod growing;
pub mod pathing;
pub mod steps;
pub mod styles;
pub mod units;

pub use crate::errors::MazeError;
