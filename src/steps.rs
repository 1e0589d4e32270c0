//! The recorded history of a maze's growth.
//!
//! A generator appends `GrowStep`s to a `StepLog` as it carves; a consumer later pops them off
//! the front and applies them to a blank grid of the same shape, one animation frame per step.

use serde_derive::{Deserialize, Serialize};
use std::collections::vec_deque::{self, VecDeque};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::cells::{Direction, GridCoordinate};
use crate::errors::MazeError;
use crate::grid::Grid;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActionKind {
    Activate,
    Deactivate,
}

impl ActionKind {
    #[inline]
    pub fn flag(self) -> bool {
        self == ActionKind::Activate
    }
}

impl FromStr for ActionKind {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activate" => Ok(ActionKind::Activate),
            "deactivate" => Ok(ActionKind::Deactivate),
            _ => Err(MazeError::InvalidAction(s.to_owned())),
        }
    }
}

impl TryFrom<String> for ActionKind {
    type Error = MazeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> String {
        kind.to_string()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ActionKind::Activate => f.write_str("activate"),
            ActionKind::Deactivate => f.write_str("deactivate"),
        }
    }
}

/// A cell, or one of the four walls of a cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub struct ActionTarget {
    pub cell: GridCoordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall: Option<Direction>,
}

/// Sets exactly one `active` flag on one cell or wall.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub struct GrowAction {
    pub kind: ActionKind,
    #[serde(flatten)]
    pub target: ActionTarget,
}

impl GrowAction {
    pub fn new(kind: ActionKind, cell: GridCoordinate, wall: Option<Direction>) -> GrowAction {
        GrowAction {
            kind,
            target: ActionTarget { cell, wall },
        }
    }

    pub fn activate_cell(cell: GridCoordinate) -> GrowAction {
        GrowAction::new(ActionKind::Activate, cell, None)
    }

    pub fn deactivate_cell(cell: GridCoordinate) -> GrowAction {
        GrowAction::new(ActionKind::Deactivate, cell, None)
    }

    pub fn activate_wall(cell: GridCoordinate, side: Direction) -> GrowAction {
        GrowAction::new(ActionKind::Activate, cell, Some(side))
    }

    pub fn deactivate_wall(cell: GridCoordinate, side: Direction) -> GrowAction {
        GrowAction::new(ActionKind::Deactivate, cell, Some(side))
    }

    pub fn apply(&self, grid: &mut Grid) -> Result<(), MazeError> {
        let ActionTarget { cell, wall } = self.target;
        match wall {
            Some(side) => grid.set_wall_active(cell, side, self.kind.flag()),
            None => grid.set_cell_active(cell, self.kind.flag()),
        }
    }
}

/// One or more actions applied together as a single frame.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<GrowAction>", into = "Vec<GrowAction>")]
pub struct GrowStep {
    actions: Vec<GrowAction>,
}

impl GrowStep {
    /// None for an empty list of actions.
    pub fn new(actions: Vec<GrowAction>) -> Option<GrowStep> {
        if actions.is_empty() {
            None
        } else {
            Some(GrowStep { actions })
        }
    }

    pub fn single(action: GrowAction) -> GrowStep {
        GrowStep { actions: vec![action] }
    }

    #[inline]
    pub fn actions(&self) -> &[GrowAction] {
        &self.actions
    }

    /// Applies every action or none: all targets are resolved against the grid before any flag is
    /// set.
    ///
    /// Checking the cell is enough to resolve a wall target too, every cell owns all four of its
    /// wall slots. A target kind that can fail any other way must be checked here as well.
    pub fn apply(&self, grid: &mut Grid) -> Result<(), MazeError> {
        if let Some(bad) = self.actions.iter().find(|a| !grid.is_valid_coordinate(a.target.cell)) {
            return Err(MazeError::out_of_grid(bad.target.cell));
        }
        for action in &self.actions {
            action.apply(grid)?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<GrowAction>> for GrowStep {
    type Error = &'static str;

    fn try_from(actions: Vec<GrowAction>) -> Result<Self, Self::Error> {
        GrowStep::new(actions).ok_or("a grow step needs at least one action")
    }
}

impl From<GrowStep> for Vec<GrowAction> {
    fn from(step: GrowStep) -> Vec<GrowAction> {
        step.actions
    }
}

/// Ordered growth steps: appended at the back while generating, consumed from the front while
/// replaying.
#[derive(Eq, PartialEq, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepLog {
    steps: VecDeque<GrowStep>,
}

impl StepLog {
    pub fn new() -> StepLog {
        StepLog::default()
    }

    pub fn push(&mut self, step: GrowStep) {
        self.steps.push_back(step);
    }

    /// Appends the actions as one step, skipping an empty list.
    pub fn record(&mut self, actions: Vec<GrowAction>) {
        if let Some(step) = GrowStep::new(actions) {
            self.push(step);
        }
    }

    pub fn pop_front(&mut self) -> Option<GrowStep> {
        self.steps.pop_front()
    }

    pub fn front(&self) -> Option<&GrowStep> {
        self.steps.front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn actions_count(&self) -> usize {
        self.steps.iter().map(|step| step.actions.len()).sum()
    }

    pub fn iter(&self) -> vec_deque::Iter<GrowStep> {
        self.steps.iter()
    }

    /// Applies every step in order to `grid` without consuming the log.
    pub fn apply_all(&self, grid: &mut Grid) -> Result<(), MazeError> {
        self.steps.iter().try_for_each(|step| step.apply(grid))
    }
}

impl IntoIterator for StepLog {
    type Item = GrowStep;
    type IntoIter = vec_deque::IntoIter<GrowStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a> IntoIterator for &'a StepLog {
    type Item = &'a GrowStep;
    type IntoIter = vec_deque::Iter<'a, GrowStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl Extend<GrowStep> for StepLog {
    fn extend<T: IntoIterator<Item = GrowStep>>(&mut self, iter: T) {
        self.steps.extend(iter)
    }
}
