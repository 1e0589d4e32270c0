//! Replays a step log onto its own grid, one step per tick, so a maze can be revealed at whatever
//! pace the caller likes.

use rand::Rng;
use tracing::{debug, trace};

use crate::errors::MazeError;
use crate::generators::Algorithm;
use crate::grid::{Grid, Style};
use crate::steps::StepLog;
use crate::units::{Height, Width};

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Playback {
    /// Steps remain to be applied.
    Pending,
    /// Every step has been applied, the grid holds the finished maze.
    Drained,
}

#[derive(Clone, Debug)]
pub struct GrowingMaze {
    grid: Grid,
    steps: StepLog,
}

impl GrowingMaze {
    /// Generate a maze with `algorithm` and get it back ready to grow from a blank grid.
    pub fn generate<R>(algorithm: Algorithm,
                       width: Width,
                       height: Height,
                       style: Style,
                       rng: &mut R)
                       -> Result<GrowingMaze, MazeError>
        where R: Rng + ?Sized
    {
        let mut carved = Grid::new(width, height, style)?;
        let steps = algorithm.generate(&mut carved, rng)?;
        GrowingMaze::from_steps(width, height, style, steps)
    }

    /// Grow a previously recorded log, for example one loaded from a file.
    pub fn from_steps(width: Width,
                      height: Height,
                      style: Style,
                      steps: StepLog)
                      -> Result<GrowingMaze, MazeError> {
        Ok(GrowingMaze {
            grid: Grid::new(width, height, style)?,
            steps,
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The steps not yet applied.
    #[inline]
    pub fn steps(&self) -> &StepLog {
        &self.steps
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn has_more_steps(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn state(&self) -> Playback {
        if self.has_more_steps() {
            Playback::Pending
        } else {
            Playback::Drained
        }
    }

    /// Apply the earliest remaining step. Ok(false) when there was nothing left to apply.
    ///
    /// A step that fails to apply stays at the front of the log and leaves the grid untouched.
    pub fn advance(&mut self) -> Result<bool, MazeError> {
        let applied = match self.steps.front() {
            Some(step) => {
                step.apply(&mut self.grid)?;
                trace!(actions = step.actions().len(), "applied grow step");
                true
            }
            None => false,
        };

        if applied {
            let _ = self.steps.pop_front();
            if self.steps.is_empty() {
                debug!(width = self.grid.width().0,
                       height = self.grid.height().0,
                       style = %self.grid.style(),
                       "maze fully grown");
            }
        }
        Ok(applied)
    }

    /// Skip the rest of the animation. Returns how many steps were applied.
    pub fn finish(&mut self) -> Result<usize, MazeError> {
        let mut applied = 0;
        while self.advance()? {
            applied += 1;
        }
        Ok(applied)
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}
