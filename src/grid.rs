use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cells::{Cell, CoordinateSmallVec, Direction, GridCoordinate, Wall, WallIndex,
                   WallSmallVec};
use crate::errors::{MazeError, Reference};
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{CellsCount, Height, Width, WallsCount};

/// How a grid's cells and walls are read as a maze.
///
/// `Basic` is the thick-wall style: only cells at odd coordinates away from the border are floor,
/// the cells in between are carved to join them and walls play no part once cleared.
/// `Advanced` is the thin-wall style: every cell is floor and an inactive wall is an open passage.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Basic,
    Advanced,
}

impl Style {
    pub fn min_dimension(self) -> usize {
        match self {
            Style::Basic => 3,
            Style::Advanced => 1,
        }
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Style::Basic),
            "advanced" => Ok(Style::Advanced),
            _ => Err(format!("Invalid maze style '{}', must be 'basic' or 'advanced'", s)),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Style::Basic => f.write_str("basic"),
            Style::Advanced => f.write_str("advanced"),
        }
    }
}

/// A rectangular maze topology.
///
/// The grid owns every cell and wall. Cells refer to their neighbours by coordinate and to their
/// walls by `WallIndex`, so the shape is fixed at construction and only the `active` flags change
/// afterwards.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Grid {
    width: Width,
    height: Height,
    style: Style,
    cells: Vec<Cell>,
    walls: Vec<Wall>,
}

impl Grid {
    /// Build a blank grid: no active cells, every wall active.
    ///
    /// Fails with `InvalidDimension` if either side is below the style's minimum.
    pub fn new(width: Width, height: Height, style: Style) -> Result<Grid, MazeError> {
        let (Width(w), Height(h)) = (width, height);
        let minimum = style.min_dimension();
        if w < minimum || h < minimum {
            return Err(MazeError::InvalidDimension {
                width: w,
                height: h,
                minimum,
            });
        }

        let cells = CellIter::new(width, height)
            .map(|coord| {
                let neighbour = |dir| {
                    coord.offset(dir, 1).filter(|c| (c.x as usize) < w && (c.y as usize) < h)
                };
                let neighbours = [neighbour(Direction::North),
                                  neighbour(Direction::East),
                                  neighbour(Direction::South),
                                  neighbour(Direction::West)];
                let walls = [Direction::North, Direction::East, Direction::South, Direction::West]
                    .map(|dir| wall_slot(coord, dir, width, height));
                Cell::new(coord, neighbours, walls)
            })
            .collect::<Vec<_>>();

        // Second pass: one wall per cell boundary, laid out to match `wall_slot`.
        // Horizontal boundaries first, row by row, then the vertical boundaries of each row.
        let WallsCount(walls_count) = width.walls_count(height);
        let mut walls = Vec::with_capacity(walls_count);
        let gc = |x: usize, y: usize| GridCoordinate::new(x as u32, y as u32);
        for boundary in 0..=h {
            for x in 0..w {
                let wall = if boundary < h {
                    let north_of = boundary.checked_sub(1).map(|y| gc(x, y));
                    Wall::new(gc(x, boundary), Direction::North, north_of)
                } else {
                    Wall::new(gc(x, boundary - 1), Direction::South, None)
                };
                walls.push(wall);
            }
        }
        for y in 0..h {
            for boundary in 0..=w {
                let wall = if boundary < w {
                    let west_of = boundary.checked_sub(1).map(|x| gc(x, y));
                    Wall::new(gc(boundary, y), Direction::West, west_of)
                } else {
                    Wall::new(gc(boundary - 1, y), Direction::East, None)
                };
                walls.push(wall);
            }
        }

        Ok(Grid {
            width,
            height,
            style,
            cells,
            walls,
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn style(&self) -> Style {
        self.style
    }

    #[inline]
    pub fn size(&self) -> CellsCount {
        CellsCount(self.cells.len())
    }

    #[inline]
    pub fn walls_count(&self) -> WallsCount {
        WallsCount(self.walls.len())
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional row major index in the range 0..size.
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, coord: GridCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    pub fn wall(&self, wall: WallIndex) -> Option<&Wall> {
        self.walls.get(wall.0)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.width, self.height)
    }

    /// False for coordinates outside of the grid.
    pub fn is_cell_active(&self, coord: GridCoordinate) -> bool {
        self.cell(coord).map_or(false, Cell::is_active)
    }

    /// None for coordinates outside of the grid.
    pub fn is_wall_active(&self, coord: GridCoordinate, side: Direction) -> Option<bool> {
        self.cell(coord).map(|cell| self.walls[cell.wall(side).0].active)
    }

    pub fn set_cell_active(&mut self, coord: GridCoordinate, active: bool) -> Result<(), MazeError> {
        let index = self.grid_coordinate_to_index(coord)
            .ok_or_else(|| MazeError::out_of_grid(coord))?;
        self.cells[index].active = active;
        Ok(())
    }

    /// Sets the wall on the `side` of the cell at `coord`, which is the same wall as the opposite
    /// side of the neighbouring cell.
    pub fn set_wall_active(&mut self,
                           coord: GridCoordinate,
                           side: Direction,
                           active: bool)
                           -> Result<(), MazeError> {
        let wall = self.cell(coord)
            .map(|cell| cell.wall(side))
            .ok_or_else(|| MazeError::out_of_grid(coord))?;
        self.walls[wall.0].active = active;
        Ok(())
    }

    /// Cells that are to the North, East, South or West of a cell, but not necessarily joined to
    /// it by a passage. Empty for coordinates outside of the grid.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        self.cell(coord).map(Cell::neighbours).unwrap_or_default()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: Direction)
                                  -> Option<GridCoordinate> {
        self.cell(coord).and_then(|cell| cell.neighbour(direction))
    }

    pub fn active_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        self.neighbours(coord)
            .into_iter()
            .filter(|n| self.is_cell_active(*n))
            .collect()
    }

    pub fn inactive_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        self.neighbours(coord)
            .into_iter()
            .filter(|n| !self.is_cell_active(*n))
            .collect()
    }

    /// Inactive neighbours that are not on the grid's edge.
    pub fn inner_inactive_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        self.neighbours(coord)
            .into_iter()
            .filter(|n| {
                self.cell(*n).map_or(false, |cell| !cell.is_active() && !cell.is_on_edge())
            })
            .collect()
    }

    pub fn active_walls(&self, coord: GridCoordinate) -> WallSmallVec {
        self.cell(coord)
            .map(|cell| {
                cell.walls()
                    .iter()
                    .cloned()
                    .filter(|wall| self.walls[wall.0].active)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Active walls that separate this cell from a neighbour, excluding the grid's border walls.
    pub fn inner_active_walls(&self, coord: GridCoordinate) -> WallSmallVec {
        self.active_walls(coord)
            .into_iter()
            .filter(|wall| self.walls[wall.0].is_inner())
            .collect()
    }

    /// The neighbour on the far side of `cell` from `neighbour`, None when `cell` is on that edge.
    pub fn opposite_neighbour(&self,
                              cell: GridCoordinate,
                              neighbour: GridCoordinate)
                              -> Result<Option<GridCoordinate>, MazeError> {
        let direction = self.direction_between(cell, neighbour)?;
        Ok(self.neighbour_at_direction(cell, direction.opposite()))
    }

    pub fn wall_between(&self,
                        cell: GridCoordinate,
                        neighbour: GridCoordinate)
                        -> Result<WallIndex, MazeError> {
        let direction = self.direction_between(cell, neighbour)?;
        let from = self.cell(cell).ok_or_else(|| MazeError::out_of_grid(cell))?;
        Ok(from.wall(direction))
    }

    /// The side of `cell` that `neighbour` is on.
    pub fn direction_between(&self,
                             cell: GridCoordinate,
                             neighbour: GridCoordinate)
                             -> Result<Direction, MazeError> {
        let from = self.cell(cell).ok_or_else(|| MazeError::out_of_grid(cell))?;
        from.direction_to(neighbour)
            .ok_or(MazeError::InvalidReference {
                from: cell,
                reason: Reference::NotANeighbour(neighbour),
            })
    }

    /// The side of `cell` that `wall` is on.
    pub fn wall_direction(&self, cell: GridCoordinate, wall: WallIndex) -> Result<Direction, MazeError> {
        let from = self.cell(cell).ok_or_else(|| MazeError::out_of_grid(cell))?;
        from.direction_of_wall(wall)
            .ok_or(MazeError::InvalidReference {
                from: cell,
                reason: Reference::NotAnAdjacentWall(wall),
            })
    }

    /// The one or two cells a wall divides. Empty for an unknown wall.
    pub fn wall_cells(&self, wall: WallIndex) -> CoordinateSmallVec {
        self.wall(wall).map(Wall::cells).unwrap_or_default()
    }

    pub fn active_wall_cells(&self, wall: WallIndex) -> CoordinateSmallVec {
        self.wall_cells(wall)
            .into_iter()
            .filter(|c| self.is_cell_active(*c))
            .collect()
    }

    pub fn inactive_wall_cells(&self, wall: WallIndex) -> CoordinateSmallVec {
        self.wall_cells(wall)
            .into_iter()
            .filter(|c| !self.is_cell_active(*c))
            .collect()
    }

    /// Can the maze be walked from `coord` into its neighbour at `direction`?
    /// Both cells have to be active with no active wall between them.
    pub fn is_passage(&self, coord: GridCoordinate, direction: Direction) -> bool {
        match (self.cell(coord), self.neighbour_at_direction(coord, direction)) {
            (Some(cell), Some(neighbour)) => {
                cell.is_active() && self.is_cell_active(neighbour) &&
                !self.walls[cell.wall(direction).0].active
            }
            _ => false,
        }
    }

    /// Cells joined to a cell by a passage.
    pub fn passages(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        Direction::ALL
            .iter()
            .filter(|dir| self.is_passage(coord, **dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Where a walker at `coord` ends up after trying to step in `direction`.
    /// The walker stays put at the grid edge, in front of an inactive cell or an active wall.
    pub fn move_from(&self, coord: GridCoordinate, direction: Direction) -> GridCoordinate {
        let cell = match self.cell(coord) {
            Some(cell) => cell,
            None => return coord,
        };
        match cell.neighbour(direction) {
            Some(target) if self.is_cell_active(target) &&
                            !self.walls[cell.wall(direction).0].active => target,
            _ => coord,
        }
    }

    pub fn move_north(&self, coord: GridCoordinate) -> GridCoordinate {
        self.move_from(coord, Direction::North)
    }

    pub fn move_east(&self, coord: GridCoordinate) -> GridCoordinate {
        self.move_from(coord, Direction::East)
    }

    pub fn move_south(&self, coord: GridCoordinate) -> GridCoordinate {
        self.move_from(coord, Direction::South)
    }

    pub fn move_west(&self, coord: GridCoordinate) -> GridCoordinate {
        self.move_from(coord, Direction::West)
    }

    pub fn active_cells_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_active()).count()
    }

    pub fn inactive_walls_count(&self) -> usize {
        self.walls.iter().filter(|w| !w.is_active()).count()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| !c.is_active()) && self.walls.iter().all(Wall::is_active)
    }

    /// The carved maze as a graph: one node per active cell, one edge per passage.
    pub fn passage_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let cells_count = self.cells.len();
        let mut graph = UnGraph::<GridCoordinate, ()>::with_capacity(cells_count, cells_count);
        let nodes: Vec<Option<NodeIndex>> = self.cells
            .iter()
            .map(|cell| {
                if cell.is_active() {
                    Some(graph.add_node(cell.coordinate()))
                } else {
                    None
                }
            })
            .collect();

        for cell in self.cells.iter().filter(|c| c.is_active()) {
            let coord = cell.coordinate();
            for dir in &[Direction::East, Direction::South] {
                if self.is_passage(coord, *dir) {
                    let a = self.grid_coordinate_to_index(coord).and_then(|i| nodes[i]);
                    let b = self.neighbour_at_direction(coord, *dir)
                        .and_then(|n| self.grid_coordinate_to_index(n))
                        .and_then(|i| nodes[i]);
                    if let (Some(a), Some(b)) = (a, b) {
                        graph.add_edge(a, b, ());
                    }
                }
            }
        }
        graph
    }

    /// Do the active cells form a single tree of passages?
    pub fn is_perfect_maze(&self) -> bool {
        let graph = self.passage_graph();
        graph.node_count() > 0 && connected_components(&graph) == 1 && !is_cyclic_undirected(&graph)
    }
}

/// Arena slot of the wall on the `side` of `coord`, horizontal walls first then vertical walls.
fn wall_slot(coord: GridCoordinate, side: Direction, width: Width, height: Height) -> WallIndex {
    let (Width(w), Height(h)) = (width, height);
    let (x, y) = (coord.x as usize, coord.y as usize);
    let vertical_base = w * (h + 1);
    let index = match side {
        Direction::North => y * w + x,
        Direction::South => (y + 1) * w + x,
        Direction::West => vertical_base + y * (w + 1) + x,
        Direction::East => vertical_base + y * (w + 1) + x + 1,
    };
    WallIndex(index)
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut output = String::new();

        match self.style {
            Style::Basic => {
                for row in self.iter_row() {
                    for coord in row {
                        output.push(if self.is_cell_active(coord) { ' ' } else { 'X' });
                    }
                    output.push('\n');
                }
            }
            Style::Advanced => {
                let wall_up = |coord, side| self.is_wall_active(coord, side).unwrap_or(true);

                // The north most boundary, after which each row draws its own southern walls.
                output.push('+');
                for x in 0..self.width.0 {
                    let coord = GridCoordinate::new(x as u32, 0);
                    output.push_str(if wall_up(coord, Direction::North) { "---" } else { "   " });
                    output.push('+');
                }
                output.push('\n');

                for row in self.iter_row() {
                    let mut middle = String::new();
                    let mut bottom = String::from("+");
                    if let Some(first) = row.first() {
                        middle.push(if wall_up(*first, Direction::West) { '|' } else { ' ' });
                    }
                    for coord in row {
                        middle.push_str(if self.is_cell_active(coord) { "   " } else { "###" });
                        middle.push(if wall_up(coord, Direction::East) { '|' } else { ' ' });
                        bottom.push_str(if wall_up(coord, Direction::South) { "---" } else { "   " });
                        bottom.push('+');
                    }
                    output.push_str(&middle);
                    output.push('\n');
                    output.push_str(&bottom);
                    output.push('\n');
                }
            }
        }

        write!(f, "{}", output)
    }
}
