use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub x: u32,
    pub y: u32,
}

impl GridCoordinate {
    pub fn new(x: u32, y: u32) -> GridCoordinate {
        GridCoordinate { x, y }
    }

    /// Creates a new coordinate `distance` cells away in the given direction.
    /// Returns None if that would step below zero on either axis, the caller checks the upper
    /// bounds against its grid.
    pub fn offset(self, direction: Direction, distance: u32) -> Option<GridCoordinate> {
        let (x, y) = (self.x, self.y);
        match direction {
            Direction::North => y.checked_sub(distance).map(|ny| GridCoordinate::new(x, ny)),
            Direction::East => x.checked_add(distance).map(|nx| GridCoordinate::new(nx, y)),
            Direction::South => y.checked_add(distance).map(|ny| GridCoordinate::new(x, ny)),
            Direction::West => x.checked_sub(distance).map(|nx| GridCoordinate::new(nx, y)),
        }
    }
}

impl From<(u32, u32)> for GridCoordinate {
    fn from(x_y_pair: (u32, u32)) -> GridCoordinate {
        GridCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;
pub type WallSmallVec = SmallVec<[WallIndex; 4]>;

/// The four sides of a cell, in the order a cell stores its neighbour and wall slots.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North,
                                     Direction::East,
                                     Direction::South,
                                     Direction::West];

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// Stable slot of a wall in its grid's wall arena.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct WallIndex(pub usize);

#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Cell {
    coordinate: GridCoordinate,
    pub(crate) active: bool,
    neighbours: [Option<GridCoordinate>; 4],
    walls: [WallIndex; 4],
}

impl Cell {
    pub(crate) fn new(coordinate: GridCoordinate,
                      neighbours: [Option<GridCoordinate>; 4],
                      walls: [WallIndex; 4])
                      -> Cell {
        Cell {
            coordinate,
            active: false,
            neighbours,
            walls,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> GridCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn neighbour(&self, direction: Direction) -> Option<GridCoordinate> {
        self.neighbours[direction.slot()]
    }

    /// Adjacent cells in north, east, south, west order, skipping the grid boundary.
    pub fn neighbours(&self) -> CoordinateSmallVec {
        self.neighbours.iter().filter_map(|n| *n).collect()
    }

    #[inline]
    pub fn wall(&self, direction: Direction) -> WallIndex {
        self.walls[direction.slot()]
    }

    #[inline]
    pub fn walls(&self) -> [WallIndex; 4] {
        self.walls
    }

    /// A cell is on the edge when it has fewer than four neighbours.
    pub fn is_on_edge(&self) -> bool {
        self.neighbours.iter().any(Option::is_none)
    }

    pub fn direction_to(&self, neighbour: GridCoordinate) -> Option<Direction> {
        Direction::ALL
            .iter()
            .cloned()
            .find(|dir| self.neighbours[dir.slot()] == Some(neighbour))
    }

    pub fn direction_of_wall(&self, wall: WallIndex) -> Option<Direction> {
        Direction::ALL.iter().cloned().find(|dir| self.walls[dir.slot()] == wall)
    }
}

/// A wall on one side of a cell, shared with the neighbour on the other side if there is one.
///
/// `active` means the wall blocks passage.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Wall {
    pub(crate) active: bool,
    first: GridCoordinate,
    first_side: Direction,
    second: Option<GridCoordinate>,
}

impl Wall {
    pub(crate) fn new(first: GridCoordinate,
                      first_side: Direction,
                      second: Option<GridCoordinate>)
                      -> Wall {
        Wall {
            active: true,
            first,
            first_side,
            second,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The cell this wall is addressed from, and the side of that cell it sits on.
    #[inline]
    pub fn anchor(&self) -> (GridCoordinate, Direction) {
        (self.first, self.first_side)
    }

    /// One cell for a border wall, two for an interior wall.
    pub fn cells(&self) -> CoordinateSmallVec {
        let mut cells = CoordinateSmallVec::new();
        cells.push(self.first);
        cells.extend(self.second);
        cells
    }

    #[inline]
    pub fn is_inner(&self) -> bool {
        self.second.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_directions() {
        for dir in Direction::ALL.iter() {
            assert_ne!(dir.opposite(), *dir);
            assert_eq!(dir.opposite().opposite(), *dir);
        }
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::East.opposite(), Direction::West);
    }

    #[test]
    fn direction_slots_are_distinct() {
        let slots: Vec<usize> = Direction::ALL.iter().map(|d| d.slot()).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn coordinate_offsets() {
        let gc = |x, y| GridCoordinate::new(x, y);
        assert_eq!(gc(0, 0).offset(Direction::North, 1), None);
        assert_eq!(gc(0, 0).offset(Direction::West, 1), None);
        assert_eq!(gc(0, 0).offset(Direction::East, 1), Some(gc(1, 0)));
        assert_eq!(gc(0, 0).offset(Direction::South, 2), Some(gc(0, 2)));
        assert_eq!(gc(1, 3).offset(Direction::North, 2), Some(gc(1, 1)));
        assert_eq!(gc(1, 3).offset(Direction::West, 2), None);
        assert_eq!(gc(u32::MAX, 0).offset(Direction::East, 1), None);
    }

    #[test]
    fn cell_edge_detection() {
        let gc = |x, y| GridCoordinate::new(x, y);
        let walls = [WallIndex(0), WallIndex(1), WallIndex(2), WallIndex(3)];
        let inner = Cell::new(gc(1, 1),
                              [Some(gc(1, 0)), Some(gc(2, 1)), Some(gc(1, 2)), Some(gc(0, 1))],
                              walls);
        let corner = Cell::new(gc(0, 0), [None, Some(gc(1, 0)), Some(gc(0, 1)), None], walls);
        assert!(!inner.is_on_edge());
        assert!(corner.is_on_edge());
        assert_eq!(&*corner.neighbours(), &[gc(1, 0), gc(0, 1)]);
        assert_eq!(corner.direction_to(gc(0, 1)), Some(Direction::South));
        assert_eq!(corner.direction_to(gc(5, 5)), None);
        assert_eq!(inner.direction_of_wall(WallIndex(3)), Some(Direction::West));
        assert_eq!(inner.direction_of_wall(WallIndex(9)), None);
    }

    #[test]
    fn wall_cells() {
        let border = Wall::new(GridCoordinate::new(0, 0), Direction::North, None);
        let inner = Wall::new(GridCoordinate::new(0, 1),
                              Direction::North,
                              Some(GridCoordinate::new(0, 0)));
        assert!(border.is_active());
        assert!(!border.is_inner());
        assert_eq!(border.cells().len(), 1);
        assert!(inner.is_inner());
        assert_eq!(&*inner.cells(), &[GridCoordinate::new(0, 1), GridCoordinate::new(0, 0)]);
        assert_eq!(inner.anchor(), (GridCoordinate::new(0, 1), Direction::North));
    }
}
