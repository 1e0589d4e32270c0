// Dijkstra's Algorithm, the simplified flood fill form.
// Every passage is one step long so a breadth first walk from the start visits each cell at its
// shortest distance the first time, no relaxing of distances is needed.
//
// Only passages count: both cells active and no active wall between them. That makes the same
// code work on a live grid, a half grown maze and either maze style.

use fnv::FnvHashMap;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::cells::GridCoordinate;
use crate::grid::Grid;

#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// None if the start is outside the grid or not carved yet.
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {
        if !grid.is_cell_active(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = FnvHashMap::default();
        distances.insert(start_coordinate, 0);

        // The distances map doubles as the visited set, so the frontier can be a plain vec.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {
            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link_coordinate in grid.passages(*cell_coord) {
                    if !distances.contains_key(&link_coordinate) {
                        distances.insert(link_coordinate, distance_to_cell + 1);
                        new_frontier.push(link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None when `coord` cannot be reached from the start.
    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// Cells at the maximum distance from the start, in row major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted_by_key(|coord| (coord.y, coord.x))
            .collect()
    }
}

/// Walks back downhill from `end_point` to the start of `distances_from_start`.
/// None if the end point is unreachable.
pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {
    distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {
        let current_distance = distances_from_start.distance_from_start_to(current_coord)?;

        let closest_to_start = grid.passages(current_coord)
            .into_iter()
            .filter_map(|coord| {
                distances_from_start.distance_from_start_to(coord).map(|d| (coord, d))
            })
            .min_by_key(|&(_, distance)| distance);

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance => {
                current_coord = closer_coord;
                path.push(current_coord);
            }
            // The grid changed since the distances were computed.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// The longest route through a perfect maze: the cell furthest from any cell is one end of it.
/// On a maze with loops or disconnected regions it is just some long path.
pub fn longest_path(grid: &Grid) -> Option<Vec<GridCoordinate>> {
    let arbitrary_start_point = grid.iter().find(|coord| grid.is_cell_active(*coord))?;
    let first_distances = Distances::new(grid, arbitrary_start_point)?;
    let long_path_start = *first_distances.furthest_points_on_grid().first()?;

    let distances_from_start = Distances::new(grid, long_path_start)?;
    let end_point = *distances_from_start.furthest_points_on_grid().first()?;

    shortest_path(grid, &distances_from_start, end_point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::Direction;
    use crate::grid::Style;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    // A 2x2 loop: every cell active, every inner wall down.
    fn open_grid() -> Grid {
        let mut g = Grid::new(Width(2), Height(2), Style::Advanced).unwrap();
        for coord in g.iter() {
            g.set_cell_active(coord, true).unwrap();
        }
        g.set_wall_active(gc(0, 0), Direction::East, false).unwrap();
        g.set_wall_active(gc(0, 0), Direction::South, false).unwrap();
        g.set_wall_active(gc(1, 1), Direction::North, false).unwrap();
        g.set_wall_active(gc(1, 1), Direction::West, false).unwrap();
        g
    }

    #[test]
    fn distances_require_an_active_start() {
        let g = Grid::new(Width(3), Height(3), Style::Advanced).unwrap();
        assert!(Distances::new(&g, gc(1, 1)).is_none());
        assert!(Distances::new(&open_grid(), gc(5, 5)).is_none());
    }

    #[test]
    fn distances_on_open_grid() {
        let g = open_grid();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.start(), gc(0, 0));
        assert_eq!(distances.distance_from_start_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_from_start_to(gc(1, 0)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), Some(2));
        assert_eq!(distances.max(), 2);
        assert_eq!(&*distances.furthest_points_on_grid(), &[gc(1, 1)]);
        assert_eq!(distances.reachable_count(), 4);
    }

    #[test]
    fn unreachable_cells_have_no_distance() {
        let mut g = open_grid();
        g.set_wall_active(gc(1, 1), Direction::North, true).unwrap();
        g.set_wall_active(gc(1, 1), Direction::West, true).unwrap();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.distance_from_start_to(gc(1, 1)), None);
        assert!(shortest_path(&g, &distances, gc(1, 1)).is_none());
    }

    #[test]
    fn shortest_path_on_open_grid() {
        let g = open_grid();
        let distances = Distances::new(&g, gc(0, 0)).unwrap();
        let path = shortest_path(&g, &distances, gc(1, 1)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(&gc(0, 0)));
        assert_eq!(path.last(), Some(&gc(1, 1)));
        assert_eq!(shortest_path(&g, &distances, gc(0, 0)), Some(vec![gc(0, 0)]));
    }

    #[test]
    fn longest_path_through_a_corridor() {
        // A U shaped corridor: (0,0) (0,1) (1,1) (1,0)
        let mut g = Grid::new(Width(2), Height(2), Style::Advanced).unwrap();
        for coord in g.iter() {
            g.set_cell_active(coord, true).unwrap();
        }
        g.set_wall_active(gc(0, 0), Direction::South, false).unwrap();
        g.set_wall_active(gc(0, 1), Direction::East, false).unwrap();
        g.set_wall_active(gc(1, 1), Direction::North, false).unwrap();

        let path = longest_path(&g).unwrap();
        assert_eq!(path, vec![gc(1, 0), gc(1, 1), gc(0, 1), gc(0, 0)]);
    }

    #[test]
    fn no_longest_path_on_a_blank_grid() {
        let g = Grid::new(Width(3), Height(3), Style::Basic).unwrap();
        assert!(longest_path(&g).is_none());
    }
}
