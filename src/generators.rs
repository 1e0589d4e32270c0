use petgraph::unionfind::UnionFind;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::cells::GridCoordinate;
use crate::errors::MazeError;
use crate::grid::{Grid, Style};
use crate::steps::StepLog;
use crate::styles::{CarveStyle, Edge, EdgeSmallVec, ThickWalls, ThinWalls};

/// The maze generation algorithms. Each runs in either grid style.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Algorithm {
    DepthFirst,
    Kruskal,
    Prim,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::DepthFirst, Algorithm::Kruskal, Algorithm::Prim];

    /// Carve a maze into a blank `grid`, returning the steps that grew it.
    pub fn generate<R>(self, grid: &mut Grid, rng: &mut R) -> Result<StepLog, MazeError>
        where R: Rng + ?Sized
    {
        match self {
            Algorithm::DepthFirst => depth_first(grid, rng),
            Algorithm::Kruskal => kruskal(grid, rng),
            Algorithm::Prim => prim(grid, rng),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "depth-first" | "dfs" => Ok(Algorithm::DepthFirst),
            "kruskal" => Ok(Algorithm::Kruskal),
            "prim" => Ok(Algorithm::Prim),
            _ => {
                Err(format!("Unknown maze algorithm '{}', must be one of depth-first, kruskal or \
                             prim",
                            s))
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Algorithm::DepthFirst => f.write_str("depth-first"),
            Algorithm::Kruskal => f.write_str("kruskal"),
            Algorithm::Prim => f.write_str("prim"),
        }
    }
}

/// A deterministic generator for reproducible mazes.
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    XorShiftRng::seed_from_u64(seed)
}

pub fn entropy_rng() -> XorShiftRng {
    XorShiftRng::from_entropy()
}

/// Randomized depth first search, the recursive backtracker.
///
/// Walks from a random floor cell to a random unvisited neighbour, carving as it goes, and
/// backtracks along its stack whenever it hits a dead end. Long winding corridors with few
/// branches.
pub fn depth_first<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<StepLog, MazeError> {
    let log = match grid.style() {
        Style::Basic => carve_depth_first::<ThickWalls, _>(grid, rng)?,
        Style::Advanced => carve_depth_first::<ThinWalls, _>(grid, rng)?,
    };
    log_generated(Algorithm::DepthFirst, grid, &log);
    Ok(log)
}

/// Randomized Kruskal's.
///
/// Every floor cell starts in a set of its own. Edges are visited in a random order and carved
/// whenever they join two different sets, the sets then merge. Lots of short dead ends.
pub fn kruskal<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<StepLog, MazeError> {
    let mut log = StepLog::new();
    match grid.style() {
        Style::Basic => carve_kruskal::<ThickWalls, _>(grid, rng, &mut log)?,
        Style::Advanced => carve_kruskal::<ThinWalls, _>(grid, rng, &mut log)?,
    };
    log_generated(Algorithm::Kruskal, grid, &log);
    Ok(log)
}

/// Randomized Prim's.
///
/// Grows outwards from a random floor cell, each time carving a random edge from the frontier of
/// edges leading out of the carved region. Radiates from the start with many short branches.
pub fn prim<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<StepLog, MazeError> {
    let log = match grid.style() {
        Style::Basic => carve_prim::<ThickWalls, _>(grid, rng)?,
        Style::Advanced => carve_prim::<ThinWalls, _>(grid, rng)?,
    };
    log_generated(Algorithm::Prim, grid, &log);
    Ok(log)
}

fn log_generated(algorithm: Algorithm, grid: &Grid, log: &StepLog) {
    debug!(%algorithm,
           style = %grid.style(),
           width = grid.width().0,
           height = grid.height().0,
           steps = log.len(),
           actions = log.actions_count(),
           "maze generated");
}

fn carve_depth_first<S, R>(grid: &mut Grid, rng: &mut R) -> Result<StepLog, MazeError>
    where S: CarveStyle,
          R: Rng + ?Sized
{
    ensure_blank(grid)?;
    let mut log = StepLog::new();
    S::prepare(grid, &mut log)?;

    let start = match S::random_floor_cell(grid, rng) {
        Some(cell) => cell,
        None => return Ok(log),
    };
    log.record(S::activate(grid, start)?);

    let mut stack = vec![start];
    while let Some(&current) = stack.last() {
        let unvisited: EdgeSmallVec = S::edges_from(grid, current)
            .into_iter()
            .filter(|edge| !grid.is_cell_active(edge.to))
            .collect();

        match unvisited.choose(rng) {
            Some(&edge) => {
                log.record(S::connect(grid, edge)?);
                stack.push(edge.to);
            }
            None => {
                stack.pop();
            }
        }
    }

    Ok(log)
}

/// Returns the final disjoint sets, indexed by cell index, alongside the steps in `log`.
fn carve_kruskal<S, R>(grid: &mut Grid,
                       rng: &mut R,
                       log: &mut StepLog)
                       -> Result<UnionFind<usize>, MazeError>
    where S: CarveStyle,
          R: Rng + ?Sized
{
    ensure_blank(grid)?;
    S::prepare(grid, log)?;

    let mut sets = UnionFind::new(grid.size().0);
    let mut edges = S::all_edges(grid);
    edges.shuffle(rng);

    for edge in edges {
        let from = cell_index(grid, edge.from)?;
        let to = cell_index(grid, edge.to)?;
        if sets.union(from, to) {
            log.record(S::connect(grid, edge)?);
        }
    }

    // Only a grid with a single floor cell has no edges to carve it through.
    let uncarved: Vec<GridCoordinate> = S::floor_cells(grid)
        .into_iter()
        .filter(|cell| !grid.is_cell_active(*cell))
        .collect();
    for cell in uncarved {
        log.record(S::activate(grid, cell)?);
    }

    Ok(sets)
}

fn carve_prim<S, R>(grid: &mut Grid, rng: &mut R) -> Result<StepLog, MazeError>
    where S: CarveStyle,
          R: Rng + ?Sized
{
    ensure_blank(grid)?;
    let mut log = StepLog::new();
    S::prepare(grid, &mut log)?;

    let start = match S::random_floor_cell(grid, rng) {
        Some(cell) => cell,
        None => return Ok(log),
    };
    log.record(S::activate(grid, start)?);

    let mut frontier: Vec<Edge> = S::edges_from(grid, start).into_vec();
    while !frontier.is_empty() {
        let pick = rng.gen_range(0..frontier.len());
        let edge = frontier.swap_remove(pick);

        // Another frontier edge may have reached the far cell first.
        if grid.is_cell_active(edge.from) && !grid.is_cell_active(edge.to) {
            log.record(S::connect(grid, edge)?);
            frontier.extend(S::edges_from(grid, edge.to)
                .into_iter()
                .filter(|next| !grid.is_cell_active(next.to)));
        }
    }

    Ok(log)
}

/// Replay starts from a blank grid, so generation has to as well.
fn ensure_blank(grid: &Grid) -> Result<(), MazeError> {
    if grid.is_blank() {
        Ok(())
    } else {
        Err(MazeError::NotBlank {
            active_cells: grid.active_cells_count(),
            inactive_walls: grid.inactive_walls_count(),
        })
    }
}

fn cell_index(grid: &Grid, coord: GridCoordinate) -> Result<usize, MazeError> {
    grid.grid_coordinate_to_index(coord).ok_or_else(|| MazeError::out_of_grid(coord))
}

#[cfg(test)]
mod tests {
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::cells::Direction;
    use crate::pathing::Distances;
    use crate::steps::ActionKind;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    fn grid(w: usize, h: usize, style: Style) -> Grid {
        Grid::new(Width(w), Height(h), style).unwrap()
    }

    fn all_variants() -> Vec<(Algorithm, Style)> {
        Algorithm::ALL
            .iter()
            .flat_map(|algorithm| {
                [Style::Basic, Style::Advanced].iter().map(move |style| (*algorithm, *style))
            })
            .collect()
    }

    #[test]
    fn algorithm_names() {
        for algorithm in &Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(*algorithm));
        }
        assert_eq!("DFS".parse::<Algorithm>(), Ok(Algorithm::DepthFirst));
        assert!("wilson".parse::<Algorithm>().is_err());
    }

    #[test]
    fn smallest_basic_grid_carves_its_single_floor_cell() {
        for algorithm in &Algorithm::ALL {
            let mut live = grid(3, 3, Style::Basic);
            let log = algorithm.generate(&mut live, &mut seeded_rng(7)).unwrap();

            let mut replayed = grid(3, 3, Style::Basic);
            log.apply_all(&mut replayed).unwrap();

            assert_eq!(replayed.active_cells_count(), 1, "{}", algorithm);
            assert!(replayed.is_cell_active(gc(1, 1)));
            assert_eq!(replayed.inactive_walls_count(), replayed.walls_count().0);
            assert_eq!(replayed, live);
        }
    }

    #[test]
    fn five_by_five_advanced_grid_is_a_spanning_tree() {
        for algorithm in &Algorithm::ALL {
            let mut live = grid(5, 5, Style::Advanced);
            let log = algorithm.generate(&mut live, &mut seeded_rng(11)).unwrap();

            let mut replayed = grid(5, 5, Style::Advanced);
            log.apply_all(&mut replayed).unwrap();

            assert_eq!(replayed.active_cells_count(), 25, "{}", algorithm);
            assert_eq!(replayed.inactive_walls_count(), 24, "{}", algorithm);
            assert!(replayed.is_perfect_maze());
        }
    }

    #[test]
    fn carved_grids_are_rejected() {
        for (algorithm, style) in all_variants() {
            let mut g = grid(5, 5, style);
            let _ = Algorithm::DepthFirst.generate(&mut g, &mut seeded_rng(4)).unwrap();
            let carved = g.clone();

            let result = algorithm.generate(&mut g, &mut seeded_rng(4));
            assert_eq!(result,
                       Err(MazeError::NotBlank {
                           active_cells: carved.active_cells_count(),
                           inactive_walls: carved.inactive_walls_count(),
                       }),
                       "{} {}",
                       algorithm,
                       style);
            assert_eq!(g, carved);
        }

        let mut one_wall_down = grid(3, 3, Style::Advanced);
        one_wall_down.set_wall_active(gc(1, 1), Direction::North, false).unwrap();
        assert!(kruskal(&mut one_wall_down, &mut seeded_rng(4)).is_err());
    }

    #[test]
    fn one_by_one_advanced_grid() {
        for algorithm in &Algorithm::ALL {
            let mut live = grid(1, 1, Style::Advanced);
            let log = algorithm.generate(&mut live, &mut seeded_rng(3)).unwrap();
            assert_eq!(log.len(), 1);
            assert_eq!(live.active_cells_count(), 1);
            assert_eq!(live.inactive_walls_count(), 0);
        }
    }

    #[test]
    fn basic_style_clears_walls_in_the_leading_step() {
        for algorithm in &Algorithm::ALL {
            let mut live = grid(9, 7, Style::Basic);
            let log = algorithm.generate(&mut live, &mut seeded_rng(5)).unwrap();
            let first = log.front().unwrap();
            assert_eq!(first.actions().len(), live.walls_count().0);
            assert!(first.actions().iter().all(|a| {
                a.kind == ActionKind::Deactivate && a.target.wall.is_some()
            }));
            assert!(log.iter().skip(1).flat_map(|s| s.actions()).all(|a| a.target.wall.is_none()));
        }
    }

    #[test]
    fn replay_is_exact_for_every_variant() {
        for (algorithm, style) in all_variants() {
            let mut live = grid(15, 11, style);
            let log = algorithm.generate(&mut live, &mut seeded_rng(2024)).unwrap();
            let mut replayed = grid(15, 11, style);
            log.apply_all(&mut replayed).unwrap();
            assert_eq!(replayed, live, "{} {}", algorithm, style);
        }
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        for (algorithm, style) in all_variants() {
            let mut first = grid(13, 13, style);
            let mut second = grid(13, 13, style);
            let first_log = algorithm.generate(&mut first, &mut seeded_rng(99)).unwrap();
            let second_log = algorithm.generate(&mut second, &mut seeded_rng(99)).unwrap();
            assert_eq!(first_log, second_log);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn active_cells_are_never_carved_again() {
        for (algorithm, style) in all_variants() {
            let mut live = grid(11, 9, style);
            let log = algorithm.generate(&mut live, &mut seeded_rng(17)).unwrap();

            let mut replayed = grid(11, 9, style);
            for action in log.iter().flat_map(|step| step.actions()) {
                if action.kind == ActionKind::Activate && action.target.wall.is_none() {
                    assert!(!replayed.is_cell_active(action.target.cell),
                            "{} {} reactivated {}",
                            algorithm,
                            style,
                            action.target.cell);
                }
                action.apply(&mut replayed).unwrap();
            }
        }
    }

    #[test]
    fn every_floor_cell_is_carved() {
        let mut basic = grid(21, 15, Style::Basic);
        let _ = prim(&mut basic, &mut seeded_rng(1)).unwrap();
        assert!(ThickWalls::floor_cells(&basic).iter().all(|c| basic.is_cell_active(*c)));
        // Border cells are never floor.
        assert!(basic.iter()
            .filter(|c| c.x == 0 || c.y == 0 || c.x == 20 || c.y == 14)
            .all(|c| !basic.is_cell_active(c)));

        let mut advanced = grid(8, 6, Style::Advanced);
        let _ = depth_first(&mut advanced, &mut seeded_rng(1)).unwrap();
        assert_eq!(advanced.active_cells_count(), 48);
    }

    #[test]
    fn kruskal_sets_match_reachability() {
        for style in &[Style::Basic, Style::Advanced] {
            let mut g = grid(9, 9, *style);
            let mut log = StepLog::new();
            let mut rng = seeded_rng(8);
            let sets = match *style {
                Style::Basic => carve_kruskal::<ThickWalls, _>(&mut g, &mut rng, &mut log),
                Style::Advanced => carve_kruskal::<ThinWalls, _>(&mut g, &mut rng, &mut log),
            };
            let sets = sets.unwrap();
            assert!(g.is_perfect_maze());

            let floor = match *style {
                Style::Basic => ThickWalls::floor_cells(&g),
                Style::Advanced => ThinWalls::floor_cells(&g),
            };
            for a in &floor {
                let distances = Distances::new(&g, *a).unwrap();
                let a_index = g.grid_coordinate_to_index(*a).unwrap();
                for b in &floor {
                    let b_index = g.grid_coordinate_to_index(*b).unwrap();
                    assert_eq!(sets.equiv(a_index, b_index),
                               distances.distance_from_start_to(*b).is_some());
                }
            }
        }
    }

    quickcheck! {
        fn generated_mazes_are_perfect(w: u8, h: u8, seed: u64, algorithm: u8, advanced: bool)
                                       -> TestResult {
            let style = if advanced { Style::Advanced } else { Style::Basic };
            let width = style.min_dimension() + (w % 14) as usize;
            let height = style.min_dimension() + (h % 14) as usize;
            let algorithm = Algorithm::ALL[algorithm as usize % Algorithm::ALL.len()];

            let mut live = grid(width, height, style);
            let log = match algorithm.generate(&mut live, &mut seeded_rng(seed)) {
                Ok(log) => log,
                Err(_) => return TestResult::failed(),
            };

            let mut replayed = grid(width, height, style);
            if log.apply_all(&mut replayed).is_err() {
                return TestResult::failed();
            }

            TestResult::from_bool(live.is_perfect_maze() && replayed == live)
        }
    }
}
