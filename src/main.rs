use docopt::Docopt;
use growing_mazes::{
    generators::{self, Algorithm},
    grid::{Grid, Style},
    growing::GrowingMaze,
    pathing,
    steps::StepLog,
    units::{Height, Width},
};
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};
use tracing_subscriber::filter::EnvFilter;
use std::{
    env,
    fs::File,
    io,
    io::prelude::*,
    path::Path,
    thread,
    time::Duration,
};

const USAGE: &str = "Growing Mazes

Usage:
    grow_maze -h | --help
    grow_maze [(depth-first|kruskal|prim)] [--advanced] [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--animate] [--frame-delay=<ms>] [--show-path] [--save-steps=<path>]
    grow_maze all [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--animate] [--frame-delay=<ms>] [--show-path]
    grow_maze replay --steps=<path> [--animate] [--frame-delay=<ms>] [--show-path]

Options:
    -h --help              Show this screen.
    --advanced             Thin walls between every cell instead of thick walls carved out of the grid.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 31].
    --grid-height=<h>      The grid height in a w*h grid [default: 21].
    --seed=<s>             Seed the random number generator to get the same maze every time.
    --animate              Print the maze after every growth step instead of only the finished maze.
    --frame-delay=<ms>     Milliseconds to wait between animation frames [default: 40].
    --show-path            Show the longest path through the finished maze.
    --save-steps=<path>    Save the maze dimensions and growth steps to a JSON file.
    --steps=<path>         A JSON file written by --save-steps to grow again.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_depth_first: bool,
    cmd_kruskal: bool,
    cmd_prim: bool,
    cmd_all: bool,
    cmd_replay: bool,
    flag_advanced: bool,
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_animate: bool,
    flag_frame_delay: u64,
    flag_show_path: bool,
    flag_save_steps: String,
    flag_steps: String,
}

/// Everything needed to grow a recorded maze again.
#[derive(Debug, Serialize, Deserialize)]
struct SavedMaze {
    width: usize,
    height: usize,
    style: Style,
    steps: StepLog,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Json(::serde_json::Error);
            Maze(::growing_mazes::MazeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(io::stderr)
        .init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    if args.cmd_replay {
        let saved = load_saved_maze(&args.flag_steps)
            .chain_err(|| format!("Failed to load maze steps from {}", args.flag_steps))?;
        let maze = GrowingMaze::from_steps(Width(saved.width),
                                           Height(saved.height),
                                           saved.style,
                                           saved.steps)?;
        return grow_and_show(maze, &args);
    }

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    let style = if args.flag_advanced { Style::Advanced } else { Style::Basic };
    let mut rng = make_rng(args.flag_seed);

    if args.cmd_all {
        // Every algorithm in both styles, one after the other.
        for algorithm in &Algorithm::ALL {
            for style in &[Style::Basic, Style::Advanced] {
                println!("{} ({})", algorithm, style);
                let maze = GrowingMaze::generate(*algorithm,
                                                 Width(width),
                                                 Height(height),
                                                 *style,
                                                 &mut rng)?;
                grow_and_show(maze, &args)?;
            }
        }
        return Ok(());
    }

    let algorithm = chosen_algorithm(&args);
    let maze = GrowingMaze::generate(algorithm, Width(width), Height(height), style, &mut rng)?;

    if !args.flag_save_steps.is_empty() {
        let saved = SavedMaze {
            width,
            height,
            style,
            steps: maze.steps().clone(),
        };
        save_maze(&saved, &args.flag_save_steps)
            .chain_err(|| format!("Failed to save maze steps to {}", args.flag_save_steps))?;
    }

    grow_and_show(maze, &args)
}

/// The directives from `RUST_LOG` when set and valid, otherwise warnings only.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log.filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn chosen_algorithm(maze_args: &MazeArgs) -> Algorithm {
    if maze_args.cmd_kruskal {
        Algorithm::Kruskal
    } else if maze_args.cmd_prim {
        Algorithm::Prim
    } else {
        Algorithm::DepthFirst
    }
}

fn make_rng(seed: Option<u64>) -> XorShiftRng {
    match seed {
        Some(seed) => generators::seeded_rng(seed),
        None => generators::entropy_rng(),
    }
}

fn grow_and_show(mut maze: GrowingMaze, maze_args: &MazeArgs) -> Result<()> {
    if maze_args.flag_animate {
        let frame_delay = Duration::from_millis(maze_args.flag_frame_delay);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        while maze.advance()? {
            // Clear the terminal and home the cursor before each frame.
            write!(out, "\x1B[2J\x1B[H{}", maze.grid())?;
            out.flush()?;
            thread::sleep(frame_delay);
        }
    } else {
        let _ = maze.finish()?;
        println!("{}", maze.grid());
    }

    if maze_args.flag_show_path {
        print_longest_path(maze.grid());
    }
    Ok(())
}

fn print_longest_path(maze_grid: &Grid) {
    match pathing::longest_path(maze_grid) {
        Some(path) => {
            let route = path.iter().map(|coord| coord.to_string()).collect::<Vec<_>>().join(" ");
            println!("Longest path ({} cells): {}", path.len(), route);
        }
        None => println!("The maze has no carved cells."),
    }
}

fn load_saved_maze(file_name: &str) -> Result<SavedMaze> {
    let file = File::open(Path::new(file_name))?;
    let saved = serde_json::from_reader(io::BufReader::new(file))?;
    Ok(saved)
}

fn save_maze(saved: &SavedMaze, file_name: &str) -> Result<()> {
    let mut file = File::create(Path::new(file_name))?;
    serde_json::to_writer(&mut file, saved)?;
    file.write_all(b"\n")?;
    Ok(())
}
