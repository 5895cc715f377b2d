use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use rand::Rng;

use maze_gen::{new_generator, regenerate, GeneratorKind, StepEvent, WallGrid};

const DEFAULT_DIMS: (usize, usize) = (15, 15);

#[derive(Parser, Debug)]
#[command(version, about = "Generate perfect mazes", long_about = None)]
struct Args {
    /// Number of columns, 2..=50
    #[arg(short = 'W', long, default_value_t = DEFAULT_DIMS.0)]
    width: usize,

    /// Number of rows, 2..=50
    #[arg(short = 'H', long, default_value_t = DEFAULT_DIMS.1)]
    height: usize,

    #[arg(short, long, value_enum, default_value_t = GeneratorKind::Dfs)]
    algorithm: GeneratorKind,

    /// Seed for reproducible mazes, random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Redraw after every step, waiting this many milliseconds in between
    #[arg(short, long)]
    delay: Option<u64>,

    /// How many mazes to generate one after another
    #[arg(short, long, default_value_t = 1)]
    count: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let grid = match WallGrid::new(args.width, args.height) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let mut rng = rand::thread_rng();
    let mut seed = args.seed.unwrap_or_else(|| rng.gen());
    let mut maze_generator = new_generator(args.algorithm, grid, seed);

    for round in 0..args.count.max(1) {
        if round > 0 {
            seed = rng.gen();
            maze_generator = regenerate(maze_generator, args.algorithm, seed);
        }
        info!(
            "generating {}x{} maze with {} (seed {})",
            args.width, args.height, args.algorithm, seed
        );

        let mut steps = 0;
        while let Some(event) = maze_generator.next_step() {
            steps += 1;
            if let Some(delay) = args.delay {
                if !matches!(event, StepEvent::CellStateChanged { .. }) {
                    // clear screen and home the cursor
                    print!("\x1B[2J\x1B[H{}", maze_generator.grid());
                    thread::sleep(Duration::from_millis(delay));
                }
            }
        }

        let grid = maze_generator.grid();
        if !grid.is_perfect_maze() {
            warn!("seed {} produced an imperfect maze", seed);
        }
        info!("{} steps, {} passages", steps, grid.passage_count());
        println!("seed: {}\n{}", seed, grid);
    }
}
