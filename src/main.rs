use clap::Parser;
use crossfill::{find_solution, load_puzzle, render_grid, SolverConfig};
use instant::Duration;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Fill a crossword structure with words from a word list.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Structure file: `_` for open cells, `#` for blocks, one row per line
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Also write the filled grid to this file
    output: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECONDS")]
    time_limit: Option<u64>,

    /// Print search statistics
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let puzzle = match load_puzzle(&args.structure, &args.words) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let config = SolverConfig {
        time_limit: args.time_limit.map(Duration::from_secs),
    };

    match find_solution(&puzzle, &config) {
        Ok(result) => {
            let display_grid = render_grid(&puzzle, &result.assignment);

            if args.stats {
                println!("{:?}", result.statistics);
            }
            println!("{}", display_grid);

            if let Some(output) = &args.output {
                if let Err(err) = fs::write(output, display_grid + "\n") {
                    eprintln!("error: failed to write {}: {}", output.display(), err);
                    return ExitCode::FAILURE;
                }
            }
        }
        Err(failure) => {
            if args.stats {
                println!("{:?}", failure.statistics);
            }
            if failure.statistics.deadline_exceeded {
                println!("No solution found within the time limit.");
            } else {
                println!("No solution.");
            }
        }
    }

    ExitCode::SUCCESS
}
