#![warn(clippy::pedantic)]

use std::{fs, path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};
use cube_core::FaceletCube;
use env_logger::TimestampPrecision;
use log::{LevelFilter, info};
use two_phase::{Tables, TwoPhaseSolver};

/// Solves a 3x3x3 Rubik's cube with Kociemba's two-phase algorithm
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// File containing the unfolded cube diagram
    input_file: PathBuf,

    /// File the solution string is written to
    output_file: PathBuf,

    /// Maximum total solution length to search for
    #[arg(long, default_value_t = 25)]
    max_depth: u8,

    /// Wall-clock search budget in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Ceiling on the number of phase-2 moves
    #[arg(long, default_value_t = 10)]
    phase2_limit: u8,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let text = fs::read_to_string(&cli.input_file)
        .wrap_err_with(|| format!("could not read {}", cli.input_file.display()))?;
    let cube = FaceletCube::parse_diagram(&text)?.to_cubie()?;

    let tables = Tables::generate();
    let mut solver = TwoPhaseSolver::new(&tables);
    solver.max_depth = cli.max_depth;
    solver.timeout = Duration::from_secs(cli.timeout);
    solver.phase2_limit = cli.phase2_limit;

    let solution = match solver.solve(&cube) {
        Ok(solution) => solution,
        Err(err) => {
            println!("Error {}", err.code());
            return Ok(ExitCode::from(err.code()));
        }
    };

    // Replaying the solution on the parsed cube double-checks the tables
    // before anything is written out.
    let mut replay = cube.clone();
    replay.apply_moves(solution.moves());
    if !replay.is_solved() {
        return Err(eyre!("solution {solution} failed replay verification"));
    }
    info!("solved in {} moves: {solution}", solution.len());

    fs::write(&cli.output_file, solution.to_string())
        .wrap_err_with(|| format!("could not write {}", cli.output_file.display()))?;
    Ok(ExitCode::SUCCESS)
}
