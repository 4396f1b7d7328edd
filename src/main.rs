use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod crossing;
mod error;
mod formulation;
mod hailstone;
mod parser;

use crossing::{DEFAULT_AREA_MAX, DEFAULT_AREA_MIN, count_crossings_2d};
use error::AppError;
use formulation::{FormulationConfig, NumericDomain, SolverConfig, solve_with_config};
use hailstone::Hailstone;
use parser::parse_hailstones;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "hailstorm")]
#[command(about = "hailstorm - find the single throw that hits every hailstone")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    throw: ThrowArgs,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(clap::Args)]
struct ThrowArgs {
    /// Hailstone list, one `X, Y, Z @ A, B, C` per line (stdin when absent or "-")
    input: Option<PathBuf>,

    /// Numeric domain of the unknowns: real (r) or integer (int, i)
    #[arg(long, default_value = "real", value_parser = NumericDomain::from_str)]
    domain: NumericDomain,

    /// Constrain only the first N hailstones (default 9)
    #[arg(long, conflicts_with = "all_particles")]
    max_particles: Option<usize>,

    /// Constrain every hailstone in the input
    #[arg(long)]
    all_particles: bool,

    /// Emit the collision-time quotient hints
    #[arg(long, overrides_with = "no_hints")]
    hints: bool,

    /// Never emit the quotient hints
    #[arg(long, overrides_with = "hints")]
    no_hints: bool,

    /// Solver timeout in seconds (no timeout when absent)
    #[arg(long)]
    solver_timeout: Option<u64>,

    /// Fail unless no other thrown trajectory fits (runs a second check)
    #[arg(long)]
    require_unique: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Count hailstone pairs whose X/Y paths cross inside a test area
    Crossings {
        /// Hailstone list (stdin when absent or "-")
        input: Option<PathBuf>,
        /// Lower edge of the test area on both axes
        #[arg(long, default_value_t = DEFAULT_AREA_MIN, allow_negative_numbers = true)]
        min: i64,
        /// Upper edge of the test area on both axes
        #[arg(long, default_value_t = DEFAULT_AREA_MAX, allow_negative_numbers = true)]
        max: i64,
    },
}

impl ThrowArgs {
    fn to_config(&self) -> FormulationConfig {
        let mut config = FormulationConfig::default().with_domain(self.domain);

        if self.all_particles {
            config = config.with_all_particles();
        } else if let Some(max) = self.max_particles {
            config = config.with_max_particles(max);
        }

        if self.hints {
            config = config.with_quotient_hints(true);
        } else if self.no_hints {
            config = config.with_quotient_hints(false);
        }

        if let Some(secs) = self.solver_timeout {
            config = config.with_solver(SolverConfig::with_timeout_secs(secs));
        }

        config.with_require_unique(self.require_unique)
    }
}

// --- Input ---

fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn load_hailstones(path: Option<&Path>) -> Result<Vec<Hailstone>, AppError> {
    let content = read_input(path)?;
    let hailstones = parse_hailstones(&content)?;
    info!("parsed {} hailstones", hailstones.len());
    Ok(hailstones)
}

// --- Commands ---

fn run_throw(args: &ThrowArgs) -> Result<(), AppError> {
    let config = args.to_config();
    config.validate().map_err(AppError::Config)?;

    let hailstones = load_hailstones(args.input.as_deref())?;
    let solution = solve_with_config(&hailstones, &config)?;
    println!("{}", solution);
    Ok(())
}

fn run_crossings(input: Option<&Path>, min: i64, max: i64) -> Result<(), AppError> {
    if min > max {
        return Err(AppError::Config(format!(
            "test area is empty: min {} > max {}",
            min, max
        )));
    }
    let hailstones = load_hailstones(input)?;
    println!("{}", count_crossings_2d(&hailstones, min, max)?);
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match &args.command {
        Some(Commands::Crossings { input, min, max }) => {
            run_crossings(input.as_deref(), *min, *max)
        }
        None => run_throw(&args.throw),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_default_args_give_default_config() {
        let args = Args::try_parse_from(["hailstorm"]).unwrap();
        let config = args.throw.to_config();
        assert_eq!(config.domain, NumericDomain::Real);
        assert_eq!(config.max_particles, FormulationConfig::default().max_particles);
        assert!(!config.hints_enabled());
        assert!(!config.require_unique);
    }

    #[test]
    fn test_throw_flags() {
        let args = Args::try_parse_from([
            "hailstorm",
            "--domain",
            "integer",
            "--no-hints",
            "--all-particles",
            "--solver-timeout",
            "30",
            "--require-unique",
            "input.txt",
        ])
        .unwrap();
        let config = args.throw.to_config();
        assert_eq!(config.domain, NumericDomain::Integer);
        assert_eq!(config.max_particles, None);
        assert!(!config.hints_enabled());
        assert!(config.solver.timeout.is_some());
        assert!(config.require_unique);
        assert_eq!(args.throw.input, Some(PathBuf::from("input.txt")));
    }

    #[test]
    fn test_domain_aliases() {
        for (flag, expected) in [
            ("int", NumericDomain::Integer),
            ("I", NumericDomain::Integer),
            ("r", NumericDomain::Real),
            ("reals", NumericDomain::Real),
        ] {
            let args = Args::try_parse_from(["hailstorm", "--domain", flag]).unwrap();
            assert_eq!(args.throw.to_config().domain, expected, "--domain {}", flag);
        }
    }

    #[test]
    fn test_unknown_domain_is_rejected() {
        let err = Args::try_parse_from(["hailstorm", "--domain", "complex"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown numeric domain"));
    }

    #[test]
    fn test_cap_conflicts_with_all_particles() {
        assert!(
            Args::try_parse_from(["hailstorm", "--max-particles", "4", "--all-particles"])
                .is_err()
        );
    }

    #[test]
    fn test_crossings_subcommand() {
        let args =
            Args::try_parse_from(["hailstorm", "crossings", "--min", "7", "--max", "27"]).unwrap();
        match args.command {
            Some(Commands::Crossings { input, min, max }) => {
                assert!(input.is_none());
                assert_eq!((min, max), (7, 27));
            }
            None => panic!("expected the crossings subcommand"),
        }
    }
}
