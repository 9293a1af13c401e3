use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use anyhow::Result;

mod config;
mod error;
mod commands;

use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser, Debug)]
#[command(name = "svfind")]
#[command(about = "svfind - find insertions from pairwise genome alignments")]
#[command(version)]
#[command(long_about = "
svfind scans a .1aln pairwise alignment file for pairs of alignments whose
reference coordinates meet but whose query coordinates leave a gap, and writes
each such insertion with its inserted sequence to a .1sv file.

Examples:
  svfind -a hapA.1sv hapA_hapB.1aln
  svfind -w 20 -m 10000 -a hapA.1sv -b hapB.1sv hapA_hapB.1aln
  svfind -a repeats.1sv self.1aln
")]
pub struct Cli {
    /// Alignment file (.1aln, optionally gzipped)
    #[arg(required_unless_present = "print_config")]
    pub alignments: Option<PathBuf>,

    /// Maximum overhang between the two flanking alignments
    #[arg(short = 'w', long)]
    pub max_overhang: Option<u64>,

    /// Maximum insertion length (exclusive)
    #[arg(short = 'm', long)]
    pub max_size: Option<u64>,

    /// Output file for insertions in the first sequence set
    #[arg(short = 'a', value_name = "FILE")]
    pub out_a: Option<PathBuf>,

    /// Output file for insertions in the second sequence set
    #[arg(short = 'b', value_name = "FILE")]
    pub out_b: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    pub quiet: bool,
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.print_config {
        print!("{}", Config::example_toml()?);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let params = config.detect_params(cli.max_overhang, cli.max_size)?;
    log::debug!(
        "max_overhang {}, max_size {}",
        params.max_overhang,
        params.max_size
    );

    let alignments = cli
        .alignments
        .ok_or_else(|| CliError::usage("an alignment file is required"))?;
    let outputs = commands::find::Outputs {
        a: cli.out_a,
        b: cli.out_b,
    };
    let command_line = std::env::args().collect::<Vec<_>>().join(" ");

    commands::find::execute(&params, &alignments, &outputs, &command_line)
}

fn main() -> Result<()> {
    let cli = parse_args();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<CliError>() {
            Some(cli_error) => print_error_and_exit(cli_error),
            None => Err(e),
        },
    }
}
