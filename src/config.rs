//! # Configuration Logic
//!
//! ## Role
//! CLI argument parsing and validation.
//!
//! ## Design
//! - `struct Config` derives `clap::Parser`; global flags apply to every
//!   subcommand:
//!   - `threads: Option<usize>` - worker threads (default: all cores)
//!   - `profile: bool` - emit span timings on close
//!   - `heartbeat: bool` - periodic progress line on stderr
//! - Subcommands:
//!   - `enumerate` - drain every profile's enumerator, optionally walk the
//!     cross-product of profiles
//!   - `group` - cluster segments and write the group hierarchy as CSV
//!   - `list` - segments on one chromosome overlapping a range
//!
//! ## Validation
//! - `max_paths` in `1..=4`, `max_depth` in `1..u32::MAX`, `min_match_depth >= 1`
//! - `start <= end` for listings
//! - every input file exists
//!
//! ## Example CLI
//! ```bash
//! dnaclad enumerate --matches chr.csv --max-depth 8 --max-paths 2
//! dnaclad group --matches chr.csv --groups groups.csv --out groups_out.csv
//! dnaclad list --matches chr.csv --chromosome 7 --start 1000000 --end 2000000
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::error::{DnacladError, Result};
use crate::model::parameters::{EnumerationParams, MAX_DEPTH_LIMIT, MAX_PATHS_LIMIT};
use crate::utils::threading::available_threads;

#[derive(Debug, Parser)]
#[command(name = "dnaclad")]
#[command(about = "Hypothesize shared-ancestry trees from DNA match segments")]
#[command(version)]
pub struct Config {
    /// Number of worker threads (default: all cores)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Print span timings when each stage closes
    #[arg(long, global = true)]
    pub profile: bool,

    /// Report progress on stderr periodically
    #[arg(long, global = true)]
    pub heartbeat: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enumerate ancestry hypotheses for every match profile
    Enumerate(EnumerateArgs),
    /// Group overlapping segments and write the hierarchy as CSV
    Group(GroupArgs),
    /// List segments on one chromosome overlapping a range
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct EnumerateArgs {
    /// Chromosome match CSV files
    #[arg(long = "matches", required = true, num_args = 1..)]
    pub matches: Vec<PathBuf>,

    /// Deepest generation considered (1 = parents)
    #[arg(long, default_value_t = 10)]
    pub max_depth: u32,

    /// Maximum assignments per profile hypothesis
    #[arg(long, default_value_t = 2)]
    pub max_paths: usize,

    /// Shallowest generation at which a match may be assigned
    #[arg(long, default_value_t = 2)]
    pub min_match_depth: u32,

    /// Treat match profiles as female
    #[arg(long)]
    pub female: bool,

    /// Also walk up to this many cross-profile combinations
    #[arg(long)]
    pub combinations: Option<usize>,
}

#[derive(Debug, Args)]
pub struct GroupArgs {
    /// Chromosome match CSV files
    #[arg(long = "matches", required = true, num_args = 1..)]
    pub matches: Vec<PathBuf>,

    /// Hand-edited group description CSV
    #[arg(long)]
    pub groups: Option<PathBuf>,

    /// Output CSV (default: stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Chromosome match CSV file
    #[arg(long = "matches", required = true)]
    pub matches: PathBuf,

    /// Chromosome to list
    #[arg(long)]
    pub chromosome: String,

    /// Range start (inclusive)
    #[arg(long)]
    pub start: u64,

    /// Range end (inclusive)
    #[arg(long)]
    pub end: u64,

    /// Shortest segment length to list
    #[arg(long, default_value_t = 5000)]
    pub min_length: u64,
}

impl EnumerateArgs {
    pub fn params(&self) -> EnumerationParams {
        EnumerationParams {
            max_depth: self.max_depth,
            maximum_paths: self.max_paths,
        }
    }
}

impl Config {
    /// Parse CLI args and validate
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(DnacladError::config("threads must be at least 1"));
        }

        match &self.command {
            Command::Enumerate(args) => {
                if !(1..=MAX_PATHS_LIMIT).contains(&args.max_paths) {
                    return Err(DnacladError::config(format!(
                        "max-paths must be between 1 and {}, got {}",
                        MAX_PATHS_LIMIT, args.max_paths
                    )));
                }
                if !(1..=MAX_DEPTH_LIMIT).contains(&args.max_depth) {
                    return Err(DnacladError::config(format!(
                        "max-depth must be between 1 and {}, got {}",
                        MAX_DEPTH_LIMIT, args.max_depth
                    )));
                }
                if args.min_match_depth < 1 {
                    return Err(DnacladError::config("min-match-depth must be at least 1"));
                }
                require_files(&args.matches)
            }
            Command::Group(args) => {
                require_files(&args.matches)?;
                require_files(args.groups.iter())
            }
            Command::List(args) => {
                if args.start > args.end {
                    return Err(DnacladError::config(format!(
                        "range start {} exceeds end {}",
                        args.start, args.end
                    )));
                }
                require_files([&args.matches])
            }
        }
    }

    /// Worker thread count (default: all cores)
    pub fn nthreads(&self) -> usize {
        self.threads.unwrap_or_else(available_threads)
    }
}

fn require_files<I, P>(paths: I) -> Result<()>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DnacladError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}
