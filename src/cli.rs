// SPDX-License-Identifier: BSD-3-Clause
use std::fmt;
use std::path::PathBuf;

use ptcoalesce::{Check, Reduction};

#[derive(Clone, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Format {
    /// One `{'a', 'b'}` set per line
    Text,
    Json,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Text => write!(f, "text"),
            Format::Json => write!(f, "json"),
        }
    }
}

/// Coalesce a points-to dump into alias groups
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Handling of malformed lines
    #[arg(long, default_value_t = Check::Default)]
    pub check: Check,

    /// Output format
    #[arg(long, default_value_t = Format::Text)]
    pub format: Format,

    /// Points-to dump, one `NodeID n (val:name) PointsTo: { .. }` per line
    #[arg()]
    pub log: PathBuf,

    /// Quiet
    #[arg(long)]
    pub quiet: bool,

    /// How reduction passes apply merges
    #[arg(long, default_value_t = Reduction::Snapshot)]
    pub reduction: Reduction,

    /// Print run statistics
    #[arg(long)]
    pub stats: bool,

    /// Tracing
    #[arg(long)]
    pub tracing: bool,

    /// Also write folded stacks for a flamegraph (requires --tracing)
    #[arg(long, requires = "tracing")]
    pub flame: Option<PathBuf>,
}
