// SPDX-License-Identifier: BSD-3-Clause
//! Alias analysis over a points-to dump

use std::fmt;

use tracing::{info, trace_span, warn};

use crate::{
    coalesce::{AliasGroup, Engine, Reduction},
    dump::{parse_log, Skipped},
    parse::ParseError,
};

/// What to do about lines that do not parse.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum Check {
    /// Skip them silently
    #[default]
    Default,
    /// Skip them, reporting each one
    Report,
    /// Report them, then fail
    Strict,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Default => write!(f, "default"),
            Check::Report => write!(f, "report"),
            Check::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Options {
    pub check: Check,
    pub reduction: Reduction,
}

/// Strict checking found lines that did not parse.
#[derive(Debug, thiserror::Error)]
#[error("found {} malformed line(s)", .skipped.len())]
pub struct MalformedLines {
    pub skipped: Vec<Skipped>,
}

/// Counts describing one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Stats {
    /// Lines decoded into points-to records
    pub records: usize,
    /// Non-blank lines that did not match the grammar
    pub skipped: usize,
    /// Skipped lines whose only fault was a node id too large to represent
    pub overflowed: usize,
    /// Distinct value names
    pub names: usize,
    /// Distinct nodes before reduction
    pub nodes: usize,
    /// Nodes left after reduction
    pub surviving_nodes: usize,
    pub passes: usize,
    /// Points-to sets collapsed
    pub merges: usize,
    pub groups: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct Output {
    pub groups: Vec<AliasGroup>,
    #[serde(skip)]
    pub skipped: Vec<Skipped>,
    pub stats: Stats,
}

/// Decode `text` and coalesce its points-to sets into alias groups.
///
/// Under [`Check::Strict`] any skipped line fails the run. Lines dropped for
/// an oversized node id are logged in every mode.
pub fn analysis(text: &str, opts: &Options) -> Result<Output, MalformedLines> {
    let span = trace_span!("analysis");
    let _span = span.enter();

    let log = parse_log(text);
    let mut overflowed = 0;
    for s in &log.skipped {
        let overflow = matches!(s.error, ParseError::NodeIdOverflow { .. });
        if overflow {
            overflowed += 1;
        }
        if overflow || opts.check != Check::Default {
            warn!(line = s.line, error = %s.error, "skipped line");
        }
    }
    if opts.check == Check::Strict && !log.skipped.is_empty() {
        return Err(MalformedLines {
            skipped: log.skipped,
        });
    }
    let records = log.records.len();
    let mut engine: Engine = log.records.into_iter().collect();
    let names = engine.forward().len();
    let nodes = engine.backward().len();

    let reduced = engine.reduce(opts.reduction);
    let groups = engine.alias_groups();
    let stats = Stats {
        records,
        skipped: log.skipped.len(),
        overflowed,
        names,
        nodes,
        surviving_nodes: engine.backward().len(),
        passes: reduced.passes,
        merges: reduced.merges,
        groups: groups.len(),
    };
    info!(
        records = stats.records,
        skipped = stats.skipped,
        passes = stats.passes,
        groups = stats.groups,
        reduction = %opts.reduction,
        "coalesced points-to sets"
    );
    Ok(Output {
        groups,
        skipped: log.skipped,
        stats,
    })
}
