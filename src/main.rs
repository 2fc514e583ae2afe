// SPDX-License-Identifier: BSD-3-Clause
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use tracing_flame::{FlameLayer, FlushGuard};
use tracing_subscriber::{fmt, prelude::*};

use ptcoalesce::{analysis, Check, Skipped};

mod cli;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn setup_global_subscriber(flame: Option<&Path>) -> Result<Option<FlushGuard<BufWriter<File>>>> {
    let filter_layer = tracing::level_filters::LevelFilter::TRACE;
    // stdout carries the groups
    let fmt_layer = fmt::Layer::default().with_writer(io::stderr);
    let (flame_layer, guard) = match flame {
        Some(path) => {
            let (layer, guard) = FlameLayer::with_file(path).with_context(|| {
                format!("Couldn't create flamegraph output at {}", path.display())
            })?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(flame_layer)
        .init();
    Ok(guard)
}

fn report_skipped(skipped: &[Skipped]) -> Result<()> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "skipped {} malformed line(s)", skipped.len())?;
    for s in skipped {
        writeln!(stderr, "  line {}: {}", s.line, s.error)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let args = cli::Args::parse();

    let _guard = if args.tracing {
        setup_global_subscriber(args.flame.as_deref())?
    } else {
        None
    };

    let bytes = std::fs::read(&args.log)
        .with_context(|| format!("Couldn't read points-to dump at {}", args.log.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let opts = analysis::Options {
        check: args.check,
        reduction: args.reduction,
    };
    let outs = match analysis::analysis(&text, &opts) {
        Ok(outs) => outs,
        Err(err) => {
            report_skipped(&err.skipped)?;
            return Err(anyhow!("{} in {}", err, args.log.display()));
        }
    };

    if args.check == Check::Report && !outs.skipped.is_empty() {
        report_skipped(&outs.skipped)?;
    } else if outs.stats.overflowed > 0 {
        writeln!(
            io::stderr(),
            "dropped {} line(s) with node ids beyond {}",
            outs.stats.overflowed,
            u64::MAX
        )?;
    }

    if !args.quiet {
        let mut stdout = io::stdout().lock();
        match args.format {
            cli::Format::Text => {
                for group in &outs.groups {
                    writeln!(stdout, "{}", group)?;
                }
            }
            cli::Format::Json => {
                serde_json::to_writer_pretty(&mut stdout, &outs)
                    .context("Couldn't serialize alias groups")?;
                writeln!(stdout)?;
            }
        }
    }

    if args.stats && args.format == cli::Format::Text {
        let mut stdout = io::stdout().lock();
        let s = &outs.stats;
        writeln!(stdout)?;
        writeln!(stdout, "stats")?;
        writeln!(stdout, "-----")?;
        writeln!(stdout, "records: {}", s.records)?;
        writeln!(stdout, "skipped lines: {}", s.skipped)?;
        writeln!(stdout, "oversized node ids: {}", s.overflowed)?;
        writeln!(stdout, "names: {}", s.names)?;
        writeln!(stdout, "nodes: {}", s.nodes)?;
        writeln!(stdout, "surviving nodes: {}", s.surviving_nodes)?;
        writeln!(stdout, "passes: {}", s.passes)?;
        writeln!(stdout, "merges: {}", s.merges)?;
        writeln!(stdout, "alias groups: {}", s.groups)?;
    }

    Ok(())
}
