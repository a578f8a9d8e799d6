//! Command-line front end: parse a GameSafe log once, then replay it
//! at the requested cutoffs and write the results.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{ArgGroup, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dendro_core::{EventId, RecordBase};
use dendro_replay::{parse_log, reconstruct, table_event_ids, ReconstructOptions};
use dendro_report::{write_dataset, write_timeline};

#[derive(Parser)]
#[command(
    name = "dendro",
    about = "Replay a z-Tree GameSafe log and reconstruct its data tables",
    group(ArgGroup::new("cutoff_mode").required(true))
)]
struct Args {
    /// Path to the exported readable GameSafe text log.
    log: PathBuf,

    /// Directory output files are written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Reconstruct the data tables up to this event id.
    #[arg(long, group = "cutoff_mode", value_name = "EVENT_ID")]
    cutoff: Option<u64>,

    /// Reconstruct the data tables at the end of the log.
    #[arg(long = "final", group = "cutoff_mode")]
    final_cutoff: bool,

    /// Reconstruct at every event that changes a table. Writes one
    /// file set per such event id.
    #[arg(long, group = "cutoff_mode")]
    all: bool,

    /// Also write the experiment timeline report (timeline.txt).
    #[arg(long)]
    timeline: bool,

    /// Numbering base of record numbers on the wire.
    #[arg(long, value_enum, default_value_t = BaseArg::Zero)]
    record_base: BaseArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BaseArg {
    /// Record numbers start at 0 (matches captured logs).
    Zero,
    /// Record numbers start at 1.
    One,
}

impl From<BaseArg> for RecordBase {
    fn from(arg: BaseArg) -> Self {
        match arg {
            BaseArg::Zero => Self::Zero,
            BaseArg::One => Self::One,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.log)
        .with_context(|| format!("cannot read log file {}", args.log.display()))?;
    let started = Instant::now();
    let events = parse_log(&raw).context("parsing the log failed")?;
    info!(
        events = events.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "log parsed"
    );

    let options = ReconstructOptions {
        record_base: args.record_base.into(),
    };

    if args.timeline {
        let path = args.out_dir.join("timeline.txt");
        write_timeline(&events, options.record_base, &path)
            .with_context(|| format!("writing timeline to {}", path.display()))?;
        info!(path = %path.display(), "timeline written");
    }

    let cutoffs: Vec<EventId> = if let Some(id) = args.cutoff {
        vec![EventId(id)]
    } else if args.all {
        table_event_ids(&events)
    } else {
        debug_assert!(args.final_cutoff);
        match events.last() {
            Some(last) => vec![last.id],
            None => anyhow::bail!("the log contains no events"),
        }
    };

    for cutoff in cutoffs {
        let started = Instant::now();
        let dataset = reconstruct(&events, cutoff, &options)
            .with_context(|| format!("reconstruction at cutoff {cutoff} failed"))?;
        let written = write_dataset(&dataset, cutoff, &args.out_dir)
            .with_context(|| format!("writing tables for cutoff {cutoff}"))?;
        info!(
            cutoff = cutoff.0,
            tables = written.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tables written"
        );
    }
    Ok(())
}
