//! # compare-maps
//!
//! Compares the neighbour, noise or crosstalk map stored in two files.
//!
//! ```bash
//! # Row-by-row comparison; fails if the maps differ in length
//! compare-maps neighbours old/neighbours.jsonl new/neighbours.jsonl
//!
//! # Match rows by cellId and show the first 10 mismatches
//! compare-maps noise old/ new/ --ignoreCounts --debugevts 10
//! ```

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use cellcraft_cli::{logging::init_tracing, render};
use cellcraft_compare::{
    CompareObserver, FieldRule, RecordSource, RowView, compare_keyed, compare_ordered,
    maps::MapKind,
};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "compare-maps")]
#[command(about = "Compare noise, neighbour or crosstalk maps between two files")]
struct Args {
    /// Map type: neighbours, noise or xtalk
    maptype: String,

    /// First map (a file, or a directory holding <table>.jsonl)
    file1: PathBuf,

    /// Second map
    file2: PathBuf,

    /// Number of entries to process (default: all)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    nevts: i64,

    /// Print every compared entry
    #[arg(long)]
    verbose: bool,

    /// Accept maps of different lengths and match entries by cellId
    #[arg(long = "ignoreCounts")]
    ignore_counts: bool,

    /// If > 0, print the values of the first given number of differing entries
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    debugevts: i64,
}

/// Prints rows in verbose mode and reports progress on stderr.
struct Console {
    verbose: bool,
    fields: Vec<FieldRule>,
}

impl CompareObserver for Console {
    fn on_progress(&mut self, processed: usize, total: usize) {
        info!(processed, total, "comparing entries");
    }

    fn on_row(&mut self, row: &RowView<'_>) {
        if self.verbose {
            print!("{}", render::row_details(row, &self.fields));
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let args = Args::parse();
    println!();

    let kind: MapKind = match args.maptype.parse() {
        Ok(kind) => kind,
        Err(err) => {
            error!("{err}");
            println!("Wrong argument");
            return Ok(ExitCode::FAILURE);
        }
    };

    let left = kind.open(&args.file1);
    let right = kind.open(&args.file2);
    let left_count = left
        .count()
        .with_context(|| format!("reading {}", left.path().display()))?;
    let right_count = right
        .count()
        .with_context(|| format!("reading {}", right.path().display()))?;

    print!("{}", render::count_check(left_count, right_count, args.ignore_counts));
    if left_count != right_count && !args.ignore_counts {
        return Ok(ExitCode::FAILURE);
    }

    let details = usize::try_from(args.debugevts).unwrap_or(0);
    let mut options = kind.options();
    options.set_max_mismatches(details);
    if let Some(max_rows) = usize::try_from(args.nevts).ok().filter(|n| *n > 0) {
        options.set_max_rows(max_rows);
    }

    let mut console = Console {
        verbose: args.verbose,
        fields: options.fields.clone(),
    };

    if args.ignore_counts {
        // Without details only the first difference is of interest.
        if details == 0 {
            options.set_stop_after(1);
        }
        let report = compare_keyed(&left, &right, &options, &mut console)
            .context("comparing maps by cellId")?;
        let scanned = options.max_rows.map_or(left_count, |max| left_count.min(max));
        print!(
            "{}",
            render::keyed_report(&report, &options.fields, scanned, details)
        );
    } else {
        let report = compare_ordered(&left, &right, &options, &mut console)
            .context("comparing maps entry by entry")?;
        print!("{}", render::ordered_report(&report, &options.fields, details));
    }

    println!();
    Ok(ExitCode::SUCCESS)
}
