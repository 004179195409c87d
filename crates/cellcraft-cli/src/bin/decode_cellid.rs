//! # decode-cellid
//!
//! Prints the fields packed into calorimeter cell identifiers.
//!
//! ```bash
//! decode-cellid 0x834 12345
//! decode-cellid --geometry my_detector.json 0b1000_00100
//! ```

use std::path::PathBuf;

use anyhow::Context;
use cellcraft::{CodecError, ReadoutRegistry};
use cellcraft_cli::{cellid::parse_cell_id, detector::load_detector, logging::init_tracing, render};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "decode-cellid")]
#[command(about = "Decode packed detector cell identifiers")]
struct Args {
    /// Cell identifiers: decimal, 0x, 0o or 0b literals
    #[arg(required = true, value_parser = parse_cell_id, allow_negative_numbers = true)]
    cell_ids: Vec<u64>,

    /// Detector description (JSON); the bundled example is used if absent
    #[arg(long, short = 'g', env = "CELLCRAFT_GEOMETRY")]
    geometry: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let detector = load_detector(args.geometry.as_deref())?;
    match &args.geometry {
        Some(path) => info!(detector = %detector.name, path = %path.display(), "loaded detector description"),
        None => info!(detector = %detector.name, "using bundled detector description"),
    }

    let mut registry = ReadoutRegistry::new(&detector, detector.systems().clone())
        .with_system_bits(detector.system_bits);

    for id in args.cell_ids {
        print!("{}", render::cell_header(id));
        match registry.codec_for(id) {
            Ok(selected) => print!("{}", render::cell_fields(id, &selected)),
            Err(CodecError::UnknownSystem(system)) => println!("Unknown system {system}"),
            Err(err) => return Err(err).with_context(|| format!("decoding cell id {id:#x}")),
        }
    }
    Ok(())
}
