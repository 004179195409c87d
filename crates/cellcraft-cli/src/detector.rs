use std::{fs, path::Path};

use anyhow::Context;
use cellcraft::DetectorDescription;

/// Description used when no geometry file is given.
pub const EXAMPLE_DETECTOR: &str = include_str!("../data/example_detector.json");

/// Loads the detector description at `path`, or the bundled example.
pub fn load_detector(path: Option<&Path>) -> anyhow::Result<DetectorDescription> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading detector description {}", path.display()))?;
            DetectorDescription::from_json(&json)
                .with_context(|| format!("parsing detector description {}", path.display()))
        }
        None => DetectorDescription::from_json(EXAMPLE_DETECTOR)
            .context("parsing the bundled example detector description"),
    }
}
