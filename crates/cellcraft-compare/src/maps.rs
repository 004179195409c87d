//! Presets for the cell maps produced by the calibration tools.

use std::{fmt, path::Path, str::FromStr};

use crate::{
    compare::{CompareOptions, FieldRule},
    errors::UnknownMapKind,
    source::JsonLinesSource,
};

/// Key shared by every map.
pub const CELL_ID: &str = "cellId";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    /// Neighbour list of every cell.
    Neighbours,
    /// Noise level and offset of every cell.
    Noise,
    /// Crosstalk neighbours and coefficients, stored as parallel lists.
    Crosstalk,
}

impl MapKind {
    /// Name of the table holding the map.
    pub fn table(self) -> &'static str {
        match self {
            MapKind::Neighbours => "neighbours",
            MapKind::Noise => "noisyCells",
            MapKind::Crosstalk => "crosstalk_neighbours",
        }
    }

    /// Fields compared for this map, in report order.
    pub fn fields(self) -> Vec<FieldRule> {
        match self {
            MapKind::Neighbours => vec![FieldRule::sorted(CELL_ID), FieldRule::sorted("neighbours")],
            MapKind::Noise => vec![
                FieldRule::sorted(CELL_ID),
                FieldRule::sorted("noiseLevel"),
                FieldRule::sorted("noiseOffset"),
            ],
            // Neighbours and coefficients are paired by position.
            MapKind::Crosstalk => vec![
                FieldRule::as_is(CELL_ID),
                FieldRule::as_is("list_crosstalk_neighbours"),
                FieldRule::as_is("list_crosstalks"),
                FieldRule::as_is("CellInfo"),
            ],
        }
    }

    pub fn options(self) -> CompareOptions {
        CompareOptions::new(CELL_ID, self.fields())
    }

    /// Opens the map stored at `path`. A directory resolves to `<dir>/<table>.jsonl`.
    pub fn open(self, path: &Path) -> JsonLinesSource {
        let file = if path.is_dir() {
            path.join(format!("{}.jsonl", self.table()))
        } else {
            path.to_path_buf()
        };
        JsonLinesSource::new(file, CELL_ID)
    }
}

impl FromStr for MapKind {
    type Err = UnknownMapKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neighbours" => Ok(MapKind::Neighbours),
            "noise" => Ok(MapKind::Noise),
            "xtalk" => Ok(MapKind::Crosstalk),
            other => Err(UnknownMapKind(other.to_string())),
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKind::Neighbours => write!(f, "neighbours"),
            MapKind::Noise => write!(f, "noise"),
            MapKind::Crosstalk => write!(f, "xtalk"),
        }
    }
}
