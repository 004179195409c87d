//! JSON-deserializable detector description.
//!
//! These types describe the readouts of a detector and which system tag
//! selects each of them. They are intended to be read from a description file
//! shipped next to the tools and then converted into
//! [crate::geometry::DetectorDescription].
//!
//! ```json
//! {
//!   "name": "toy",
//!   "system_bits": 5,
//!   "readouts": [ { "name": "ECalBarrel", "encoding": "system:5,layer:8" } ],
//!   "systems": [ { "id": 4, "readout": "ECalBarrel" } ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level detector description.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DetectorDef {
    /// Detector name, printed by the tools.
    pub name: String,
    /// Width of the leading system tag; defaults to 5 bits.
    #[serde(default)]
    pub system_bits: Option<u32>,
    /// All readouts and their layout strings.
    pub readouts: Vec<ReadoutDef>,
    /// System tag to readout assignments.
    #[serde(default)]
    pub systems: Vec<SystemDef>,
}

/// A named readout and its layout, given either as a string or as explicit fields.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReadoutDef {
    pub name: String,
    /// Layout in `name:width` / `name:offset:width` form.
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpecDef>,
}

/// Binds a system tag value to a readout.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemDef {
    pub id: u64,
    pub readout: String,
}

/// Structured alternative to a layout string.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldSpecDef {
    pub name: String,
    pub offset: u32,
    pub width: u32,
    #[serde(default)]
    pub signed: bool,
}
