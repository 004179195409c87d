//! Access to readout layouts provided by the detector geometry.
//!
//! The geometry itself (compact description parsing, segmentation) lives
//! outside this crate. [GeometryService] is the narrow interface the codec
//! registry needs from it; [DetectorDescription] is an in-memory
//! implementation that can also be loaded from JSON (feature `serde`).

use std::collections::BTreeMap;

use crate::{bits::SYSTEM_BITS, errors::GeometryError};

/// Supplies the layout description of a named readout.
pub trait GeometryService {
    fn readout_layout(&self, readout: &str) -> Result<String, GeometryError>;
}

impl<G: GeometryService + ?Sized> GeometryService for &G {
    fn readout_layout(&self, readout: &str) -> Result<String, GeometryError> {
        (**self).readout_layout(readout)
    }
}

/// Maps system tags (the leading bits of every identifier) to readout names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemTable {
    readouts: BTreeMap<u64, String>,
}

impl SystemTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, system: u64, readout: impl Into<String>) -> &mut Self {
        self.readouts.insert(system, readout.into());
        self
    }

    pub fn readout(&self, system: u64) -> Option<&str> {
        self.readouts.get(&system).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.readouts
            .iter()
            .map(|(system, readout)| (*system, readout.as_str()))
    }
}

/// Readout layouts and system assignments of one detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorDescription {
    pub name: String,
    /// Width of the system tag; every readout starts with a field this wide.
    pub system_bits: u32,
    readouts: BTreeMap<String, String>,
    systems: SystemTable,
}

impl DetectorDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_bits: SYSTEM_BITS,
            readouts: BTreeMap::new(),
            systems: SystemTable::new(),
        }
    }

    /// Registers a readout layout, optionally bound to a system tag.
    pub fn with_readout(
        mut self,
        readout: impl Into<String>,
        layout: impl Into<String>,
        system: Option<u64>,
    ) -> Self {
        let readout = readout.into();
        if let Some(system) = system {
            self.systems.insert(system, readout.clone());
        }
        self.readouts.insert(readout, layout.into());
        self
    }

    pub fn systems(&self) -> &SystemTable {
        &self.systems
    }

    pub fn readouts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.readouts
            .iter()
            .map(|(name, layout)| (name.as_str(), layout.as_str()))
    }

    /// Checks that every system tag points at a known readout and fits in `system_bits`.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.system_bits == 0 || self.system_bits > 64 {
            return Err(GeometryError::Description(format!(
                "system_bits must be in 1..=64, got {}",
                self.system_bits
            )));
        }

        for (system, readout) in self.systems.iter() {
            if !self.readouts.contains_key(readout) {
                return Err(GeometryError::Description(format!(
                    "system {system} refers to unknown readout '{readout}'"
                )));
            }
            if system > crate::bits::mask(self.system_bits) {
                return Err(GeometryError::Description(format!(
                    "system {system} does not fit in {} bits",
                    self.system_bits
                )));
            }
        }

        Ok(())
    }

    /// Parses and validates a JSON description (see [crate::serde::DetectorDef]).
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, GeometryError> {
        let def: crate::serde::DetectorDef = serde_json::from_str(json)
            .map_err(|err| GeometryError::Description(err.to_string()))?;
        Self::try_from(def)
    }
}

impl GeometryService for DetectorDescription {
    fn readout_layout(&self, readout: &str) -> Result<String, GeometryError> {
        self.readouts
            .get(readout)
            .cloned()
            .ok_or_else(|| GeometryError::UnknownReadout(readout.to_string()))
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::DetectorDef> for DetectorDescription {
    type Error = GeometryError;

    fn try_from(value: crate::serde::DetectorDef) -> Result<Self, Self::Error> {
        let mut detector = DetectorDescription::new(value.name);
        if let Some(system_bits) = value.system_bits {
            detector.system_bits = system_bits;
        }

        for readout in value.readouts {
            if detector.readouts.contains_key(&readout.name) {
                return Err(GeometryError::Description(format!(
                    "readout '{}' defined twice",
                    readout.name
                )));
            }
            let layout = match (readout.encoding, readout.fields.is_empty()) {
                (Some(encoding), true) => encoding,
                (None, false) => {
                    let fields: Vec<crate::field::FieldSpec> =
                        readout.fields.into_iter().map(Into::into).collect();
                    crate::layout::format_layout(&fields)
                }
                (Some(_), false) => {
                    return Err(GeometryError::Description(format!(
                        "readout '{}' has both an encoding and fields",
                        readout.name
                    )));
                }
                (None, true) => {
                    return Err(GeometryError::Description(format!(
                        "readout '{}' has no encoding",
                        readout.name
                    )));
                }
            };
            detector.readouts.insert(readout.name, layout);
        }

        for system in value.systems {
            if let Some(previous) = detector.systems.readout(system.id) {
                return Err(GeometryError::Description(format!(
                    "system {} assigned to both '{}' and '{}'",
                    system.id, previous, system.readout
                )));
            }
            detector.systems.insert(system.id, system.readout);
        }

        detector.validate()?;
        Ok(detector)
    }
}
