//! Lazily built, memoized codecs keyed by readout name.

use std::collections::{HashMap, hash_map::Entry};

use tracing::debug;

use crate::{
    bits::{extract_bits, SYSTEM_BITS},
    codec::Codec,
    errors::CodecError,
    geometry::{GeometryService, SystemTable},
};

/// Owns a geometry handle and caches one [Codec] per readout.
///
/// Codecs are built on first request and never rebuilt; the layout lookup on
/// the geometry service happens at most once per readout name.
pub struct ReadoutRegistry<G> {
    geometry: G,
    systems: SystemTable,
    system_bits: u32,
    codecs: HashMap<String, Codec>,
}

impl<G: GeometryService> ReadoutRegistry<G> {
    pub fn new(geometry: G, systems: SystemTable) -> Self {
        Self {
            geometry,
            systems,
            system_bits: SYSTEM_BITS,
            codecs: HashMap::new(),
        }
    }

    /// Overrides the width of the system tag used by [ReadoutRegistry::codec_for].
    pub fn with_system_bits(mut self, system_bits: u32) -> Self {
        self.system_bits = system_bits;
        self
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn systems(&self) -> &SystemTable {
        &self.systems
    }

    /// Number of codecs built so far.
    pub fn cached(&self) -> usize {
        self.codecs.len()
    }

    /// Returns the codec of `readout`, building it on first use.
    pub fn codec(&mut self, readout: &str) -> Result<&Codec, CodecError> {
        match self.codecs.entry(readout.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let layout = self.geometry.readout_layout(readout)?;
                let codec = Codec::parse(&layout)?;
                debug!(readout, layout = %layout, fields = codec.fields().len(), "built readout codec");
                Ok(entry.insert(codec))
            }
        }
    }

    /// Reads the system tag of `id`.
    pub fn system_of(&self, id: u64) -> u64 {
        extract_bits(id, 0, self.system_bits)
    }

    /// Selects the codec for `id` through its system tag.
    pub fn codec_for(&mut self, id: u64) -> Result<Selected<'_>, CodecError> {
        let system = self.system_of(id);
        let readout = self
            .systems
            .readout(system)
            .ok_or(CodecError::UnknownSystem(system))?
            .to_string();
        let codec = self.codec(&readout)?;

        Ok(Selected {
            system,
            readout,
            codec,
        })
    }
}

/// Result of selecting a codec by system tag.
#[derive(Debug)]
pub struct Selected<'a> {
    pub system: u64,
    pub readout: String,
    pub codec: &'a Codec,
}
