//! Error types for layout parsing, codec access and geometry lookups.

use thiserror::Error;

/// Errors produced when building a [crate::codec::Codec] from a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A field token is malformed (bad number, zero width, out of range, duplicate name, ...).
    #[error("malformed layout at '{token}': {reason}")]
    MalformedLayout { token: String, reason: String },
}

impl LayoutError {
    pub(crate) fn malformed(token: impl Into<String>, reason: impl Into<String>) -> Self {
        LayoutError::MalformedLayout {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

/// Errors produced by the readout geometry collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The geometry has no readout with this name.
    #[error("unknown readout '{0}'")]
    UnknownReadout(String),
    /// The detector description itself is inconsistent or unreadable.
    #[error("invalid detector description: {0}")]
    Description(String),
}

/// Errors produced when decoding or encoding through a codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A field name that is not part of the codec.
    #[error("unknown field '{0}'")]
    UnknownField(String),
    /// A system tag with no readout registered for it.
    #[error("unknown system {0}")]
    UnknownSystem(u64),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
