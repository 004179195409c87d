//! # cellcraft
//!
//! Bit-field codec for packed detector cell identifiers.
//!
//! A readout layout such as `system:5,layer:8,x:32:-16` names the bit ranges of
//! a 64-bit identifier. Compile it into a [Codec] once, then decode or encode
//! identifiers with it. A [registry::ReadoutRegistry] picks the right codec for
//! an identifier from its leading system tag and memoizes codecs by readout name.
//!
//! ## Example
//!
//! ```
//! use cellcraft::{Codec, Value};
//!
//! let codec = Codec::parse("system:5,layer:8,x:32:-16").unwrap();
//! let id = codec.encode([("system", Value::U64(4)), ("x", Value::I64(-2))]).unwrap();
//! assert_eq!(codec.get(id, "x"), Ok(Value::I64(-2)));
//! assert_eq!(cellcraft::bits::system_tag(id), 4);
//! ```

pub mod bits;
pub mod codec;
pub mod errors;
pub mod field;
pub mod geometry;
pub mod layout;
pub mod registry;
#[cfg(feature = "serde")]
pub mod serde;
pub mod value;

pub use codec::Codec;
pub use errors::{CodecError, GeometryError, LayoutError};
pub use field::FieldSpec;
pub use geometry::{DetectorDescription, GeometryService, SystemTable};
pub use registry::{ReadoutRegistry, Selected};
pub use value::Value;
