//! Codec: compiled set of fields used to decode and encode cell identifiers.

use std::{collections::HashMap, str::FromStr};

use crate::{
    errors::{CodecError, LayoutError},
    field::FieldSpec,
    layout::{format_layout, parse_layout},
    value::Value,
};

/// An immutable readout encoding. Use [Codec::parse] or [Codec::compile] to
/// build one, then [Codec::decode] / [Codec::encode] identifiers with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
}

impl Codec {
    /// Compiles a slice of [FieldSpec]s into a codec. Fails if any field is invalid
    /// or a name repeats.
    pub fn compile(fields: &[FieldSpec]) -> Result<Self, LayoutError> {
        let mut index = HashMap::with_capacity(fields.len());

        for (position, field) in fields.iter().enumerate() {
            field.validate()?;
            if index.insert(field.name.clone(), position).is_some() {
                return Err(LayoutError::malformed(
                    field.to_string(),
                    "duplicate field name",
                ));
            }
        }

        Ok(Self {
            fields: fields.to_vec(),
            index,
        })
    }

    /// Parses a textual layout such as `system:5,layer:8,x:32:-16`.
    pub fn parse(description: &str) -> Result<Self, LayoutError> {
        let fields = parse_layout(description)?;
        Self::compile(&fields)
    }

    /// Fields in definition order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&position| &self.fields[position])
    }

    /// Canonical layout string with explicit offsets.
    pub fn description(&self) -> String {
        format_layout(&self.fields)
    }

    /// Decodes every field of `id`, in definition order.
    pub fn decode(&self, id: u64) -> Vec<(&str, Value)> {
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.extract(id)))
            .collect()
    }

    /// Decodes a single named field of `id`.
    pub fn get(&self, id: u64, name: &str) -> Result<Value, CodecError> {
        self.require(name).map(|field| field.extract(id))
    }

    /// Returns `id` with the named field replaced by `value` (truncated to the field width).
    pub fn set(&self, id: u64, name: &str, value: impl Into<Value>) -> Result<u64, CodecError> {
        self.require(name).map(|field| field.insert(id, value.into()))
    }

    /// Packs field values into a new identifier. Fields not supplied stay zero;
    /// values are truncated to their field width.
    pub fn encode<'a, I, V>(&self, values: I) -> Result<u64, CodecError>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<Value>,
    {
        let mut id = 0u64;

        for (name, value) in values {
            let field = self.require(name)?;
            id |= field.insert(0, value.into());
        }

        Ok(id)
    }

    fn require(&self, name: &str) -> Result<&FieldSpec, CodecError> {
        self.field(name)
            .ok_or_else(|| CodecError::UnknownField(name.to_string()))
    }
}

impl FromStr for Codec {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codec::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ecal_barrel() -> Codec {
        Codec::parse("system:5,cryo:1,type:3,subtype:3,layer:8,module:11,theta:10").unwrap()
    }

    #[test]
    fn test_decode_in_definition_order() {
        let codec = ecal_barrel();
        let id = codec
            .encode([("system", 4u64), ("layer", 7), ("module", 1500), ("theta", 300)])
            .unwrap();

        let decoded = codec.decode(id);
        let names: Vec<&str> = decoded.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            ["system", "cryo", "type", "subtype", "layer", "module", "theta"]
        );
        assert_eq!(codec.get(id, "system"), Ok(Value::U64(4)));
        assert_eq!(codec.get(id, "layer"), Ok(Value::U64(7)));
        assert_eq!(codec.get(id, "module"), Ok(Value::U64(1500)));
        assert_eq!(codec.get(id, "theta"), Ok(Value::U64(300)));
        assert_eq!(codec.get(id, "cryo"), Ok(Value::U64(0)));
    }

    #[test]
    fn test_sign_extension() {
        let codec = Codec::parse("raw:0:4,value:0:-4").unwrap();
        assert_eq!(codec.get(0b1111, "value"), Ok(Value::I64(-1)));
        assert_eq!(codec.get(0b1111, "raw"), Ok(Value::U64(15)));
        assert_eq!(codec.get(0b0111, "value"), Ok(Value::I64(7)));
    }

    #[test]
    fn test_full_width_field() {
        let codec = Codec::parse("all:0:64,signed_all:0:-64").unwrap();
        assert_eq!(codec.get(u64::MAX, "all"), Ok(Value::U64(u64::MAX)));
        assert_eq!(codec.get(u64::MAX, "signed_all"), Ok(Value::I64(-1)));
        assert_eq!(codec.encode([("all", u64::MAX)]), Ok(u64::MAX));
    }

    #[test]
    fn test_encode_wraps_to_width() {
        let codec = Codec::parse("system:5,layer:3").unwrap();
        assert_eq!(codec.encode([("layer", 9)]), Ok(1 << 5));
        assert_eq!(codec.encode([("system", -1)]), Ok(0b11111));
    }

    #[test]
    fn test_signed_roundtrip() {
        let codec = Codec::parse("system:5,x:16:-16,y:-16").unwrap();
        let id = codec
            .encode([("system", Value::U64(9)), ("x", Value::I64(-300)), ("y", Value::I64(42))])
            .unwrap();
        assert_eq!(
            codec.decode(id),
            vec![
                ("system", Value::U64(9)),
                ("x", Value::I64(-300)),
                ("y", Value::I64(42)),
            ]
        );
    }

    #[test]
    fn test_unknown_field() {
        let codec = ecal_barrel();
        assert_eq!(
            codec.get(0, "phi"),
            Err(CodecError::UnknownField("phi".to_string()))
        );
        assert_eq!(
            codec.encode([("system", 4), ("phi", 1)]),
            Err(CodecError::UnknownField("phi".to_string()))
        );
    }

    #[test]
    fn test_set() {
        let codec = ecal_barrel();
        let id = codec.encode([("system", 4), ("layer", 3)]).unwrap();
        let moved = codec.set(id, "layer", 5).unwrap();
        assert_eq!(codec.get(moved, "layer"), Ok(Value::U64(5)));
        assert_eq!(codec.get(moved, "system"), Ok(Value::U64(4)));
    }

    #[test]
    fn test_decode_is_stable() {
        let codec = ecal_barrel();
        let id = 0x0123_4567_89ab_cdef;
        assert_eq!(codec.decode(id), codec.decode(id));
    }

    #[test]
    fn test_compile_rejects_duplicates() {
        let fields = vec![FieldSpec::new("a", 0, 4), FieldSpec::new("a", 4, 4)];
        assert!(matches!(
            Codec::compile(&fields),
            Err(LayoutError::MalformedLayout { .. })
        ));
    }

    #[test]
    fn test_description_roundtrip() {
        let codec = ecal_barrel();
        let reparsed: Codec = codec.description().parse().unwrap();
        assert_eq!(reparsed.fields(), codec.fields());
    }
}
