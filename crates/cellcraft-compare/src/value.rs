//! Scalar and list values stored in map records.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// A single stored value.
///
/// Numbers compare by value whatever their variant, so `Int(5)`, `UInt(5)`
/// and `Float(5.0)` are equal while `Float(5.5)` differs from all of them.
/// There is no tolerance. `0.0` equals `-0.0`, every NaN equals every other
/// NaN and sorts above all numbers. Numbers sort before strings.
#[derive(Debug, Clone)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

/// 2^63 and 2^64, the first floats above `i64::MAX` and `u64::MAX`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        use Scalar::*;

        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (UInt(a), UInt(b)) => a.cmp(b),
            (Int(a), UInt(b)) => cmp_i64_u64(*a, *b),
            (UInt(a), Int(b)) => cmp_i64_u64(*b, *a).reverse(),
            (Float(a), Float(b)) => cmp_f64(*a, *b),
            (Int(a), Float(b)) => cmp_i64_f64(*a, *b),
            (Float(a), Int(b)) => cmp_i64_f64(*b, *a).reverse(),
            (UInt(a), Float(b)) => cmp_u64_f64(*a, *b),
            (Float(a), UInt(b)) => cmp_u64_f64(*b, *a).reverse(),
            (Str(a), Str(b)) => a.cmp(b),
            (Str(_), _) => Ordering::Greater,
            (_, Str(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equal numbers must hash alike across variants.
        match self {
            Scalar::Int(v) => (0u8, i128::from(*v)).hash(state),
            Scalar::UInt(v) => (0u8, i128::from(*v)).hash(state),
            Scalar::Float(v) if v.is_nan() => 2u8.hash(state),
            Scalar::Float(v) if v.fract() == 0.0 && v.abs() < TWO_POW_64 => {
                (0u8, *v as i128).hash(state)
            }
            Scalar::Float(v) => (1u8, v.to_bits()).hash(state),
            Scalar::Str(v) => (3u8, v).hash(state),
        }
    }
}

fn cmp_i64_u64(a: i64, b: u64) -> Ordering {
    u64::try_from(a).map_or(Ordering::Less, |a| a.cmp(&b))
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// How an integer equal to `f.trunc()` orders against `f`.
fn cmp_fraction(f: f64) -> Ordering {
    let fraction = f - f.trunc();
    if fraction > 0.0 {
        Ordering::Less
    } else if fraction < 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

fn cmp_i64_f64(a: i64, b: f64) -> Ordering {
    if b.is_nan() || b >= TWO_POW_63 {
        Ordering::Less
    } else if b < -TWO_POW_63 {
        Ordering::Greater
    } else {
        a.cmp(&(b.trunc() as i64)).then_with(|| cmp_fraction(b))
    }
}

fn cmp_u64_f64(a: u64, b: f64) -> Ordering {
    if b.is_nan() || b >= TWO_POW_64 {
        Ordering::Less
    } else if b < 0.0 {
        Ordering::Greater
    } else {
        a.cmp(&(b.trunc() as u64)).then_with(|| cmp_fraction(b))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::UInt(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(v) => write!(f, "{v}"),
        }
    }
}

/// A field of a record: one scalar or a sequence of scalars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl FieldValue {
    /// Returns the value with list elements sorted; scalars are unchanged.
    pub fn sorted(&self) -> FieldValue {
        match self {
            FieldValue::Scalar(_) => self.clone(),
            FieldValue::List(items) => {
                let mut items = items.clone();
                items.sort();
                FieldValue::List(items)
            }
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(scalar) => Some(scalar),
            FieldValue::List(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar(scalar) => write!(f, "{scalar}"),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value.into())
                }
            }

            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

impl_from_scalar! {
    i32 => Int,
    i64 => Int,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    &str => Str,
    String => Str,
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for FieldValue {
    fn from(value: Vec<T>) -> Self {
        FieldValue::List(value.into_iter().map(Into::into).collect())
    }
}
