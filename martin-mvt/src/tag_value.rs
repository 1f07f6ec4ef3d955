use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use geozero::mvt::tile::Value;

use crate::{MvtError, MvtResult};

/// A scalar tag value.
///
/// Every variant is its own kind: values of different variants never compare
/// equal, even when they hold the same number or text.
#[derive(Debug, Clone)]
pub enum TagValue {
    String(String),
    /// Rendered text of a value that was tagged through its [`Display`] impl.
    Display(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl TagValue {
    /// Tags a value by its [`Display`] rendering.
    pub fn display(value: &impl Display) -> Self {
        Self::Display(value.to_string())
    }
}

// Floats compare by their bits so that they can be used as keys.
// Negative zero is folded into zero, and identical NaN bits are equal.

fn f32_bits(v: f32) -> u32 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

fn f64_bits(v: f64) -> u64 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

impl PartialEq for TagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) | (Self::Display(a), Self::Display(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => f32_bits(*a) == f32_bits(*b),
            (Self::F64(a), Self::F64(b)) => f64_bits(*a) == f64_bits(*b),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TagValue {}

impl Hash for TagValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            Self::String(s) | Self::Display(s) => s.hash(state),
            Self::I8(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::U8(v) => v.hash(state),
            Self::U16(v) => v.hash(state),
            Self::U32(v) => v.hash(state),
            Self::U64(v) => v.hash(state),
            Self::F32(v) => f32_bits(*v).hash(state),
            Self::F64(v) => f64_bits(*v).hash(state),
            Self::Bool(v) => v.hash(state),
        }
    }
}

impl Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => write!(f, "{v:?}"),
            Self::Display(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}i8"),
            Self::I16(v) => write!(f, "{v}i16"),
            Self::I32(v) => write!(f, "{v}i32"),
            Self::I64(v) => write!(f, "{v}i64"),
            Self::U8(v) => write!(f, "{v}u8"),
            Self::U16(v) => write!(f, "{v}u16"),
            Self::U32(v) => write!(f, "{v}u32"),
            Self::U64(v) => write!(f, "{v}u64"),
            Self::F32(v) => write!(f, "{v}f32"),
            Self::F64(v) => write!(f, "{v}f64"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TagValue {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl TryFrom<serde_json::Value> for TagValue {
    type Error = MvtError;

    /// Only JSON scalars are accepted. `null`, arrays and objects are rejected rather than stringified.
    fn try_from(value: serde_json::Value) -> MvtResult<Self> {
        use serde_json::Value as Json;

        Ok(match value {
            Json::String(s) => Self::String(s),
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Self::I64(v)
                } else if let Some(v) = n.as_u64() {
                    Self::U64(v)
                } else if let Some(v) = n.as_f64() {
                    Self::F64(v)
                } else {
                    Err(unsupported(n.to_string()))?
                }
            }
            v @ (Json::Null | Json::Array(_) | Json::Object(_)) => Err(unsupported(v.to_string()))?,
        })
    }
}

fn unsupported(value: String) -> MvtError {
    MvtError::UnsupportedTagValueKind {
        key: String::new(),
        value,
    }
}

impl From<TagValue> for Value {
    fn from(tv: TagValue) -> Self {
        match tv {
            TagValue::String(s) | TagValue::Display(s) => Self {
                string_value: Some(s),
                ..Default::default()
            },
            TagValue::F32(f) => Self {
                float_value: Some(f),
                ..Default::default()
            },
            TagValue::F64(d) => Self {
                double_value: Some(d),
                ..Default::default()
            },
            TagValue::I8(i) => int_value(i.into()),
            TagValue::I16(i) => int_value(i.into()),
            TagValue::I32(i) => int_value(i.into()),
            TagValue::I64(i) => int_value(i),
            TagValue::U8(u) => uint_value(u.into()),
            TagValue::U16(u) => uint_value(u.into()),
            TagValue::U32(u) => uint_value(u.into()),
            TagValue::U64(u) => uint_value(u),
            TagValue::Bool(b) => Self {
                bool_value: Some(b),
                ..Default::default()
            },
        }
    }
}

fn int_value(v: i64) -> Value {
    Value {
        int_value: Some(v),
        ..Default::default()
    }
}

fn uint_value(v: u64) -> Value {
    Value {
        uint_value: Some(v),
        ..Default::default()
    }
}
