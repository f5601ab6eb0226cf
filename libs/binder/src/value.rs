//! Scalar value decoding and the value view used by validation rules

use std::collections::{BTreeMap, HashMap};

use crate::error::ConversionError;

/// Read-only view of a field's final value, as seen by validation rules
pub trait FieldValue {
    /// Whether the value equals the zero value of its kind
    fn is_zero(&self) -> bool;

    /// Textual form used for allow-list comparison; `None` when the value
    /// has no scalar text (lists, maps)
    fn as_text(&self) -> Option<String> {
        None
    }
}

/// A leaf value decodable from annotation text
pub trait Scalar: FieldValue + Sized + 'static {
    /// Kind name used in conversion errors
    const KIND: &'static str;

    fn parse_scalar(text: &str) -> Result<Self, ConversionError>;
}

/// Parse every option as one element of a homogeneous list
///
/// Fails on the first element that does not convert.
pub fn parse_list<V: Scalar>(options: &[String]) -> Result<Vec<V>, ConversionError> {
    options.iter().map(|o| V::parse_scalar(o)).collect()
}

macro_rules! integer_scalar {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn is_zero(&self) -> bool {
                    *self == 0
                }

                fn as_text(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }

            impl Scalar for $ty {
                const KIND: &'static str = $kind;

                fn parse_scalar(text: &str) -> Result<Self, ConversionError> {
                    text.parse::<$ty>()
                        .map_err(|e| ConversionError::new(text, Self::KIND, e))
                }
            }
        )*
    };
}

integer_scalar! {
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    isize => "int",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    usize => "uint",
}

macro_rules! float_scalar {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn is_zero(&self) -> bool {
                    *self == 0.0
                }

                fn as_text(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }

            impl Scalar for $ty {
                const KIND: &'static str = $kind;

                fn parse_scalar(text: &str) -> Result<Self, ConversionError> {
                    text.parse::<$ty>()
                        .map_err(|e| ConversionError::new(text, Self::KIND, e))
                }
            }
        )*
    };
}

float_scalar! {
    f32 => "float32",
    f64 => "float64",
}

impl FieldValue for bool {
    fn is_zero(&self) -> bool {
        !*self
    }

    fn as_text(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Empty text is `false`; otherwise only the usual boolean literals are accepted
impl Scalar for bool {
    const KIND: &'static str = "bool";

    fn parse_scalar(text: &str) -> Result<Self, ConversionError> {
        match text {
            "" => Ok(false),
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            _ => Err(ConversionError::new(text, Self::KIND, "invalid syntax")),
        }
    }
}

impl FieldValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn as_text(&self) -> Option<String> {
        Some(self.clone())
    }
}

impl Scalar for String {
    const KIND: &'static str = "string";

    fn parse_scalar(text: &str) -> Result<Self, ConversionError> {
        Ok(text.to_string())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn as_text(&self) -> Option<String> {
        self.as_ref().and_then(FieldValue::as_text)
    }
}

impl<T: Scalar> Scalar for Option<T> {
    const KIND: &'static str = T::KIND;

    fn parse_scalar(text: &str) -> Result<Self, ConversionError> {
        T::parse_scalar(text).map(Some)
    }
}

impl<T> FieldValue for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> FieldValue for BTreeMap<K, V> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> FieldValue for HashMap<K, V, S> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}
