// Copyright 2025 The LdapMatch Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use cheetah_string::CheetahString;

use crate::expression::version::Version;

/// Comparison behavior for property values outside the closed set of
/// supported kinds.
///
/// This is the statically typed replacement for comparing arbitrary
/// objects by reflectively constructing a peer from the filter's string
/// operand: the implementation owns both the parse of the operand and the
/// comparison against it.
///
/// # Contract
///
/// - `partial_compare` returns `None` when the operand cannot be parsed
///   into the implementing type; the affected filter term is then false.
/// - When `ordered` returns `false`, `>=` and `<=` filters collapse to
///   equality checks, matching types that support equality but carry no
///   natural ordering.
pub trait OpaqueValue: fmt::Debug + Send + Sync {
    /// Parse `operand` into this value's type and compare against self.
    fn partial_compare(&self, operand: &str) -> Option<Ordering>;

    /// Whether ordering comparisons are meaningful for this type.
    fn ordered(&self) -> bool {
        true
    }
}

/// A property value as seen by the filter evaluator.
///
/// The comparison rules of RFC 1960 depend on the runtime type of the
/// stored property, so callers normalize their values into this closed
/// union at the boundary (the `From` conversions cover the common cases).
/// Sequences match existentially: a filter term is true for a `Vec` value
/// iff it is true for at least one element.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Str(CheetahString),
    Int(i32),
    Long(i64),
    Byte(i8),
    Short(i16),
    Float(f32),
    Double(f64),
    Char(char),
    Bool(bool),
    Version(Version),
    Vec(Vec<PropertyValue>),
    Opaque(Arc<dyn OpaqueValue>),
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::Str(a), PropertyValue::Str(b)) => a == b,
            (PropertyValue::Int(a), PropertyValue::Int(b)) => a == b,
            (PropertyValue::Long(a), PropertyValue::Long(b)) => a == b,
            (PropertyValue::Byte(a), PropertyValue::Byte(b)) => a == b,
            (PropertyValue::Short(a), PropertyValue::Short(b)) => a == b,
            (PropertyValue::Float(a), PropertyValue::Float(b)) => a.total_cmp(b).is_eq(),
            (PropertyValue::Double(a), PropertyValue::Double(b)) => a.total_cmp(b).is_eq(),
            (PropertyValue::Char(a), PropertyValue::Char(b)) => a == b,
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a == b,
            (PropertyValue::Version(a), PropertyValue::Version(b)) => a == b,
            (PropertyValue::Vec(a), PropertyValue::Vec(b)) => a == b,
            (PropertyValue::Opaque(a), PropertyValue::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<CheetahString> for PropertyValue {
    fn from(value: CheetahString) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Long(value)
    }
}

impl From<i8> for PropertyValue {
    fn from(value: i8) -> Self {
        PropertyValue::Byte(value)
    }
}

impl From<i16> for PropertyValue {
    fn from(value: i16) -> Self {
        PropertyValue::Short(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(value)
    }
}

impl From<char> for PropertyValue {
    fn from(value: char) -> Self {
        PropertyValue::Char(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Version> for PropertyValue {
    fn from(value: Version) -> Self {
        PropertyValue::Version(value)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        PropertyValue::Vec(values.into_iter().map(Into::into).collect())
    }
}

impl From<Arc<dyn OpaqueValue>> for PropertyValue {
    fn from(value: Arc<dyn OpaqueValue>) -> Self {
        PropertyValue::Opaque(value)
    }
}

/// Serde support for the closed data variants.
///
/// Opaque values are runtime-only comparison hooks and cannot cross a
/// serialization boundary; serializing one is an error.
mod serde_impl {
    use serde::de::Deserializer;
    use serde::ser::Error;
    use serde::ser::Serializer;
    use serde::Deserialize;
    use serde::Serialize;

    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename = "PropertyValue")]
    enum Repr {
        Str(CheetahString),
        Int(i32),
        Long(i64),
        Byte(i8),
        Short(i16),
        Float(f32),
        Double(f64),
        Char(char),
        Bool(bool),
        Version(Version),
        Vec(Vec<Repr>),
    }

    fn to_repr(value: &PropertyValue) -> Result<Repr, &'static str> {
        Ok(match value {
            PropertyValue::Str(v) => Repr::Str(v.clone()),
            PropertyValue::Int(v) => Repr::Int(*v),
            PropertyValue::Long(v) => Repr::Long(*v),
            PropertyValue::Byte(v) => Repr::Byte(*v),
            PropertyValue::Short(v) => Repr::Short(*v),
            PropertyValue::Float(v) => Repr::Float(*v),
            PropertyValue::Double(v) => Repr::Double(*v),
            PropertyValue::Char(v) => Repr::Char(*v),
            PropertyValue::Bool(v) => Repr::Bool(*v),
            PropertyValue::Version(v) => Repr::Version(v.clone()),
            PropertyValue::Vec(v) => Repr::Vec(v.iter().map(to_repr).collect::<Result<_, _>>()?),
            PropertyValue::Opaque(_) => return Err("opaque property values cannot be serialized"),
        })
    }

    fn from_repr(repr: Repr) -> PropertyValue {
        match repr {
            Repr::Str(v) => PropertyValue::Str(v),
            Repr::Int(v) => PropertyValue::Int(v),
            Repr::Long(v) => PropertyValue::Long(v),
            Repr::Byte(v) => PropertyValue::Byte(v),
            Repr::Short(v) => PropertyValue::Short(v),
            Repr::Float(v) => PropertyValue::Float(v),
            Repr::Double(v) => PropertyValue::Double(v),
            Repr::Char(v) => PropertyValue::Char(v),
            Repr::Bool(v) => PropertyValue::Bool(v),
            Repr::Version(v) => PropertyValue::Version(v),
            Repr::Vec(v) => PropertyValue::Vec(v.into_iter().map(from_repr).collect()),
        }
    }

    impl Serialize for PropertyValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            to_repr(self).map_err(S::Error::custom)?.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for PropertyValue {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Repr::deserialize(deserializer).map(from_repr)
        }
    }
}
