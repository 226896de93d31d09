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

//! Comparison of a stored property value against a filter operand.
//!
//! The rules depend on the kind of the stored value, not on anything in
//! the filter itself: the same `(x>=5)` term compares numerically against
//! an `Int` property and lexicographically against a `Str` property.
//! Sequences match existentially. Every failure path (unparsable
//! operand, missing character, throwing comparison) makes the affected
//! term false; nothing here panics or returns an error.

use std::cmp::Ordering;
use std::str::FromStr;

use cheetah_string::CheetahString;

use crate::expression::filter_expression::approx_string;
use crate::expression::property_value::OpaqueValue;
use crate::expression::property_value::PropertyValue;
use crate::expression::version::Version;

/// A leaf comparison with its string operand, or the segment list for a
/// substring match. `Greater` and `Less` are inclusive (`>=` / `<=`).
pub(crate) enum CompareOp<'a> {
    Equal(&'a str),
    Approx(&'a str),
    Greater(&'a str),
    Less(&'a str),
    Substring(&'a [Option<CheetahString>]),
}

impl<'a> CompareOp<'a> {
    /// The string operand, unless this is a substring match.
    fn operand(&self) -> Option<&'a str> {
        match self {
            CompareOp::Equal(s)
            | CompareOp::Approx(s)
            | CompareOp::Greater(s)
            | CompareOp::Less(s) => Some(*s),
            CompareOp::Substring(_) => None,
        }
    }
}

pub(crate) fn compare(op: &CompareOp<'_>, value: &PropertyValue) -> bool {
    match value {
        PropertyValue::Str(s) => compare_string(op, s),
        PropertyValue::Int(v) => compare_integer(op, *v),
        PropertyValue::Long(v) => compare_integer(op, *v),
        PropertyValue::Byte(v) => compare_integer(op, *v),
        PropertyValue::Short(v) => compare_integer(op, *v),
        PropertyValue::Float(v) => compare_float(op, *v),
        PropertyValue::Double(v) => compare_double(op, *v),
        PropertyValue::Char(v) => compare_character(op, *v),
        PropertyValue::Bool(v) => compare_boolean(op, *v),
        PropertyValue::Version(v) => compare_version(op, v),
        PropertyValue::Vec(values) => values.iter().any(|v| compare(op, v)),
        PropertyValue::Opaque(v) => compare_opaque(op, v.as_ref()),
    }
}

fn compare_string(op: &CompareOp<'_>, string: &str) -> bool {
    match op {
        CompareOp::Substring(segments) => substring_match(string, segments),
        CompareOp::Equal(operand) => string == *operand,
        CompareOp::Approx(operand) => {
            approx_string(string).to_lowercase() == approx_string(operand).to_lowercase()
        }
        CompareOp::Greater(operand) => string >= *operand,
        CompareOp::Less(operand) => string <= *operand,
    }
}

/// Anchored sequential scan over the star-separated segments.
///
/// A `None` segment is a wildcard; consecutive wildcards collapse (the
/// first is ignored). A literal after a wildcard may land anywhere at or
/// past the scan position, a literal not after a wildcard must sit
/// exactly at it, and the final literal must end the string.
fn substring_match(string: &str, segments: &[Option<CheetahString>]) -> bool {
    let size = segments.len();
    let mut pos = 0usize;
    let mut i = 0usize;
    while i < size {
        let segment = segments[i].as_deref();
        if i + 1 < size {
            match segment {
                None => {
                    let Some(next) = segments[i + 1].as_deref() else {
                        // '**': ignore the first star
                        i += 1;
                        continue;
                    };
                    let Some(index) = string[pos..].find(next) else {
                        return false;
                    };
                    pos += index + next.len();
                    if i + 2 < size {
                        // the literal was consumed here unless it is the
                        // last segment, which still owes the end check
                        i += 1;
                    }
                }
                Some(literal) => {
                    if string[pos..].starts_with(literal) {
                        pos += literal.len();
                    } else {
                        return false;
                    }
                }
            }
        } else {
            return match segment {
                None => true,
                Some(literal) => string.ends_with(literal),
            };
        }
        i += 1;
    }
    true
}

fn compare_integer<T: FromStr + Ord>(op: &CompareOp<'_>, value: T) -> bool {
    let Some(operand) = op.operand() else {
        return false;
    };
    let Ok(parsed) = operand.trim().parse::<T>() else {
        return false;
    };
    match op {
        CompareOp::Equal(_) | CompareOp::Approx(_) => value == parsed,
        CompareOp::Greater(_) => value >= parsed,
        CompareOp::Less(_) => value <= parsed,
        CompareOp::Substring(_) => false,
    }
}

fn compare_float(op: &CompareOp<'_>, value: f32) -> bool {
    let Some(operand) = op.operand() else {
        return false;
    };
    let Ok(parsed) = operand.trim().parse::<f32>() else {
        return false;
    };
    // total order, so NaN compares equal to NaN
    match op {
        CompareOp::Equal(_) | CompareOp::Approx(_) => value.total_cmp(&parsed).is_eq(),
        CompareOp::Greater(_) => value.total_cmp(&parsed).is_ge(),
        CompareOp::Less(_) => value.total_cmp(&parsed).is_le(),
        CompareOp::Substring(_) => false,
    }
}

fn compare_double(op: &CompareOp<'_>, value: f64) -> bool {
    let Some(operand) = op.operand() else {
        return false;
    };
    let Ok(parsed) = operand.trim().parse::<f64>() else {
        return false;
    };
    match op {
        CompareOp::Equal(_) | CompareOp::Approx(_) => value.total_cmp(&parsed).is_eq(),
        CompareOp::Greater(_) => value.total_cmp(&parsed).is_ge(),
        CompareOp::Less(_) => value.total_cmp(&parsed).is_le(),
        CompareOp::Substring(_) => false,
    }
}

fn compare_character(op: &CompareOp<'_>, value: char) -> bool {
    let Some(operand) = op.operand() else {
        return false;
    };
    let Some(parsed) = operand.chars().next() else {
        return false;
    };
    match op {
        CompareOp::Equal(_) => value == parsed,
        CompareOp::Approx(_) => {
            value == parsed
                || value.to_uppercase().eq(parsed.to_uppercase())
                || value.to_lowercase().eq(parsed.to_lowercase())
        }
        CompareOp::Greater(_) => value >= parsed,
        CompareOp::Less(_) => value <= parsed,
        CompareOp::Substring(_) => false,
    }
}

fn compare_boolean(op: &CompareOp<'_>, value: bool) -> bool {
    let Some(operand) = op.operand() else {
        return false;
    };
    // lenient parse: anything but "true" is false
    let parsed = operand.trim().eq_ignore_ascii_case("true");
    match op {
        CompareOp::Equal(_) | CompareOp::Approx(_) | CompareOp::Greater(_) | CompareOp::Less(_) => {
            value == parsed
        }
        CompareOp::Substring(_) => false,
    }
}

fn compare_version(op: &CompareOp<'_>, value: &Version) -> bool {
    let Some(operand) = op.operand() else {
        return false;
    };
    let Ok(parsed) = operand.trim().parse::<Version>() else {
        return false;
    };
    match op {
        CompareOp::Equal(_) | CompareOp::Approx(_) => *value == parsed,
        CompareOp::Greater(_) => *value >= parsed,
        CompareOp::Less(_) => *value <= parsed,
        CompareOp::Substring(_) => false,
    }
}

fn compare_opaque(op: &CompareOp<'_>, value: &dyn OpaqueValue) -> bool {
    let Some(operand) = op.operand() else {
        return false;
    };
    let Some(ordering) = value.partial_compare(operand) else {
        return false;
    };
    if !value.ordered() {
        // equality is all the type supports, whatever the operator
        return ordering == Ordering::Equal;
    }
    match op {
        CompareOp::Equal(_) | CompareOp::Approx(_) => ordering == Ordering::Equal,
        CompareOp::Greater(_) => ordering != Ordering::Less,
        CompareOp::Less(_) => ordering != Ordering::Greater,
        CompareOp::Substring(_) => false,
    }
}
