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

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use cheetah_string::CheetahString;

use crate::evaluator;
use crate::evaluator::CompareOp;
use crate::expression::evaluation_context::EvaluationContext;

/// One node of a compiled RFC 1960 filter.
///
/// The tree is immutable after construction and carries no external
/// references, so it can be shared and evaluated concurrently without
/// synchronization.
///
/// In a substring node, a `None` segment stands for the `*` wildcard; the
/// parser never produces empty literal segments.
#[derive(Debug, Clone)]
pub enum FilterExpression {
    /// `(&(..)(..))`: true iff every child matches. An empty operand list
    /// is vacuously true.
    And(Vec<FilterExpression>),
    /// `(|(..)(..))`: true iff any child matches. An empty operand list is
    /// false.
    Or(Vec<FilterExpression>),
    /// `(!(..))`
    Not(Box<FilterExpression>),
    /// `(attr=value)`
    Equal {
        attr: CheetahString,
        value: CheetahString,
    },
    /// `(attr~=value)`, case and whitespace insensitive.
    Approx {
        attr: CheetahString,
        value: CheetahString,
    },
    /// `(attr>=value)`, inclusive.
    Greater {
        attr: CheetahString,
        value: CheetahString,
    },
    /// `(attr<=value)`, inclusive.
    Less {
        attr: CheetahString,
        value: CheetahString,
    },
    /// `(attr=*)`
    Present { attr: CheetahString },
    /// `(attr=initial*any*final)`
    Substring {
        attr: CheetahString,
        segments: Vec<Option<CheetahString>>,
    },
}

impl FilterExpression {
    /// Evaluates this expression against the given property lookup.
    ///
    /// Never panics and never errors: a missing property, an unparsable
    /// operand or a type mismatch makes the affected comparison false
    /// rather than aborting the evaluation.
    pub fn matches(&self, context: &dyn EvaluationContext) -> bool {
        match self {
            FilterExpression::And(children) => children.iter().all(|c| c.matches(context)),
            FilterExpression::Or(children) => children.iter().any(|c| c.matches(context)),
            FilterExpression::Not(child) => !child.matches(context),
            FilterExpression::Present { attr } => context.get(attr).is_some(),
            FilterExpression::Equal { attr, value } => match context.get(attr) {
                Some(prop) => evaluator::compare(&CompareOp::Equal(value), prop),
                None => false,
            },
            FilterExpression::Approx { attr, value } => match context.get(attr) {
                Some(prop) => evaluator::compare(&CompareOp::Approx(value), prop),
                None => false,
            },
            FilterExpression::Greater { attr, value } => match context.get(attr) {
                Some(prop) => evaluator::compare(&CompareOp::Greater(value), prop),
                None => false,
            },
            FilterExpression::Less { attr, value } => match context.get(attr) {
                Some(prop) => evaluator::compare(&CompareOp::Less(value), prop),
                None => false,
            },
            FilterExpression::Substring { attr, segments } => match context.get(attr) {
                Some(prop) => evaluator::compare(&CompareOp::Substring(segments), prop),
                None => false,
            },
        }
    }
}

/// Escape `(`, `)`, `*` and `\` in a value for the normalized string form.
pub(crate) fn encode_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '(' | ')' | '*' | '\\') {
            encoded.push('\\');
        }
        encoded.push(c);
    }
    encoded
}

/// Map a string for an APPROX (`~=`) comparison by removing all
/// whitespace. Case folding happens at comparison time.
pub(crate) fn approx_string(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

impl fmt::Display for FilterExpression {
    /// Writes the normalized filter string: whitespace that does not affect
    /// the meaning of the filter is removed and value characters are
    /// re-escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        match self {
            FilterExpression::And(children) => {
                write!(f, "&")?;
                for child in children {
                    write!(f, "{child}")?;
                }
            }
            FilterExpression::Or(children) => {
                write!(f, "|")?;
                for child in children {
                    write!(f, "{child}")?;
                }
            }
            FilterExpression::Not(child) => {
                write!(f, "!{child}")?;
            }
            FilterExpression::Equal { attr, value } => {
                write!(f, "{attr}={}", encode_value(value))?;
            }
            FilterExpression::Approx { attr, value } => {
                write!(f, "{attr}~={}", encode_value(&approx_string(value)))?;
            }
            FilterExpression::Greater { attr, value } => {
                write!(f, "{attr}>={}", encode_value(value))?;
            }
            FilterExpression::Less { attr, value } => {
                write!(f, "{attr}<={}", encode_value(value))?;
            }
            FilterExpression::Present { attr } => {
                write!(f, "{attr}=*")?;
            }
            FilterExpression::Substring { attr, segments } => {
                write!(f, "{attr}=")?;
                for segment in segments {
                    match segment {
                        Some(literal) => write!(f, "{}", encode_value(literal))?,
                        None => write!(f, "*")?,
                    }
                }
            }
        }
        write!(f, ")")
    }
}

/// Equality is defined over the normalized string form, not structurally:
/// `(a~= b c)` and `(a~=bc)` compile to equal expressions.
impl PartialEq for FilterExpression {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for FilterExpression {}

impl Hash for FilterExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(filter: &str) -> FilterExpression {
        crate::filter::Filter::parse(filter).unwrap().into_expression()
    }

    #[test]
    fn test_normalize_removes_whitespace_outside_values() {
        assert_eq!(expr("( cn =Babs Jensen)").to_string(), "(cn=Babs Jensen)");
        assert_eq!(
            expr("(& (a=1) (b=2))").to_string(),
            "(&(a=1)(b=2))"
        );
    }

    #[test]
    fn test_normalize_reescapes_value_characters() {
        assert_eq!(expr("(cn=\\*)").to_string(), "(cn=\\*)");
        assert_eq!(expr("(cn=a\\(b\\)c)").to_string(), "(cn=a\\(b\\)c)");
        assert_eq!(expr("(cn=a\\\\b)").to_string(), "(cn=a\\\\b)");
    }

    #[test]
    fn test_normalize_substring_segments() {
        assert_eq!(expr("(o=univ*of*mich*)").to_string(), "(o=univ*of*mich*)");
        assert_eq!(expr("(o=*a*)").to_string(), "(o=*a*)");
    }

    #[test]
    fn test_normalize_approx_strips_value_whitespace() {
        assert_eq!(expr("(cn~=Babs Jensen)").to_string(), "(cn~=BabsJensen)");
    }

    #[test]
    fn test_present_versus_escaped_star_shape() {
        let present = expr("(cn=*)");
        let literal = expr("(cn=\\*)");
        assert!(matches!(present, FilterExpression::Present { .. }));
        assert!(matches!(literal, FilterExpression::Equal { .. }));
        assert_ne!(present, literal);
    }

    #[test]
    fn test_equality_is_normalized_not_structural() {
        assert_eq!(expr("(a~= b c)"), expr("(a~=bc)"));
        assert_eq!(expr("( a =b)"), expr("(a=b)"));
        assert_ne!(expr("(a=b)"), expr("(a=c)"));
    }

    #[test]
    fn test_hash_follows_equality() {
        use std::collections::hash_map::DefaultHasher;

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        expr("(a~= b c)").hash(&mut h1);
        expr("(a~=bc)").hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_empty_and_or_evaluation() {
        use crate::expression::evaluation_context::Properties;

        let props = Properties::new();
        assert!(FilterExpression::And(Vec::new()).matches(&props));
        assert!(!FilterExpression::Or(Vec::new()).matches(&props));
    }
}
