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
use std::str::FromStr;
use std::sync::OnceLock;

use ldapmatch_error::FilterError;
use ldapmatch_error::FilterResult;
use tracing::trace;

use crate::expression::evaluation_context::EvaluationContext;
use crate::expression::filter_expression::FilterExpression;
use crate::parser::Parser;

/// A compiled RFC 1960 filter.
///
/// Parsed once from its string form, then matched any number of times;
/// the compiled tree is immutable and can be shared across threads.
///
/// Two filters are equal iff their normalized string forms are equal, so
/// `(a~= b c)` and `( a ~=bc)` are the same filter. The normalized form
/// is computed lazily and cached.
///
/// # Example
///
/// ```
/// use ldapmatch_filter::Filter;
/// use ldapmatch_filter::Properties;
///
/// let filter = Filter::parse("(|(sn=Jensen)(cn=Babs J*))").unwrap();
///
/// let mut props = Properties::new();
/// props.put("sn", "Jensen");
/// assert!(filter.matches(&props));
/// ```
pub struct Filter {
    root: FilterExpression,
    /* normalized filter string, built on first use */
    filter_string: OnceLock<String>,
}

impl Filter {
    /// Compiles a filter string.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] describing where the string stopped
    /// conforming to the RFC 1960 grammar; no partial filter is produced.
    pub fn parse(filter: &str) -> FilterResult<Filter> {
        trace!("parsing filter string: {}", filter);
        Parser::new(filter).parse().map(Filter::from_expression)
    }

    /// Wraps an already-built expression tree.
    pub fn from_expression(root: FilterExpression) -> Filter {
        Filter {
            root,
            filter_string: OnceLock::new(),
        }
    }

    /// The compiled expression tree.
    pub fn expression(&self) -> &FilterExpression {
        &self.root
    }

    /// Consumes the filter, returning the expression tree.
    pub fn into_expression(self) -> FilterExpression {
        self.root
    }

    /// This filter's normalized filter string: whitespace which does not
    /// affect the meaning of the filter is removed.
    pub fn filter_string(&self) -> &str {
        self.filter_string.get_or_init(|| self.root.to_string())
    }

    /// Evaluates this filter against a property lookup.
    ///
    /// Whether attribute names are matched case-sensitively is decided by
    /// the context: [`crate::Properties`] looks keys up exactly,
    /// [`crate::CaseInsensitiveProperties`] folds them.
    ///
    /// Never panics and never errors; anomalies during comparison make
    /// the affected filter term false.
    pub fn matches(&self, context: &dyn EvaluationContext) -> bool {
        self.root.matches(context)
    }
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::parse(s)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filter_string())
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&self.filter_string()).finish()
    }
}

impl Clone for Filter {
    fn clone(&self) -> Self {
        Filter {
            root: self.root.clone(),
            filter_string: OnceLock::new(),
        }
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.filter_string() == other.filter_string()
    }
}

impl Eq for Filter {}

impl Hash for Filter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filter_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::evaluation_context::CaseInsensitiveProperties;
    use crate::expression::evaluation_context::Properties;

    #[test]
    fn test_parse_and_match() {
        let filter = Filter::parse("(cn=Babs Jensen)").unwrap();

        let mut props = Properties::new();
        props.put("cn", "Babs Jensen");
        assert!(filter.matches(&props));

        props.put("cn", "babs jensen");
        assert!(!filter.matches(&props));
    }

    #[test]
    fn test_from_str() {
        let filter: Filter = "(a=1)".parse().unwrap();
        assert_eq!(filter.filter_string(), "(a=1)");
        assert!("(a=1".parse::<Filter>().is_err());
    }

    #[test]
    fn test_attribute_names_fold_only_in_case_insensitive_context() {
        let filter = Filter::parse("(CN=a)").unwrap();

        let mut props = Properties::new();
        props.put("cn", "a");
        assert!(!filter.matches(&props));

        let ci = CaseInsensitiveProperties::new(props).unwrap();
        assert!(filter.matches(&ci));
    }

    #[test]
    fn test_display_is_normalized() {
        let filter = Filter::parse("( a = b )").unwrap();
        assert_eq!(filter.to_string(), "(a= b )");
        assert_eq!(format!("{filter:?}"), "Filter(\"(a= b )\")");
    }

    #[test]
    fn test_equality_and_hash_by_normalized_string() {
        use std::collections::HashSet;

        let a = Filter::parse("(x~= y z)").unwrap();
        let b = Filter::parse("( x ~=yz)").unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_clone_preserves_semantics() {
        let filter = Filter::parse("(a=*)").unwrap();
        let clone = filter.clone();
        assert_eq!(filter, clone);
        assert_eq!(filter.filter_string(), clone.filter_string());
    }

    #[test]
    fn test_missing_property_never_matches_leaf_ops() {
        let props = Properties::new();
        for f in ["(a=1)", "(a~=1)", "(a>=1)", "(a<=1)", "(a=*)", "(a=1*2)"] {
            assert!(!Filter::parse(f).unwrap().matches(&props), "{f}");
        }
        // but a NOT over a missing property does match
        assert!(Filter::parse("(!(a=1))").unwrap().matches(&props));
    }
}
