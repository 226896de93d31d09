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

//! RFC 1960 LDAP filter parsing and evaluation.
//!
//! A [`Filter`] is compiled once from its string form and can then be
//! matched any number of times against property sets supplied through an
//! [`EvaluationContext`]:
//!
//! ```
//! use ldapmatch_filter::Filter;
//! use ldapmatch_filter::Properties;
//!
//! let filter = Filter::parse("(&(objectClass=Person)(cn=Babs J*))").unwrap();
//!
//! let mut props = Properties::new();
//! props.put("objectClass", "Person");
//! props.put("cn", "Babs Jensen");
//!
//! assert!(filter.matches(&props));
//! ```
//!
//! The grammar, the normalization rules and the comparison semantics follow
//! RFC 1960 (*A String Representation of LDAP Search Filters*), including
//! the traditional leniencies: `&`, `|` and `!` not followed by a
//! parenthesized list parse as ordinary attribute names, and `attr=*`
//! denotes a presence filter while `attr=\*` matches the literal `*`.

pub mod expression;
pub mod filter;

mod evaluator;
mod parser;

pub use expression::evaluation_context::CaseInsensitiveProperties;
pub use expression::evaluation_context::EvaluationContext;
pub use expression::evaluation_context::Properties;
pub use expression::filter_expression::FilterExpression;
pub use expression::property_value::OpaqueValue;
pub use expression::property_value::PropertyValue;
pub use expression::version::Version;
pub use filter::Filter;
