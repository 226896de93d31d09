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

/// Result type for filter parsing and context construction.
pub type FilterResult<T> = Result<T, FilterError>;

/// Error types for RFC 1960 filter operations.
///
/// Every parse-time variant carries the complete filter string that was
/// being parsed and, where the failure has a position, the remaining
/// substring starting at that position.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Missing '(': {remaining}")]
    MissingOpenParen { filter: String, remaining: String },

    #[error("Missing ')': {remaining}")]
    MissingCloseParen { filter: String, remaining: String },

    #[error("Missing attr: {remaining}")]
    MissingAttribute { filter: String, remaining: String },

    #[error("Missing value: {remaining}")]
    MissingValue { filter: String, remaining: String },

    #[error("Invalid operator: {remaining}")]
    InvalidOperator { filter: String, remaining: String },

    #[error("Invalid value: {remaining}")]
    InvalidValue { filter: String, remaining: String },

    #[error("Extraneous trailing characters: {remaining}")]
    TrailingCharacters { filter: String, remaining: String },

    #[error("Filter ended abruptly")]
    EndedAbruptly { filter: String },

    #[error("case variants of the same key name: {key}")]
    AmbiguousKey { key: String },
}

impl FilterError {
    pub fn missing_open_paren(filter: impl Into<String>, remaining: impl Into<String>) -> Self {
        FilterError::MissingOpenParen {
            filter: filter.into(),
            remaining: remaining.into(),
        }
    }

    pub fn missing_close_paren(filter: impl Into<String>, remaining: impl Into<String>) -> Self {
        FilterError::MissingCloseParen {
            filter: filter.into(),
            remaining: remaining.into(),
        }
    }

    pub fn missing_attribute(filter: impl Into<String>, remaining: impl Into<String>) -> Self {
        FilterError::MissingAttribute {
            filter: filter.into(),
            remaining: remaining.into(),
        }
    }

    pub fn missing_value(filter: impl Into<String>, remaining: impl Into<String>) -> Self {
        FilterError::MissingValue {
            filter: filter.into(),
            remaining: remaining.into(),
        }
    }

    pub fn invalid_operator(filter: impl Into<String>, remaining: impl Into<String>) -> Self {
        FilterError::InvalidOperator {
            filter: filter.into(),
            remaining: remaining.into(),
        }
    }

    pub fn invalid_value(filter: impl Into<String>, remaining: impl Into<String>) -> Self {
        FilterError::InvalidValue {
            filter: filter.into(),
            remaining: remaining.into(),
        }
    }

    pub fn trailing_characters(filter: impl Into<String>, remaining: impl Into<String>) -> Self {
        FilterError::TrailingCharacters {
            filter: filter.into(),
            remaining: remaining.into(),
        }
    }

    pub fn ended_abruptly(filter: impl Into<String>) -> Self {
        FilterError::EndedAbruptly {
            filter: filter.into(),
        }
    }

    pub fn ambiguous_key(key: impl Into<String>) -> Self {
        FilterError::AmbiguousKey { key: key.into() }
    }

    /// The complete filter string that failed to parse, if this error was
    /// raised by the parser.
    pub fn filter_string(&self) -> Option<&str> {
        match self {
            FilterError::MissingOpenParen { filter, .. }
            | FilterError::MissingCloseParen { filter, .. }
            | FilterError::MissingAttribute { filter, .. }
            | FilterError::MissingValue { filter, .. }
            | FilterError::InvalidOperator { filter, .. }
            | FilterError::InvalidValue { filter, .. }
            | FilterError::TrailingCharacters { filter, .. }
            | FilterError::EndedAbruptly { filter } => Some(filter),
            FilterError::AmbiguousKey { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_messages() {
        let err = FilterError::missing_open_paren("cn=a)", "cn=a)");
        assert_eq!(err.to_string(), "Missing '(': cn=a)");

        let err = FilterError::missing_close_paren("(cn=a", "");
        assert_eq!(err.to_string(), "Missing ')': ");

        let err = FilterError::missing_attribute("(=a)", "=a)");
        assert_eq!(err.to_string(), "Missing attr: =a)");

        let err = FilterError::missing_value("(a>=)", ")");
        assert_eq!(err.to_string(), "Missing value: )");

        let err = FilterError::invalid_operator("(a!b)", "!b)");
        assert_eq!(err.to_string(), "Invalid operator: !b)");

        let err = FilterError::invalid_value("(a=(b)", "(b)");
        assert_eq!(err.to_string(), "Invalid value: (b)");

        let err = FilterError::trailing_characters("(a=b)x", "x");
        assert_eq!(err.to_string(), "Extraneous trailing characters: x");

        let err = FilterError::ended_abruptly("(a=b");
        assert_eq!(err.to_string(), "Filter ended abruptly");

        let err = FilterError::ambiguous_key("CN");
        assert_eq!(err.to_string(), "case variants of the same key name: CN");
    }

    #[test]
    fn test_filter_string_accessor() {
        let err = FilterError::ended_abruptly("(a=b");
        assert_eq!(err.filter_string(), Some("(a=b"));

        let err = FilterError::ambiguous_key("CN");
        assert_eq!(err.filter_string(), None);
    }
}
