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

/// Result type for DN chain matching operations.
pub type DnResult<T> = Result<T, DnError>;

/// Low-level failures while parsing or canonicalizing a single DN, a DN
/// chain or a chain match pattern.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DnParseError {
    #[error("unterminated escape: {0}")]
    UnterminatedEscape(String),

    #[error("unterminated quote: {0}")]
    UnterminatedQuote(String),

    #[error("missing '=' in RDN: {0}")]
    MissingEquals(String),

    #[error("empty attribute type: {0}")]
    EmptyAttributeType(String),

    #[error("invalid hex value: {0}")]
    InvalidHexValue(String),

    #[error("improperly terminated DN: {0}")]
    ImproperlyTerminatedDn(String),

    #[error("invalid wildcard prefix")]
    InvalidWildcardPrefix,

    #[error("empty pattern")]
    EmptyPattern,

    #[error("empty DN chain")]
    EmptyChain,
}

/// Errors surfaced by DN chain matching, wrapping the underlying parse
/// failure with the input it occurred in.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DnError {
    #[error("Invalid DN chain: {chain}")]
    InvalidChain {
        chain: String,
        #[source]
        source: DnParseError,
    },

    #[error("Invalid match pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: DnParseError,
    },
}

impl DnError {
    pub fn invalid_chain(chain: impl Into<String>, source: DnParseError) -> Self {
        DnError::InvalidChain {
            chain: chain.into(),
            source,
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, source: DnParseError) -> Self {
        DnError::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// The underlying parse failure.
    pub fn parse_error(&self) -> &DnParseError {
        match self {
            DnError::InvalidChain { source, .. } | DnError::InvalidPattern { source, .. } => source,
        }
    }
}
