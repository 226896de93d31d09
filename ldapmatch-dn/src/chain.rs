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

//! Parsed DN chains and chain match patterns.

use ldapmatch_error::DnError;
use ldapmatch_error::DnParseError;
use ldapmatch_error::DnResult;

use crate::canonical::canonical_rdns;

/// One RDN: the canonical `type=value` strings of its AVAs.
pub(crate) type Rdn = Vec<String>;

/// One DN: its RDNs in significance order, least significant first.
pub(crate) type ParsedDn = Vec<Rdn>;

/// One non-wildcard pattern slot. With `prefix` set (written `*,` in the
/// source) any number of leading RDNs of the candidate DN are skipped and
/// only its trailing RDNs must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DnPattern {
    pub(crate) prefix: bool,
    pub(crate) rdns: Vec<Rdn>,
}

/// One slot of a chain pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PatternEntry {
    /// `*`: matches zero or one DN of the chain.
    Any,
    /// `-`: matches zero or more DNs of the chain.
    AnyRun,
    /// A concrete DN pattern.
    Dn(DnPattern),
}

/// A parsed, canonicalized DN chain. Always holds at least one DN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnChain {
    dns: Vec<ParsedDn>,
}

impl DnChain {
    /// Parses and canonicalizes a chain of DN strings, least significant
    /// DN first.
    ///
    /// # Errors
    ///
    /// An empty chain or any unparsable DN yields
    /// [`DnError::InvalidChain`] carrying the joined chain and the
    /// underlying failure.
    pub fn parse<S: AsRef<str>>(chain: &[S]) -> DnResult<Self> {
        Self::parse_inner(chain).map_err(|e| DnError::invalid_chain(join_chain(chain), e))
    }

    fn parse_inner<S: AsRef<str>>(chain: &[S]) -> Result<Self, DnParseError> {
        let mut dns = Vec::with_capacity(chain.len());
        for dn in chain {
            dns.push(canonical_rdns(dn.as_ref())?);
        }
        if dns.is_empty() {
            return Err(DnParseError::EmptyChain);
        }
        Ok(Self { dns })
    }

    pub fn len(&self) -> usize {
        self.dns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dns.is_empty()
    }

    pub(crate) fn dns(&self) -> &[ParsedDn] {
        &self.dns
    }
}

/// A parsed DN chain match pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnChainPattern {
    entries: Vec<PatternEntry>,
}

impl DnChainPattern {
    /// Parses a semicolon-separated chain pattern.
    ///
    /// Semicolons inside quoted segments do not split, and `\` escapes
    /// the following character. Each resulting entry is either a bare
    /// wildcard (`*` or `-`), a DN prefixed with `*,`, or a plain DN.
    ///
    /// # Errors
    ///
    /// Empty patterns, trailing semicolons, unterminated escapes, a `*`
    /// prefix not followed by `,`, and unparsable DNs all yield
    /// [`DnError::InvalidPattern`] carrying the pattern and the
    /// underlying failure.
    pub fn parse(pattern: &str) -> DnResult<Self> {
        Self::parse_inner(pattern).map_err(|e| DnError::invalid_pattern(pattern, e))
    }

    fn parse_inner(pattern: &str) -> Result<Self, DnParseError> {
        let mut entries = Vec::new();
        for raw in split_pattern(pattern)? {
            entries.push(parse_entry(&raw)?);
        }
        Ok(Self { entries })
    }

    pub(crate) fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }
}

/// Splits a pattern on top-level semicolons, honoring quotes and escapes
/// and trimming spaces around each entry. A pattern that is empty or
/// ends with a semicolon is malformed.
fn split_pattern(pattern: &str) -> Result<Vec<String>, DnParseError> {
    let chars: Vec<char> = pattern.chars().collect();
    let length = chars.len();
    let mut entries = Vec::new();

    // start with a semicolon so an entirely empty pattern is caught by
    // the trailing-semicolon check below
    let mut last = ';';
    let mut start = skip_spaces(&chars, 0);
    while start < length {
        let mut cursor = start;
        let mut end = start;
        let mut in_quote = false;
        while cursor < length {
            let c = chars[cursor];
            last = c;
            match c {
                '"' => in_quote = !in_quote,
                '\\' => {
                    cursor += 1; // skip the escaped char
                    if cursor == length {
                        return Err(DnParseError::UnterminatedEscape(pattern.to_string()));
                    }
                }
                ';' if !in_quote => break,
                _ => {}
            }
            if c != ' ' {
                // ignore trailing whitespace
                end = cursor + 1;
            }
            cursor += 1;
        }
        entries.push(chars[start..end].iter().collect());
        start = skip_spaces(&chars, cursor + 1);
    }
    if last == ';' {
        // last non-whitespace character was a semicolon, or the whole
        // pattern was blank
        return Err(DnParseError::EmptyPattern);
    }
    Ok(entries)
}

fn parse_entry(entry: &str) -> Result<PatternEntry, DnParseError> {
    if entry.is_empty() {
        return Err(DnParseError::EmptyPattern);
    }
    if entry == "*" {
        return Ok(PatternEntry::Any);
    }
    if entry == "-" {
        return Ok(PatternEntry::AnyRun);
    }

    let chars: Vec<char> = entry.chars().collect();
    if chars.first() == Some(&'*') {
        let index = skip_spaces(&chars, 1);
        if chars.get(index) != Some(&',') {
            return Err(DnParseError::InvalidWildcardPrefix);
        }
        let rest: String = chars[index + 1..].iter().collect();
        return Ok(PatternEntry::Dn(DnPattern {
            prefix: true,
            rdns: canonical_rdns(&rest)?,
        }));
    }

    Ok(PatternEntry::Dn(DnPattern {
        prefix: false,
        rdns: canonical_rdns(entry)?,
    }))
}

fn skip_spaces(chars: &[char], mut index: usize) -> usize {
    while chars.get(index) == Some(&' ') {
        index += 1;
    }
    index
}

pub(crate) fn join_chain<S: AsRef<str>>(chain: &[S]) -> String {
    chain
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_parse_canonicalizes() {
        let chain = DnChain::parse(&["cn = Bugs Bunny , o=ACME, c=US"]).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(
            chain.dns()[0],
            vec![
                vec!["cn=bugs bunny".to_string()],
                vec!["o=acme".to_string()],
                vec!["c=us".to_string()],
            ]
        );
    }

    #[test]
    fn test_empty_chain_is_rejected() {
        let err = DnChain::parse::<&str>(&[]).unwrap_err();
        assert!(matches!(err, DnError::InvalidChain { .. }));
        assert_eq!(err.parse_error(), &DnParseError::EmptyChain);
    }

    #[test]
    fn test_chain_error_carries_joined_chain() {
        let err = DnChain::parse(&["cn=a", "no equals"]).unwrap_err();
        match err {
            DnError::InvalidChain { chain, .. } => assert_eq!(chain, "cn=a; no equals"),
            other => panic!("expected InvalidChain, got {other:?}"),
        }
    }

    #[test]
    fn test_pattern_entries() {
        let pattern = DnChainPattern::parse("-; *, o=Tweety Inc., c=US").unwrap();
        let entries = pattern.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], PatternEntry::AnyRun);
        match &entries[1] {
            PatternEntry::Dn(dp) => {
                assert!(dp.prefix);
                assert_eq!(
                    dp.rdns,
                    vec![
                        vec!["o=tweety inc.".to_string()],
                        vec!["c=us".to_string()],
                    ]
                );
            }
            other => panic!("expected Dn entry, got {other:?}"),
        }
    }

    #[test]
    fn test_star_entry_and_plain_entry() {
        let pattern = DnChainPattern::parse("*; cn=you").unwrap();
        assert_eq!(pattern.entries()[0], PatternEntry::Any);
        assert!(matches!(&pattern.entries()[1], PatternEntry::Dn(dp) if !dp.prefix));
    }

    #[test]
    fn test_quoted_semicolon_does_not_split() {
        let pattern = DnChainPattern::parse("cn=\"a;b\", c=US").unwrap();
        assert_eq!(pattern.entries().len(), 1);
    }

    #[test]
    fn test_empty_pattern_is_rejected() {
        for malformed in ["", "   ", "cn=a;", "cn=a; ", ";cn=a"] {
            let err = DnChainPattern::parse(malformed).unwrap_err();
            assert_eq!(err.parse_error(), &DnParseError::EmptyPattern, "{malformed:?}");
        }
    }

    #[test]
    fn test_unterminated_escape_in_pattern() {
        let err = DnChainPattern::parse("cn=a\\").unwrap_err();
        assert!(matches!(
            err.parse_error(),
            DnParseError::UnterminatedEscape(_)
        ));
    }

    #[test]
    fn test_invalid_wildcard_prefix() {
        let err = DnChainPattern::parse("*x, o=ACME").unwrap_err();
        assert_eq!(err.parse_error(), &DnParseError::InvalidWildcardPrefix);
        let err = DnChainPattern::parse("* o=ACME").unwrap_err();
        assert_eq!(err.parse_error(), &DnParseError::InvalidWildcardPrefix);
    }

    #[test]
    fn test_entry_spacing_is_trimmed() {
        let pattern = DnChainPattern::parse("  cn=me , c=US  ;  cn=you  ").unwrap();
        assert_eq!(pattern.entries().len(), 2);
        match &pattern.entries()[0] {
            PatternEntry::Dn(dp) => {
                assert_eq!(
                    dp.rdns,
                    vec![vec!["cn=me".to_string()], vec!["c=us".to_string()]]
                );
            }
            other => panic!("expected Dn entry, got {other:?}"),
        }
    }
}
