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

//! Recursive matching of a DN chain against a chain pattern.
//!
//! The walk runs from the least significant end of both sequences. `*`
//! branches between consuming zero and one chain DN, `-` tries every
//! remaining consumption count; each recursive branch strictly advances
//! at least one index, so the search is bounded and polynomial in the
//! chain length.

use ldapmatch_error::DnResult;
use tracing::trace;

use crate::chain::DnChain;
use crate::chain::DnChainPattern;
use crate::chain::DnPattern;
use crate::chain::ParsedDn;
use crate::chain::PatternEntry;
use crate::chain::Rdn;

/// Wildcard token accepted for an RDN component value, e.g. `cn=*`.
const VALUE_WILDCARD: &str = "=*";
/// The same wildcard after hex canonicalization of the string `*`.
const VALUE_WILDCARD_HEX: &str = "=#16012a";

impl DnChainPattern {
    /// Matches a parsed chain against this pattern.
    pub fn matches(&self, chain: &DnChain) -> bool {
        dn_chain_match(chain.dns(), 0, self.entries(), 0)
    }
}

/// Matches a DN chain against a chain pattern, parsing both.
///
/// The chain is given least significant DN first, each element in RFC
/// 2253 format.
///
/// # Errors
///
/// An unparsable chain or pattern yields a [`ldapmatch_error::DnError`]
/// wrapping the underlying failure; a well-formed non-match is `Ok(false)`.
///
/// # Example
///
/// ```
/// use ldapmatch_dn::match_distinguished_name_chain;
///
/// let chain = ["cn=me,c=US", "cn=you"];
/// assert!(match_distinguished_name_chain("cn=me,c=US;*;cn=you", &chain).unwrap());
/// ```
pub fn match_distinguished_name_chain<S: AsRef<str>>(
    pattern: &str,
    chain: &[S],
) -> DnResult<bool> {
    trace!("matching DN chain against pattern: {}", pattern);
    let parsed_chain = DnChain::parse(chain)?;
    let parsed_pattern = DnChainPattern::parse(pattern)?;
    Ok(parsed_pattern.matches(&parsed_chain))
}

/// Check the name/value components of an RDN against a pattern RDN.
fn rdn_match(rdn: &Rdn, pattern: &Rdn) -> bool {
    if rdn.len() != pattern.len() {
        return false;
    }
    for (component, pattern_component) in rdn.iter().zip(pattern) {
        let (Some(name_end), Some(pattern_name_end)) =
            (component.find('='), pattern_component.find('='))
        else {
            return false;
        };
        if name_end != pattern_name_end || component[..name_end] != pattern_component[..name_end] {
            return false;
        }
        let value = &component[name_end..];
        let pattern_value = &pattern_component[pattern_name_end..];
        if value != pattern_value
            && pattern_value != VALUE_WILDCARD
            && pattern_value != VALUE_WILDCARD_HEX
        {
            return false;
        }
    }
    true
}

/// Check one chain DN against one concrete pattern DN. A prefix pattern
/// matches against the trailing RDNs of a longer DN; otherwise the RDN
/// counts must be equal.
fn dn_match(dn: &ParsedDn, pattern: &DnPattern) -> bool {
    if pattern.rdns.is_empty() && !pattern.prefix {
        return false;
    }
    let pattern_len = pattern.rdns.len();
    let dn_start = if dn.len() < pattern_len {
        return false;
    } else if dn.len() > pattern_len {
        if !pattern.prefix {
            return false;
        }
        dn.len() - pattern_len
    } else {
        0
    };
    pattern
        .rdns
        .iter()
        .enumerate()
        .all(|(i, p)| rdn_match(&dn[dn_start + i], p))
}

/// Index of the first non-wildcard pattern entry at or after `index`, or
/// the end of the pattern.
fn skip_wildcards(entries: &[PatternEntry], mut index: usize) -> usize {
    while matches!(
        entries.get(index),
        Some(PatternEntry::Any | PatternEntry::AnyRun)
    ) {
        index += 1;
    }
    index
}

fn dn_chain_match(
    chain: &[ParsedDn],
    chain_index: usize,
    entries: &[PatternEntry],
    pattern_index: usize,
) -> bool {
    if chain_index >= chain.len() {
        return false;
    }
    if pattern_index >= entries.len() {
        return false;
    }

    match &entries[pattern_index] {
        PatternEntry::Any => {
            let next = pattern_index + 1;
            if next >= entries.len() {
                // a trailing '*' allows at most one remaining DN
                return chain.len() - 1 == chain_index;
            }
            // zero-or-one: match in place, or consume one chain DN
            dn_chain_match(chain, chain_index, entries, next)
                || dn_chain_match(chain, chain_index + 1, entries, next)
        }
        PatternEntry::AnyRun => {
            let next = skip_wildcards(entries, pattern_index);
            if next >= entries.len() {
                // a trailing '-' swallows the rest of the chain
                return true;
            }
            // zero-or-more: try every remaining starting position
            (chain_index..chain.len()).any(|i| dn_chain_match(chain, i, entries, next))
        }
        PatternEntry::Dn(_) => {
            let mut chain_index = chain_index;
            let mut pattern_index = pattern_index;
            loop {
                let pattern = match &entries[pattern_index] {
                    PatternEntry::Dn(pattern) => pattern,
                    // a wildcard mid-walk restarts the branching search
                    PatternEntry::Any | PatternEntry::AnyRun => {
                        return dn_chain_match(chain, chain_index, entries, pattern_index);
                    }
                };
                if !dn_match(&chain[chain_index], pattern) {
                    return false;
                }
                chain_index += 1;
                pattern_index += 1;
                // both exhausted: everything matched
                if chain_index >= chain.len() && pattern_index >= entries.len() {
                    return true;
                }
                // chain exhausted: the rest of the pattern must be all
                // wildcards (trailing wildcards are optional)
                if chain_index >= chain.len() {
                    return skip_wildcards(entries, pattern_index) >= entries.len();
                }
                // pattern exhausted with chain left over: mismatch
                if pattern_index >= entries.len() {
                    return false;
                }
            }
        }
    }
}
