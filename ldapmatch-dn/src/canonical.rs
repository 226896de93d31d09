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

//! RFC 2253 distinguished name parsing and canonical form.
//!
//! Matching compares canonical component strings for equality, so both
//! the chain DNs and the pattern DNs go through the same normalization:
//!
//! - attribute types lowercased, whitespace around `,`, `+` and `=`
//!   dropped;
//! - values unescaped, trimmed of unescaped outer whitespace, internal
//!   whitespace runs collapsed to one space, lowercased, then minimally
//!   re-escaped;
//! - quoted values lose their quotes (the content keeps its whitespace);
//! - `#hex` values keep their form with the digits lowercased;
//! - multi-valued RDNs are sorted so AVA order cannot defeat a match.
//!
//! `cn = Bugs  Bunny, o = ACME` and `CN=bugs bunny,O=acme` canonicalize
//! identically.

use ldapmatch_error::DnParseError;

/// One value character plus whether it is protected from whitespace
/// normalization (escaped or quoted in the source).
type ValueChar = (char, bool);

/// Returns the canonical string form of one distinguished name.
///
/// The empty string is a valid (empty) DN.
pub fn canonicalize(dn: &str) -> Result<String, DnParseError> {
    let rdns = canonical_rdns(dn)?;
    Ok(rdns
        .iter()
        .map(|rdn| rdn.join("+"))
        .collect::<Vec<_>>()
        .join(","))
}

/// Parses a DN into its canonical RDNs, each RDN a list of canonical
/// `type=value` component strings.
pub(crate) fn canonical_rdns(dn: &str) -> Result<Vec<Vec<String>>, DnParseError> {
    let chars: Vec<char> = dn.chars().collect();
    let mut pos = 0usize;
    let mut rdns: Vec<Vec<String>> = Vec::new();
    let mut avas: Vec<String> = Vec::new();

    skip_spaces(&chars, &mut pos);
    if pos == chars.len() {
        return Ok(rdns);
    }

    loop {
        let (ava, terminator) = parse_ava(&chars, &mut pos, dn)?;
        avas.push(ava);
        match terminator {
            Some('+') => {
                if pos == chars.len() {
                    return Err(DnParseError::ImproperlyTerminatedDn(dn.to_string()));
                }
            }
            Some(_) => {
                // ',' or ';' closes the RDN; another must follow
                avas.sort_unstable();
                rdns.push(std::mem::take(&mut avas));
                if pos == chars.len() {
                    return Err(DnParseError::ImproperlyTerminatedDn(dn.to_string()));
                }
            }
            None => {
                avas.sort_unstable();
                rdns.push(avas);
                return Ok(rdns);
            }
        }
    }
}

/// Parses one `type=value` pair starting at `pos`, leaving `pos` just
/// past the terminating separator. Returns the canonical component and
/// the separator (`'+'`, `','`/`';'`, or `None` at end of input).
fn parse_ava(
    chars: &[char],
    pos: &mut usize,
    dn: &str,
) -> Result<(String, Option<char>), DnParseError> {
    skip_spaces(chars, pos);

    // attribute type, up to '='
    let type_start = *pos;
    loop {
        match chars.get(*pos) {
            Some('=') => break,
            Some(',' | '+' | ';') | None => {
                return Err(DnParseError::MissingEquals(dn.to_string()));
            }
            Some(_) => *pos += 1,
        }
    }
    let attr_type: String = chars[type_start..*pos]
        .iter()
        .collect::<String>()
        .trim()
        .to_lowercase();
    if attr_type.is_empty() {
        return Err(DnParseError::EmptyAttributeType(dn.to_string()));
    }
    *pos += 1; // consume '='

    skip_spaces(chars, pos);

    let (value, terminator) = match chars.get(*pos) {
        Some('#') => parse_hex_value(chars, pos, dn)?,
        Some('"') => parse_quoted_value(chars, pos, dn)?,
        _ => parse_plain_value(chars, pos, dn)?,
    };

    Ok((format!("{attr_type}={value}"), terminator))
}

fn parse_plain_value(
    chars: &[char],
    pos: &mut usize,
    dn: &str,
) -> Result<(String, Option<char>), DnParseError> {
    let mut value: Vec<ValueChar> = Vec::new();
    let terminator = loop {
        match chars.get(*pos) {
            None => break None,
            Some(c @ (',' | '+' | ';')) => {
                let sep = *c;
                *pos += 1;
                break Some(sep);
            }
            Some('\\') => {
                *pos += 1;
                let Some(escaped) = chars.get(*pos) else {
                    return Err(DnParseError::UnterminatedEscape(dn.to_string()));
                };
                value.push((*escaped, true));
                *pos += 1;
            }
            Some(c) => {
                value.push((*c, false));
                *pos += 1;
            }
        }
    };
    Ok((normalize_value(&value), terminator))
}

fn parse_quoted_value(
    chars: &[char],
    pos: &mut usize,
    dn: &str,
) -> Result<(String, Option<char>), DnParseError> {
    *pos += 1; // consume opening '"'
    let mut value: Vec<ValueChar> = Vec::new();
    loop {
        match chars.get(*pos) {
            None => return Err(DnParseError::UnterminatedQuote(dn.to_string())),
            Some('"') => {
                *pos += 1;
                break;
            }
            Some('\\') => {
                *pos += 1;
                let Some(escaped) = chars.get(*pos) else {
                    return Err(DnParseError::UnterminatedQuote(dn.to_string()));
                };
                value.push((*escaped, true));
                *pos += 1;
            }
            Some(c) => {
                // quoted content is protected from whitespace trimming
                value.push((*c, true));
                *pos += 1;
            }
        }
    }
    let terminator = expect_separator(chars, pos)
        .map_err(|_| DnParseError::ImproperlyTerminatedDn(dn.to_string()))?;
    Ok((normalize_value(&value), terminator))
}

fn parse_hex_value(
    chars: &[char],
    pos: &mut usize,
    dn: &str,
) -> Result<(String, Option<char>), DnParseError> {
    *pos += 1; // consume '#'
    let digit_start = *pos;
    while chars.get(*pos).is_some_and(|c| c.is_ascii_hexdigit()) {
        *pos += 1;
    }
    let digits = *pos - digit_start;
    if digits == 0 || digits % 2 != 0 {
        return Err(DnParseError::InvalidHexValue(dn.to_string()));
    }
    let value: String = std::iter::once('#')
        .chain(chars[digit_start..*pos].iter().map(|c| c.to_ascii_lowercase()))
        .collect();
    let terminator =
        expect_separator(chars, pos).map_err(|_| DnParseError::InvalidHexValue(dn.to_string()))?;
    Ok((value, terminator))
}

/// After a self-delimiting value only spaces may precede the separator
/// or the end of the DN.
fn expect_separator(chars: &[char], pos: &mut usize) -> Result<Option<char>, ()> {
    skip_spaces(chars, pos);
    match chars.get(*pos) {
        None => Ok(None),
        Some(c @ (',' | '+' | ';')) => {
            let sep = *c;
            *pos += 1;
            Ok(Some(sep))
        }
        Some(_) => Err(()),
    }
}

/// Trims unprotected outer whitespace, collapses unprotected internal
/// whitespace runs, lowercases, and re-escapes the characters that need
/// it in the emitted form.
fn normalize_value(value: &[ValueChar]) -> String {
    let start = value
        .iter()
        .position(|(c, protected)| *protected || !c.is_whitespace())
        .unwrap_or(value.len());
    let end = value
        .iter()
        .rposition(|(c, protected)| *protected || !c.is_whitespace())
        .map_or(start, |i| i + 1);

    let mut folded = String::new();
    let mut pending_space = false;
    for (c, protected) in &value[start..end] {
        if !*protected && c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            folded.push(' ');
            pending_space = false;
        }
        if *protected && c.is_whitespace() {
            folded.push(' ');
        } else {
            for lower in c.to_lowercase() {
                folded.push(lower);
            }
        }
    }

    let mut escaped = String::with_capacity(folded.len());
    let last = folded.chars().count().saturating_sub(1);
    for (i, c) in folded.chars().enumerate() {
        let needs_escape = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';')
            || (i == 0 && matches!(c, '#' | ' '))
            || (i == last && c == ' ');
        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn skip_spaces(chars: &[char], pos: &mut usize) {
    while chars.get(*pos).is_some_and(|c| *c == ' ') {
        *pos += 1;
    }
}
