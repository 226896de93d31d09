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

//! Recursive-descent parser for the RFC 1960 filter grammar.
//!
//! ```text
//! filter     ::= '(' filtercomp ')'
//! filtercomp ::= and | or | not | item
//! and        ::= '&' filterlist
//! or         ::= '|' filterlist
//! not        ::= '!' filter
//! filterlist ::= filter | filter filterlist
//! item       ::= simple | present | substring
//! ```
//!
//! One character of lookahead over an explicit cursor. Two places
//! deliberately backtrack by restoring a saved cursor: `&`/`|`/`!` not
//! followed by `(` re-parse as an item whose attribute name starts with
//! that character, and `=*` not followed by `)` re-parses as a substring
//! value starting with a wildcard.

use cheetah_string::CheetahString;
use ldapmatch_error::FilterError;
use ldapmatch_error::FilterResult;

use crate::expression::filter_expression::FilterExpression;

/// Outcome of parsing the value side of an `=` item.
enum SubstringValue {
    /// No wildcard stars: a plain EQUAL value.
    Literal(CheetahString),
    /// Star-separated segments; `None` entries are wildcards.
    Segments(Vec<Option<CheetahString>>),
}

/// One parse call owns one parser; the cursor is never shared.
pub(crate) struct Parser {
    filter_string: String,
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    pub(crate) fn new(filter_string: &str) -> Self {
        Self {
            filter_string: filter_string.to_string(),
            chars: filter_string.chars().collect(),
            pos: 0,
        }
    }

    pub(crate) fn parse(mut self) -> FilterResult<FilterExpression> {
        let filter = self.parse_filter()?;
        if self.pos != self.chars.len() {
            return Err(FilterError::trailing_characters(
                &self.filter_string,
                self.remaining(),
            ));
        }
        Ok(filter)
    }

    fn parse_filter(&mut self) -> FilterResult<FilterExpression> {
        self.skip_whitespace();

        if self.char_at(self.pos)? != '(' {
            return Err(FilterError::missing_open_paren(
                &self.filter_string,
                self.remaining(),
            ));
        }
        self.pos += 1;

        let filter = self.parse_filtercomp()?;

        self.skip_whitespace();

        if self.char_at(self.pos)? != ')' {
            return Err(FilterError::missing_close_paren(
                &self.filter_string,
                self.remaining(),
            ));
        }
        self.pos += 1;

        self.skip_whitespace();

        Ok(filter)
    }

    fn parse_filtercomp(&mut self) -> FilterResult<FilterExpression> {
        self.skip_whitespace();

        match self.char_at(self.pos)? {
            '&' => {
                self.pos += 1;
                self.parse_and()
            }
            '|' => {
                self.pos += 1;
                self.parse_or()
            }
            '!' => {
                self.pos += 1;
                self.parse_not()
            }
            _ => self.parse_item(),
        }
    }

    fn parse_and(&mut self) -> FilterResult<FilterExpression> {
        let lookahead = self.pos;
        self.skip_whitespace();

        if self.char_at(self.pos)? != '(' {
            // '&' not followed by a filter list: it was the first
            // character of an attribute name
            self.pos = lookahead - 1;
            return self.parse_item();
        }

        let mut operands = Vec::with_capacity(10);
        while self.char_at(self.pos)? == '(' {
            operands.push(self.parse_filter()?);
        }

        Ok(FilterExpression::And(operands))
    }

    fn parse_or(&mut self) -> FilterResult<FilterExpression> {
        let lookahead = self.pos;
        self.skip_whitespace();

        if self.char_at(self.pos)? != '(' {
            self.pos = lookahead - 1;
            return self.parse_item();
        }

        let mut operands = Vec::with_capacity(10);
        while self.char_at(self.pos)? == '(' {
            operands.push(self.parse_filter()?);
        }

        Ok(FilterExpression::Or(operands))
    }

    fn parse_not(&mut self) -> FilterResult<FilterExpression> {
        let lookahead = self.pos;
        self.skip_whitespace();

        if self.char_at(self.pos)? != '(' {
            self.pos = lookahead - 1;
            return self.parse_item();
        }

        let child = self.parse_filter()?;

        Ok(FilterExpression::Not(Box::new(child)))
    }

    fn parse_item(&mut self) -> FilterResult<FilterExpression> {
        let attr = self.parse_attr()?;

        self.skip_whitespace();

        match self.char_at(self.pos)? {
            '~' => {
                if self.char_at(self.pos + 1)? == '=' {
                    self.pos += 2;
                    return Ok(FilterExpression::Approx {
                        attr,
                        value: self.parse_value()?,
                    });
                }
            }
            '>' => {
                if self.char_at(self.pos + 1)? == '=' {
                    self.pos += 2;
                    return Ok(FilterExpression::Greater {
                        attr,
                        value: self.parse_value()?,
                    });
                }
            }
            '<' => {
                if self.char_at(self.pos + 1)? == '=' {
                    self.pos += 2;
                    return Ok(FilterExpression::Less {
                        attr,
                        value: self.parse_value()?,
                    });
                }
            }
            '=' => {
                if self.char_at(self.pos + 1)? == '*' {
                    // 'attr=*' followed by ')' is a presence filter; any
                    // other continuation is a substring starting with a
                    // wildcard
                    let oldpos = self.pos;
                    self.pos += 2;
                    self.skip_whitespace();
                    if self.char_at(self.pos)? == ')' {
                        return Ok(FilterExpression::Present { attr });
                    }
                    self.pos = oldpos;
                }

                self.pos += 1;
                return Ok(match self.parse_substring()? {
                    SubstringValue::Literal(value) => FilterExpression::Equal { attr, value },
                    SubstringValue::Segments(segments) => {
                        FilterExpression::Substring { attr, segments }
                    }
                });
            }
            _ => {}
        }

        Err(FilterError::invalid_operator(
            &self.filter_string,
            self.remaining(),
        ))
    }

    fn parse_attr(&mut self) -> FilterResult<CheetahString> {
        self.skip_whitespace();

        let begin = self.pos;
        let mut end = self.pos;

        let mut c = self.char_at(self.pos)?;
        while !matches!(c, '~' | '<' | '>' | '=' | '(' | ')') {
            self.pos += 1;
            // trailing whitespace is trimmed; embedded whitespace is kept
            if !c.is_whitespace() {
                end = self.pos;
            }
            c = self.char_at(self.pos)?;
        }

        if end == begin {
            return Err(FilterError::missing_attribute(
                &self.filter_string,
                self.remaining(),
            ));
        }

        Ok(self.chars[begin..end].iter().collect::<String>().into())
    }

    fn parse_value(&mut self) -> FilterResult<CheetahString> {
        let mut value = String::with_capacity(self.chars.len() - self.pos);

        loop {
            let mut c = self.char_at(self.pos)?;
            match c {
                ')' => break,
                '(' => {
                    return Err(FilterError::invalid_value(
                        &self.filter_string,
                        self.remaining(),
                    ));
                }
                '\\' => {
                    self.pos += 1;
                    c = self.char_at(self.pos)?;
                    value.push(c);
                    self.pos += 1;
                }
                _ => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }

        if value.is_empty() {
            return Err(FilterError::missing_value(
                &self.filter_string,
                self.remaining(),
            ));
        }

        Ok(value.into())
    }

    fn parse_substring(&mut self) -> FilterResult<SubstringValue> {
        let mut pending = String::with_capacity(self.chars.len() - self.pos);
        let mut operands: Vec<Option<CheetahString>> = Vec::with_capacity(10);

        loop {
            let mut c = self.char_at(self.pos)?;
            match c {
                ')' => {
                    if !pending.is_empty() {
                        operands.push(Some(std::mem::take(&mut pending).into()));
                    }
                    break;
                }
                '(' => {
                    return Err(FilterError::invalid_value(
                        &self.filter_string,
                        self.remaining(),
                    ));
                }
                '*' => {
                    if !pending.is_empty() {
                        operands.push(Some(std::mem::take(&mut pending).into()));
                    }
                    operands.push(None);
                    self.pos += 1;
                }
                '\\' => {
                    self.pos += 1;
                    c = self.char_at(self.pos)?;
                    pending.push(c);
                    self.pos += 1;
                }
                _ => {
                    pending.push(c);
                    self.pos += 1;
                }
            }
        }

        // a single literal with no stars is a plain EQUAL, and no
        // operands at all means the empty-string EQUAL
        if operands.is_empty() {
            return Ok(SubstringValue::Literal(CheetahString::empty()));
        }
        if operands.len() == 1 {
            if let Some(Some(single)) = operands.first() {
                return Ok(SubstringValue::Literal(single.clone()));
            }
        }

        Ok(SubstringValue::Segments(operands))
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    /// Cursor read; running off the end of the character sequence while
    /// expecting more input means the filter ended abruptly.
    fn char_at(&self, pos: usize) -> FilterResult<char> {
        self.chars
            .get(pos)
            .copied()
            .ok_or_else(|| FilterError::ended_abruptly(&self.filter_string))
    }

    fn remaining(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }
}
