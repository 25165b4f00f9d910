//! Selector parsing.
//! Spec: <https://www.w3.org/TR/selectors-3/#w3cselgrammar>

use crate::{AttrOp, Combinator, ComplexSelector, Compound, ParseError, SelectorList, SimpleSelector};
use core::mem::take;

/// Parse a comma-separated selector group.
///
/// # Errors
/// Returns the first [`ParseError`] found in any part of the group.
pub fn parse_list(input: &str) -> Result<SelectorList, ParseError> {
    let mut list = SelectorList::default();
    for part in input.split(',') {
        list.selectors.push(parse_complex(part)?);
    }
    Ok(list)
}

/// Parse a single complex selector (compounds joined by combinators).
///
/// # Errors
/// Returns a [`ParseError`] if the input is empty, contains an unterminated
/// attribute selector, a dangling combinator, or a byte outside the grammar.
pub fn parse_complex(input: &str) -> Result<ComplexSelector, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut current = Compound::default();
    let mut head: Option<Compound> = None;
    let mut tail: Vec<(Combinator, Compound)> = Vec::new();
    // Combinator waiting for the compound to its right.
    let mut pending: Option<Combinator> = None;

    loop {
        let had_space = cursor.skip_whitespace();
        let Some(next_byte) = cursor.peek() else {
            break;
        };
        if let Some(explicit) = combinator_for(next_byte) {
            cursor.advance();
            // Empty here means a leading or doubled combinator.
            if current.is_empty() {
                return Err(ParseError::DanglingCombinator);
            }
            flush(&mut head, &mut tail, &mut current, &mut pending)?;
            pending = Some(explicit);
            continue;
        }
        if had_space && !current.is_empty() {
            // Whitespace between compounds is a descendant combinator.
            flush(&mut head, &mut tail, &mut current, &mut pending)?;
            pending = Some(Combinator::Descendant);
        }
        current.parts.push(cursor.simple_selector()?);
    }

    if pending.is_some() && current.is_empty() {
        return Err(ParseError::DanglingCombinator);
    }
    if !current.is_empty() {
        flush(&mut head, &mut tail, &mut current, &mut pending)?;
    }
    let Some(first) = head else {
        return Err(ParseError::Empty);
    };
    Ok(ComplexSelector { head: first, tail })
}

/// Move the accumulated compound into the selector being built.
fn flush(
    head: &mut Option<Compound>,
    tail: &mut Vec<(Combinator, Compound)>,
    current: &mut Compound,
    pending: &mut Option<Combinator>,
) -> Result<(), ParseError> {
    let compound = take(current);
    match pending.take() {
        None => {
            if head.is_some() {
                return Err(ParseError::DanglingCombinator);
            }
            *head = Some(compound);
        }
        Some(combinator) => {
            if head.is_none() {
                return Err(ParseError::DanglingCombinator);
            }
            tail.push((combinator, compound));
        }
    }
    Ok(())
}

const fn combinator_for(byte: u8) -> Option<Combinator> {
    match byte {
        b'>' => Some(Combinator::Child),
        b'+' => Some(Combinator::AdjacentSibling),
        b'~' => Some(Combinator::GeneralSibling),
        _ => None,
    }
}

/// Byte cursor over one selector string.
struct Cursor<'input> {
    bytes: &'input [u8],
    index: usize,
}

impl<'input> Cursor<'input> {
    fn new(input: &'input str) -> Self {
        Self {
            bytes: input.as_bytes(),
            index: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    /// Skip ASCII whitespace; true if any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.index;
        while matches!(self.peek(), Some(byte) if byte.is_ascii_whitespace()) {
            self.advance();
        }
        self.index > start
    }

    /// Consume one simple selector at the cursor.
    fn simple_selector(&mut self) -> Result<SimpleSelector, ParseError> {
        match self.peek() {
            Some(b'*') => {
                self.advance();
                Ok(SimpleSelector::Universal)
            }
            Some(b'.') => {
                self.advance();
                let ident = self.ident()?;
                Ok(SimpleSelector::Class(ident))
            }
            Some(b'#') => {
                self.advance();
                let ident = self.ident()?;
                Ok(SimpleSelector::Id(ident))
            }
            Some(b'[') => self.attr_selector(),
            Some(byte) if is_ident_byte(byte) => {
                let ident = self.ident()?;
                Ok(SimpleSelector::Tag(ident))
            }
            Some(other) => Err(ParseError::UnexpectedToken(char::from(other))),
            None => Err(ParseError::Empty),
        }
    }

    /// Consume `[name]`, `[name=value]`, or `[name*=value]` after peeking `[`.
    fn attr_selector(&mut self) -> Result<SimpleSelector, ParseError> {
        self.advance(); // '['
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        let (op, value) = match self.peek() {
            Some(b']') => (AttrOp::Exists, String::new()),
            Some(b'=') => {
                self.advance();
                (AttrOp::Equals, self.attr_value()?)
            }
            Some(b'*') => {
                self.advance();
                if self.peek() != Some(b'=') {
                    return Err(ParseError::UnexpectedToken('*'));
                }
                self.advance();
                (AttrOp::Contains, self.attr_value()?)
            }
            Some(other) => return Err(ParseError::UnexpectedToken(char::from(other))),
            None => return Err(ParseError::UnclosedAttr),
        };
        self.skip_whitespace();
        if self.peek() != Some(b']') {
            return Err(ParseError::UnclosedAttr);
        }
        self.advance(); // ']'
        Ok(SimpleSelector::Attr { name, op, value })
    }

    /// Consume an attribute value, quoted or bare, up to (not including) `]`.
    fn attr_value(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.advance();
                let start = self.index;
                while matches!(self.peek(), Some(byte) if byte != quote) {
                    self.advance();
                }
                if self.peek().is_none() {
                    return Err(ParseError::UnclosedAttr);
                }
                let text = self.slice(start);
                self.advance(); // closing quote
                Ok(text)
            }
            Some(_) => {
                let start = self.index;
                while matches!(self.peek(), Some(byte) if byte != b']' && !byte.is_ascii_whitespace())
                {
                    self.advance();
                }
                Ok(self.slice(start))
            }
            None => Err(ParseError::UnclosedAttr),
        }
    }

    /// Consume an identifier (ASCII alphanumerics, `-`, `_`), lowercased.
    fn ident(&mut self) -> Result<String, ParseError> {
        let start = self.index;
        while matches!(self.peek(), Some(byte) if is_ident_byte(byte)) {
            self.advance();
        }
        if self.index == start {
            return match self.peek() {
                Some(found) => Err(ParseError::UnexpectedToken(char::from(found))),
                None => Err(ParseError::Empty),
            };
        }
        Ok(self.slice(start).to_ascii_lowercase())
    }

    fn slice(&self, start: usize) -> String {
        let bytes = self.bytes.get(start..self.index).unwrap_or(&[]);
        String::from_utf8_lossy(bytes).into_owned()
    }
}

const fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}
