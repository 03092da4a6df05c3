//! Recursive-descent parser

use hashbrown::HashMap;

use super::Value;
use crate::error::{ParseError, ParseErrorKind};

/// Nesting limit for arrays and objects; deeper documents are rejected
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parse a complete document
///
/// Only whitespace may follow the root value.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(text);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.pos < parser.bytes.len() {
        return Err(parser.error(ParseErrorKind::TrailingCharacters));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.pos)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Character at the cursor, for error messages
    fn current_char(&self) -> char {
        self.text[self.pos..].chars().next().unwrap_or('\0')
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Consume `byte` if it is next
    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), ParseError> {
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.error(ParseErrorKind::Expected {
                expected,
                found: self.current_char(),
            })),
            None => Err(self.error(ParseErrorKind::UnexpectedEnd { expected })),
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error(ParseErrorKind::NestingTooDeep(MAX_NESTING_DEPTH)));
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(ParseErrorKind::UnexpectedEnd { expected: "value" })),
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => self.parse_string().map(Value::String),
            Some(b) if is_number_start(b) => self.parse_number(),
            Some(b) if b.is_ascii_alphabetic() => self.parse_literal(),
            Some(_) => Err(self.error(ParseErrorKind::Expected {
                expected: "value",
                found: self.current_char(),
            })),
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.expect(b'{', "'{'")?;
        self.enter()?;

        let mut map = HashMap::new();
        self.skip_whitespace();
        if self.eat(b'}') {
            self.depth -= 1;
            return Ok(Value::Object(map));
        }

        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                // Also rejects `{"a": 1,}`
                return Err(match self.peek() {
                    None => self.error(ParseErrorKind::UnexpectedEnd {
                        expected: "string key",
                    }),
                    Some(_) => self.error(ParseErrorKind::Expected {
                        expected: "string key",
                        found: self.current_char(),
                    }),
                });
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            self.expect(b':', "':'")?;
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            if self.eat(b',') {
                continue;
            }
            self.expect(b'}', "',' or '}'")?;
            break;
        }

        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.expect(b'[', "'['")?;
        self.enter()?;

        let mut items = Vec::new();
        self.skip_whitespace();
        if self.eat(b']') {
            self.depth -= 1;
            return Ok(Value::Array(items));
        }

        loop {
            // A `]` straight after a comma fails here as "expected value"
            items.push(self.parse_value()?);

            self.skip_whitespace();
            if self.eat(b',') {
                continue;
            }
            self.expect(b']', "',' or ']'")?;
            break;
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.expect(b'"', "'\"'")?;

        let mut out = String::new();
        let mut chunk_start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::new(ParseErrorKind::UnterminatedString, start));
                }
                Some(b'"') => {
                    out.push_str(&self.text[chunk_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.text[chunk_start..self.pos]);
                    let escape_pos = self.pos;
                    self.pos += 1;
                    let decoded = match self.peek() {
                        None => {
                            return Err(ParseError::new(
                                ParseErrorKind::UnterminatedString,
                                start,
                            ));
                        }
                        Some(b'"') => '"',
                        Some(b'\\') => '\\',
                        Some(b'/') => '/',
                        Some(b'b') => '\u{08}',
                        Some(b'f') => '\u{0c}',
                        Some(b'n') => '\n',
                        Some(b'r') => '\r',
                        Some(b't') => '\t',
                        Some(_) => {
                            return Err(ParseError::new(
                                ParseErrorKind::UnsupportedEscape(self.current_char()),
                                escape_pos,
                            ));
                        }
                    };
                    out.push(decoded);
                    self.pos += 1;
                    chunk_start = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while self.peek().is_some_and(is_number_char) {
            self.pos += 1;
        }

        let token = &self.text[start..self.pos];
        token
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidNumber(token.to_string()), start))
    }

    fn parse_literal(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }

        match &self.text[start..self.pos] {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            other => Err(ParseError::new(
                ParseErrorKind::InvalidLiteral(other.to_string()),
                start,
            )),
        }
    }
}

fn is_number_start(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.')
}

fn is_number_char(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E')
}
