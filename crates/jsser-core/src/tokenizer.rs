//! Tokenizer — raw JSON text into an ordered list of [`Token`]s.
//!
//! A single cursor scans the buffer left to right, skipping whitespace
//! between tokens. The lexical rules are deliberately lenient:
//!
//! - `t`/`f` (any case) produce a boolean and skip a fixed 4 or 5 bytes
//!   without checking the remaining letters; `n` does the same for `null`.
//! - Anything that is not a string, structural character or keyword is a
//!   number, read greedily up to the next `,`, `]` or `}` with no digit
//!   validation. Bad numeric text only fails later, during conversion.
//! - The only string escape is `\"`, which yields a bare quote. Every other
//!   backslash sequence (`\n`, `\\`, `A`) is kept verbatim.

use crate::error::{Error, Result};
use std::fmt;

/// A lexical token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Null,
    Bool(bool),
    /// Raw numeric text, trailing whitespace removed.
    Number(String),
    /// String content with `\"` already turned into `"`.
    String(String),
    Comma,
    Colon,
    ArrayStart,
    ArrayEnd,
    ObjectStart,
    ObjectEnd,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Null => f.write_str("null"),
            Token::Bool(b) => write!(f, "bool {b}"),
            Token::Number(raw) => write!(f, "number {raw}"),
            Token::String(s) => write!(f, "string {s:?}"),
            Token::Comma => f.write_str("','"),
            Token::Colon => f.write_str("':'"),
            Token::ArrayStart => f.write_str("'['"),
            Token::ArrayEnd => f.write_str("']'"),
            Token::ObjectStart => f.write_str("'{'"),
            Token::ObjectEnd => f.write_str("'}'"),
        }
    }
}

/// Split `text` into tokens.
///
/// Fails only on an unterminated string.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Tokenizer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Jump `n` bytes ahead, then forward to the next char boundary so a
    /// malformed keyword never leaves the cursor inside a code point.
    fn skip_bytes(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
        while !self.text.is_char_boundary(self.pos) {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_whitespace();
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let token = match c.to_ascii_lowercase() {
            '"' => Token::String(self.read_string()?),
            '[' => self.structural(Token::ArrayStart),
            ']' => self.structural(Token::ArrayEnd),
            '{' => self.structural(Token::ObjectStart),
            '}' => self.structural(Token::ObjectEnd),
            ',' => self.structural(Token::Comma),
            ':' => self.structural(Token::Colon),
            't' => {
                self.skip_bytes(4);
                Token::Bool(true)
            }
            'f' => {
                self.skip_bytes(5);
                Token::Bool(false)
            }
            'n' => {
                self.skip_bytes(4);
                Token::Null
            }
            _ => Token::Number(self.read_number()),
        };
        Ok(Some(token))
    }

    fn structural(&mut self, token: Token) -> Token {
        self.pos += 1;
        token
    }

    /// Read a string starting at the opening quote. Leaves the cursor after
    /// the closing quote.
    fn read_string(&mut self) -> Result<String> {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let mut out = String::new();
        // skip opening quote
        let mut i = self.pos + 1;
        let mut segment = i;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' if bytes.get(i + 1) == Some(&b'"') => {
                    out.push_str(&self.text[segment..i]);
                    out.push('"');
                    i += 2;
                    segment = i;
                }
                b'"' => {
                    out.push_str(&self.text[segment..i]);
                    self.pos = i + 1;
                    return Ok(out);
                }
                _ => i += 1,
            }
        }

        Err(Error::Tokenize {
            position: start,
            message: "unterminated string".to_string(),
        })
    }

    fn read_number(&mut self) -> String {
        let rest = &self.text[self.pos..];
        let len = rest.find([',', ']', '}']).unwrap_or(rest.len());
        self.pos += len;
        rest[..len].trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_bytes_stops_on_char_boundary() {
        // "tr€" — the fixed 4-byte jump lands inside the euro sign.
        let tokens = tokenize("[tr€,1]").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::ArrayStart,
                Token::Bool(true),
                Token::Comma,
                Token::Number("1".into()),
                Token::ArrayEnd,
            ]
        );
    }

    #[test]
    fn number_stops_at_structural_terminators_only() {
        let tokens = tokenize("{\"a\": 1 2 }").unwrap();
        assert_eq!(tokens[3], Token::Number("1 2".into()));
    }
}
