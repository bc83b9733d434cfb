//! Recursive-descent parser — token list into a [`JsonValue`] tree.
//!
//! ```text
//! value   := null | bool | number | string | array | object
//! array   := '[' (value (',' value)*)? ']'
//! object  := '{' (string ':' value (',' string ':' value)*)? '}'
//! ```
//!
//! # Key design decisions
//!
//! - **Sentinel instead of error**: [`parse_value`] returns `Ok(None)` when
//!   the cursor sits on `]`, `}`, `,` or `:` and leaves the cursor in place.
//!   The array and object loops use that to recognise empty containers and
//!   trailing commas (`[1,2,]`, `{"a":1,}`); anywhere else it is an error.
//! - **Shared cursor**: one `&mut usize` index is threaded through the
//!   recursion. Nesting depth is bounded only by the call stack.

use crate::error::{Error, Result};
use crate::tokenizer::{tokenize, Token};
use crate::value::JsonValue;

/// Tokenize and parse a complete document.
///
/// Tokens after the root value are ignored.
pub fn parse(text: &str) -> Result<JsonValue> {
    let tokens = tokenize(text)?;
    parse_tokens(&tokens)
}

/// Parse the root value of an already tokenized document.
pub fn parse_tokens(tokens: &[Token]) -> Result<JsonValue> {
    let mut cursor = 0;
    let value = parse_value(tokens, &mut cursor)?
        .ok_or_else(|| unexpected(tokens, cursor))?;
    if cursor < tokens.len() {
        tracing::debug!(
            ignored = tokens.len() - cursor,
            "ignoring tokens after the root value"
        );
    }
    Ok(value)
}

/// Parse one value at `cursor`.
///
/// Returns `Ok(None)` without moving the cursor if the current token is
/// structural.
pub fn parse_value(tokens: &[Token], cursor: &mut usize) -> Result<Option<JsonValue>> {
    let value = match current(tokens, *cursor)? {
        Token::Comma | Token::Colon | Token::ArrayEnd | Token::ObjectEnd => return Ok(None),
        Token::ArrayStart => {
            *cursor += 1;
            return parse_array(tokens, cursor).map(Some);
        }
        Token::ObjectStart => {
            *cursor += 1;
            return parse_object(tokens, cursor).map(Some);
        }
        Token::Null => JsonValue::Null,
        Token::Bool(b) => JsonValue::Bool(*b),
        Token::Number(raw) => JsonValue::Number(raw.clone()),
        Token::String(s) => JsonValue::String(s.clone()),
    };
    *cursor += 1;
    Ok(Some(value))
}

/// Cursor is just past `[`.
fn parse_array(tokens: &[Token], cursor: &mut usize) -> Result<JsonValue> {
    let mut items = Vec::new();
    loop {
        if let Some(item) = parse_value(tokens, cursor)? {
            items.push(item);
            continue;
        }
        match current(tokens, *cursor)? {
            Token::Comma => *cursor += 1,
            Token::ArrayEnd => {
                *cursor += 1;
                return Ok(JsonValue::Array(items));
            }
            _ => return Err(unexpected(tokens, *cursor)),
        }
    }
}

/// Cursor is just past `{`.
fn parse_object(tokens: &[Token], cursor: &mut usize) -> Result<JsonValue> {
    let mut entries: Vec<(String, JsonValue)> = Vec::new();
    loop {
        let key_index = *cursor;
        let key = match parse_value(tokens, cursor)? {
            Some(JsonValue::String(key)) => key,
            Some(other) => {
                return Err(Error::Parse {
                    token: key_index,
                    message: format!("object key must be a string, found {}", other.kind()),
                })
            }
            None => match current(tokens, *cursor)? {
                Token::ObjectEnd => {
                    *cursor += 1;
                    return Ok(JsonValue::Object(entries));
                }
                Token::Comma => {
                    *cursor += 1;
                    continue;
                }
                _ => return Err(unexpected(tokens, *cursor)),
            },
        };

        if current(tokens, *cursor)? != &Token::Colon {
            return Err(Error::Parse {
                token: *cursor,
                message: format!("expected ':' after key {key:?}"),
            });
        }
        *cursor += 1;

        let value = parse_value(tokens, cursor)?.ok_or_else(|| unexpected(tokens, *cursor))?;

        if entries.iter().any(|(k, _)| *k == key) {
            return Err(Error::Parse {
                token: key_index,
                message: format!("duplicate key {key:?}"),
            });
        }
        entries.push((key, value));
    }
}

fn current(tokens: &[Token], cursor: usize) -> Result<&Token> {
    tokens.get(cursor).ok_or_else(|| Error::Parse {
        token: cursor,
        message: "unexpected end of input".to_string(),
    })
}

fn unexpected(tokens: &[Token], cursor: usize) -> Error {
    match tokens.get(cursor) {
        Some(token) => Error::Parse {
            token: cursor,
            message: format!("unexpected {token}"),
        },
        None => Error::Parse {
            token: cursor,
            message: "unexpected end of input".to_string(),
        },
    }
}
