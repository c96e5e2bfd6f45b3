//! The pull-based token stream contract.
//!
//! A [`StreamReader`] is a forward-only cursor over a serialized document.
//! It starts before the first token ([`StreamToken::None`]); each successful
//! [`StreamReader::advance`] positions it on the next token, and `advance`
//! returns `false` once the stream is exhausted. Scalar tokens and
//! `PropertyName` carry a payload in [`StreamReader::current_value`].
//!
//! Element-level helpers (`skip_element`, `parse_element`) expect the cursor
//! on the first token of an element and leave it on that element's last
//! token, so the caller's next `advance` moves past it.

use crate::attr::Attr;
use crate::builder::{self, DEFAULT_MAX_DEPTH};
use crate::error::{AttrError, Result};
use crate::value::AttrValue;
use std::fmt;

/// Kind of the token under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamToken {
    /// Not started, or exhausted.
    None,
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    PropertyName,
    String,
    Bool,
    Int32,
    Int64,
    Float64,
    Null,
}

impl StreamToken {
    /// Tokens that form a complete element on their own.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            StreamToken::String
                | StreamToken::Bool
                | StreamToken::Int32
                | StreamToken::Int64
                | StreamToken::Float64
                | StreamToken::Null
        )
    }

    /// The scalar token that carries `value`.
    pub fn for_value(value: &AttrValue) -> StreamToken {
        match value {
            AttrValue::Empty => StreamToken::Null,
            AttrValue::String(_) => StreamToken::String,
            AttrValue::Bool(_) => StreamToken::Bool,
            AttrValue::Int(_) => StreamToken::Int32,
            AttrValue::Long(_) => StreamToken::Int64,
            AttrValue::Float(_) | AttrValue::Double(_) => StreamToken::Float64,
        }
    }
}

impl fmt::Display for StreamToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A forward-only cursor yielding typed tokens.
pub trait StreamReader {
    /// Move to the next token. Returns `false` at end of stream, after which
    /// the current token is [`StreamToken::None`].
    fn advance(&mut self) -> Result<bool>;

    fn current_token(&self) -> StreamToken;

    /// Payload of the current scalar or property-name token.
    fn current_value(&self) -> Option<&AttrValue>;

    fn string_value(&self) -> String {
        self.current_value()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn int_value(&self) -> i32 {
        self.current_value().map_or(0, AttrValue::to_int)
    }

    fn long_value(&self) -> i64 {
        self.current_value().map_or(0, AttrValue::to_long)
    }

    fn double_value(&self) -> f64 {
        self.current_value().map_or(0.0, AttrValue::to_double)
    }

    fn bool_value(&self) -> bool {
        self.current_value().is_some_and(AttrValue::to_bool)
    }

    /// Skip the element under the cursor, including any nested content.
    fn skip_element(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.current_token() {
                StreamToken::ObjectStart | StreamToken::ArrayStart => depth += 1,
                StreamToken::ObjectEnd | StreamToken::ArrayEnd => {
                    depth = depth.saturating_sub(1);
                }
                StreamToken::None => {
                    return Err(AttrError::unexpected("an element", "end of stream"));
                }
                _ => {}
            }
            if depth == 0 {
                return Ok(());
            }
            if !self.advance()? {
                return Err(AttrError::unexpected("end of container", "end of stream"));
            }
        }
    }

    /// Materialize the element under the cursor as an attr tree.
    fn parse_element(&mut self) -> Result<Attr> {
        builder::read_element(self, 0, DEFAULT_MAX_DEPTH)
    }
}

impl<R: StreamReader + ?Sized> StreamReader for &mut R {
    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }

    fn current_token(&self) -> StreamToken {
        (**self).current_token()
    }

    fn current_value(&self) -> Option<&AttrValue> {
        (**self).current_value()
    }
}

impl<R: StreamReader + ?Sized> StreamReader for Box<R> {
    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }

    fn current_token(&self) -> StreamToken {
        (**self).current_token()
    }

    fn current_value(&self) -> Option<&AttrValue> {
        (**self).current_value()
    }
}
