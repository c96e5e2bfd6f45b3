//! Native JSON tokenizer.
//!
//! A byte-level lexer that implements [`StreamReader`] directly over the
//! input slice. Commas and colons are consumed silently. A string lexeme in
//! key position (right after `{` or after a comma inside an object) is
//! reported as `PropertyName`; the open-container stack decides which
//! position the lexer is in.
//!
//! Numbers without fraction or exponent are `Int32` when they fit 32 bits,
//! `Int64` when they fit 64 bits and `Float64` otherwise. Anything with a
//! fraction or exponent is `Float64`.
//!
//! After the root element completes, further non-whitespace input is lexed
//! as another root element. Whether that is acceptable is up to the caller.
//! A root number or literal must still end at whitespace, a bracket or a
//! delimiter, so `01` and `truex` are lex errors rather than two roots.

use crate::error::{AttrError, Result};
use crate::stream::{StreamReader, StreamToken};
use crate::value::AttrValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

/// What the lexer accepts at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Root value, or a value after `:` or after `,` in an array.
    Value,
    /// Right after `[`.
    ValueOrEnd,
    /// Right after `{`.
    KeyOrEnd,
    /// After `,` in an object.
    Key,
    Colon,
    CommaOrEnd,
}

/// Streaming tokenizer over JSON bytes.
#[derive(Debug)]
pub struct JsonStreamReader<'a> {
    input: &'a [u8],
    pos: usize,
    stack: Vec<Frame>,
    expect: Expect,
    token: StreamToken,
    value: Option<AttrValue>,
    failed: bool,
}

impl<'a> JsonStreamReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            stack: Vec::new(),
            expect: Expect::Value,
            token: StreamToken::None,
            value: None,
            failed: false,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }

    /// Byte offset of the next unread input.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn emit(&mut self, token: StreamToken, value: Option<AttrValue>) -> Result<bool> {
        self.token = token;
        self.value = value;
        Ok(true)
    }

    fn error<T>(&mut self, message: impl Into<String>) -> Result<T> {
        self.failed = true;
        self.token = StreamToken::None;
        self.value = None;
        Err(AttrError::lex(self.pos, message))
    }

    fn after_value(&mut self) {
        self.expect = if self.stack.is_empty() {
            Expect::Value
        } else {
            Expect::CommaOrEnd
        };
    }

    /// Root scalars are not self-delimiting; reject input glued to them.
    fn end_scalar(&mut self) -> Result<()> {
        if !self.stack.is_empty() {
            return Ok(());
        }
        match self.input.get(self.pos) {
            None
            | Some(
                b' ' | b'\t' | b'\n' | b'\r' | b'"' | b'[' | b']' | b'{' | b'}' | b',' | b':',
            ) => Ok(()),
            Some(&other) => self.error(format!(
                "unexpected character '{}' after root value",
                char::from(other)
            )),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.input.get(self.pos) {
            self.pos += 1;
        }
    }

    fn close(&mut self, frame: Frame) -> Result<bool> {
        if self.stack.pop() != Some(frame) {
            return self.error("mismatched closing bracket");
        }
        self.pos += 1;
        self.after_value();
        match frame {
            Frame::Object => self.emit(StreamToken::ObjectEnd, None),
            Frame::Array => self.emit(StreamToken::ArrayEnd, None),
        }
    }

    fn lex_value(&mut self, b: u8) -> Result<bool> {
        match b {
            b'{' => {
                self.pos += 1;
                self.stack.push(Frame::Object);
                self.expect = Expect::KeyOrEnd;
                self.emit(StreamToken::ObjectStart, None)
            }
            b'[' => {
                self.pos += 1;
                self.stack.push(Frame::Array);
                self.expect = Expect::ValueOrEnd;
                self.emit(StreamToken::ArrayStart, None)
            }
            b'"' => {
                let s = self.lex_string()?;
                self.after_value();
                self.emit(StreamToken::String, Some(AttrValue::String(s)))
            }
            b't' => {
                self.lex_literal("true")?;
                self.end_scalar()?;
                self.after_value();
                self.emit(StreamToken::Bool, Some(AttrValue::Bool(true)))
            }
            b'f' => {
                self.lex_literal("false")?;
                self.end_scalar()?;
                self.after_value();
                self.emit(StreamToken::Bool, Some(AttrValue::Bool(false)))
            }
            b'n' => {
                self.lex_literal("null")?;
                self.end_scalar()?;
                self.after_value();
                self.emit(StreamToken::Null, None)
            }
            b'-' | b'0'..=b'9' => {
                let value = self.lex_number()?;
                self.end_scalar()?;
                self.after_value();
                self.emit(StreamToken::for_value(&value), Some(value))
            }
            other => self.error(format!("unexpected character '{}'", char::from(other))),
        }
    }

    fn lex_key(&mut self) -> Result<bool> {
        let key = self.lex_string()?;
        self.expect = Expect::Colon;
        self.emit(StreamToken::PropertyName, Some(AttrValue::String(key)))
    }

    fn lex_literal(&mut self, literal: &str) -> Result<()> {
        if self.input[self.pos..].starts_with(literal.as_bytes()) {
            self.pos += literal.len();
            Ok(())
        } else {
            self.error(format!("invalid literal, expected '{}'", literal))
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(b'0'..=b'9') = self.input.get(self.pos) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn lex_number(&mut self) -> Result<AttrValue> {
        let start = self.pos;
        if self.input.get(self.pos) == Some(&b'-') {
            self.pos += 1;
        }
        match self.input.get(self.pos) {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                self.digits();
            }
            _ => return self.error("invalid number, expected digit"),
        }

        let mut is_float = false;
        if self.input.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            if self.digits() == 0 {
                return self.error("invalid number, expected digit after '.'");
            }
            is_float = true;
        }
        if let Some(b'e' | b'E') = self.input.get(self.pos) {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.input.get(self.pos) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                return self.error("invalid number, expected exponent digits");
            }
            is_float = true;
        }

        // The grammar above only admits ASCII.
        let text = std::str::from_utf8(&self.input[start..self.pos]).unwrap_or_default();
        if !is_float {
            if let Ok(v) = text.parse::<i64>() {
                return Ok(match i32::try_from(v) {
                    Ok(small) => AttrValue::Int(small),
                    Err(_) => AttrValue::Long(v),
                });
            }
        }
        match text.parse::<f64>() {
            Ok(v) => Ok(AttrValue::Double(v)),
            Err(_) => self.error(format!("invalid number '{}'", text)),
        }
    }

    fn lex_hex4(&mut self) -> Result<u32> {
        let Some(digits) = self.input.get(self.pos..self.pos + 4) else {
            return self.error("incomplete unicode escape");
        };
        let mut code = 0u32;
        for &d in digits {
            let nibble = match d {
                b'0'..=b'9' => d - b'0',
                b'a'..=b'f' => d - b'a' + 10,
                b'A'..=b'F' => d - b'A' + 10,
                _ => return self.error("non-hex digit in unicode escape"),
            };
            code = (code << 4) | u32::from(nibble);
        }
        self.pos += 4;
        Ok(code)
    }

    fn lex_unicode_escape(&mut self) -> Result<char> {
        let high = self.lex_hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                if !self.input[self.pos..].starts_with(b"\\u") {
                    return self.error("unpaired surrogate in unicode escape");
                }
                self.pos += 2;
                let low = self.lex_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return self.error("invalid low surrogate in unicode escape");
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return self.error("unpaired surrogate in unicode escape"),
            other => other,
        };
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => self.error("invalid unicode escape"),
        }
    }

    /// Lex a string starting at the opening quote.
    fn lex_string(&mut self) -> Result<String> {
        self.pos += 1;
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let Some(&b) = self.input.get(self.pos) else {
                return self.error("unterminated string");
            };
            match b {
                b'"' => {
                    self.pos += 1;
                    break;
                }
                b'\\' => {
                    self.pos += 1;
                    let Some(&esc) = self.input.get(self.pos) else {
                        return self.error("unterminated escape sequence");
                    };
                    self.pos += 1;
                    let c = match esc {
                        b'"' => '"',
                        b'\\' => '\\',
                        b'/' => '/',
                        b'b' => '\u{0008}',
                        b'f' => '\u{000C}',
                        b'n' => '\n',
                        b'r' => '\r',
                        b't' => '\t',
                        b'u' => self.lex_unicode_escape()?,
                        _ => return self.error("invalid escape sequence"),
                    };
                    let mut utf8 = [0u8; 4];
                    buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                }
                0x00..=0x1F => return self.error("unescaped control character in string"),
                _ => {
                    buf.push(b);
                    self.pos += 1;
                }
            }
        }
        match String::from_utf8(buf) {
            Ok(s) => Ok(s),
            Err(_) => self.error("invalid UTF-8 in string"),
        }
    }
}

impl StreamReader for JsonStreamReader<'_> {
    fn advance(&mut self) -> Result<bool> {
        if self.failed {
            return Ok(false);
        }
        loop {
            self.skip_whitespace();
            let Some(&b) = self.input.get(self.pos) else {
                if !self.stack.is_empty() {
                    return self.error("unexpected end of input");
                }
                self.token = StreamToken::None;
                self.value = None;
                return Ok(false);
            };

            match self.expect {
                Expect::Value => return self.lex_value(b),
                Expect::ValueOrEnd => {
                    return if b == b']' {
                        self.close(Frame::Array)
                    } else {
                        self.lex_value(b)
                    };
                }
                Expect::KeyOrEnd => {
                    return match b {
                        b'}' => self.close(Frame::Object),
                        b'"' => self.lex_key(),
                        _ => self.error("expected property name or '}'"),
                    };
                }
                Expect::Key => {
                    return match b {
                        b'"' => self.lex_key(),
                        _ => self.error("expected property name"),
                    };
                }
                Expect::Colon => {
                    if b != b':' {
                        return self.error("expected ':' after property name");
                    }
                    self.pos += 1;
                    self.expect = Expect::Value;
                }
                Expect::CommaOrEnd => match (b, self.stack.last()) {
                    (b',', Some(Frame::Object)) => {
                        self.pos += 1;
                        self.expect = Expect::Key;
                    }
                    (b',', Some(Frame::Array)) => {
                        self.pos += 1;
                        self.expect = Expect::Value;
                    }
                    (b'}', _) => return self.close(Frame::Object),
                    (b']', _) => return self.close(Frame::Array),
                    _ => return self.error("expected ',' or closing bracket"),
                },
            }
        }
    }

    fn current_token(&self) -> StreamToken {
        self.token
    }

    fn current_value(&self) -> Option<&AttrValue> {
        self.value.as_ref()
    }
}
