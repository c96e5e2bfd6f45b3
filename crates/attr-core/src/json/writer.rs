//! JSON output: a validating token writer and the tree serializer on top.
//!
//! [`JsonWriter`] accepts the same token vocabulary a [`StreamReader`]
//! produces and refuses sequences that would yield malformed JSON, such as
//! a value inside an object with no property name before it. The writer
//! emits no whitespace unless pretty printing is enabled.
//!
//! Doubles are written in their shortest round-trip form and always carry a
//! fraction or exponent (`1.0`, `1e300`). JSON has no spelling for NaN or
//! the infinities; they are written as `null`.

use crate::attr::Attr;
use crate::config::{EscapeMode, SerializerOptions};
use crate::error::{AttrError, Result};
use crate::stream::{StreamReader, StreamToken};
use crate::value::AttrValue;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy)]
enum Scope {
    Object { first: bool, has_key: bool },
    Array { first: bool },
}

/// Incremental JSON writer.
#[derive(Debug, Clone)]
pub struct JsonWriter {
    out: String,
    options: SerializerOptions,
    stack: Vec<Scope>,
    root_written: bool,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new(SerializerOptions::default())
    }
}

impl JsonWriter {
    pub fn new(options: SerializerOptions) -> Self {
        Self {
            out: String::new(),
            options,
            stack: Vec::new(),
            root_written: false,
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn begin_object(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push('{');
        self.stack.push(Scope::Object {
            first: true,
            has_key: false,
        });
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(Scope::Object { has_key: false, first }) => {
                let empty = *first;
                self.stack.pop();
                self.close('}', empty);
                Ok(())
            }
            Some(Scope::Object { has_key: true, .. }) => Err(AttrError::invalid_operation(
                "end of object directly after a property name",
            )),
            _ => Err(AttrError::invalid_operation("end of object outside an object")),
        }
    }

    pub fn begin_array(&mut self) -> Result<()> {
        self.before_value()?;
        self.out.push('[');
        self.stack.push(Scope::Array { first: true });
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(Scope::Array { first }) => {
                let empty = *first;
                self.stack.pop();
                self.close(']', empty);
                Ok(())
            }
            _ => Err(AttrError::invalid_operation("end of array outside an array")),
        }
    }

    pub fn property_name(&mut self, name: &str) -> Result<()> {
        let depth = self.stack.len();
        let needs_comma = match self.stack.last_mut() {
            Some(Scope::Object { first, has_key }) if !*has_key => {
                let needs_comma = !*first;
                *first = false;
                *has_key = true;
                needs_comma
            }
            Some(Scope::Object { .. }) => {
                return Err(AttrError::invalid_operation("two property names in a row"));
            }
            _ => {
                return Err(AttrError::invalid_operation(
                    "property name outside an object",
                ));
            }
        };
        if needs_comma {
            self.out.push(',');
        }
        self.newline(depth);
        self.write_string(name);
        self.out.push(':');
        if self.options.pretty {
            self.out.push(' ');
        }
        Ok(())
    }

    pub fn value(&mut self, value: &AttrValue) -> Result<()> {
        self.before_value()?;
        self.write_scalar(value);
        Ok(())
    }

    pub fn null(&mut self) -> Result<()> {
        self.value(&AttrValue::Empty)
    }

    /// Write one token as read from a [`StreamReader`].
    pub fn write_token(&mut self, token: StreamToken, value: Option<&AttrValue>) -> Result<()> {
        match token {
            StreamToken::None => Err(AttrError::invalid_operation("cannot write the None token")),
            StreamToken::ObjectStart => self.begin_object(),
            StreamToken::ObjectEnd => self.end_object(),
            StreamToken::ArrayStart => self.begin_array(),
            StreamToken::ArrayEnd => self.end_array(),
            StreamToken::PropertyName => match value {
                Some(name) => self.property_name(&name.to_string()),
                None => Err(AttrError::invalid_operation("property name without a payload")),
            },
            StreamToken::Null => self.null(),
            scalar => match value {
                Some(v) => self.value(v),
                None => Err(AttrError::invalid_operation(format!(
                    "{} token without a payload",
                    scalar
                ))),
            },
        }
    }

    /// Hand back the text. Fails while containers are still open.
    pub fn finish(self) -> Result<String> {
        if !self.stack.is_empty() {
            return Err(AttrError::invalid_operation(format!(
                "{} unclosed container(s)",
                self.stack.len()
            )));
        }
        Ok(self.out)
    }

    fn before_value(&mut self) -> Result<()> {
        let depth = self.stack.len();
        let needs_comma = match self.stack.last_mut() {
            None if self.root_written => {
                return Err(AttrError::invalid_operation("a second root element"));
            }
            None => {
                self.root_written = true;
                return Ok(());
            }
            Some(Scope::Object { has_key, .. }) => {
                if !*has_key {
                    return Err(AttrError::invalid_operation(
                        "value in an object without a property name",
                    ));
                }
                *has_key = false;
                return Ok(());
            }
            Some(Scope::Array { first }) => {
                let needs_comma = !*first;
                *first = false;
                needs_comma
            }
        };
        if needs_comma {
            self.out.push(',');
        }
        self.newline(depth);
        Ok(())
    }

    fn close(&mut self, bracket: char, empty: bool) {
        if !empty {
            self.newline(self.stack.len());
        }
        self.out.push(bracket);
    }

    fn newline(&mut self, depth: usize) {
        if self.options.pretty {
            self.out.push('\n');
            for _ in 0..depth * self.options.indent {
                self.out.push(' ');
            }
        }
    }

    fn write_scalar(&mut self, value: &AttrValue) {
        match value {
            AttrValue::Empty => self.out.push_str("null"),
            AttrValue::String(s) => self.write_string(s),
            AttrValue::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            AttrValue::Int(v) => {
                let _ = write!(self.out, "{}", v);
            }
            AttrValue::Long(v) => {
                let _ = write!(self.out, "{}", v);
            }
            AttrValue::Float(v) if v.is_finite() => {
                let _ = write!(self.out, "{:?}", v);
            }
            AttrValue::Double(v) if v.is_finite() => {
                let _ = write!(self.out, "{:?}", v);
            }
            AttrValue::Float(_) | AttrValue::Double(_) => self.out.push_str("null"),
        }
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        match self.options.escape {
            EscapeMode::Standard => escape_standard(&mut self.out, s),
            EscapeMode::QuoteOnly => {
                for c in s.chars() {
                    if c == '"' {
                        self.out.push('\\');
                    }
                    self.out.push(c);
                }
            }
        }
        self.out.push('"');
    }
}

fn escape_standard(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}

/// Serializes attr trees to JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    options: SerializerOptions,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SerializerOptions) -> Self {
        Self { options }
    }

    pub fn pretty() -> Self {
        Self::with_options(SerializerOptions::pretty())
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    pub fn serialize(&self, attr: &Attr) -> Result<Vec<u8>> {
        self.serialize_to_string(attr).map(String::into_bytes)
    }

    pub fn serialize_to_string(&self, attr: &Attr) -> Result<String> {
        let mut writer = JsonWriter::new(self.options.clone());
        write_attr(&mut writer, attr)?;
        writer.finish()
    }
}

/// Write `attr` and all of its children.
pub fn write_attr(writer: &mut JsonWriter, attr: &Attr) -> Result<()> {
    match attr {
        Attr::Value(v) => writer.value(v),
        Attr::Dic(dic) => {
            writer.begin_object()?;
            for (key, child) in dic {
                writer.property_name(key)?;
                write_attr(writer, child)?;
            }
            writer.end_object()
        }
        Attr::List(list) => {
            writer.begin_array()?;
            for child in list {
                write_attr(writer, child)?;
            }
            writer.end_array()
        }
    }
}

/// Copy the element under the reader's cursor into `writer` without
/// building a tree. Leaves the cursor on the element's last token.
pub fn transcode<R: StreamReader + ?Sized>(reader: &mut R, writer: &mut JsonWriter) -> Result<()> {
    let mut depth = 0usize;
    loop {
        let token = reader.current_token();
        writer.write_token(token, reader.current_value())?;
        match token {
            StreamToken::ObjectStart | StreamToken::ArrayStart => depth += 1,
            StreamToken::ObjectEnd | StreamToken::ArrayEnd => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 {
            return Ok(());
        }
        if !reader.advance()? {
            return Err(AttrError::unexpected("end of container", "end of stream"));
        }
    }
}

/// Serialize with default options.
pub fn to_json(attr: &Attr) -> Result<String> {
    JsonSerializer::new().serialize_to_string(attr)
}

/// Serialize with two-space indentation.
pub fn to_json_pretty(attr: &Attr) -> Result<String> {
    JsonSerializer::pretty().serialize_to_string(attr)
}
