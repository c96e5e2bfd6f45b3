//! Tree builder: turns a token stream into an attr tree.
//!
//! The builder primes the reader with one `advance`, consumes exactly one
//! element recursively, then advances once more to look for trailing
//! content. Blank input is not an error: it yields an `Empty` scalar.
//! Any failure of the underlying stream surfaces as [`AttrError::Parse`].

use crate::attr::Attr;
use crate::config::{JsonBackend, ParserOptions, TrailingContent};
use crate::dic::AttrDic;
use crate::error::{AttrError, Result};
use crate::json::{JsonStreamReader, SerdeJsonStreamReader};
use crate::list::AttrList;
use crate::stream::{StreamReader, StreamToken};

/// Nesting limit used when no options are given.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Builds attr trees from JSON input or from any [`StreamReader`].
#[derive(Debug, Clone, Default)]
pub struct AttrParser {
    options: ParserOptions,
}

impl AttrParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse UTF-8 JSON bytes with the configured backend.
    pub fn parse(&self, bytes: &[u8]) -> Result<Attr> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Attr::empty());
        }
        tracing::trace!(backend = ?self.options.backend, len = bytes.len(), "parsing JSON");
        match self.options.backend {
            JsonBackend::Native => self.parse_reader(JsonStreamReader::new(bytes)),
            JsonBackend::Serde => self.parse_reader(SerdeJsonStreamReader::new(bytes)),
        }
    }

    pub fn parse_str(&self, text: &str) -> Result<Attr> {
        self.parse(text.as_bytes())
    }

    /// Consume one root element from a fresh reader.
    pub fn parse_reader<R: StreamReader>(&self, mut reader: R) -> Result<Attr> {
        if !reader.advance().map_err(AttrError::into_parse)? {
            return Ok(Attr::empty());
        }
        let root =
            read_element(&mut reader, 0, self.options.max_depth).map_err(AttrError::into_parse)?;

        match (reader.advance(), self.options.trailing) {
            (Ok(false), _) => Ok(root),
            (Ok(true), TrailingContent::Reject) => Err(AttrError::TrailingContent.into_parse()),
            (Err(err), TrailingContent::Reject) => Err(err.into_parse()),
            (trailing, TrailingContent::Ignore) => {
                tracing::debug!(error = ?trailing.err(), "ignoring content after the root element");
                Ok(root)
            }
        }
    }
}

/// Parse JSON bytes with default options.
pub fn parse(bytes: &[u8]) -> Result<Attr> {
    AttrParser::new().parse(bytes)
}

/// Parse JSON text with default options.
pub fn parse_str(text: &str) -> Result<Attr> {
    AttrParser::new().parse_str(text)
}

/// Build the element under the cursor. On return the cursor sits on the
/// element's last token.
pub(crate) fn read_element<R: StreamReader + ?Sized>(
    reader: &mut R,
    depth: usize,
    max_depth: usize,
) -> Result<Attr> {
    match reader.current_token() {
        StreamToken::ObjectStart => read_object(reader, depth, max_depth).map(Attr::Dic),
        StreamToken::ArrayStart => read_array(reader, depth, max_depth).map(Attr::List),
        StreamToken::Null => Ok(Attr::empty()),
        token if token.is_scalar() => {
            let value = reader
                .current_value()
                .cloned()
                .ok_or_else(|| AttrError::unexpected(format!("a {} payload", token), "none"))?;
            Ok(Attr::Value(value))
        }
        token => Err(AttrError::unexpected("an element", token.to_string())),
    }
}

fn enter(depth: usize, max_depth: usize) -> Result<()> {
    if depth >= max_depth {
        return Err(AttrError::DepthLimit { limit: max_depth });
    }
    Ok(())
}

fn next_token<R: StreamReader + ?Sized>(reader: &mut R, expected: &str) -> Result<StreamToken> {
    if reader.advance()? {
        Ok(reader.current_token())
    } else {
        Err(AttrError::unexpected(expected, "end of stream"))
    }
}

fn read_object<R: StreamReader + ?Sized>(
    reader: &mut R,
    depth: usize,
    max_depth: usize,
) -> Result<AttrDic> {
    enter(depth, max_depth)?;
    let mut dic = AttrDic::new();
    loop {
        match next_token(reader, "property name or end of object")? {
            StreamToken::ObjectEnd => return Ok(dic),
            StreamToken::PropertyName => {
                let key = reader.string_value();
                next_token(reader, "property value")?;
                let value = read_element(reader, depth + 1, max_depth)?;
                dic.set(key, value);
            }
            other => {
                return Err(AttrError::unexpected(
                    "property name or end of object",
                    other.to_string(),
                ))
            }
        }
    }
}

fn read_array<R: StreamReader + ?Sized>(
    reader: &mut R,
    depth: usize,
    max_depth: usize,
) -> Result<AttrList> {
    enter(depth, max_depth)?;
    let mut list = AttrList::new();
    loop {
        match next_token(reader, "element or end of array")? {
            StreamToken::ArrayEnd => return Ok(list),
            _ => {
                let item = read_element(reader, depth + 1, max_depth)?;
                list.add(item);
            }
        }
    }
}
