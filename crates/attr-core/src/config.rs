//! Parser and serializer options.
//!
//! Every options struct deserializes with `#[serde(default)]`, so a partial
//! JSON document such as `{"serializer": {"pretty": true}}` is a valid
//! [`AttrConfig`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What the tree builder does with content after the root element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailingContent {
    /// Return the root and drop whatever follows it.
    #[default]
    Ignore,
    /// Fail with `AttrError::TrailingContent`.
    Reject,
}

/// Which tokenizer turns JSON bytes into tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JsonBackend {
    /// Hand-written byte lexer, `JsonStreamReader`.
    #[default]
    Native,
    /// serde_json document stream, `SerdeJsonStreamReader`.
    Serde,
}

/// String escaping applied by the JSON writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscapeMode {
    /// `"`, `\` and every control character.
    #[default]
    Standard,
    /// Only `"`. Output may not parse back when strings hold `\` or control
    /// characters.
    QuoteOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub trailing: TrailingContent,
    pub max_depth: usize,
    pub backend: JsonBackend,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            trailing: TrailingContent::Ignore,
            max_depth: crate::builder::DEFAULT_MAX_DEPTH,
            backend: JsonBackend::Native,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
    pub escape: EscapeMode,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
            escape: EscapeMode::Standard,
        }
    }
}

impl SerializerOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

/// Combined configuration, as loaded from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttrConfig {
    pub parser: ParserOptions,
    pub serializer: SerializerOptions,
}

impl AttrConfig {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Command-line names are the serde names.
macro_rules! from_str_via_serde {
    ($($ty:ty),* $(,)?) => {$(
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                serde_json::from_value(serde_json::Value::String(s.to_owned()))
                    .map_err(|err| err.to_string())
            }
        }
    )*};
}

from_str_via_serde!(TrailingContent, JsonBackend, EscapeMode);
