//! # attr-core
//!
//! A dynamic attribute tree (`Attr`) with a pull-based token stream, a tree
//! builder on top of that stream and a JSON serializer.
//!
//! An attr node is a scalar, a string-keyed dictionary or a list. Lookups
//! never fail: a missing key or index yields a shared `Empty` sentinel.
//! Parsing is split in two: tokenizers implement [`StreamReader`] and the
//! builder turns any stream into a tree, so JSON text, an existing tree or a
//! wrapped stream all parse the same way.
//!
//! ## Quick start
//!
//! ```rust
//! use attr_core::{parse_str, to_json};
//!
//! let attr = parse_str(r#"{"n":42,"s":"hi","l":[1,2,3]}"#).unwrap();
//! assert_eq!(attr.get("n").as_value().to_int(), 42);
//! assert_eq!(attr.get("l").at(2).as_value().to_int(), 3);
//! assert!(attr.get("missing").is_null_or_empty());
//!
//! assert_eq!(to_json(&attr).unwrap(), r#"{"n":42,"s":"hi","l":[1,2,3]}"#);
//! ```
//!
//! ## Modules
//!
//! - [`attr`], [`dic`], [`list`], [`value`]: the value model
//! - [`convert`]: typed extraction (`FromAttrValue`) and serde interop
//! - [`stream`]: the `StreamReader` contract and `StreamToken`
//! - [`json`]: native and serde_json tokenizers, `JsonWriter`, `JsonSerializer`
//! - [`tree`]: `AttrStreamReader`, a token stream over an existing tree
//! - [`wrap`]: `WrappedStreamReader`, nests a stream under a key path
//! - [`builder`]: `AttrParser`, token stream → tree
//! - [`query`]: URL query string → tree
//! - [`patch`]: JSON Pointer, JSON Patch and diff
//! - [`storage`]: `AttrStorage` and the in-memory implementation
//! - [`response`]: the `"error"` response convention
//! - [`config`]: parser and serializer options
//! - [`error`]: `AttrError` and `Result`

#[macro_use]
mod diag;

pub mod attr;
pub mod builder;
pub mod config;
pub mod convert;
pub mod dic;
pub mod error;
pub mod json;
pub mod list;
pub mod patch;
pub mod query;
pub mod response;
pub mod storage;
pub mod stream;
pub mod tree;
pub mod value;
pub mod wrap;

pub use attr::{Attr, AttrType, INVALID};
pub use builder::{parse, parse_str, AttrParser, DEFAULT_MAX_DEPTH};
pub use config::{AttrConfig, EscapeMode, JsonBackend, ParserOptions, SerializerOptions, TrailingContent};
pub use convert::FromAttrValue;
pub use dic::AttrDic;
pub use error::{AttrError, Result};
pub use json::{
    to_json, to_json_pretty, transcode, JsonSerializer, JsonStreamReader, JsonWriter,
    SerdeJsonStreamReader,
};
pub use list::AttrList;
pub use patch::{apply_patch, apply_patch_attr, diff, pointer, PatchOperation};
pub use query::{parse_query, UrlQueryAttrParser};
pub use response::ResponseError;
pub use storage::{AttrStorage, MemoryAttrStorage};
pub use stream::{StreamReader, StreamToken};
pub use tree::AttrStreamReader;
pub use value::{AttrValue, AttrValueType};
pub use wrap::WrappedStreamReader;
