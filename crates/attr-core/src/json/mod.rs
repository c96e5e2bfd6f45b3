//! JSON tokenizers and writer.

mod reader;
mod serde_reader;
mod writer;

pub use reader::JsonStreamReader;
pub use serde_reader::SerdeJsonStreamReader;
pub use writer::{to_json, to_json_pretty, transcode, write_attr, JsonSerializer, JsonWriter};
