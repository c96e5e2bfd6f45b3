//! Token stream backed by serde_json.
//!
//! Each root document is decoded into a `serde_json::Value` and flattened
//! into a queue of tokens. With `preserve_order` enabled the property order
//! matches the input, so the stream is token-for-token the same as
//! [`JsonStreamReader`](super::JsonStreamReader) for well-formed input
//! without duplicate keys.

use crate::convert::number_to_value;
use crate::error::Result;
use crate::stream::{StreamReader, StreamToken};
use crate::value::AttrValue;
use serde_json::de::SliceRead;
use serde_json::{Deserializer, StreamDeserializer, Value};
use std::collections::VecDeque;

type Event = (StreamToken, Option<AttrValue>);

pub struct SerdeJsonStreamReader<'a> {
    documents: StreamDeserializer<'a, SliceRead<'a>, Value>,
    pending: VecDeque<Event>,
    token: StreamToken,
    value: Option<AttrValue>,
    done: bool,
}

impl<'a> SerdeJsonStreamReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            documents: Deserializer::from_slice(input).into_iter::<Value>(),
            pending: VecDeque::new(),
            token: StreamToken::None,
            value: None,
            done: false,
        }
    }

    fn finish(&mut self) {
        self.done = true;
        self.token = StreamToken::None;
        self.value = None;
    }
}

fn flatten(value: Value, out: &mut VecDeque<Event>) {
    match value {
        Value::Null => out.push_back((StreamToken::Null, None)),
        Value::Bool(b) => out.push_back((StreamToken::Bool, Some(AttrValue::Bool(b)))),
        Value::Number(n) => {
            let v = number_to_value(&n);
            out.push_back((StreamToken::for_value(&v), Some(v)));
        }
        Value::String(s) => out.push_back((StreamToken::String, Some(AttrValue::String(s)))),
        Value::Array(items) => {
            out.push_back((StreamToken::ArrayStart, None));
            for item in items {
                flatten(item, out);
            }
            out.push_back((StreamToken::ArrayEnd, None));
        }
        Value::Object(map) => {
            out.push_back((StreamToken::ObjectStart, None));
            for (key, item) in map {
                out.push_back((StreamToken::PropertyName, Some(AttrValue::String(key))));
                flatten(item, out);
            }
            out.push_back((StreamToken::ObjectEnd, None));
        }
    }
}

impl StreamReader for SerdeJsonStreamReader<'_> {
    fn advance(&mut self) -> Result<bool> {
        if self.pending.is_empty() {
            if self.done {
                return Ok(false);
            }
            match self.documents.next() {
                None => {
                    self.finish();
                    return Ok(false);
                }
                Some(Err(err)) => {
                    self.finish();
                    return Err(err.into());
                }
                Some(Ok(doc)) => flatten(doc, &mut self.pending),
            }
        }
        match self.pending.pop_front() {
            Some((token, value)) => {
                self.token = token;
                self.value = value;
                Ok(true)
            }
            None => {
                self.finish();
                Ok(false)
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
