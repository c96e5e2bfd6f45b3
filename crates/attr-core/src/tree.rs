//! Token stream over an in-memory attr tree.
//!
//! [`AttrStreamReader`] yields the tokens a JSON tokenizer would produce for
//! the serialized tree, so any consumer of [`StreamReader`] (the builder,
//! the JSON writer, the wrapping decorator) can read a tree directly.
//! Empty scalars surface as `Null`; `Float` scalars surface as `Float64`
//! with their payload unchanged.

use crate::attr::Attr;
use crate::error::Result;
use crate::stream::{StreamReader, StreamToken};
use crate::value::AttrValue;

enum Frame<'a> {
    Dic(indexmap::map::Iter<'a, String, Attr>),
    List(std::slice::Iter<'a, Attr>),
}

pub struct AttrStreamReader<'a> {
    root: Option<&'a Attr>,
    stack: Vec<Frame<'a>>,
    // Value waiting behind a PropertyName token.
    pending: Option<&'a Attr>,
    token: StreamToken,
    value: Option<AttrValue>,
}

impl<'a> AttrStreamReader<'a> {
    pub fn new(root: &'a Attr) -> Self {
        Self {
            root: Some(root),
            stack: Vec::new(),
            pending: None,
            token: StreamToken::None,
            value: None,
        }
    }

    fn enter(&mut self, attr: &'a Attr) {
        match attr {
            Attr::Value(AttrValue::Empty) => {
                self.token = StreamToken::Null;
                self.value = None;
            }
            Attr::Value(v) => {
                self.token = StreamToken::for_value(v);
                self.value = Some(v.clone());
            }
            Attr::Dic(dic) => {
                self.stack.push(Frame::Dic(dic.iter()));
                self.token = StreamToken::ObjectStart;
                self.value = None;
            }
            Attr::List(list) => {
                self.stack.push(Frame::List(list.iter()));
                self.token = StreamToken::ArrayStart;
                self.value = None;
            }
        }
    }
}

impl StreamReader for AttrStreamReader<'_> {
    fn advance(&mut self) -> Result<bool> {
        if let Some(attr) = self.pending.take().or_else(|| self.root.take()) {
            self.enter(attr);
            return Ok(true);
        }
        match self.stack.last_mut() {
            None => {
                self.token = StreamToken::None;
                self.value = None;
                Ok(false)
            }
            Some(Frame::Dic(entries)) => {
                match entries.next() {
                    Some((key, child)) => {
                        self.pending = Some(child);
                        self.token = StreamToken::PropertyName;
                        self.value = Some(AttrValue::String(key.clone()));
                    }
                    None => {
                        self.stack.pop();
                        self.token = StreamToken::ObjectEnd;
                        self.value = None;
                    }
                }
                Ok(true)
            }
            Some(Frame::List(items)) => {
                match items.next() {
                    Some(child) => self.enter(child),
                    None => {
                        self.stack.pop();
                        self.token = StreamToken::ArrayEnd;
                        self.value = None;
                    }
                }
                Ok(true)
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
