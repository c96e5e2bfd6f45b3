//! Decorator that nests another stream under a fixed key path.
//!
//! Wrapping the stream of `X` under `["a", "b"]` yields the tokens of
//! `{"a": {"b": X}}`. The inner tokens are passed through as they are read;
//! nothing is buffered. When the inner stream is empty the envelope still
//! closes properly, holding `null`. Whatever the inner stream yields after
//! its root element follows the envelope unchanged, so trailing content and
//! late lex errors surface exactly as they would without the wrapper.

use crate::error::Result;
use crate::stream::{StreamReader, StreamToken};
use crate::value::AttrValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Next synthetic prefix token, counting ObjectStart and PropertyName.
    Prefix(usize),
    /// Inner stream is positioned; `depth` counts its open containers.
    Delegating { depth: usize },
    /// Closing brackets already emitted.
    Suffix(usize),
    /// Envelope closed; inner tokens after its root pass through.
    Trailing,
    Done,
}

#[derive(Debug)]
pub struct WrappedStreamReader<R> {
    inner: R,
    path: Vec<String>,
    phase: Phase,
    // Whether the current token comes from `inner`.
    delegated: bool,
    token: StreamToken,
    value: Option<AttrValue>,
}

impl<R: StreamReader> WrappedStreamReader<R> {
    pub fn new<I, S>(inner: R, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner,
            path: path.into_iter().map(Into::into).collect(),
            phase: Phase::Prefix(0),
            delegated: false,
            token: StreamToken::None,
            value: None,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn synthetic(&mut self, token: StreamToken, value: Option<AttrValue>) -> Result<bool> {
        self.delegated = false;
        self.token = token;
        self.value = value;
        Ok(token != StreamToken::None)
    }
}

impl<R: StreamReader> StreamReader for WrappedStreamReader<R> {
    fn advance(&mut self) -> Result<bool> {
        loop {
            match self.phase {
                Phase::Prefix(i) if i == 2 * self.path.len() => {
                    self.phase = Phase::Delegating { depth: 0 };
                }
                Phase::Prefix(i) => {
                    self.phase = Phase::Prefix(i + 1);
                    return if i % 2 == 0 {
                        self.synthetic(StreamToken::ObjectStart, None)
                    } else {
                        let key = AttrValue::String(self.path[i / 2].clone());
                        self.synthetic(StreamToken::PropertyName, Some(key))
                    };
                }
                Phase::Delegating { depth } => {
                    if !self.inner.advance()? {
                        if depth > 0 || self.path.is_empty() {
                            self.phase = Phase::Done;
                            continue;
                        }
                        self.phase = Phase::Suffix(0);
                        return self.synthetic(StreamToken::Null, None);
                    }
                    let depth = match self.inner.current_token() {
                        StreamToken::ObjectStart | StreamToken::ArrayStart => depth + 1,
                        StreamToken::ObjectEnd | StreamToken::ArrayEnd => depth.saturating_sub(1),
                        _ => depth,
                    };
                    self.phase = if depth == 0 {
                        Phase::Suffix(0)
                    } else {
                        Phase::Delegating { depth }
                    };
                    self.delegated = true;
                    return Ok(true);
                }
                Phase::Suffix(i) if i == self.path.len() => {
                    self.phase = Phase::Trailing;
                }
                Phase::Suffix(i) => {
                    self.phase = Phase::Suffix(i + 1);
                    return self.synthetic(StreamToken::ObjectEnd, None);
                }
                Phase::Trailing => match self.inner.advance() {
                    Ok(true) => {
                        self.delegated = true;
                        return Ok(true);
                    }
                    Ok(false) => self.phase = Phase::Done,
                    Err(err) => {
                        self.phase = Phase::Done;
                        self.synthetic(StreamToken::None, None)?;
                        return Err(err);
                    }
                },
                Phase::Done => return self.synthetic(StreamToken::None, None),
            }
        }
    }

    fn current_token(&self) -> StreamToken {
        if self.delegated {
            self.inner.current_token()
        } else {
            self.token
        }
    }

    fn current_value(&self) -> Option<&AttrValue> {
        if self.delegated {
            self.inner.current_value()
        } else {
            self.value.as_ref()
        }
    }
}
