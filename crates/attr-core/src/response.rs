//! Error payloads embedded in response trees.
//!
//! A response dictionary reports a failure under the reserved `"error"`
//! key:
//!
//! ```json
//! {"error": {"code": 4, "message": "...", "client_message": "...", "client_localize": "..."}}
//! ```

use crate::attr::Attr;
use crate::dic::AttrDic;
use thiserror::Error;

pub const ERROR_KEY: &str = "error";
const CODE_KEY: &str = "code";
const MESSAGE_KEY: &str = "message";
const CLIENT_MESSAGE_KEY: &str = "client_message";
const CLIENT_LOCALIZE_KEY: &str = "client_localize";

#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("response error {code}: {message}")]
pub struct ResponseError {
    pub code: i32,
    pub message: String,
    pub client_message: String,
    pub client_localize: String,
}

impl ResponseError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Self::default()
        }
    }

    /// The error carried by `response`, if any. A bare scalar under
    /// `"error"` is read as the code.
    pub fn from_attr(response: &Attr) -> Option<Self> {
        let Attr::Dic(dic) = response else {
            return None;
        };
        if !dic.contains_key(ERROR_KEY) {
            return None;
        }
        match dic.get(ERROR_KEY) {
            Attr::Dic(err) => Some(Self {
                code: err.get_value(CODE_KEY).to_int(),
                message: err.get_value(MESSAGE_KEY).to_string(),
                client_message: err.get_value(CLIENT_MESSAGE_KEY).to_string(),
                client_localize: err.get_value(CLIENT_LOCALIZE_KEY).to_string(),
            }),
            Attr::Value(v) if !v.is_empty() => Some(Self::new(v.to_int(), "")),
            _ => None,
        }
    }

    /// The `{"error": {...}}` dictionary for this error.
    pub fn to_attr(&self) -> Attr {
        let mut err = AttrDic::with_capacity(4);
        err.set_value(CODE_KEY, self.code);
        err.set_value(MESSAGE_KEY, self.message.as_str());
        err.set_value(CLIENT_MESSAGE_KEY, self.client_message.as_str());
        err.set_value(CLIENT_LOCALIZE_KEY, self.client_localize.as_str());
        let mut response = AttrDic::with_capacity(1);
        response.set(ERROR_KEY, err);
        Attr::Dic(response)
    }
}
