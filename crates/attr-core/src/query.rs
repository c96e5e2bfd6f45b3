//! URL query string parser.
//!
//! Parses `a=1&b[x]=2&c[]=3&c[]=4` style input straight into a dictionary.
//! Keys and values are percent-decoded (`+` is a space) and every leaf is a
//! string scalar. Bracketed segments after the base key descend into nested
//! containers: numeric or empty segments create lists, anything else creates
//! dictionaries. An empty segment appends.
//!
//! A list that later meets a segment it cannot hold, a name or an index past
//! its end, is turned into a dictionary in place. Its existing children keep
//! their index as key.
//!
//! Pieces without `=` are collected in a list under the empty key.

use crate::attr::Attr;
use crate::dic::AttrDic;
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, Default)]
pub struct UrlQueryAttrParser;

impl UrlQueryAttrParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(&self, query: &str) -> Attr {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut root = AttrDic::new();
        for piece in query.split('&').filter(|p| !p.is_empty()) {
            let Some((key, value)) = form_urlencoded::parse(piece.as_bytes()).next() else {
                continue;
            };
            if piece.contains('=') {
                let (base, segments) = split_key(&key);
                let slot = root.get_or_insert_with(base, Attr::empty);
                assign(slot, &segments, value.into_owned());
            } else {
                let slot = root.get_or_insert_with("", Attr::empty);
                assign(slot, &[""], key.into_owned());
            }
        }
        Attr::Dic(root)
    }
}

/// Parse a query string with the default parser.
pub fn parse_query(query: &str) -> Attr {
    UrlQueryAttrParser::new().parse(query)
}

/// Split `name[a][b]` into `name` and `["a", "b"]`. A key that does not
/// follow that shape is taken literally.
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    if open == 0 {
        return (key, Vec::new());
    }
    let (base, mut rest) = key.split_at(open);
    let mut segments = Vec::new();
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return (key, Vec::new());
        };
        let Some(close) = inner.find(']') else {
            return (key, Vec::new());
        };
        let segment = &inner[..close];
        if segment.contains('[') {
            return (key, Vec::new());
        }
        segments.push(segment);
        rest = &inner[close + 1..];
    }
    (base, segments)
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn assign(slot: &mut Attr, segments: &[&str], value: String) {
    let Some((&segment, rest)) = segments.split_first() else {
        *slot = Attr::from(value);
        return;
    };

    if slot.is_value() {
        *slot = if segment.is_empty() || is_index(segment) {
            Attr::List(Default::default())
        } else {
            Attr::Dic(AttrDic::new())
        };
    }

    if let Attr::List(list) = slot {
        let fits = segment.is_empty()
            || (is_index(segment) && segment.parse::<usize>().is_ok_and(|i| i <= list.len()));
        if !fits {
            tracing::trace!(segment, len = list.len(), "converting query list to dictionary");
            let list = std::mem::take(list);
            *slot = Attr::Dic(list.into_dic());
        }
    }

    match slot {
        Attr::List(list) => {
            let idx = segment.parse::<usize>().unwrap_or(list.len());
            if idx == list.len() {
                list.add(Attr::empty());
            }
            if let Some(child) = list.get_mut(idx) {
                assign(child, rest, value);
            }
        }
        Attr::Dic(dic) => {
            let key = if segment.is_empty() {
                dic.len().to_string()
            } else {
                segment.to_string()
            };
            assign(dic.get_or_insert_with(key, Attr::empty), rest, value);
        }
        Attr::Value(_) => {}
    }
}
