//! JSON Pointer (RFC 6901), JSON Patch (RFC 6902) and tree diffs.
//!
//! Patches are applied atomically: operations run against a copy of the
//! target, which replaces the original only when every operation succeeds.
//!
//! A patch document is a list of dictionaries with `op`, `path` and, per
//! operation, `value` or `from`. [`PatchOperation`] is its typed form.

use crate::attr::Attr;
use crate::dic::AttrDic;
use crate::error::{AttrError, Result};
use crate::list::AttrList;

const OP_KEY: &str = "op";
const PATH_KEY: &str = "path";
const VALUE_KEY: &str = "value";
const FROM_KEY: &str = "from";

type OpResult<T> = std::result::Result<T, String>;

/// One JSON Patch operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOperation {
    Add { path: String, value: Attr },
    Remove { path: String },
    Replace { path: String, value: Attr },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Attr },
}

impl PatchOperation {
    /// The `op` name as written in a patch document.
    pub fn name(&self) -> &'static str {
        match self {
            PatchOperation::Add { .. } => "add",
            PatchOperation::Remove { .. } => "remove",
            PatchOperation::Replace { .. } => "replace",
            PatchOperation::Move { .. } => "move",
            PatchOperation::Copy { .. } => "copy",
            PatchOperation::Test { .. } => "test",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }

    pub fn to_attr(&self) -> Attr {
        let mut dic = AttrDic::with_capacity(3);
        dic.set_value(OP_KEY, self.name());
        if let PatchOperation::Move { from, .. } | PatchOperation::Copy { from, .. } = self {
            dic.set_value(FROM_KEY, from.as_str());
        }
        dic.set_value(PATH_KEY, self.path());
        match self {
            PatchOperation::Add { value, .. }
            | PatchOperation::Replace { value, .. }
            | PatchOperation::Test { value, .. } => {
                dic.set(VALUE_KEY, value.clone());
            }
            _ => {}
        }
        Attr::Dic(dic)
    }

    pub fn from_attr(attr: &Attr) -> Result<Self> {
        read_operation(attr).map_err(|message| AttrError::patch(0, message))
    }
}

fn read_operation(attr: &Attr) -> OpResult<PatchOperation> {
    let Attr::Dic(dic) = attr else {
        return Err(format!("operation must be a dictionary, found {}", attr.attr_type()));
    };
    let required = |key: &str| -> OpResult<String> {
        if dic.contains_key(key) {
            Ok(dic.get_value(key).to_string())
        } else {
            Err(format!("missing '{}'", key))
        }
    };
    let value = || -> OpResult<Attr> {
        if dic.contains_key(VALUE_KEY) {
            Ok(dic.get(VALUE_KEY).clone())
        } else {
            Err(format!("missing '{}'", VALUE_KEY))
        }
    };

    let path = required(PATH_KEY)?;
    match required(OP_KEY)?.as_str() {
        "add" => Ok(PatchOperation::Add { path, value: value()? }),
        "remove" => Ok(PatchOperation::Remove { path }),
        "replace" => Ok(PatchOperation::Replace { path, value: value()? }),
        "move" => Ok(PatchOperation::Move { from: required(FROM_KEY)?, path }),
        "copy" => Ok(PatchOperation::Copy { from: required(FROM_KEY)?, path }),
        "test" => Ok(PatchOperation::Test { path, value: value()? }),
        other => Err(format!("unknown operation '{}'", other)),
    }
}

/// Read a patch document into typed operations.
pub fn patch_from_attr(patch: &Attr) -> Result<Vec<PatchOperation>> {
    let Attr::List(list) = patch else {
        return Err(AttrError::invalid_operation("a patch document must be a list"));
    };
    list.iter()
        .enumerate()
        .map(|(i, op)| read_operation(op).map_err(|message| AttrError::patch(i, message)))
        .collect()
}

/// Write typed operations back as a patch document.
pub fn patch_to_attr(ops: &[PatchOperation]) -> Attr {
    Attr::List(ops.iter().map(PatchOperation::to_attr).collect())
}

/// Escape one reference token: `~` becomes `~0` and `/` becomes `~1`.
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Split a pointer into unescaped reference tokens. The empty pointer
/// refers to the whole document.
pub fn split_pointer(path: &str) -> Result<Vec<String>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(AttrError::Pointer(format!("'{}' does not start with '/'", path)));
    };
    rest.split('/').map(unescape_token).collect()
}

fn unescape_token(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(AttrError::Pointer(format!("invalid escape in '{}'", raw))),
        }
    }
    Ok(out)
}

/// Resolve `path` against `root`.
pub fn pointer<'a>(root: &'a Attr, path: &str) -> Result<&'a Attr> {
    let tokens = split_pointer(path)?;
    resolve(root, &tokens).ok_or_else(|| AttrError::Pointer(format!("'{}' not found", path)))
}

fn resolve<'a>(root: &'a Attr, tokens: &[String]) -> Option<&'a Attr> {
    tokens.iter().try_fold(root, |node, token| match node {
        Attr::Dic(dic) if dic.contains_key(token) => Some(dic.get(token)),
        Attr::List(list) => list_index(token, list.len(), false).map(|i| list.get(i)),
        _ => None,
    })
}

fn resolve_mut<'a>(root: &'a mut Attr, tokens: &[String]) -> Option<&'a mut Attr> {
    tokens.iter().try_fold(root, |node, token| match node {
        Attr::Dic(dic) => dic.get_mut(token),
        Attr::List(list) => {
            let idx = list_index(token, list.len(), false)?;
            list.get_mut(idx)
        }
        Attr::Value(_) => None,
    })
}

/// Array index per RFC 6901: decimal without leading zeros, or `-` for the
/// position past the end when `append` is allowed.
fn list_index(token: &str, len: usize, append: bool) -> Option<usize> {
    if token == "-" {
        return append.then_some(len);
    }
    if token.is_empty()
        || !token.bytes().all(|b| b.is_ascii_digit())
        || (token.len() > 1 && token.starts_with('0'))
    {
        return None;
    }
    let idx = token.parse::<usize>().ok()?;
    let in_range = if append { idx <= len } else { idx < len };
    in_range.then_some(idx)
}

fn parent_of<'a>(root: &'a mut Attr, path: &str) -> OpResult<(&'a mut Attr, String)> {
    let mut tokens = split_pointer(path).map_err(|e| e.to_string())?;
    let Some(last) = tokens.pop() else {
        return Err("the document root has no parent".to_string());
    };
    let parent =
        resolve_mut(root, &tokens).ok_or_else(|| format!("parent of '{}' not found", path))?;
    Ok((parent, last))
}

fn add(root: &mut Attr, path: &str, value: Attr) -> OpResult<()> {
    if path.is_empty() {
        *root = value;
        return Ok(());
    }
    let (parent, last) = parent_of(root, path)?;
    match parent {
        Attr::Dic(dic) => {
            dic.set(last, value);
            Ok(())
        }
        Attr::List(list) => {
            let idx = list_index(&last, list.len(), true)
                .ok_or_else(|| format!("index '{}' out of range", last))?;
            if list.insert(idx, value) {
                Ok(())
            } else {
                Err(format!("list at '{}' refuses duplicates", path))
            }
        }
        Attr::Value(_) => Err(format!("parent of '{}' is not a container", path)),
    }
}

fn remove(root: &mut Attr, path: &str) -> OpResult<Attr> {
    let (parent, last) = parent_of(root, path)?;
    match parent {
        Attr::Dic(dic) => dic.remove(&last).ok_or_else(|| format!("'{}' not found", path)),
        Attr::List(list) => list_index(&last, list.len(), false)
            .and_then(|idx| list.remove_at(idx))
            .ok_or_else(|| format!("index '{}' out of range", last)),
        Attr::Value(_) => Err(format!("parent of '{}' is not a container", path)),
    }
}

fn replace(root: &mut Attr, path: &str, value: Attr) -> OpResult<()> {
    let tokens = split_pointer(path).map_err(|e| e.to_string())?;
    let target = resolve_mut(root, &tokens).ok_or_else(|| format!("'{}' not found", path))?;
    *target = value;
    Ok(())
}

fn apply_one(root: &mut Attr, op: &PatchOperation) -> OpResult<()> {
    match op {
        PatchOperation::Add { path, value } => add(root, path, value.clone()),
        PatchOperation::Remove { path } => remove(root, path).map(drop),
        PatchOperation::Replace { path, value } => replace(root, path, value.clone()),
        PatchOperation::Move { from, path } => {
            if from == path {
                return Ok(());
            }
            if path.starts_with(&format!("{}/", from)) {
                return Err(format!("cannot move '{}' into its own child", from));
            }
            let value = remove(root, from)?;
            add(root, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = pointer(root, from).map_err(|e| e.to_string())?.clone();
            add(root, path, value)
        }
        PatchOperation::Test { path, value } => {
            let actual = pointer(root, path).map_err(|e| e.to_string())?;
            if actual == value {
                Ok(())
            } else {
                Err(format!("test failed at '{}'", path))
            }
        }
    }
}

/// Apply `ops` to `target`. On failure `target` is left untouched and the
/// error names the failing operation.
pub fn apply_patch(target: &mut Attr, ops: &[PatchOperation]) -> Result<()> {
    let mut work = target.clone();
    for (index, op) in ops.iter().enumerate() {
        apply_one(&mut work, op).map_err(|message| AttrError::patch(index, message))?;
        tracing::debug!(index, op = op.name(), path = op.path(), "applied patch operation");
    }
    *target = work;
    Ok(())
}

/// Apply a patch document in its attr form.
pub fn apply_patch_attr(target: &mut Attr, patch: &Attr) -> Result<()> {
    let ops = patch_from_attr(patch)?;
    apply_patch(target, &ops)
}

/// Operations that turn `origin` into `to`.
pub fn diff(origin: &Attr, to: &Attr) -> Vec<PatchOperation> {
    let mut ops = Vec::new();
    diff_into(origin, to, String::new(), &mut ops);
    ops
}

fn child_path(path: &str, token: &str) -> String {
    format!("{}/{}", path, escape_token(token))
}

fn diff_into(origin: &Attr, to: &Attr, path: String, ops: &mut Vec<PatchOperation>) {
    match (origin, to) {
        (Attr::List(a), Attr::List(b)) => diff_lists(a, b, &path, ops),
        (Attr::Dic(a), Attr::Dic(b)) => diff_dics(a, b, &path, ops),
        _ => {
            if origin != to {
                ops.push(PatchOperation::Replace {
                    path,
                    value: to.clone(),
                });
            }
        }
    }
}

fn diff_lists(a: &AttrList, b: &AttrList, path: &str, ops: &mut Vec<PatchOperation>) {
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        diff_into(x, y, child_path(path, &i.to_string()), ops);
    }
    // Descending, so earlier removals do not shift later indices.
    for i in (b.len()..a.len()).rev() {
        ops.push(PatchOperation::Remove {
            path: child_path(path, &i.to_string()),
        });
    }
    for i in a.len()..b.len() {
        ops.push(PatchOperation::Add {
            path: child_path(path, &i.to_string()),
            value: b.get(i).clone(),
        });
    }
}

fn diff_dics(a: &AttrDic, b: &AttrDic, path: &str, ops: &mut Vec<PatchOperation>) {
    for (key, x) in a {
        let kpath = child_path(path, key);
        if b.contains_key(key) {
            diff_into(x, b.get(key), kpath, ops);
        } else {
            ops.push(PatchOperation::Remove { path: kpath });
        }
    }
    for (key, y) in b {
        if !a.contains_key(key) {
            ops.push(PatchOperation::Add {
                path: child_path(path, key),
                value: y.clone(),
            });
        }
    }
}
