use attr_core::patch::{escape_token, patch_from_attr, patch_to_attr, split_pointer};
use attr_core::{
    apply_patch, apply_patch_attr, diff, parse_str, pointer, Attr, AttrError, PatchOperation,
};

fn json(text: &str) -> Attr {
    parse_str(text).unwrap()
}

/// Apply a patch document given as JSON and return the result.
fn patched(doc: &str, patch: &str) -> attr_core::Result<Attr> {
    let mut target = json(doc);
    apply_patch_attr(&mut target, &json(patch))?;
    Ok(target)
}

fn assert_patched(doc: &str, patch: &str, expected: &str) {
    assert_eq!(patched(doc, patch).unwrap(), json(expected), "patch {patch}");
}

fn assert_diff_round_trip(from: &str, to: &str) {
    let (from, to) = (json(from), json(to));
    let ops = diff(&from, &to);
    let mut target = from.clone();
    apply_patch(&mut target, &ops).unwrap();
    assert_eq!(target, to, "ops: {ops:?}");
}

// ============================================================================
// Pointers
// ============================================================================

#[test]
fn pointer_lookup() {
    let doc = json(r#"{"a":{"b":[10,20]},"":1,"x/y":2,"m~n":3}"#);
    assert_eq!(pointer(&doc, "").unwrap(), &doc);
    assert_eq!(pointer(&doc, "/a/b/1").unwrap(), &Attr::from(20));
    assert_eq!(pointer(&doc, "/").unwrap(), &Attr::from(1));
    assert_eq!(pointer(&doc, "/x~1y").unwrap(), &Attr::from(2));
    assert_eq!(pointer(&doc, "/m~0n").unwrap(), &Attr::from(3));
}

#[test]
fn pointer_misses() {
    let doc = json(r#"{"a":[1]}"#);
    for path in ["/b", "/a/1", "/a/-", "/a/01", "/a/x", "/a/0/z", "a"] {
        assert!(matches!(pointer(&doc, path), Err(AttrError::Pointer(_))), "{path}");
    }
}

#[test]
fn token_escaping() {
    assert_eq!(escape_token("a/b~c"), "a~1b~0c");
    assert_eq!(split_pointer("/a~1b~0c/d").unwrap(), vec!["a/b~c", "d"]);
    assert!(split_pointer("/bad~2").is_err());
    assert!(split_pointer("").unwrap().is_empty());
}

// ============================================================================
// Operations
// ============================================================================

#[test]
fn add_operations() {
    assert_patched(r#"{"a":1}"#, r#"[{"op":"add","path":"/b","value":[1]}]"#, r#"{"a":1,"b":[1]}"#);
    assert_patched(r#"{"a":1}"#, r#"[{"op":"add","path":"/a","value":2}]"#, r#"{"a":2}"#);
    assert_patched(r#"[1,3]"#, r#"[{"op":"add","path":"/1","value":2}]"#, r#"[1,2,3]"#);
    assert_patched(r#"[1]"#, r#"[{"op":"add","path":"/-","value":2}]"#, r#"[1,2]"#);
    assert_patched(r#"[1]"#, r#"[{"op":"add","path":"/1","value":2}]"#, r#"[1,2]"#);
    assert_patched(r#"{}"#, r#"[{"op":"add","path":"","value":"root"}]"#, r#""root""#);
}

#[test]
fn add_with_null_value() {
    assert_patched(r#"{}"#, r#"[{"op":"add","path":"/n","value":null}]"#, r#"{"n":null}"#);
}

#[test]
fn remove_operations() {
    assert_patched(r#"{"a":1,"b":2}"#, r#"[{"op":"remove","path":"/a"}]"#, r#"{"b":2}"#);
    assert_patched(r#"[1,2,3]"#, r#"[{"op":"remove","path":"/1"}]"#, r#"[1,3]"#);
    assert_patched(r#"{"a":{"b":[1,2]}}"#, r#"[{"op":"remove","path":"/a/b/0"}]"#, r#"{"a":{"b":[2]}}"#);
}

#[test]
fn replace_operations() {
    assert_patched(r#"{"a":1}"#, r#"[{"op":"replace","path":"/a","value":{"x":1}}]"#, r#"{"a":{"x":1}}"#);
    assert_patched(r#"[1,2]"#, r#"[{"op":"replace","path":"/0","value":9}]"#, r#"[9,2]"#);
    assert_patched(r#"[1]"#, r#"[{"op":"replace","path":"","value":{}}]"#, r#"{}"#);
}

#[test]
fn move_and_copy() {
    assert_patched(
        r#"{"a":{"x":1},"b":{}}"#,
        r#"[{"op":"move","from":"/a/x","path":"/b/y"}]"#,
        r#"{"a":{},"b":{"y":1}}"#,
    );
    assert_patched(r#"[1,2,3]"#, r#"[{"op":"move","from":"/0","path":"/-"}]"#, r#"[2,3,1]"#);
    assert_patched(
        r#"{"a":[1]}"#,
        r#"[{"op":"copy","from":"/a","path":"/b"}]"#,
        r#"{"a":[1],"b":[1]}"#,
    );
    assert_patched(r#"{"a":1}"#, r#"[{"op":"move","from":"/a","path":"/a"}]"#, r#"{"a":1}"#);
}

#[test]
fn copy_is_independent() {
    let result = patched(
        r#"{"a":{"k":1}}"#,
        r#"[{"op":"copy","from":"/a","path":"/b"},{"op":"replace","path":"/b/k","value":2}]"#,
    )
    .unwrap();
    assert_eq!(result, json(r#"{"a":{"k":1},"b":{"k":2}}"#));
}

#[test]
fn test_operation() {
    assert_patched(r#"{"a":[1,"x"]}"#, r#"[{"op":"test","path":"/a","value":[1,"x"]}]"#, r#"{"a":[1,"x"]}"#);
    assert!(patched(r#"{"a":1}"#, r#"[{"op":"test","path":"/a","value":2}]"#).is_err());
    assert!(patched(r#"{"a":1}"#, r#"[{"op":"test","path":"/b","value":1}]"#).is_err());
}

// ============================================================================
// Failures and atomicity
// ============================================================================

#[test]
fn failing_operations() {
    for (doc, patch) in [
        (r#"{}"#, r#"[{"op":"remove","path":"/nope"}]"#),
        (r#"[1]"#, r#"[{"op":"remove","path":"/5"}]"#),
        (r#"[1]"#, r#"[{"op":"add","path":"/3","value":1}]"#),
        (r#"{}"#, r#"[{"op":"add","path":"/a/b","value":1}]"#),
        (r#"{"a":1}"#, r#"[{"op":"add","path":"/a/b","value":1}]"#),
        (r#"{}"#, r#"[{"op":"replace","path":"/a","value":1}]"#),
        (r#"{"a":{}}"#, r#"[{"op":"move","from":"/a","path":"/a/b"}]"#),
        (r#"{}"#, r#"[{"op":"copy","from":"/x","path":"/y"}]"#),
        (r#"{}"#, r#"[{"op":"remove","path":""}]"#),
    ] {
        assert!(
            matches!(patched(doc, patch), Err(AttrError::Patch { index: 0, .. })),
            "{patch} on {doc}"
        );
    }
}

#[test]
fn failed_patch_leaves_target_untouched() {
    let mut target = json(r#"{"a":1}"#);
    let patch = json(r#"[{"op":"add","path":"/b","value":2},{"op":"remove","path":"/missing"}]"#);
    match apply_patch_attr(&mut target, &patch) {
        Err(AttrError::Patch { index, .. }) => assert_eq!(index, 1),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(target, json(r#"{"a":1}"#));
}

#[test]
fn malformed_patch_documents() {
    assert!(patch_from_attr(&json(r#"{"op":"add"}"#)).is_err());
    for bad in [
        r#"[{"op":"add","path":"/a"}]"#,
        r#"[{"op":"move","path":"/a"}]"#,
        r#"[{"op":"frobnicate","path":"/a"}]"#,
        r#"[{"path":"/a"}]"#,
        r#"[{"op":"remove"}]"#,
        r#"[1]"#,
    ] {
        assert!(
            matches!(patch_from_attr(&json(bad)), Err(AttrError::Patch { index: 0, .. })),
            "{bad}"
        );
    }
}

#[test]
fn operations_round_trip_through_attr() {
    let ops = vec![
        PatchOperation::Add { path: "/a".into(), value: Attr::from(1) },
        PatchOperation::Remove { path: "/b".into() },
        PatchOperation::Move { from: "/c".into(), path: "/d".into() },
        PatchOperation::Test { path: "/e".into(), value: Attr::empty() },
    ];
    let doc = patch_to_attr(&ops);
    assert_eq!(doc.at(2).get("from").as_value().to_string(), "/c");
    assert_eq!(patch_from_attr(&doc).unwrap(), ops);
    assert_eq!(PatchOperation::from_attr(doc.at(1)).unwrap(), ops[1]);
}

// ============================================================================
// Diff
// ============================================================================

#[test]
fn diff_of_equal_trees_is_empty() {
    let doc = json(r#"{"a":[1,{"b":null}]}"#);
    assert!(diff(&doc, &doc.clone()).is_empty());
}

#[test]
fn diff_scalar_change() {
    let ops = diff(&json(r#"{"a":1}"#), &json(r#"{"a":2}"#));
    assert_eq!(ops, vec![PatchOperation::Replace { path: "/a".into(), value: Attr::from(2) }]);
}

#[test]
fn diff_kind_change_replaces() {
    let ops = diff(&json(r#"{"a":[1]}"#), &json(r#"{"a":{"0":1}}"#));
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].name(), "replace");
}

#[test]
fn diff_list_shrink_removes_descending() {
    let ops = diff(&json("[1,2,3,4]"), &json("[1,2]"));
    let paths: Vec<_> = ops.iter().map(|op| (op.name(), op.path().to_string())).collect();
    assert_eq!(paths, vec![("remove", "/3".to_string()), ("remove", "/2".to_string())]);
}

#[test]
fn diff_list_growth_adds_in_order() {
    let ops = diff(&json("[1]"), &json("[1,2,3]"));
    let paths: Vec<_> = ops.iter().map(|op| op.path().to_string()).collect();
    assert_eq!(paths, vec!["/1", "/2"]);
}

#[test]
fn diff_escapes_keys() {
    let ops = diff(&json(r#"{}"#), &json(r#"{"a/b~c":1}"#));
    assert_eq!(ops[0].path(), "/a~1b~0c");
}

#[test]
fn diff_then_patch_reaches_target() {
    assert_diff_round_trip(r#"{"a":1,"b":[1,2,3],"c":{"d":"x"}}"#, r#"{"a":"1","b":[1,5],"e":true,"c":{}}"#);
    assert_diff_round_trip("[1,[2,3],{}]", r#"[1,[2],{"k":[]},4,5]"#);
    assert_diff_round_trip(r#"{"x/y":1}"#, r#"{"x/y":2,"~":3}"#);
    assert_diff_round_trip("1", r#"{"a":1}"#);
}
