use attr_core::{
    parse_str, Attr, AttrConfig, AttrDic, AttrParser, AttrStorage, EscapeMode, JsonBackend,
    JsonSerializer, MemoryAttrStorage, ResponseError, SerializerOptions, TrailingContent,
};

// ============================================================================
// Storage
// ============================================================================

#[test]
fn save_then_load() {
    let mut storage = MemoryAttrStorage::new();
    let doc = parse_str(r#"{"level":3,"items":["a","b"]}"#).unwrap();
    storage.save("progress", &doc).unwrap();

    assert!(storage.has("progress"));
    assert_eq!(storage.load("progress").unwrap(), Some(doc));
    assert_eq!(storage.raw("progress").unwrap(), br#"{"level":3,"items":["a","b"]}"#);
}

#[test]
fn load_missing_key() {
    let storage = MemoryAttrStorage::new();
    assert!(!storage.has("nope"));
    assert_eq!(storage.load("nope").unwrap(), None);
}

#[test]
fn save_overwrites() {
    let mut storage = MemoryAttrStorage::new();
    storage.save("k", &Attr::from(1)).unwrap();
    storage.save("k", &Attr::from(2)).unwrap();
    assert_eq!(storage.len(), 1);
    assert_eq!(storage.load("k").unwrap(), Some(Attr::from(2)));
}

#[test]
fn remove_and_keys() {
    let mut storage = MemoryAttrStorage::new();
    for key in ["b", "a", "c"] {
        storage.save(key, &Attr::from(key)).unwrap();
    }
    assert_eq!(storage.stored_keys(), vec!["a", "b", "c"]);
    storage.remove("b").unwrap();
    storage.remove("b").unwrap();
    assert_eq!(storage.stored_keys(), vec!["a", "c"]);
    assert!(!storage.has("b"));
}

#[test]
fn empty_scalar_survives_storage() {
    let mut storage = MemoryAttrStorage::new();
    storage.save("e", &Attr::empty()).unwrap();
    assert_eq!(storage.raw("e").unwrap(), b"null");
    assert!(storage.load("e").unwrap().unwrap().is_null_or_empty());
}

#[test]
fn corrupt_bytes_fail_to_load() {
    let mut storage = MemoryAttrStorage::new();
    storage.save_raw("bad", b"{\"a\":".to_vec());
    assert!(storage.load("bad").is_err());
}

#[test]
fn custom_codec() {
    let mut storage =
        MemoryAttrStorage::with_codec(AttrParser::new(), JsonSerializer::pretty());
    storage.save("k", &parse_str("[1]").unwrap()).unwrap();
    assert_eq!(storage.raw("k").unwrap(), b"[\n  1\n]");
    assert_eq!(storage.load("k").unwrap(), Some(parse_str("[1]").unwrap()));
}

#[test]
fn storage_as_trait_object() {
    let mut storage: Box<dyn AttrStorage> = Box::new(MemoryAttrStorage::new());
    storage.save("x", &Attr::from(true)).unwrap();
    assert!(storage.has("x"));
}

// ============================================================================
// Response errors
// ============================================================================

#[test]
fn response_without_error() {
    assert_eq!(ResponseError::from_attr(&parse_str(r#"{"data":1}"#).unwrap()), None);
    assert_eq!(ResponseError::from_attr(&parse_str("[1]").unwrap()), None);
    assert_eq!(ResponseError::from_attr(&parse_str(r#"{"error":null}"#).unwrap()), None);
}

#[test]
fn response_with_error_dictionary() {
    let response = parse_str(
        r#"{"error":{"code":401,"message":"expired","client_message":"Please log in","client_localize":"login_required"}}"#,
    )
    .unwrap();
    let err = ResponseError::from_attr(&response).unwrap();
    assert_eq!(err.code, 401);
    assert_eq!(err.message, "expired");
    assert_eq!(err.client_message, "Please log in");
    assert_eq!(err.client_localize, "login_required");
    assert_eq!(err.to_string(), "response error 401: expired");
}

#[test]
fn response_error_fields_default_when_missing() {
    let err = ResponseError::from_attr(&parse_str(r#"{"error":{"code":"7"}}"#).unwrap()).unwrap();
    assert_eq!(err, ResponseError::new(7, ""));
}

#[test]
fn response_error_as_bare_code() {
    let err = ResponseError::from_attr(&parse_str(r#"{"error":12}"#).unwrap()).unwrap();
    assert_eq!(err.code, 12);
}

#[test]
fn response_error_round_trip() {
    let err = ResponseError {
        code: 3,
        message: "m".into(),
        client_message: "c".into(),
        client_localize: "l".into(),
    };
    let attr = err.to_attr();
    assert!(attr.get("error").is_dic());
    assert_eq!(ResponseError::from_attr(&attr), Some(err));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn config_defaults() {
    let config = AttrConfig::default();
    assert_eq!(config.parser.trailing, TrailingContent::Ignore);
    assert_eq!(config.parser.backend, JsonBackend::Native);
    assert_eq!(config.parser.max_depth, attr_core::DEFAULT_MAX_DEPTH);
    assert_eq!(config.serializer, SerializerOptions::default());
    assert_eq!(config.serializer.escape, EscapeMode::Standard);
}

#[test]
fn partial_config_file() {
    let config = AttrConfig::from_json(
        r#"{"parser":{"trailing":"reject","backend":"serde"},"serializer":{"pretty":true}}"#,
    )
    .unwrap();
    assert_eq!(config.parser.trailing, TrailingContent::Reject);
    assert_eq!(config.parser.backend, JsonBackend::Serde);
    assert_eq!(config.parser.max_depth, attr_core::DEFAULT_MAX_DEPTH);
    assert!(config.serializer.pretty);
    assert_eq!(config.serializer.indent, 2);
}

#[test]
fn config_rejects_unknown_enum_values() {
    assert!(AttrConfig::from_json(r#"{"serializer":{"escape":"html"}}"#).is_err());
}

#[test]
fn option_names_parse() {
    assert_eq!("quote-only".parse::<EscapeMode>().unwrap(), EscapeMode::QuoteOnly);
    assert_eq!("serde".parse::<JsonBackend>().unwrap(), JsonBackend::Serde);
    assert_eq!("reject".parse::<TrailingContent>().unwrap(), TrailingContent::Reject);
    let err = "loud".parse::<TrailingContent>().unwrap_err();
    assert!(err.contains("ignore") && err.contains("reject"), "{err}");
}

#[test]
fn option_names_match_config_names() {
    for mode in [EscapeMode::Standard, EscapeMode::QuoteOnly] {
        let name = serde_json::to_value(mode).unwrap();
        assert_eq!(name.as_str().unwrap().parse::<EscapeMode>().unwrap(), mode);
    }
    for backend in [JsonBackend::Native, JsonBackend::Serde] {
        let name = serde_json::to_value(backend).unwrap();
        assert_eq!(name.as_str().unwrap().parse::<JsonBackend>().unwrap(), backend);
    }
}

#[test]
fn config_drives_parser_and_serializer() {
    let config = AttrConfig::from_json(r#"{"serializer":{"escape":"quote-only"}}"#).unwrap();
    let attr = AttrParser::with_options(config.parser).parse_str(r#"{"k":"a\\b"}"#).unwrap();
    let mut dic = AttrDic::new();
    dic.set_value("k", "a\\b");
    assert_eq!(attr, Attr::from(dic));
    let text = JsonSerializer::with_options(config.serializer)
        .serialize_to_string(&attr)
        .unwrap();
    assert_eq!(text, r#"{"k":"a\b"}"#);
}
