use knap_utils::{dejsonify, jsonify, jsonify_internal, load_json_arg};
use serde_json::json;

#[test]
fn test_jsonify_sorts_keys() {
    let value = json!({
        "capacity": 50,
        "items": [{"weight": 10, "value": 60, "id": 1}],
        "algorithm": "greedy",
    });
    assert_eq!(
        jsonify(&value).unwrap(),
        r#"{"algorithm":"greedy","capacity":50,"items":[{"id":1,"value":60,"weight":10}]}"#
    );
}

#[test]
fn test_jsonify_internal_leaves_scalars() {
    assert_eq!(jsonify_internal(&json!(7)), json!(7));
    assert_eq!(jsonify_internal(&json!("x")), json!("x"));
    assert_eq!(jsonify_internal(&json!(null)), json!(null));
}

#[test]
fn test_dejsonify() {
    let v: Vec<u32> = dejsonify("[1,2,3]").unwrap();
    assert_eq!(v, vec![1, 2, 3]);
    assert!(dejsonify::<Vec<u32>>("[1,").is_err());
}

#[test]
fn test_load_json_arg_inline() {
    assert_eq!(load_json_arg(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
}

#[test]
fn test_load_json_arg_missing_file() {
    let err = load_json_arg("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}
