use engine::model::action::{ActionFlow, ActionStep};
use engine::model::binding::Bind;
use engine::model::document::{RawNode, parse_document};
use engine::model::value::PropValue;

use ordered_float::OrderedFloat;

#[test]
fn test_document_serialization_roundtrip() {
    let source = r#"{
        "type": "container",
        "refName": "screen",
        "commonProps": { "visible": "$.state.shown", "padding": 16 },
        "props": { "axis": "vertical", "spacing": 8 },
        "children": {
            "children": [
                { "type": "text", "props": { "text": "$.state.title", "size": 24 } },
                {
                    "type": "button",
                    "props": {
                        "label": "Reload",
                        "onTap": [
                            { "type": "sendRequest", "url": "$.state.endpoint", "bindTo": "reply" },
                            { "type": "setState", "key": "title", "value": "$.reply.body.title" }
                        ]
                    }
                }
            ]
        }
    }"#;

    let document = parse_document(source).expect("Failed to parse document");
    assert_eq!(document.node_type, "container");
    assert_eq!(document.ref_name.as_deref(), Some("screen"));
    assert_eq!(document.slot("children").len(), 2);

    // Serialize
    let json = serde_json::to_string(&document).expect("Failed to serialize document");

    // Deserialize
    let loaded: RawNode = serde_json::from_str(&json).expect("Failed to deserialize document");

    // Assert
    assert_eq!(document, loaded, "Roundtrip failed: documents are not equal");
    assert_eq!(loaded.slot("children")[1].node_type, "button");
}

#[test]
fn test_prop_value_json_conversion() {
    let json: serde_json::Value = serde_json::from_str(
        r#"{ "items": [ { "name": "A", "score": 1.5 } ], "count": 2, "live": true }"#,
    )
    .unwrap();

    let value = PropValue::from(json.clone());
    assert_eq!(value.field("count"), Some(&PropValue::Integer(2)));
    assert_eq!(value.field("live"), Some(&PropValue::Bool(true)));
    assert_eq!(
        value
            .field("items")
            .and_then(|items| items.index(0))
            .and_then(|item| item.field("score")),
        Some(&PropValue::Number(OrderedFloat(1.5)))
    );

    let back = serde_json::Value::from(&value);
    assert_eq!(back, json);
}

#[test]
fn test_flow_parsed_from_node_props() {
    let node: RawNode = serde_json::from_value(serde_json::json!({
        "type": "button",
        "props": {
            "onTap": {
                "steps": [
                    { "type": "delay", "ms": 100 },
                    { "type": "navigate", "route": "/detail", "params": { "id": "$.currentItem.id" } }
                ],
                "onError": [
                    { "type": "setState", "key": "lastError", "value": "$.error.message" }
                ]
            }
        }
    }))
    .unwrap();

    let flow = node.flow("onTap").unwrap().unwrap();
    assert_eq!(flow.steps.len(), 2);
    assert_eq!(flow.on_error.len(), 1);

    match &flow.steps[0] {
        ActionStep::Delay { ms } => assert_eq!(ms, &Bind::Value(100)),
        other => panic!("Expected delay step, got {:?}", other),
    }
    match &flow.steps[1] {
        ActionStep::Navigate { route, params } => {
            assert_eq!(route, &Bind::Value("/detail".to_string()));
            assert!(params.get("id").unwrap().is_expr());
        }
        other => panic!("Expected navigate step, got {:?}", other),
    }
}

#[test]
fn test_malformed_flow_is_a_document_error() {
    let raw = serde_json::json!([{ "type": "setState", "key": "x", "value": { "nested": true } }]);
    // Object literals coerce to PropValue maps, so this parses.
    assert!(ActionFlow::from_json(&raw).is_ok());

    let raw = serde_json::json!([{ "type": "delay", "ms": "soon" }]);
    // A non-numeric, non-expression delay cannot resolve; reject at parse.
    assert!(ActionFlow::from_json(&raw).is_err());
}
