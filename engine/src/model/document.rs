use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::action::ActionFlow;
use crate::model::binding::Bind;
use crate::model::value::FromPropValue;

/// One node of the raw document tree, exactly as the server sent it.
/// Builders shape this into typed virtual nodes; nothing renders from a
/// `RawNode` directly.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, rename = "refName", skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,

    #[serde(
        default,
        rename = "commonProps",
        skip_serializing_if = "Option::is_none"
    )]
    pub common_props: Option<serde_json::Value>,

    /// Layout props assigned by the enclosing node, opaque to the engine.
    #[serde(
        default,
        rename = "parentProps",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_props: Option<serde_json::Value>,

    #[serde(default)]
    pub props: serde_json::Map<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub children: HashMap<String, SlotChildren>,
}

/// A slot holds either one well-known child or an ordered group.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum SlotChildren {
    One(Box<RawNode>),
    Many(Vec<RawNode>),
}

impl SlotChildren {
    pub fn as_slice(&self) -> &[RawNode] {
        match self {
            SlotChildren::One(node) => std::slice::from_ref(node.as_ref()),
            SlotChildren::Many(nodes) => nodes,
        }
    }
}

pub fn parse_document(json: &str) -> Result<RawNode, EngineError> {
    Ok(serde_json::from_str(json)?)
}

impl RawNode {
    pub fn prop(&self, key: &str) -> Option<&serde_json::Value> {
        self.props.get(key)
    }

    /// Typed binding for a prop; absent when the key is missing or the
    /// literal does not coerce.
    pub fn bind<T>(&self, key: &str) -> Option<Bind<T>>
    where
        T: FromPropValue + Clone,
    {
        self.prop(key).and_then(Bind::from_raw)
    }

    pub fn bind_or<T>(&self, key: &str, default: T) -> Bind<T>
    where
        T: FromPropValue + Clone,
    {
        self.bind(key).unwrap_or(Bind::Value(default))
    }

    /// Parses an action flow prop (e.g. `onTap`). A malformed flow is a
    /// document error so authors hear about it at build time, not at tap
    /// time.
    pub fn flow(&self, key: &str) -> Result<Option<Arc<ActionFlow>>, EngineError> {
        match self.prop(key) {
            Some(raw) => Ok(Some(Arc::new(ActionFlow::from_json(raw)?))),
            None => Ok(None),
        }
    }

    pub fn slot(&self, name: &str) -> &[RawNode] {
        self.children
            .get(name)
            .map(SlotChildren::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_document_with_named_slots() {
        let doc = parse_document(
            r#"{
                "type": "container",
                "refName": "rootBox",
                "commonProps": { "visible": true },
                "props": { "axis": "vertical" },
                "children": {
                    "children": [
                        { "type": "text", "props": { "text": "hi" } }
                    ],
                    "header": { "type": "text", "props": { "text": "$.title" } }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(doc.node_type, "container");
        assert_eq!(doc.ref_name.as_deref(), Some("rootBox"));
        assert_eq!(doc.slot("children").len(), 1);
        assert_eq!(doc.slot("header").len(), 1);
        assert_eq!(doc.slot("footer").len(), 0);
        assert_eq!(doc.slot("header")[0].node_type, "text");
    }

    #[test]
    fn bind_helpers_read_props() {
        let node: RawNode = serde_json::from_value(json!({
            "type": "text",
            "props": { "text": "$.user.name", "size": 14 }
        }))
        .unwrap();

        assert!(node.bind::<String>("text").unwrap().is_expr());
        assert_eq!(node.bind::<f64>("size"), Some(Bind::Value(14.0)));
        assert_eq!(node.bind::<f64>("missing"), None);
        assert_eq!(node.bind_or::<f64>("missing", 12.0), Bind::Value(12.0));
    }

    #[test]
    fn flow_prop_parses_or_errors() {
        let node: RawNode = serde_json::from_value(json!({
            "type": "button",
            "props": {
                "onTap": [ { "type": "setState", "key": "n", "value": 1 } ],
                "onBad": [ { "type": "nonsense" } ]
            }
        }))
        .unwrap();

        assert_eq!(node.flow("onTap").unwrap().unwrap().steps.len(), 1);
        assert!(node.flow("onBad").is_err());
        assert!(node.flow("onMissing").unwrap().is_none());
    }
}
