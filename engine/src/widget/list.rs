use std::sync::Arc;

use crate::error::EngineError;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::model::value::PropValue;
use crate::node::{NodeIdentity, Slots, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{Axis, Primitive, RenderedNode};

pub struct ListBuilder;

impl WidgetBuilder for ListBuilder {
    fn type_tag(&self) -> &'static str {
        "list"
    }

    fn build(
        &self,
        raw: &RawNode,
        registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        let mut slots = Slots::new();
        slots.insert("template", registry.build_slot(raw.slot("template")));
        Ok(Arc::new(ListNode {
            identity: NodeIdentity::from_raw(raw),
            data_source: raw.bind_or("dataSource", Vec::new()),
            spacing: raw.bind_or("spacing", 0.0),
            slots,
        }))
    }
}

/// Repeater. The template subtree is built once; each render pass renders
/// it once per item under a derived payload exposing `currentItem` and
/// `index` to that item's subtree only.
pub struct ListNode {
    identity: NodeIdentity,
    data_source: Bind<Vec<PropValue>>,
    spacing: Bind<f64>,
    slots: Slots,
}

impl WidgetNode for ListNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    fn slots(&self) -> Option<&Slots> {
        Some(&self.slots)
    }

    fn render(&self, payload: &RenderPayload) -> RenderedNode {
        if !self.identity.visible(payload) {
            return self.identity.hidden();
        }
        let items = payload.resolve(&self.data_source).unwrap_or_default();
        let mut children = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let item_payload = payload.chained(
                [
                    ("currentItem".to_string(), item),
                    ("index".to_string(), PropValue::Integer(index as i64)),
                ]
                .into_iter()
                .collect(),
            );
            children.extend(self.slots.render_group("template", &item_payload));
        }
        self.identity.rendered(
            payload,
            Primitive::Container {
                axis: Axis::Vertical,
                spacing: payload.resolve(&self.spacing).unwrap_or(0.0),
            },
            Vec::new(),
            children,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::bare_payload;
    use crate::scope::ScopeContext;
    use serde_json::json;

    #[test]
    fn renders_template_once_per_item_with_chained_scope() {
        let registry = NodeRegistry::with_builtins();
        let raw: RawNode = serde_json::from_value(json!({
            "type": "list",
            "props": { "dataSource": "$.items" },
            "children": {
                "template": [
                    { "type": "text", "props": { "text": "$.currentItem.name" } }
                ]
            }
        }))
        .unwrap();
        let node = registry.create_widget(&raw).unwrap();

        let mut payload = bare_payload();
        payload.scope = ScopeContext::root(
            [(
                "items".to_string(),
                PropValue::Array(vec![
                    PropValue::object([("name".to_string(), PropValue::from("A"))]),
                    PropValue::object([("name".to_string(), PropValue::from("B"))]),
                ]),
            )]
            .into_iter()
            .collect(),
        );

        let rendered = node.render(&payload);
        assert_eq!(rendered.children.len(), 2);
        let texts: Vec<_> = rendered
            .children
            .iter()
            .map(|child| match &child.primitive {
                Primitive::Text { content, .. } => content.clone(),
                other => panic!("Expected text, got {:?}", other),
            })
            .collect();
        assert_eq!(texts, vec!["A", "B"]);
    }

    #[test]
    fn unresolved_data_source_renders_no_items() {
        let registry = NodeRegistry::with_builtins();
        let raw: RawNode = serde_json::from_value(json!({
            "type": "list",
            "props": { "dataSource": "$.ghost" },
            "children": { "template": [ { "type": "text" } ] }
        }))
        .unwrap();
        let node = registry.create_widget(&raw).unwrap();

        let rendered = node.render(&bare_payload());
        assert!(rendered.children.is_empty());
    }
}
