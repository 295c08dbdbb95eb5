use std::sync::Arc;

use crate::error::EngineError;
use crate::model::action::ActionFlow;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::node::{NodeIdentity, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{EventHook, Primitive, RenderedNode};

pub struct ButtonBuilder;

impl WidgetBuilder for ButtonBuilder {
    fn type_tag(&self) -> &'static str {
        "button"
    }

    fn build(
        &self,
        raw: &RawNode,
        _registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        Ok(Arc::new(ButtonNode {
            identity: NodeIdentity::from_raw(raw),
            label: raw.bind_or("label", String::new()),
            enabled: raw.bind_or("enabled", true),
            on_tap: raw.flow("onTap")?,
        }))
    }
}

pub struct ButtonNode {
    identity: NodeIdentity,
    label: Bind<String>,
    enabled: Bind<bool>,
    on_tap: Option<Arc<ActionFlow>>,
}

impl WidgetNode for ButtonNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    fn render(&self, payload: &RenderPayload) -> RenderedNode {
        if !self.identity.visible(payload) {
            return self.identity.hidden();
        }
        // The hook captures the scope active at this render site, so a
        // button inside a list item dispatches with that item's bindings.
        let events = self
            .on_tap
            .iter()
            .map(|flow| EventHook {
                event: "tap".to_string(),
                flow: Arc::clone(flow),
                scope: payload.scope.clone(),
            })
            .collect();
        self.identity.rendered(
            payload,
            Primitive::Button {
                label: payload.resolve(&self.label).unwrap_or_default(),
                enabled: payload.resolve(&self.enabled).unwrap_or(true),
            },
            events,
            Vec::new(),
        )
    }
}
