use std::sync::Arc;

use crate::error::EngineError;
use crate::model::action::ActionFlow;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::node::{NodeIdentity, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{EventHook, Primitive, RenderedNode};

pub struct TextInputBuilder;

impl WidgetBuilder for TextInputBuilder {
    fn type_tag(&self) -> &'static str {
        "textInput"
    }

    fn build(
        &self,
        raw: &RawNode,
        _registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        Ok(Arc::new(TextInputNode {
            identity: NodeIdentity::from_raw(raw),
            value: raw.bind_or("value", String::new()),
            placeholder: raw.bind("placeholder"),
            on_change: raw.flow("onChange")?,
        }))
    }
}

/// Form field. The platform reports edits through the `change` hook; the
/// document decides what the edit does (typically a state write).
pub struct TextInputNode {
    identity: NodeIdentity,
    value: Bind<String>,
    placeholder: Option<Bind<String>>,
    on_change: Option<Arc<ActionFlow>>,
}

impl WidgetNode for TextInputNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    fn render(&self, payload: &RenderPayload) -> RenderedNode {
        if !self.identity.visible(payload) {
            return self.identity.hidden();
        }
        let events = self
            .on_change
            .iter()
            .map(|flow| EventHook {
                event: "change".to_string(),
                flow: Arc::clone(flow),
                scope: payload.scope.clone(),
            })
            .collect();
        self.identity.rendered(
            payload,
            Primitive::TextField {
                value: payload.resolve(&self.value).unwrap_or_default(),
                placeholder: payload.resolve_opt(self.placeholder.as_ref()),
            },
            events,
            Vec::new(),
        )
    }
}
