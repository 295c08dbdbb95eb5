use std::sync::Arc;

use crate::error::EngineError;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::node::{NodeIdentity, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{Primitive, RenderedNode};

pub struct TextBuilder;

impl WidgetBuilder for TextBuilder {
    fn type_tag(&self) -> &'static str {
        "text"
    }

    fn build(
        &self,
        raw: &RawNode,
        _registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        Ok(Arc::new(TextNode {
            identity: NodeIdentity::from_raw(raw),
            text: raw.bind_or("text", String::new()),
            size: raw.bind("size"),
            color: raw.bind("color"),
        }))
    }
}

pub struct TextNode {
    identity: NodeIdentity,
    text: Bind<String>,
    size: Option<Bind<f64>>,
    color: Option<Bind<String>>,
}

impl WidgetNode for TextNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    fn render(&self, payload: &RenderPayload) -> RenderedNode {
        if !self.identity.visible(payload) {
            return self.identity.hidden();
        }
        let content = payload.resolve(&self.text).unwrap_or_default();
        let color = payload
            .resolve_opt(self.color.as_ref())
            .map(|token| payload.resolvers.color_or_raw(token));
        self.identity.rendered(
            payload,
            Primitive::Text {
                content,
                size: payload.resolve_opt(self.size.as_ref()),
                color,
            },
            Vec::new(),
            Vec::new(),
        )
    }
}
