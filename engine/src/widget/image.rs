use std::sync::Arc;

use crate::error::EngineError;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::node::{NodeIdentity, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{Primitive, RenderedNode};

pub struct ImageBuilder;

impl WidgetBuilder for ImageBuilder {
    fn type_tag(&self) -> &'static str {
        "image"
    }

    fn build(
        &self,
        raw: &RawNode,
        _registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        Ok(Arc::new(ImageNode {
            identity: NodeIdentity::from_raw(raw),
            url: raw.bind("url"),
            placeholder: raw.bind("placeholder"),
        }))
    }
}

pub struct ImageNode {
    identity: NodeIdentity,
    url: Option<Bind<String>>,
    placeholder: Option<Bind<String>>,
}

impl WidgetNode for ImageNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    fn render(&self, payload: &RenderPayload) -> RenderedNode {
        if !self.identity.visible(payload) {
            return self.identity.hidden();
        }
        // Unresolved url falls back to the placeholder asset, if any.
        let name = payload
            .resolve_opt(self.url.as_ref())
            .or_else(|| payload.resolve_opt(self.placeholder.as_ref()));
        let primitive = match name {
            Some(name) => {
                let url = payload
                    .resolvers
                    .assets
                    .resolve_url(&name)
                    .unwrap_or(name);
                Primitive::Image { url }
            }
            None => Primitive::Empty,
        };
        self.identity
            .rendered(payload, primitive, Vec::new(), Vec::new())
    }
}
