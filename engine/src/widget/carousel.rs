use std::sync::Arc;

use crate::error::EngineError;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::model::value::PropValue;
use crate::node::{NodeIdentity, Slots, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{Primitive, RenderedNode};

pub struct CarouselBuilder;

impl WidgetBuilder for CarouselBuilder {
    fn type_tag(&self) -> &'static str {
        "carousel"
    }

    fn build(
        &self,
        raw: &RawNode,
        registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        let mut slots = Slots::new();
        slots.insert("pages", registry.build_slot(raw.slot("pages")));
        Ok(Arc::new(CarouselNode {
            identity: NodeIdentity::from_raw(raw),
            page: raw.bind_or("page", 0),
            slots,
        }))
    }
}

/// Paged composite: static pages, each rendered under a derived payload
/// exposing its own `pageIndex`.
pub struct CarouselNode {
    identity: NodeIdentity,
    page: Bind<i64>,
    slots: Slots,
}

impl WidgetNode for CarouselNode {
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
        let children = self
            .slots
            .get("pages")
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let page_payload = payload.chained(
                    [("pageIndex".to_string(), PropValue::Integer(index as i64))]
                        .into_iter()
                        .collect(),
                );
                page.render(&page_payload)
            })
            .collect();
        let page = payload.resolve(&self.page).unwrap_or(0).max(0) as usize;
        self.identity
            .rendered(payload, Primitive::Pager { page }, Vec::new(), children)
    }
}
