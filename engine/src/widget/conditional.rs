use std::sync::Arc;

use crate::error::EngineError;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::node::{NodeIdentity, Slots, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{Axis, Primitive, RenderedNode};

pub struct ConditionalBuilder;

impl WidgetBuilder for ConditionalBuilder {
    fn type_tag(&self) -> &'static str {
        "conditional"
    }

    fn build(
        &self,
        raw: &RawNode,
        registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        let mut slots = Slots::new();
        slots.insert("then", registry.build_slot(raw.slot("then")));
        slots.insert("else", registry.build_slot(raw.slot("else")));
        Ok(Arc::new(ConditionalNode {
            identity: NodeIdentity::from_raw(raw),
            condition: raw.bind_or("condition", false),
            slots,
        }))
    }
}

/// Both branches are built up front; only the active one renders. An
/// unresolved condition counts as false.
pub struct ConditionalNode {
    identity: NodeIdentity,
    condition: Bind<bool>,
    slots: Slots,
}

impl WidgetNode for ConditionalNode {
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
        let branch = if payload.resolve(&self.condition).unwrap_or(false) {
            "then"
        } else {
            "else"
        };
        let children = self.slots.render_group(branch, payload);
        self.identity.rendered(
            payload,
            Primitive::Container {
                axis: Axis::Stack,
                spacing: 0.0,
            },
            Vec::new(),
            children,
        )
    }
}
