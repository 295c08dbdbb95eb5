use std::sync::Arc;

use crate::error::EngineError;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::node::{NodeIdentity, Slots, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{Axis, Primitive, RenderedNode};

pub struct ContainerBuilder;

impl WidgetBuilder for ContainerBuilder {
    fn type_tag(&self) -> &'static str {
        "container"
    }

    fn build(
        &self,
        raw: &RawNode,
        registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        let mut slots = Slots::new();
        slots.insert("children", registry.build_slot(raw.slot("children")));
        Ok(Arc::new(ContainerNode {
            identity: NodeIdentity::from_raw(raw),
            axis: parse_axis(raw.prop("axis")),
            spacing: raw.bind_or("spacing", 0.0),
            slots,
        }))
    }
}

fn parse_axis(raw: Option<&serde_json::Value>) -> Axis {
    match raw.and_then(|v| v.as_str()) {
        Some("horizontal") => Axis::Horizontal,
        Some("stack") => Axis::Stack,
        _ => Axis::Vertical,
    }
}

/// Static composite: children share the parent's scope unchanged.
pub struct ContainerNode {
    identity: NodeIdentity,
    axis: Axis,
    spacing: Bind<f64>,
    slots: Slots,
}

impl WidgetNode for ContainerNode {
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
        let children = self.slots.render_group("children", payload);
        self.identity.rendered(
            payload,
            Primitive::Container {
                axis: self.axis,
                spacing: payload.resolve(&self.spacing).unwrap_or(0.0),
            },
            Vec::new(),
            children,
        )
    }
}
