use std::collections::HashMap;
use std::sync::Arc;

use crate::error::EngineError;
use crate::model::binding::Bind;
use crate::model::document::RawNode;
use crate::model::value::PropValue;
use crate::node::{NodeIdentity, Slots, WidgetNode};
use crate::registry::{NodeRegistry, WidgetBuilder};
use crate::render::payload::RenderPayload;
use crate::render::primitive::{Axis, Primitive, RenderedNode};
use crate::resource::ResourceState;

pub struct LazyBuilder;

impl WidgetBuilder for LazyBuilder {
    fn type_tag(&self) -> &'static str {
        "lazy"
    }

    fn build(
        &self,
        raw: &RawNode,
        registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        let mut slots = Slots::new();
        slots.insert("loading", registry.build_slot(raw.slot("loading")));
        slots.insert("content", registry.build_slot(raw.slot("content")));
        slots.insert("error", registry.build_slot(raw.slot("error")));
        Ok(Arc::new(LazyNode {
            identity: NodeIdentity::from_raw(raw),
            resource: raw.bind_or("resource", String::new()),
            slots,
        }))
    }
}

/// Deferred content backed by a collaborator-owned async resource. The
/// render pass only reads the resource's current state; completion is
/// observed through the engine's provider subscription, which schedules one
/// normal re-render.
pub struct LazyNode {
    identity: NodeIdentity,
    resource: Bind<String>,
    slots: Slots,
}

impl WidgetNode for LazyNode {
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
        let state = match payload.resolve(&self.resource) {
            Some(key) if !key.is_empty() => payload.resolvers.resources.state(&key),
            _ => ResourceState::Pending,
        };
        let (branch, bindings) = match state {
            ResourceState::Pending => (
                "loading",
                HashMap::from([(
                    "futureState".to_string(),
                    PropValue::from("loading"),
                )]),
            ),
            ResourceState::Ready(value) => (
                "content",
                HashMap::from([
                    ("futureState".to_string(), PropValue::from("success")),
                    ("value".to_string(), value),
                ]),
            ),
            ResourceState::Failed(message) => (
                "error",
                HashMap::from([
                    ("futureState".to_string(), PropValue::from("error")),
                    ("error".to_string(), PropValue::from(message)),
                ]),
            ),
        };
        let branch_payload = payload.chained(bindings);
        let children = self.slots.render_group(branch, &branch_payload);
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
