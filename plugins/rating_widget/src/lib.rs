use std::sync::Arc;

use engine::model::binding::Bind;
use engine::node::NodeIdentity;
use engine::render::primitive::{Primitive, RenderedNode};
use engine::{
    EngineError, NodeRegistry, RawNode, RenderPayload, WidgetBuilder, WidgetNode, WidgetPlugin,
};

pub struct RatingWidgetPlugin;

impl WidgetPlugin for RatingWidgetPlugin {
    fn id(&self) -> &'static str {
        "rating_widget_plugin"
    }

    fn register(&self, registry: &mut NodeRegistry) {
        registry.register(Arc::new(RatingBuilder));
    }
}

struct RatingBuilder;

impl WidgetBuilder for RatingBuilder {
    fn type_tag(&self) -> &'static str {
        "rating"
    }

    fn build(
        &self,
        raw: &RawNode,
        _registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError> {
        Ok(Arc::new(RatingNode {
            identity: NodeIdentity::from_raw(raw),
            value: raw.bind_or("value", 0.0),
            max: raw.bind_or("max", 5),
        }))
    }
}

struct RatingNode {
    identity: NodeIdentity,
    value: Bind<f64>,
    max: Bind<i64>,
}

impl WidgetNode for RatingNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    fn render(&self, payload: &RenderPayload) -> RenderedNode {
        if !self.identity.visible(payload) {
            return self.identity.hidden();
        }
        let max = payload.resolve(&self.max).unwrap_or(5).clamp(1, 10) as usize;
        let value = payload.resolve(&self.value).unwrap_or(0.0);
        let filled = (value.round().max(0.0) as usize).min(max);

        let mut stars = String::with_capacity(max * 3);
        for _ in 0..filled {
            stars.push('\u{2605}');
        }
        for _ in filled..max {
            stars.push('\u{2606}');
        }

        self.identity.rendered(
            payload,
            Primitive::Text {
                content: stars,
                size: None,
                color: None,
            },
            Vec::new(),
            Vec::new(),
        )
    }
}

#[allow(improper_ctypes_definitions)]
#[no_mangle]
pub extern "C" fn create_widget_plugin() -> *mut dyn WidgetPlugin {
    let plugin: Box<dyn WidgetPlugin> = Box::new(RatingWidgetPlugin);
    Box::into_raw(plugin)
}
