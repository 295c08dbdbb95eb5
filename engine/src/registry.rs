use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use libloading::{Library, Symbol};
use log::{error, warn};

use crate::error::EngineError;
use crate::model::document::RawNode;
use crate::node::{PlaceholderNode, WidgetNode, link_parents};
use crate::util::timing::ScopedTimer;

/// Turns one raw node into a concrete widget node, recursively building
/// declared child groups through the registry so children exist before the
/// parent's render contract is ever invoked.
pub trait WidgetBuilder: Send + Sync {
    fn type_tag(&self) -> &'static str;
    fn build(
        &self,
        raw: &RawNode,
        registry: &NodeRegistry,
    ) -> Result<Arc<dyn WidgetNode>, EngineError>;
}

/// Entry point implemented by dynamically loaded widget libraries.
pub trait WidgetPlugin: Send + Sync {
    fn id(&self) -> &'static str;
    fn register(&self, registry: &mut NodeRegistry);
}

// Type definition for C FFI
pub type WidgetPluginCreateFn = unsafe extern "C" fn() -> *mut dyn WidgetPlugin;

/// Maps a node type tag to its builder. Duplicate registration overwrites
/// silently (last write wins) so host apps can override built-ins.
pub struct NodeRegistry {
    builders: HashMap<&'static str, Arc<dyn WidgetBuilder>>,
    dynamic_libraries: Vec<Library>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
            dynamic_libraries: Vec::new(),
        }
    }

    /// Registry pre-loaded with the built-in widget set.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::widget::register_builtins(&mut registry);
        registry
    }

    pub fn register(&mut self, builder: Arc<dyn WidgetBuilder>) {
        self.builders.insert(builder.type_tag(), builder);
    }

    pub fn create_widget(&self, raw: &RawNode) -> Result<Arc<dyn WidgetNode>, EngineError> {
        match self.builders.get(raw.node_type.as_str()) {
            Some(builder) => builder.build(raw, self),
            None => Err(EngineError::UnknownNodeType(raw.node_type.clone())),
        }
    }

    /// Builds an ordered child group. A child that fails to build degrades
    /// to a placeholder so the failure stays local to that subtree.
    pub fn build_slot(&self, children: &[RawNode]) -> Vec<Arc<dyn WidgetNode>> {
        children
            .iter()
            .map(|raw| match self.create_widget(raw) {
                Ok(node) => node,
                Err(err) => {
                    warn!("Replacing '{}' node with placeholder: {}", raw.node_type, err);
                    PlaceholderNode::for_raw(raw)
                }
            })
            .collect()
    }

    /// Builds the whole document tree and wires parent back-references.
    /// Never fails: a broken root renders as an empty document.
    pub fn build_tree(&self, raw: &RawNode) -> Arc<dyn WidgetNode> {
        let _timer = ScopedTimer::debug("Widget tree build");
        let root = match self.create_widget(raw) {
            Ok(node) => node,
            Err(err) => {
                error!("Document root '{}' failed to build: {}", raw.node_type, err);
                PlaceholderNode::for_raw(raw)
            }
        };
        link_parents(&root);
        root
    }

    pub fn registered_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.builders.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn load_widget_plugin_from_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<(), EngineError> {
        unsafe {
            let library = Library::new(path.as_ref())?;
            let constructor: Symbol<WidgetPluginCreateFn> = library.get(b"create_widget_plugin")?;
            let raw = constructor();
            if raw.is_null() {
                return Err(EngineError::Plugin(
                    "create_widget_plugin returned null".to_string(),
                ));
            }
            let plugin_box = Box::from_raw(raw);
            plugin_box.register(self);
            self.dynamic_libraries.push(library);
        }
        Ok(())
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeIdentity;
    use crate::render::payload::RenderPayload;
    use crate::render::primitive::{Primitive, RenderedNode};
    use serde_json::json;

    struct TagNode {
        identity: NodeIdentity,
        label: &'static str,
    }

    impl WidgetNode for TagNode {
        fn identity(&self) -> &NodeIdentity {
            &self.identity
        }

        fn render(&self, payload: &RenderPayload) -> RenderedNode {
            self.identity.rendered(
                payload,
                Primitive::Text {
                    content: self.label.to_string(),
                    size: None,
                    color: None,
                },
                Vec::new(),
                Vec::new(),
            )
        }
    }

    struct TagBuilder {
        tag: &'static str,
        label: &'static str,
    }

    impl WidgetBuilder for TagBuilder {
        fn type_tag(&self) -> &'static str {
            self.tag
        }

        fn build(
            &self,
            raw: &RawNode,
            _registry: &NodeRegistry,
        ) -> Result<Arc<dyn WidgetNode>, EngineError> {
            Ok(Arc::new(TagNode {
                identity: NodeIdentity::from_raw(raw),
                label: self.label,
            }))
        }
    }

    fn raw(node_type: &str) -> RawNode {
        serde_json::from_value(json!({ "type": node_type })).unwrap()
    }

    #[test]
    fn unknown_type_is_an_error() {
        let registry = NodeRegistry::new();
        match registry.create_widget(&raw("mystery")) {
            Err(EngineError::UnknownNodeType(tag)) => assert_eq!(tag, "mystery"),
            other => panic!("Expected UnknownNodeType, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn duplicate_registration_overwrites_silently() {
        let mut registry = NodeRegistry::new();
        registry.register(Arc::new(TagBuilder {
            tag: "badge",
            label: "built-in",
        }));
        registry.register(Arc::new(TagBuilder {
            tag: "badge",
            label: "host override",
        }));

        let node = registry.create_widget(&raw("badge")).unwrap();
        let payload = crate::engine::test_support::bare_payload();
        match node.render(&payload).primitive {
            Primitive::Text { content, .. } => assert_eq!(content, "host override"),
            other => panic!("Expected text, got {:?}", other),
        }
    }

    #[test]
    fn build_slot_degrades_unknown_children_to_placeholders() {
        let mut registry = NodeRegistry::new();
        registry.register(Arc::new(TagBuilder {
            tag: "badge",
            label: "x",
        }));

        let children = [raw("badge"), raw("mystery")];
        let built = registry.build_slot(&children);
        assert_eq!(built.len(), 2);

        let payload = crate::engine::test_support::bare_payload();
        assert!(matches!(
            built[1].render(&payload).primitive,
            Primitive::Empty
        ));
    }
}
