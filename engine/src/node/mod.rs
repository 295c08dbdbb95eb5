use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};

use uuid::Uuid;

use crate::model::common::CommonProps;
use crate::model::document::RawNode;
use crate::render::payload::RenderPayload;
use crate::render::primitive::{EventHook, Primitive, RenderedNode, ResolvedCommon};

/// The abstract tree unit every widget implements. Built once per document
/// parse and reused across render passes; `render` re-resolves expression
/// bindings against the payload's scope every time it runs and must not
/// block.
pub trait WidgetNode: Send + Sync {
    fn identity(&self) -> &NodeIdentity;

    /// Named child groups; `None` for leaf nodes.
    fn slots(&self) -> Option<&Slots> {
        None
    }

    fn render(&self, payload: &RenderPayload) -> RenderedNode;
}

/// Identity block shared by every node: stable id, optional document
/// `refName`, pre-parsed common props, raw layout props assigned by the
/// parent, and a weak back-reference to the parent. The back-reference is
/// queryable but never owns; the tree's only ownership direction is
/// parent to child.
pub struct NodeIdentity {
    pub id: Uuid,
    pub ref_name: Option<String>,
    pub common: CommonProps,
    pub parent_props: Option<serde_json::Value>,
    parent: RwLock<Option<Weak<dyn WidgetNode>>>,
}

impl NodeIdentity {
    pub fn from_raw(raw: &RawNode) -> NodeIdentity {
        NodeIdentity {
            id: Uuid::new_v4(),
            ref_name: raw.ref_name.clone(),
            common: CommonProps::from_raw(raw.common_props.as_ref()),
            parent_props: raw.parent_props.clone(),
            parent: RwLock::new(None),
        }
    }

    pub fn parent(&self) -> Option<Arc<dyn WidgetNode>> {
        self.parent
            .read()
            .expect("node parent poisoned")
            .as_ref()
            .and_then(Weak::upgrade)
    }

    pub(crate) fn set_parent(&self, parent: Weak<dyn WidgetNode>) {
        *self.parent.write().expect("node parent poisoned") = Some(parent);
    }

    pub fn visible(&self, payload: &RenderPayload) -> bool {
        payload.resolve_or(self.common.visible.as_ref(), true)
    }

    fn resolve_common(&self, payload: &RenderPayload) -> ResolvedCommon {
        ResolvedCommon {
            visible: true,
            width: payload.resolve_opt(self.common.width.as_ref()),
            height: payload.resolve_opt(self.common.height.as_ref()),
            padding: payload.resolve_opt(self.common.padding.as_ref()),
            background_color: payload
                .resolve_opt(self.common.background_color.as_ref())
                .map(|token| payload.resolvers.color_or_raw(token)),
        }
    }

    /// Standard assembly of a rendered widget from resolved parts.
    pub fn rendered(
        &self,
        payload: &RenderPayload,
        primitive: Primitive,
        events: Vec<EventHook>,
        children: Vec<RenderedNode>,
    ) -> RenderedNode {
        RenderedNode {
            node_id: self.id,
            ref_name: self.ref_name.clone(),
            primitive,
            common: self.resolve_common(payload),
            events,
            children,
        }
    }

    /// Output of a node whose `visible` binding resolved false.
    pub fn hidden(&self) -> RenderedNode {
        RenderedNode {
            node_id: self.id,
            ref_name: self.ref_name.clone(),
            primitive: Primitive::Empty,
            common: ResolvedCommon::default(),
            events: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Named child groups of a composite node, each an ordered list.
#[derive(Default)]
pub struct Slots {
    groups: HashMap<String, Vec<Arc<dyn WidgetNode>>>,
}

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, children: Vec<Arc<dyn WidgetNode>>) {
        self.groups.insert(name.into(), children);
    }

    pub fn get(&self, name: &str) -> &[Arc<dyn WidgetNode>] {
        self.groups.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Arc<dyn WidgetNode>>)> {
        self.groups.iter()
    }

    /// Renders every child of a group under the given payload, in order.
    pub fn render_group(&self, name: &str, payload: &RenderPayload) -> Vec<RenderedNode> {
        self.get(name)
            .iter()
            .map(|child| child.render(payload))
            .collect()
    }
}

/// Stands in for a subtree whose builder failed; renders empty so the rest
/// of the document stays alive.
pub struct PlaceholderNode {
    identity: NodeIdentity,
}

impl PlaceholderNode {
    pub fn for_raw(raw: &RawNode) -> Arc<dyn WidgetNode> {
        Arc::new(PlaceholderNode {
            identity: NodeIdentity::from_raw(raw),
        })
    }
}

impl WidgetNode for PlaceholderNode {
    fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    fn render(&self, payload: &RenderPayload) -> RenderedNode {
        self.identity
            .rendered(payload, Primitive::Empty, Vec::new(), Vec::new())
    }
}

/// Post-build pass wiring weak parent references; children are built
/// before their parents, so this runs once the whole tree exists.
pub fn link_parents(root: &Arc<dyn WidgetNode>) {
    if let Some(slots) = root.slots() {
        for (_, group) in slots.iter() {
            for child in group {
                child.identity().set_parent(Arc::downgrade(root));
                link_parents(child);
            }
        }
    }
}
