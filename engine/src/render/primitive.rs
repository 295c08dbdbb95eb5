use std::sync::Arc;

use uuid::Uuid;

use crate::model::action::ActionFlow;
use crate::scope::ScopeContext;

/// Layout direction for container primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
    Stack,
}

/// Platform drawing primitive with every property already resolved. The
/// platform renderer consumes these; nothing here is re-evaluated.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Empty,
    Text {
        content: String,
        size: Option<f64>,
        color: Option<String>,
    },
    Image {
        url: String,
    },
    Container {
        axis: Axis,
        spacing: f64,
    },
    Button {
        label: String,
        enabled: bool,
    },
    TextField {
        value: String,
        placeholder: Option<String>,
    },
    Pager {
        page: usize,
    },
}

/// Common block resolved once per render.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ResolvedCommon {
    pub visible: bool,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Option<f64>,
    pub background_color: Option<String>,
}

/// Event wiring handed to the platform: when the named gesture fires on
/// this widget, the host passes the hook back to the dispatcher. The scope
/// is the one active at the widget's render site, so repeated items each
/// capture their own bindings.
#[derive(Clone, Debug)]
pub struct EventHook {
    pub event: String,
    pub flow: Arc<ActionFlow>,
    pub scope: ScopeContext,
}

impl PartialEq for EventHook {
    fn eq(&self, other: &Self) -> bool {
        self.event == other.event && self.flow == other.flow && self.scope == other.scope
    }
}

/// One rendered widget. Pure data; comparing two passes over the same tree
/// is how re-render idempotence is asserted.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedNode {
    pub node_id: Uuid,
    pub ref_name: Option<String>,
    pub primitive: Primitive,
    pub common: ResolvedCommon,
    pub events: Vec<EventHook>,
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    /// Count of this node plus all descendants.
    pub fn widget_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(RenderedNode::widget_count)
            .sum::<usize>()
    }

    /// Depth-first search by `refName`.
    pub fn find(&self, ref_name: &str) -> Option<&RenderedNode> {
        if self.ref_name.as_deref() == Some(ref_name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(ref_name))
    }
}
