//! Server-driven UI engine: parses a JSON document into a tree of typed
//! virtual nodes, resolves expression-bound properties against a chain of
//! lexically scoped variables on every render pass, and emits a tree of
//! platform widget descriptions. Side effects run as declarative action
//! flows dispatched from widget events.

pub mod action;
pub mod engine;
pub mod error;
pub mod expr;
pub mod model;
pub mod navigator;
pub mod network;
pub mod node;
pub mod registry;
pub mod render;
pub mod resource;
pub mod scope;
pub mod state;
pub mod style;
pub mod util;
pub mod widget;

pub use action::{CustomActionHandler, FlowDispatcher, FlowHandle, FlowOutcome, FlowPhase};
pub use engine::{DocumentEngine, EngineServices};
pub use error::EngineError;
pub use expr::{ExprEvaluator, PathEvaluator, is_expression};
pub use model::{ActionFlow, ActionStep, Bind, FromPropValue, PropValue, RawNode, parse_document};
pub use navigator::{Navigator, NoopNavigator};
pub use network::{ApiRequest, ApiResponse, NetworkClient, NullNetworkClient};
pub use node::{NodeIdentity, PlaceholderNode, Slots, WidgetNode};
pub use registry::{NodeRegistry, WidgetBuilder, WidgetPlugin};
pub use render::{Axis, EventHook, Primitive, RenderPayload, RenderedNode, ResolvedCommon};
pub use resource::{MemoryResourceProvider, ResourceProvider, ResourceState};
pub use scope::ScopeContext;
pub use state::{MemoryStateStore, StateStore};
pub use style::{AssetResolver, StaticTheme, StyleResolvers, ThemeProvider};
