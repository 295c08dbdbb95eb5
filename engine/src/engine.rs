use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;

use crate::action::dispatcher::{FlowDispatcher, FlowHandle};
use crate::error::EngineError;
use crate::expr::{ExprEvaluator, PathEvaluator};
use crate::model::document::{RawNode, parse_document};
use crate::model::value::PropValue;
use crate::navigator::{Navigator, NoopNavigator};
use crate::network::{NetworkClient, NullNetworkClient};
use crate::node::WidgetNode;
use crate::registry::NodeRegistry;
use crate::render::payload::RenderPayload;
use crate::render::primitive::{EventHook, RenderedNode};
use crate::resource::{MemoryResourceProvider, ResourceProvider};
use crate::scope::ScopeContext;
use crate::state::{MemoryStateStore, StateStore};
use crate::style::{AssetResolver, PassthroughAssets, StaticTheme, StyleResolvers, ThemeProvider};
use crate::util::timing::ScopedTimer;

/// Collaborator bundle injected into the engine. Every field is a trait
/// object so tests and hosts can swap any piece.
#[derive(Clone)]
pub struct EngineServices {
    pub state: Arc<dyn StateStore>,
    pub network: Arc<dyn NetworkClient>,
    pub navigator: Arc<dyn Navigator>,
    pub resources: Arc<dyn ResourceProvider>,
    pub theme: Arc<dyn ThemeProvider>,
    pub assets: Arc<dyn AssetResolver>,
    pub evaluator: Arc<dyn ExprEvaluator>,
}

impl Default for EngineServices {
    fn default() -> Self {
        Self {
            state: Arc::new(MemoryStateStore::new()),
            network: Arc::new(NullNetworkClient),
            navigator: Arc::new(NoopNavigator),
            resources: Arc::new(MemoryResourceProvider::new()),
            theme: Arc::new(StaticTheme::empty()),
            assets: Arc::new(PassthroughAssets),
            evaluator: Arc::new(PathEvaluator::new()),
        }
    }
}

/// Re-render signalling. State and resource collaborators feed it; the
/// host registers one callback to hear about pending passes.
#[derive(Default)]
struct InvalidationHub {
    pending: AtomicU64,
    listener: RwLock<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl InvalidationHub {
    fn invalidate(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if let Some(listener) = self
            .listener
            .read()
            .expect("invalidation hub poisoned")
            .as_ref()
        {
            listener();
        }
    }
}

/// Owns one parsed document: registry, virtual node tree and collaborator
/// handles. The tree is built once and reused across render passes; only
/// `hot_reload` rebuilds it.
pub struct DocumentEngine {
    registry: Arc<NodeRegistry>,
    services: EngineServices,
    dispatcher: Arc<FlowDispatcher>,
    resolvers: Arc<StyleResolvers>,
    root: RwLock<Arc<dyn WidgetNode>>,
    invalidations: Arc<InvalidationHub>,
}

impl DocumentEngine {
    pub fn new(document: &RawNode, registry: NodeRegistry, services: EngineServices) -> Self {
        let dispatcher = Arc::new(FlowDispatcher::new(
            Arc::clone(&services.state),
            Arc::clone(&services.network),
            Arc::clone(&services.navigator),
            Arc::clone(&services.evaluator),
        ));
        let resolvers = Arc::new(StyleResolvers {
            theme: Arc::clone(&services.theme),
            assets: Arc::clone(&services.assets),
            resources: Arc::clone(&services.resources),
        });

        let invalidations = Arc::new(InvalidationHub::default());
        let hub = Arc::clone(&invalidations);
        services
            .state
            .subscribe(Box::new(move |_key, _value| hub.invalidate()));
        let hub = Arc::clone(&invalidations);
        services
            .resources
            .subscribe(Box::new(move |_key| hub.invalidate()));

        let root = registry.build_tree(document);
        Self {
            registry: Arc::new(registry),
            services,
            dispatcher,
            resolvers,
            root: RwLock::new(root),
            invalidations,
        }
    }

    pub fn from_json(
        json: &str,
        registry: NodeRegistry,
        services: EngineServices,
    ) -> Result<Self, EngineError> {
        let document = parse_document(json)?;
        Ok(Self::new(&document, registry, services))
    }

    /// One synchronous pass over the reused tree with a fresh root scope
    /// bound to the current state snapshot (visible as `$.state.*`).
    pub fn render(&self) -> RenderedNode {
        self.render_with(HashMap::new())
    }

    /// Same, with additional host bindings visible at the root.
    pub fn render_with(&self, bindings: HashMap<String, PropValue>) -> RenderedNode {
        let _timer = ScopedTimer::debug("Render pass");
        let mut scope = ScopeContext::root(
            [(
                "state".to_string(),
                PropValue::Object(self.services.state.snapshot()),
            )]
            .into_iter()
            .collect(),
        );
        if !bindings.is_empty() {
            scope = scope.chained_with(bindings);
        }
        let payload = RenderPayload::new(
            scope,
            Arc::clone(&self.services.evaluator),
            Arc::clone(&self.dispatcher),
            Arc::clone(&self.resolvers),
        );
        let rendered = self.root.read().expect("node tree poisoned").render(&payload);
        debug!("Render pass produced {} widget(s)", rendered.widget_count());
        rendered
    }

    /// Platform callback entry point: runs the hook's flow against the
    /// scope captured at its render site. Must be called from within a
    /// tokio runtime.
    pub fn dispatch(&self, hook: &EventHook) -> FlowHandle {
        self.dispatcher
            .dispatch(Arc::clone(&hook.flow), hook.scope.clone())
    }

    pub fn dispatcher(&self) -> &Arc<FlowDispatcher> {
        &self.dispatcher
    }

    pub fn registry(&self) -> &Arc<NodeRegistry> {
        &self.registry
    }

    pub fn state(&self) -> &Arc<dyn StateStore> {
        &self.services.state
    }

    /// Structural rebuild for a changed source document; derived render
    /// state in the old tree is dropped with it.
    pub fn hot_reload(&self, json: &str) -> Result<(), EngineError> {
        let document = parse_document(json)?;
        let root = self.registry.build_tree(&document);
        *self.root.write().expect("node tree poisoned") = root;
        self.invalidations.invalidate();
        Ok(())
    }

    /// Host hook fired whenever a collaborator invalidates the last pass.
    pub fn on_invalidate(&self, listener: Box<dyn Fn() + Send + Sync>) {
        *self
            .invalidations
            .listener
            .write()
            .expect("invalidation hub poisoned") = Some(listener);
    }

    /// Pending re-render requests since the last call; draining returns the
    /// engine to "clean".
    pub fn take_invalidations(&self) -> u64 {
        self.invalidations.pending.swap(0, Ordering::SeqCst)
    }
}
