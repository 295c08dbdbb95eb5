use std::collections::HashMap;
use std::sync::Arc;

use crate::action::dispatcher::FlowDispatcher;
use crate::expr::ExprEvaluator;
use crate::model::binding::Bind;
use crate::model::value::{FromPropValue, PropValue};
use crate::scope::ScopeContext;
use crate::style::StyleResolvers;

/// Per-pass context threaded top-down through the tree: the current scope,
/// the expression evaluator, the dispatch handle for event wiring, and the
/// style/resource lookups. Immutable by convention; deriving a payload for
/// a child scope copies everything but the scope by reference.
#[derive(Clone)]
pub struct RenderPayload {
    pub scope: ScopeContext,
    pub evaluator: Arc<dyn ExprEvaluator>,
    pub dispatcher: Arc<FlowDispatcher>,
    pub resolvers: Arc<StyleResolvers>,
}

impl RenderPayload {
    pub fn new(
        scope: ScopeContext,
        evaluator: Arc<dyn ExprEvaluator>,
        dispatcher: Arc<FlowDispatcher>,
        resolvers: Arc<StyleResolvers>,
    ) -> Self {
        Self {
            scope,
            evaluator,
            dispatcher,
            resolvers,
        }
    }

    /// The only sanctioned way new scopes enter the tree: a derived payload
    /// whose scope wraps this one with additional bindings.
    pub fn chained(&self, bindings: HashMap<String, PropValue>) -> RenderPayload {
        RenderPayload {
            scope: self.scope.chained_with(bindings),
            evaluator: Arc::clone(&self.evaluator),
            dispatcher: Arc::clone(&self.dispatcher),
            resolvers: Arc::clone(&self.resolvers),
        }
    }

    pub fn resolve<T>(&self, bind: &Bind<T>) -> Option<T>
    where
        T: FromPropValue + Clone,
    {
        bind.resolve(&self.scope, self.evaluator.as_ref())
    }

    pub fn resolve_opt<T>(&self, bind: Option<&Bind<T>>) -> Option<T>
    where
        T: FromPropValue + Clone,
    {
        bind.and_then(|bind| self.resolve(bind))
    }

    pub fn resolve_or<T>(&self, bind: Option<&Bind<T>>, default: T) -> T
    where
        T: FromPropValue + Clone,
    {
        self.resolve_opt(bind).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::PathEvaluator;
    use crate::navigator::NoopNavigator;
    use crate::network::NullNetworkClient;
    use crate::state::MemoryStateStore;

    fn payload_with(scope: ScopeContext) -> RenderPayload {
        let evaluator: Arc<dyn ExprEvaluator> = Arc::new(PathEvaluator::new());
        let dispatcher = Arc::new(FlowDispatcher::new(
            Arc::new(MemoryStateStore::new()),
            Arc::new(NullNetworkClient),
            Arc::new(NoopNavigator),
            Arc::clone(&evaluator),
        ));
        RenderPayload::new(scope, evaluator, dispatcher, Arc::new(StyleResolvers::defaults()))
    }

    #[test]
    fn chained_payload_shadows_without_touching_parent() {
        let payload = payload_with(ScopeContext::root(
            [("x".to_string(), PropValue::Integer(1))].into_iter().collect(),
        ));
        let derived = payload.chained(
            [("x".to_string(), PropValue::Integer(2))].into_iter().collect(),
        );

        assert_eq!(derived.scope.lookup("x"), Some(&PropValue::Integer(2)));
        assert_eq!(payload.scope.lookup("x"), Some(&PropValue::Integer(1)));
    }

    #[test]
    fn resolve_helpers_apply_defaults() {
        let payload = payload_with(ScopeContext::empty());
        let missing: Option<&Bind<f64>> = None;

        assert_eq!(payload.resolve_or(missing, 4.0), 4.0);
        assert_eq!(
            payload.resolve_or(Some(&Bind::Expr("$.ghost".into())), 4.0),
            4.0
        );
        assert_eq!(payload.resolve(&Bind::Value(9.0)), Some(9.0));
    }
}
