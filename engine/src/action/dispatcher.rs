use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::EngineError;
use crate::expr::ExprEvaluator;
use crate::model::action::{ActionFlow, ActionStep, RequestTemplate};
use crate::model::value::PropValue;
use crate::navigator::Navigator;
use crate::network::{ApiRequest, NetworkClient};
use crate::scope::ScopeContext;
use crate::state::StateStore;
use crate::util::timing::ScopedTimer;

/// Observable lifecycle of one dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    Running,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowOutcome {
    Succeeded,
    Failed { message: String },
}

/// Host-registered handler for `custom` steps.
pub trait CustomActionHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn handle(
        &self,
        params: &HashMap<String, PropValue>,
        scope: &ScopeContext,
    ) -> Result<Option<PropValue>, EngineError>;
}

/// Handle to one running flow. Dropping it detaches the flow; `cancel`
/// aborts it at the next await point.
pub struct FlowHandle {
    id: Uuid,
    phase: watch::Receiver<FlowPhase>,
    join: JoinHandle<FlowOutcome>,
}

impl FlowHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> FlowPhase {
        *self.phase.borrow()
    }

    pub fn cancel(&self) {
        self.join.abort();
    }

    pub async fn outcome(self) -> FlowOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => FlowOutcome::Failed {
                message: "flow cancelled".to_string(),
            },
            Err(err) => FlowOutcome::Failed {
                message: format!("flow panicked: {}", err),
            },
        }
    }
}

/// Executes action flows. Each dispatch is an independent tokio task; steps
/// inside one flow run strictly in declared order and a step's bound result
/// is visible to the remaining steps of that invocation only. The
/// dispatcher takes no locks on shared state; cross-flow ordering is the
/// state collaborator's discipline.
pub struct FlowDispatcher {
    state: Arc<dyn StateStore>,
    network: Arc<dyn NetworkClient>,
    navigator: Arc<dyn Navigator>,
    evaluator: Arc<dyn ExprEvaluator>,
    custom: RwLock<HashMap<&'static str, Arc<dyn CustomActionHandler>>>,
}

impl FlowDispatcher {
    pub fn new(
        state: Arc<dyn StateStore>,
        network: Arc<dyn NetworkClient>,
        navigator: Arc<dyn Navigator>,
        evaluator: Arc<dyn ExprEvaluator>,
    ) -> Self {
        Self {
            state,
            network,
            navigator,
            evaluator,
            custom: RwLock::new(HashMap::new()),
        }
    }

    /// Last registration for a name wins, same as widget builders.
    pub fn register_custom_handler(&self, handler: Arc<dyn CustomActionHandler>) {
        self.custom
            .write()
            .expect("custom handlers poisoned")
            .insert(handler.name(), handler);
    }

    /// Must be called from within a tokio runtime.
    pub fn dispatch(self: &Arc<Self>, flow: Arc<ActionFlow>, scope: ScopeContext) -> FlowHandle {
        let (phase_tx, phase_rx) = watch::channel(FlowPhase::Idle);
        let id = Uuid::new_v4();
        let dispatcher = Arc::clone(self);
        let join = tokio::spawn(async move {
            let _timer = ScopedTimer::debug_lazy(|| format!("Flow {}", id));
            let _ = phase_tx.send(FlowPhase::Running);
            let outcome = dispatcher.run_flow(&flow, scope).await;
            let _ = phase_tx.send(match outcome {
                FlowOutcome::Succeeded => FlowPhase::Succeeded,
                FlowOutcome::Failed { .. } => FlowPhase::Failed,
            });
            outcome
        });
        FlowHandle {
            id,
            phase: phase_rx,
            join,
        }
    }

    async fn run_flow(&self, flow: &ActionFlow, scope: ScopeContext) -> FlowOutcome {
        let mut scope = scope;
        for (index, step) in flow.steps.iter().enumerate() {
            match self.execute_step(step, &scope).await {
                Ok(Some((name, value))) => {
                    scope = scope.chained_with([(name, value)].into_iter().collect());
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("Flow step {} failed: {}", index, err);
                    let error_scope = scope.chained_with(
                        [(
                            "error".to_string(),
                            PropValue::object([
                                ("step".to_string(), PropValue::Integer(index as i64)),
                                ("message".to_string(), PropValue::from(err.to_string())),
                            ]),
                        )]
                        .into_iter()
                        .collect(),
                    );
                    self.run_error_steps(&flow.on_error, error_scope).await;
                    return FlowOutcome::Failed {
                        message: err.to_string(),
                    };
                }
            }
        }
        FlowOutcome::Succeeded
    }

    async fn run_error_steps(&self, steps: &[ActionStep], scope: ScopeContext) {
        let mut scope = scope;
        for (index, step) in steps.iter().enumerate() {
            match self.execute_step(step, &scope).await {
                Ok(Some((name, value))) => {
                    scope = scope.chained_with([(name, value)].into_iter().collect());
                }
                Ok(None) => {}
                Err(err) => {
                    // No recursion into onError; report and stop.
                    warn!("onError step {} failed: {}", index, err);
                    return;
                }
            }
        }
    }

    async fn execute_step(
        &self,
        step: &ActionStep,
        scope: &ScopeContext,
    ) -> Result<Option<(String, PropValue)>, EngineError> {
        match step {
            ActionStep::SetState { key, value } => {
                let resolved = value.resolve(scope, self.evaluator.as_ref()).ok_or_else(|| {
                    EngineError::ActionStep(format!("setState '{}': value did not resolve", key))
                })?;
                self.state.write(key, resolved);
                Ok(None)
            }
            ActionStep::SendRequest { request, bind_to } => {
                let api_request = self.build_request(request, scope)?;
                debug!("Flow request {} {}", api_request.method, api_request.url);
                let response = self
                    .network
                    .execute(api_request)
                    .await
                    .map_err(|err| EngineError::ActionStep(err.to_string()))?;
                match bind_to {
                    Some(name) => Ok(Some((
                        name.clone(),
                        PropValue::object([
                            (
                                "status".to_string(),
                                PropValue::Integer(response.status as i64),
                            ),
                            ("body".to_string(), response.body),
                        ]),
                    ))),
                    None => Ok(None),
                }
            }
            ActionStep::Navigate { route, params } => {
                let route = route.resolve(scope, self.evaluator.as_ref()).ok_or_else(|| {
                    EngineError::ActionStep("navigate: route did not resolve".to_string())
                })?;
                let params = self.resolve_params(params, scope, "navigate")?;
                self.navigator.navigate(&route, &params);
                Ok(None)
            }
            ActionStep::Delay { ms } => {
                let ms = ms.resolve(scope, self.evaluator.as_ref()).ok_or_else(|| {
                    EngineError::ActionStep("delay: ms did not resolve".to_string())
                })?;
                tokio::time::sleep(Duration::from_millis(ms.max(0) as u64)).await;
                Ok(None)
            }
            ActionStep::Custom {
                name,
                params,
                bind_to,
            } => {
                let handler = self
                    .custom
                    .read()
                    .expect("custom handlers poisoned")
                    .get(name.as_str())
                    .cloned()
                    .ok_or_else(|| {
                        EngineError::ActionStep(format!("No handler for custom step '{}'", name))
                    })?;
                let params = self.resolve_params(params, scope, name)?;
                let result = handler.handle(&params, scope)?;
                match (bind_to, result) {
                    (Some(binding), Some(value)) => Ok(Some((binding.clone(), value))),
                    _ => Ok(None),
                }
            }
        }
    }

    fn build_request(
        &self,
        template: &RequestTemplate,
        scope: &ScopeContext,
    ) -> Result<ApiRequest, EngineError> {
        let url = template
            .url
            .resolve(scope, self.evaluator.as_ref())
            .ok_or_else(|| {
                EngineError::ActionStep("sendRequest: url did not resolve".to_string())
            })?;
        let mut headers = HashMap::new();
        for (name, bind) in &template.headers {
            let value = bind.resolve(scope, self.evaluator.as_ref()).ok_or_else(|| {
                EngineError::ActionStep(format!("sendRequest: header '{}' did not resolve", name))
            })?;
            headers.insert(name.clone(), value);
        }
        let body = match &template.body {
            Some(bind) => Some(bind.resolve(scope, self.evaluator.as_ref()).ok_or_else(
                || EngineError::ActionStep("sendRequest: body did not resolve".to_string()),
            )?),
            None => None,
        };
        Ok(ApiRequest {
            method: template.method.clone(),
            url,
            headers,
            body,
        })
    }

    fn resolve_params(
        &self,
        params: &HashMap<String, crate::model::binding::Bind<PropValue>>,
        scope: &ScopeContext,
        step_name: &str,
    ) -> Result<HashMap<String, PropValue>, EngineError> {
        params
            .iter()
            .map(|(name, bind)| {
                let value = bind.resolve(scope, self.evaluator.as_ref()).ok_or_else(|| {
                    EngineError::ActionStep(format!(
                        "{}: param '{}' did not resolve",
                        step_name, name
                    ))
                })?;
                Ok((name.clone(), value))
            })
            .collect()
    }
}
