use std::collections::HashMap;

use serde::Deserialize;

use crate::error::EngineError;
use crate::model::binding::Bind;
use crate::model::value::PropValue;

/// Declarative, ordered list of side-effecting steps triggered by a node
/// event. Parsed once from the document, immutable afterwards; every
/// dispatch re-resolves the step bindings against the scope active at
/// dispatch time.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ActionFlow {
    pub steps: Vec<ActionStep>,
    pub on_error: Vec<ActionStep>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionStep {
    SetState {
        key: String,
        value: Bind<PropValue>,
    },
    SendRequest {
        request: RequestTemplate,
        bind_to: Option<String>,
    },
    Navigate {
        route: Bind<String>,
        params: HashMap<String, Bind<PropValue>>,
    },
    Delay {
        ms: Bind<i64>,
    },
    Custom {
        name: String,
        params: HashMap<String, Bind<PropValue>>,
        bind_to: Option<String>,
    },
}

/// Unresolved request description; bindings are resolved per dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestTemplate {
    pub method: String,
    pub url: Bind<String>,
    pub headers: HashMap<String, Bind<String>>,
    pub body: Option<Bind<PropValue>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlow {
    Steps(Vec<RawStep>),
    Tagged {
        steps: Vec<RawStep>,
        #[serde(default, rename = "onError")]
        on_error: Vec<RawStep>,
    },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawStep {
    SetState {
        key: String,
        value: serde_json::Value,
    },
    SendRequest {
        url: serde_json::Value,
        #[serde(default = "default_method")]
        method: String,
        #[serde(default)]
        headers: HashMap<String, serde_json::Value>,
        #[serde(default)]
        body: Option<serde_json::Value>,
        #[serde(default, rename = "bindTo")]
        bind_to: Option<String>,
    },
    Navigate {
        route: serde_json::Value,
        #[serde(default)]
        params: HashMap<String, serde_json::Value>,
    },
    Delay {
        ms: serde_json::Value,
    },
    Custom {
        name: String,
        #[serde(default)]
        params: HashMap<String, serde_json::Value>,
        #[serde(default, rename = "bindTo")]
        bind_to: Option<String>,
    },
}

fn default_method() -> String {
    "GET".to_string()
}

impl ActionFlow {
    /// Accepts either a bare step array or `{ "steps": [...], "onError":
    /// [...] }`.
    pub fn from_json(raw: &serde_json::Value) -> Result<ActionFlow, EngineError> {
        let parsed: RawFlow = serde_json::from_value(raw.clone())?;
        let (steps, on_error) = match parsed {
            RawFlow::Steps(steps) => (steps, Vec::new()),
            RawFlow::Tagged { steps, on_error } => (steps, on_error),
        };
        Ok(ActionFlow {
            steps: convert_steps(steps)?,
            on_error: convert_steps(on_error)?,
        })
    }
}

fn convert_steps(raw: Vec<RawStep>) -> Result<Vec<ActionStep>, EngineError> {
    raw.into_iter().map(convert_step).collect()
}

fn convert_step(raw: RawStep) -> Result<ActionStep, EngineError> {
    match raw {
        RawStep::SetState { key, value } => Ok(ActionStep::SetState {
            key,
            value: required_bind(&value, "setState.value")?,
        }),
        RawStep::SendRequest {
            url,
            method,
            headers,
            body,
            bind_to,
        } => Ok(ActionStep::SendRequest {
            request: RequestTemplate {
                method,
                url: required_bind(&url, "sendRequest.url")?,
                headers: bind_map(headers, "sendRequest.headers")?,
                body: body
                    .as_ref()
                    .map(|b| required_bind(b, "sendRequest.body"))
                    .transpose()?,
            },
            bind_to,
        }),
        RawStep::Navigate { route, params } => Ok(ActionStep::Navigate {
            route: required_bind(&route, "navigate.route")?,
            params: bind_map(params, "navigate.params")?,
        }),
        RawStep::Delay { ms } => Ok(ActionStep::Delay {
            ms: required_bind(&ms, "delay.ms")?,
        }),
        RawStep::Custom {
            name,
            params,
            bind_to,
        } => Ok(ActionStep::Custom {
            name,
            params: bind_map(params, "custom.params")?,
            bind_to,
        }),
    }
}

fn required_bind<T>(raw: &serde_json::Value, field: &str) -> Result<Bind<T>, EngineError>
where
    T: crate::model::value::FromPropValue + Clone,
{
    Bind::from_raw(raw)
        .ok_or_else(|| EngineError::Document(format!("Invalid literal for '{}': {}", field, raw)))
}

fn bind_map<T>(
    raw: HashMap<String, serde_json::Value>,
    field: &str,
) -> Result<HashMap<String, Bind<T>>, EngineError>
where
    T: crate::model::value::FromPropValue + Clone,
{
    raw.into_iter()
        .map(|(k, v)| {
            let bind = required_bind(&v, field)?;
            Ok((k, bind))
        })
        .collect()
}
