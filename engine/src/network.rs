use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::error::EngineError;
use crate::model::value::PropValue;

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<PropValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: PropValue,
}

pub type NetworkFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ApiResponse, EngineError>> + Send + 'a>>;

/// Transport collaborator, consumed only from action-flow steps. Timeouts
/// are this collaborator's responsibility and surface as `Err`, which the
/// dispatcher turns into a step failure.
pub trait NetworkClient: Send + Sync {
    fn execute<'a>(&'a self, request: ApiRequest) -> NetworkFuture<'a>;
}

/// Default client for engines assembled without a transport. Every request
/// fails, which flows surface through their error channel.
pub struct NullNetworkClient;

impl NetworkClient for NullNetworkClient {
    fn execute<'a>(&'a self, request: ApiRequest) -> NetworkFuture<'a> {
        Box::pin(async move {
            Err(EngineError::Network(format!(
                "No network client configured (request to {})",
                request.url
            )))
        })
    }
}
