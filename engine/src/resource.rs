use std::collections::HashMap;
use std::sync::RwLock;

use crate::model::value::PropValue;

/// Lifecycle of one collaborator-owned asynchronous resource.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceState {
    Pending,
    Ready(PropValue),
    Failed(String),
}

pub type ResourceListener = Box<dyn Fn(&str) + Send + Sync>;

/// Async state holder collaborator. Nodes that render deferred content read
/// the current state during the pass (never awaiting), and the engine
/// subscribes once so a completion triggers exactly one re-render through
/// the standard path.
pub trait ResourceProvider: Send + Sync {
    fn state(&self, key: &str) -> ResourceState;
    fn subscribe(&self, listener: ResourceListener);
}

/// In-memory provider; hosts and tests drive completion explicitly.
#[derive(Default)]
pub struct MemoryResourceProvider {
    entries: RwLock<HashMap<String, ResourceState>>,
    listeners: RwLock<Vec<ResourceListener>>,
}

impl MemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete(&self, key: &str, value: PropValue) {
        self.transition(key, ResourceState::Ready(value));
    }

    pub fn fail(&self, key: &str, message: impl Into<String>) {
        self.transition(key, ResourceState::Failed(message.into()));
    }

    fn transition(&self, key: &str, state: ResourceState) {
        self.entries
            .write()
            .expect("resource provider poisoned")
            .insert(key.to_string(), state);
        for listener in self
            .listeners
            .read()
            .expect("resource provider poisoned")
            .iter()
        {
            listener(key);
        }
    }
}

impl ResourceProvider for MemoryResourceProvider {
    fn state(&self, key: &str) -> ResourceState {
        self.entries
            .read()
            .expect("resource provider poisoned")
            .get(key)
            .cloned()
            .unwrap_or(ResourceState::Pending)
    }

    fn subscribe(&self, listener: ResourceListener) {
        self.listeners
            .write()
            .expect("resource provider poisoned")
            .push(listener);
    }
}
