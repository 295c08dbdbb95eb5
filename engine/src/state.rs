use std::collections::HashMap;
use std::sync::RwLock;

use log::debug;

use crate::model::value::PropValue;

pub type StateListener = Box<dyn Fn(&str, &PropValue) + Send + Sync>;

/// Host-provided shared state. Injected through the engine, never ambient,
/// so tests can swap it. Writes must notify subscribers; the engine relies
/// on that to schedule re-renders. Ordering across concurrent flows is
/// last-writer-wins; the store itself takes no further position.
pub trait StateStore: Send + Sync {
    fn read(&self, key: &str) -> Option<PropValue>;
    fn write(&self, key: &str, value: PropValue);
    fn snapshot(&self) -> HashMap<String, PropValue>;
    fn subscribe(&self, listener: StateListener);
}

/// In-memory default store.
#[derive(Default)]
pub struct MemoryStateStore {
    entries: RwLock<HashMap<String, PropValue>>,
    listeners: RwLock<Vec<StateListener>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: HashMap<String, PropValue>) -> Self {
        Self {
            entries: RwLock::new(entries),
            listeners: RwLock::new(Vec::new()),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn read(&self, key: &str) -> Option<PropValue> {
        self.entries
            .read()
            .expect("state store poisoned")
            .get(key)
            .cloned()
    }

    fn write(&self, key: &str, value: PropValue) {
        debug!("State write '{}'", key);
        self.entries
            .write()
            .expect("state store poisoned")
            .insert(key.to_string(), value.clone());
        for listener in self.listeners.read().expect("state store poisoned").iter() {
            listener(key, &value);
        }
    }

    fn snapshot(&self) -> HashMap<String, PropValue> {
        self.entries.read().expect("state store poisoned").clone()
    }

    fn subscribe(&self, listener: StateListener) {
        self.listeners
            .write()
            .expect("state store poisoned")
            .push(listener);
    }
}
