use std::collections::HashMap;

use log::info;

use crate::model::value::PropValue;

/// Routing collaborator; the engine only dispatches into it from navigate
/// steps and takes no position on what a route is.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str, params: &HashMap<String, PropValue>);
}

pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: &str, _params: &HashMap<String, PropValue>) {
        info!("Navigation to '{}' ignored (no navigator configured)", route);
    }
}
