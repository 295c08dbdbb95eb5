use std::collections::HashMap;
use std::sync::Arc;

use crate::resource::{MemoryResourceProvider, ResourceProvider};

/// Theme lookup: token name to a concrete color string the platform
/// understands. Color parsing itself is the platform's concern.
pub trait ThemeProvider: Send + Sync {
    fn color(&self, token: &str) -> Option<String>;
}

/// Asset lookup: logical asset name to a fetchable URL.
pub trait AssetResolver: Send + Sync {
    fn resolve_url(&self, name: &str) -> Option<String>;
}

pub struct StaticTheme {
    colors: HashMap<String, String>,
}

impl StaticTheme {
    pub fn new(colors: HashMap<String, String>) -> Self {
        Self { colors }
    }

    pub fn empty() -> Self {
        Self {
            colors: HashMap::new(),
        }
    }
}

impl ThemeProvider for StaticTheme {
    fn color(&self, token: &str) -> Option<String> {
        self.colors.get(token).cloned()
    }
}

/// Treats every asset name as already being a URL.
pub struct PassthroughAssets;

impl AssetResolver for PassthroughAssets {
    fn resolve_url(&self, name: &str) -> Option<String> {
        Some(name.to_string())
    }
}

/// Style and resource lookups carried by the render payload.
#[derive(Clone)]
pub struct StyleResolvers {
    pub theme: Arc<dyn ThemeProvider>,
    pub assets: Arc<dyn AssetResolver>,
    pub resources: Arc<dyn ResourceProvider>,
}

impl StyleResolvers {
    pub fn defaults() -> Self {
        Self {
            theme: Arc::new(StaticTheme::empty()),
            assets: Arc::new(PassthroughAssets),
            resources: Arc::new(MemoryResourceProvider::new()),
        }
    }

    /// Theme token if it resolves, otherwise the raw value (already a
    /// platform color).
    pub fn color_or_raw(&self, value: String) -> String {
        self.theme.color(&value).unwrap_or(value)
    }
}
