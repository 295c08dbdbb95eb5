use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use log::debug;
use lru::LruCache;

use crate::model::value::PropValue;
use crate::scope::ScopeContext;

/// A raw property string is an expression when it is rooted at the scope.
/// Everything else is a literal.
pub fn is_expression(raw: &str) -> bool {
    raw.starts_with("$.")
}

/// Black-box expression grammar collaborator. The engine only ever calls
/// `evaluate`; hosts may swap in a richer grammar. Evaluation must be
/// deterministic for a given source and scope content and must not mutate
/// state.
pub trait ExprEvaluator: Send + Sync {
    fn evaluate(&self, source: &str, scope: &ScopeContext) -> Option<PropValue>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum PathSegment {
    Key(String),
    Index(usize),
}

/// Built-in evaluator for dotted paths: `$.items[2].name`. The first
/// segment is looked up in the scope chain, the rest walk the value graph.
/// Parsed paths are kept in a bounded LRU so repeated render passes do not
/// re-parse the same sources.
pub struct PathEvaluator {
    cache: Mutex<LruCache<String, Arc<Vec<PathSegment>>>>,
}

const PATH_CACHE_CAPACITY: usize = 256;

impl PathEvaluator {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(PATH_CACHE_CAPACITY).unwrap(),
            )),
        }
    }

    fn segments(&self, source: &str) -> Option<Arc<Vec<PathSegment>>> {
        let mut cache = self.cache.lock().expect("path cache poisoned");
        if let Some(parsed) = cache.get(source) {
            return Some(Arc::clone(parsed));
        }
        drop(cache);

        let parsed = Arc::new(parse_path(source)?);
        let mut cache = self.cache.lock().expect("path cache poisoned");
        cache.put(source.to_string(), Arc::clone(&parsed));
        Some(parsed)
    }
}

impl Default for PathEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprEvaluator for PathEvaluator {
    fn evaluate(&self, source: &str, scope: &ScopeContext) -> Option<PropValue> {
        let segments = match self.segments(source) {
            Some(segments) => segments,
            None => {
                debug!("Unparseable expression '{}'", source);
                return None;
            }
        };

        let mut iter = segments.iter();
        let root = match iter.next() {
            Some(PathSegment::Key(name)) => scope.lookup(name)?,
            _ => return None,
        };

        let mut current = root;
        for segment in iter {
            current = match segment {
                PathSegment::Key(name) => current.field(name)?,
                PathSegment::Index(idx) => current.index(*idx)?,
            };
        }
        Some(current.clone())
    }
}

fn parse_path(source: &str) -> Option<Vec<PathSegment>> {
    let body = source.strip_prefix("$.")?;
    if body.is_empty() {
        return None;
    }

    let mut segments = Vec::new();
    for part in body.split('.') {
        let mut rest = part;
        let key_end = rest.find('[').unwrap_or(rest.len());
        let key = &rest[..key_end];
        if key.is_empty() {
            return None;
        }
        segments.push(PathSegment::Key(key.to_string()));
        rest = &rest[key_end..];

        while let Some(stripped) = rest.strip_prefix('[') {
            let close = stripped.find(']')?;
            let idx: usize = stripped[..close].parse().ok()?;
            segments.push(PathSegment::Index(idx));
            rest = &stripped[close + 1..];
        }
        if !rest.is_empty() {
            return None;
        }
    }
    Some(segments)
}
