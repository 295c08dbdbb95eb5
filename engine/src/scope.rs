use std::collections::HashMap;
use std::sync::Arc;

use crate::model::value::PropValue;

/// Chained, read-only variable environment used to resolve expressions.
///
/// A context is a stack of immutable frames. Deriving a context with
/// [`ScopeContext::chained_with`] never touches the original; the new frame
/// holds an `Arc` to its enclosing frame, so chains form a tree and are torn
/// down by normal ownership release.
#[derive(Clone, Debug, Default)]
pub struct ScopeContext {
    frame: Option<Arc<ScopeFrame>>,
}

#[derive(Debug)]
struct ScopeFrame {
    variables: HashMap<String, PropValue>,
    enclosing: Option<Arc<ScopeFrame>>,
}

impl ScopeContext {
    /// Context with no bindings at all; every lookup is undefined.
    pub fn empty() -> Self {
        Self { frame: None }
    }

    pub fn root(bindings: HashMap<String, PropValue>) -> Self {
        Self {
            frame: Some(Arc::new(ScopeFrame {
                variables: bindings,
                enclosing: None,
            })),
        }
    }

    /// Walks local bindings first, then the enclosing chain. A miss at the
    /// root frame is undefined, not an error.
    pub fn lookup(&self, name: &str) -> Option<&PropValue> {
        let mut frame = self.frame.as_deref();
        while let Some(current) = frame {
            if let Some(value) = current.variables.get(name) {
                return Some(value);
            }
            frame = current.enclosing.as_deref();
        }
        None
    }

    /// New context wrapping `self`. Names in `bindings` shadow the same
    /// names in any enclosing frame for lookups against the new context.
    pub fn chained_with(&self, bindings: HashMap<String, PropValue>) -> ScopeContext {
        Self {
            frame: Some(Arc::new(ScopeFrame {
                variables: bindings,
                enclosing: self.frame.clone(),
            })),
        }
    }

    /// Shadowing-aware view of every visible binding. Used for equality in
    /// tests and for debug output; lookups should go through [`lookup`].
    ///
    /// [`lookup`]: ScopeContext::lookup
    pub fn flattened(&self) -> HashMap<String, PropValue> {
        let mut merged = HashMap::new();
        let mut frames = Vec::new();
        let mut frame = self.frame.as_deref();
        while let Some(current) = frame {
            frames.push(current);
            frame = current.enclosing.as_deref();
        }
        // Outermost first so inner frames overwrite on collision.
        for current in frames.into_iter().rev() {
            for (k, v) in &current.variables {
                merged.insert(k.clone(), v.clone());
            }
        }
        merged
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = self.frame.as_deref();
        while let Some(current) = frame {
            depth += 1;
            frame = current.enclosing.as_deref();
        }
        depth
    }
}

impl PartialEq for ScopeContext {
    fn eq(&self, other: &Self) -> bool {
        self.flattened() == other.flattened()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(entries: &[(&str, PropValue)]) -> HashMap<String, PropValue> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn chained_binding_shadows_enclosing() {
        let base = ScopeContext::root(bindings(&[("x", PropValue::Integer(1))]));
        let derived = base.chained_with(bindings(&[("x", PropValue::Integer(2))]));

        assert_eq!(derived.lookup("x"), Some(&PropValue::Integer(2)));
        assert_eq!(base.lookup("x"), Some(&PropValue::Integer(1)));
    }

    #[test]
    fn lookup_falls_back_to_enclosing() {
        let base = ScopeContext::root(bindings(&[("x", PropValue::Integer(1))]));
        let derived = base.chained_with(bindings(&[("y", PropValue::Integer(5))]));

        assert_eq!(derived.lookup("x"), Some(&PropValue::Integer(1)));
        assert_eq!(derived.lookup("y"), Some(&PropValue::Integer(5)));
    }

    #[test]
    fn miss_at_root_is_undefined() {
        let scope = ScopeContext::root(bindings(&[("x", PropValue::Integer(1))]));
        assert_eq!(scope.lookup("missing"), None);
        assert_eq!(ScopeContext::empty().lookup("anything"), None);
    }

    #[test]
    fn flattened_applies_shadowing() {
        let base = ScopeContext::root(bindings(&[
            ("x", PropValue::Integer(1)),
            ("y", PropValue::Integer(2)),
        ]));
        let derived = base.chained_with(bindings(&[("x", PropValue::Integer(9))]));

        let flat = derived.flattened();
        assert_eq!(flat.get("x"), Some(&PropValue::Integer(9)));
        assert_eq!(flat.get("y"), Some(&PropValue::Integer(2)));
        assert_eq!(derived.depth(), 2);
    }

    #[test]
    fn contexts_with_equal_content_compare_equal() {
        let a = ScopeContext::root(bindings(&[("x", PropValue::Integer(1))]))
            .chained_with(bindings(&[("y", PropValue::Integer(2))]));
        let b = ScopeContext::root(bindings(&[
            ("x", PropValue::Integer(1)),
            ("y", PropValue::Integer(2)),
        ]));
        assert_eq!(a, b);
    }
}
