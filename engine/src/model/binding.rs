use log::debug;

use crate::expr::{ExprEvaluator, is_expression};
use crate::model::value::{FromPropValue, PropValue};
use crate::scope::ScopeContext;

/// A property that is either a fixed value or a deferred, scope-dependent
/// expression. Resolution never panics across the evaluation boundary: a
/// failed or wrong-typed evaluation degrades to `None` and the caller
/// applies its own default.
#[derive(Clone, Debug, PartialEq)]
pub enum Bind<T> {
    Value(T),
    Expr(String),
}

impl<T> Bind<T>
where
    T: FromPropValue + Clone,
{
    /// Wraps a raw JSON property. Strings matching the expression-prefix
    /// convention become deferred expressions; anything else is coerced to
    /// a literal `T` up front. Uncoercible literals are absent, not errors.
    pub fn from_raw(raw: &serde_json::Value) -> Option<Bind<T>> {
        if let serde_json::Value::String(text) = raw {
            if is_expression(text) {
                return Some(Bind::Expr(text.clone()));
            }
        }
        let value = PropValue::from(raw.clone());
        match T::from_prop(&value) {
            Some(literal) => Some(Bind::Value(literal)),
            None => {
                debug!("Property literal {:?} does not coerce; treating as absent", raw);
                None
            }
        }
    }

    pub fn resolve(&self, scope: &ScopeContext, evaluator: &dyn ExprEvaluator) -> Option<T> {
        match self {
            Bind::Value(literal) => Some(literal.clone()),
            Bind::Expr(source) => {
                let value = evaluator.evaluate(source, scope)?;
                let coerced = T::from_prop(&value);
                if coerced.is_none() {
                    debug!("Expression '{}' evaluated to mismatched type {:?}", source, value);
                }
                coerced
            }
        }
    }

    pub fn is_expr(&self) -> bool {
        matches!(self, Bind::Expr(_))
    }
}
