pub mod action;
pub mod binding;
pub mod common;
pub mod document;
pub mod value;

pub use action::{ActionFlow, ActionStep, RequestTemplate};
pub use binding::Bind;
pub use common::CommonProps;
pub use document::{RawNode, SlotChildren, parse_document};
pub use value::{FromPropValue, PropValue};
