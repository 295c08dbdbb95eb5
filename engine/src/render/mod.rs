pub mod payload;
pub mod primitive;

pub use payload::RenderPayload;
pub use primitive::{Axis, EventHook, Primitive, RenderedNode, ResolvedCommon};
