pub mod dispatcher;

pub use dispatcher::{CustomActionHandler, FlowDispatcher, FlowHandle, FlowOutcome, FlowPhase};
