// Domain events
// Every successful company mutation is published and recorded off the request path

pub mod dispatcher;
pub mod models;

pub use dispatcher::{DispatchError, EventBus, EventDispatcher, LogEventBus};
pub use models::{Event, EventType};
