//! Engine events.
//!
//! Notification delivery is not this crate's job. Instead, the order flow publishes events at the moments the
//! marketplace cares about (payment confirmed, order assigned, status changed, order completed) and upstream
//! surfaces subscribe whatever delivery they like. Publishing is fire-and-forget: a failed send is logged and never
//! propagated into the order flow.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventDispatcher, EventProducer, Handler};
pub use event_types::{OrderAssignedEvent, OrderCompletedEvent, OrderPaidEvent, OrderStatusChangedEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
