use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    EventDispatcher,
    EventProducer,
    Handler,
    OrderAssignedEvent,
    OrderCompletedEvent,
    OrderPaidEvent,
    OrderStatusChangedEvent,
};

/// The producer ends handed to [`crate::OrderFlowApi`]. Cloneable; publishing to an empty vector is a no-op.
#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_paid_producer: Vec<EventProducer<OrderPaidEvent>>,
    pub order_assigned_producer: Vec<EventProducer<OrderAssignedEvent>>,
    pub status_changed_producer: Vec<EventProducer<OrderStatusChangedEvent>>,
    pub order_completed_producer: Vec<EventProducer<OrderCompletedEvent>>,
}

pub struct EventHandlers {
    pub on_order_paid: Option<EventDispatcher<OrderPaidEvent>>,
    pub on_order_assigned: Option<EventDispatcher<OrderAssignedEvent>>,
    pub on_status_changed: Option<EventDispatcher<OrderStatusChangedEvent>>,
    pub on_order_completed: Option<EventDispatcher<OrderCompletedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_paid = hooks.on_order_paid.map(|f| EventDispatcher::new(buffer_size, f));
        let on_order_assigned = hooks.on_order_assigned.map(|f| EventDispatcher::new(buffer_size, f));
        let on_status_changed = hooks.on_status_changed.map(|f| EventDispatcher::new(buffer_size, f));
        let on_order_completed = hooks.on_order_completed.map(|f| EventDispatcher::new(buffer_size, f));
        Self { on_order_paid, on_order_assigned, on_status_changed, on_order_completed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(dispatcher) = &self.on_order_paid {
            result.order_paid_producer.push(dispatcher.subscribe());
        }
        if let Some(dispatcher) = &self.on_order_assigned {
            result.order_assigned_producer.push(dispatcher.subscribe());
        }
        if let Some(dispatcher) = &self.on_status_changed {
            result.status_changed_producer.push(dispatcher.subscribe());
        }
        if let Some(dispatcher) = &self.on_order_completed {
            result.order_completed_producer.push(dispatcher.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(dispatcher) = self.on_order_paid {
            tokio::spawn(async move {
                dispatcher.run().await;
            });
        }
        if let Some(dispatcher) = self.on_order_assigned {
            tokio::spawn(async move {
                dispatcher.run().await;
            });
        }
        if let Some(dispatcher) = self.on_status_changed {
            tokio::spawn(async move {
                dispatcher.run().await;
            });
        }
        if let Some(dispatcher) = self.on_order_completed {
            tokio::spawn(async move {
                dispatcher.run().await;
            });
        }
    }
}

/// Hook registration. Set the closures you care about, build [`EventHandlers`] from it, hand
/// [`EventHandlers::producers`] to the API and start the handlers.
#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_paid: Option<Handler<OrderPaidEvent>>,
    pub on_order_assigned: Option<Handler<OrderAssignedEvent>>,
    pub on_status_changed: Option<Handler<OrderStatusChangedEvent>>,
    pub on_order_completed: Option<Handler<OrderCompletedEvent>>,
}

impl EventHooks {
    pub fn on_order_paid<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderPaidEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_paid = Some(Arc::new(f));
        self
    }

    pub fn on_order_assigned<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderAssignedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_assigned = Some(Arc::new(f));
        self
    }

    pub fn on_status_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderStatusChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_status_changed = Some(Arc::new(f));
        self
    }

    pub fn on_order_completed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderCompletedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_completed = Some(Arc::new(f));
        self
    }
}
