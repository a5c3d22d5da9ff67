//! Simple stateless pub-sub plumbing for engine events.
//!
//! A [`EventDispatcher`] owns the receiving end of a bounded channel and a single async handler. Any number of
//! [`EventProducer`]s can be subscribed before the dispatcher starts. The handlers are stateless: all they receive
//! is the event itself.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventDispatcher<E: Send + Sync + 'static> {
    receiver: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventDispatcher<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size);
        Self { receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Consumes events until every subscribed producer has been dropped, then waits for in-flight handler
    /// invocations to finish.
    pub async fn run(mut self) {
        debug!("📬️ Event dispatcher running");
        // drop the internal sender so the loop ends once the last subscriber is gone
        drop(self.sender);
        let mut jobs = JoinSet::new();
        while let Some(event) = self.receiver.recv().await {
            trace!("📬️ Dispatching event");
            let handler = Arc::clone(&self.handler);
            jobs.spawn(async move {
                (handler)(event).await;
            });
        }
        while let Some(finished) = jobs.join_next().await {
            if let Err(e) = finished {
                warn!("📬️ An event handler invocation panicked or was cancelled: {e}");
            }
        }
        debug!("📬️ Event dispatcher has shut down");
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[tokio::test]
    async fn dispatcher_runs_every_event_and_drains() {
        let _ = env_logger::try_init();
        let total = Arc::new(AtomicU64::new(0));
        let t2 = total.clone();
        let handler = Arc::new(move |v: u64| {
            let total = total.clone();
            Box::pin(async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
                let _ = total.fetch_add(v, Ordering::SeqCst);
            }) as Pin<Box<dyn Future<Output = ()> + Send>>
        });
        let dispatcher = EventDispatcher::new(2, handler);
        let producer_a = dispatcher.subscribe();
        let producer_b = dispatcher.subscribe();
        tokio::spawn(async move {
            for i in 0..5u64 {
                producer_a.publish_event(i * 2 + 1).await;
            }
        });
        tokio::spawn(async move {
            for i in 0..5u64 {
                producer_b.publish_event(i * 2).await;
            }
        });
        dispatcher.run().await;
        // 0..10 summed
        assert_eq!(t2.load(Ordering::SeqCst), 45);
    }
}
