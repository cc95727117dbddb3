//! Simple stateless pub-sub event plumbing.
//!
//! Events are how the engine hands side effects to the outside world without making them part
//! of a transaction: a producer publishes after commit, a handler task consumes at its own
//! pace, and a send that fails is logged and forgotten. No delivery guarantee is offered and
//! none is expected by the core.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::sync::mpsc;

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, listener) = mpsc::channel(buffer_size);
        Self { listener, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Runs until the last producer is dropped.
    pub async fn start_handler(mut self) {
        debug!("📬️ Starting event handler");
        // the internal sender must go, or the recv loop would never terminate
        drop(self.sender);
        while let Some(ev) = self.listener.recv().await {
            let handler = Arc::clone(&self.handler);
            tokio::spawn(async move {
                (handler)(ev).await;
                trace!("📬️ Event handled");
            });
        }
        debug!("📬️ Event handler has shut down");
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
