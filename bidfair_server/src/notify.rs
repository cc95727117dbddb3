//! Outbound notifications.
//!
//! Delivery is out of band: verification codes and acceptance notices are handed to whatever
//! messaging channel is wired up here. The default wiring only logs, which is enough for
//! development and for the test suite; a real deployment plugs an SMS or WhatsApp client into
//! these two functions.

use bidfair_engine::{
    events::{EventHandlers, EventHooks},
    IssuedCode,
};
use log::*;

/// Hand a freshly issued verification code to the delivery channel.
pub fn deliver_code(issued: &IssuedCode) {
    info!("📨️ Verification code for {} queued for delivery", issued.identifier);
    // never raise this above debug in production
    debug!("📨️ Code for {}: {}", issued.identifier, issued.code);
}

/// Build the engine event handlers that drive notifications. Call
/// [`EventHandlers::start_handlers`] once the producers have been handed out.
pub fn create_event_handlers(buffer_size: usize) -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_bid_accepted(|ev| {
        Box::pin(async move {
            info!(
                "📨️ Order #{} [{}]: notifying customer {} that {}'s bid of {} was accepted, and partner {} at {} \
                 that they won the job",
                ev.order.id,
                ev.order.title,
                ev.customer_name,
                ev.partner_name,
                ev.bid.price,
                ev.partner_name,
                ev.partner_phone
            );
        })
    });
    EventHandlers::new(buffer_size, hooks)
}
