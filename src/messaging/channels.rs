// Observer channels - Lock-free SPSC ring buffers from the engine to its subscribers

use crate::messaging::event::EngineEvent;
use ringbuf::traits::{Observer, Producer, Split};
use ringbuf::HeapRb;

pub type EventProducer = ringbuf::HeapProd<EngineEvent>;
pub type EventConsumer = ringbuf::HeapCons<EngineEvent>;

pub fn create_event_channel(capacity: usize) -> (EventProducer, EventConsumer) {
    let rb = HeapRb::<EngineEvent>::new(capacity);
    rb.split()
}

/// Fan-out of engine events to every subscriber.
/// A full subscriber loses the event; it never blocks the engine.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<EventProducer>,
    dropped: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber with its own buffer
    pub fn subscribe(&mut self, capacity: usize) -> EventConsumer {
        let (producer, consumer) = create_event_channel(capacity.max(1));
        self.subscribers.push(producer);
        consumer
    }

    /// Events lost to full buffers so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Subscribers whose consumer is still alive
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|p| p.read_is_held()).count()
    }

    pub fn publish(&mut self, event: EngineEvent) {
        // Forget subscribers that dropped their consumer
        self.subscribers.retain(|producer| producer.read_is_held());
        for producer in &mut self.subscribers {
            if producer.try_push(event.clone()).is_err() {
                self.dropped += 1;
                log::warn!("Event buffer full, dropping {:?}", event);
            }
        }
    }
}
