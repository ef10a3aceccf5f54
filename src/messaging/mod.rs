// Messaging module
// Engine -> observer events and status notifications

pub mod channels;
pub mod event;
pub mod notification;

pub use channels::{EventBus, EventConsumer, EventProducer, create_event_channel};
pub use event::EngineEvent;
pub use notification::{Notification, NotificationCategory, NotificationLevel};
