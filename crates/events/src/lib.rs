//! Domain events: the event contract, per-aggregate recording, and publication plumbing.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod recorder;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use recorder::EventRecorder;
