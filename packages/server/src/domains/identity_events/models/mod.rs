pub mod event;

pub use event::SecurityEvent;
