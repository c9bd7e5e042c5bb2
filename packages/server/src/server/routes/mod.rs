// HTTP routes
pub mod events;
pub mod health;
pub mod profile;

pub use events::*;
pub use health::*;
pub use profile::*;
