// Common test utilities

pub mod fakes;
pub mod fixtures;
pub mod harness;
pub mod tokens;

pub use fakes::*;
pub use fixtures::*;
pub use harness::*;
pub use tokens::*;
