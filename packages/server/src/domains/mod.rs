pub mod accounts;
pub mod aliases;
pub mod auth;
pub mod identity_events;
