// Shared types and helpers used across domains
pub mod hashing;
pub mod subscriptions;

pub use hashing::sha256_hex;
pub use subscriptions::SubscriptionPlans;
