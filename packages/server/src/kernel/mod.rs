pub mod accounts_client;
pub mod deps;
pub mod traits;

pub use accounts_client::AccountsProfileClient;
pub use deps::{RelayDeps, TracingMetrics, TracingReporter};
pub use traits::{BaseErrorReporter, BaseMetrics, BaseProfileClient, ProfileFetchError};
