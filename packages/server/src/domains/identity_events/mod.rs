pub mod authenticator;
pub mod deletion;
pub mod dispatch;
pub mod keys;
pub mod models;
pub mod reconciler;

pub use authenticator::{AuthenticationError, EventAuthenticator};
pub use deletion::handle_account_delete;
pub use dispatch::{dispatch_event, DispatchOutcome};
pub use keys::{KeySource, VerifyingKey, VerifyingKeyCache};
pub use models::event::SecurityEvent;
pub use reconciler::{reconcile, ReconcileError, ReconcileOutcome};
