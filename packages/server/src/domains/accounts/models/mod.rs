pub mod email_address;
pub mod linked_account;
pub mod profile;
pub mod user;

pub use email_address::EmailAddress;
pub use linked_account::{LinkedAccount, PROVIDER_ACCOUNTS};
pub use profile::Profile;
pub use user::User;
