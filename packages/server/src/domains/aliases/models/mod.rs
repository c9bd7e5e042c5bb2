pub mod deleted_address;
pub mod domain_address;
pub mod relay_address;

pub use deleted_address::DeletedAddress;
pub use domain_address::DomainAddress;
pub use relay_address::RelayAddress;
