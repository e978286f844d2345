mod credentials;
mod registry;

pub use self::credentials::ServiceAccount;
pub use self::registry::{Registry, RegistryAccess};
