pub(crate) mod claims;
pub(crate) mod extractors;
pub mod jwt;

pub use extractors::AuthUser;
