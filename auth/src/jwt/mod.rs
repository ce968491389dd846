pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::AccessClaims;
pub use claims::Role;
pub use claims::RoleError;
pub use errors::TokenError;
pub use handler::JwtHandler;
