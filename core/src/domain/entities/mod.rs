//! Domain entities representing core business objects.

pub mod identity;
pub mod token;
pub mod user;

#[cfg(test)]
mod tests;

pub use identity::Identity;
pub use token::{AccessClaims, RefreshTokenRecord};
pub use user::{User, ROLE_ADMIN, ROLE_USER};
