//! Authentication implementations.

mod jwt;
mod password;
mod reset;

pub use jwt::{JwtConfig, JwtTokenService};
pub use password::Argon2PasswordService;
pub use reset::JwtResetTokenService;
