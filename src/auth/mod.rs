pub mod identity;
pub mod jwt;
mod types;

pub use identity::{CallerIdentityProvider, JwtIdentityProvider};
pub use types::{CallerId, Claims};
